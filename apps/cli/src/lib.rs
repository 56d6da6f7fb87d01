//! # Applemar CLI Library
//!
//! Command-line front end of the Applemar business manager.
//!
//! ## Module Organization
//! ```text
//! applemar_cli/
//! ├── lib.rs          ◄─── You are here (arguments, startup, dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── dashboard.rs◄─── Painel financeiro
//! │   ├── sale.rs     ◄─── Checkout and sales history
//! │   ├── expense.rs  ◄─── Operating costs
//! │   ├── product.rs  ◄─── Inventory
//! │   ├── customer.rs ◄─── CRM
//! │   ├── report.rs   ◄─── Report centre and printable statement
//! │   ├── insight.rs  ◄─── AI advisory
//! │   └── data.rs     ◄─── Reset
//! ├── output.rs       ◄─── Text / JSON rendering
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use chrono::Utc;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use applemar_advisor::Advisor;
use applemar_core::report::{KindFilter, Period, TransactionFilter};
use applemar_core::{Money, PaymentMethod};
use applemar_db::Database;

use commands::customer::NewCustomer;
use commands::expense::{NewExpense, DEFAULT_EXPENSE_CATEGORY};
use commands::product::{NewProduct, ProductChanges};
use commands::sale::{CheckoutRequest, LineRequest};
use error::ApiError;
use output::Output;
use state::{ConfigState, DbState};

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "applemar")]
#[command(about = "Gestão financeira e comercial da Applemar Company Lda")]
#[command(version)]
pub struct Cli {
    /// Database file (default: platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Answer "sim" to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Painel financeiro: KPIs, sales goal, monthly flow, stock alerts
    Dashboard {
        /// all | today | month | year
        #[arg(long, default_value = "all")]
        period: Period,

        /// Sales target in Kz for this view
        #[arg(long, value_parser = Money::parse)]
        target: Option<Money>,
    },

    /// Point of sale
    #[command(subcommand)]
    Sale(SaleCommand),

    /// Operating costs
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Inventory
    #[command(subcommand)]
    Product(ProductCommand),

    /// CRM
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Report centre and printable statement
    #[command(subcommand)]
    Report(ReportCommand),

    /// AI financial advisory
    Insights,

    /// Erase all products, transactions and customers
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum SaleCommand {
    /// Sell one or more products
    Checkout {
        /// Line as ID or ID:QTY (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<LineRequest>,

        /// Customer id
        #[arg(long)]
        customer: Option<String>,

        /// cash | multicaixa | transfer
        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,
    },

    /// Sales history
    List,

    /// Void a sale (stock is not restored)
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// Record a paid expense
    Add {
        #[arg(long)]
        description: String,

        /// Amount in Kz, e.g. "45000" or "45 000,50"
        #[arg(long, value_parser = Money::parse)]
        amount: Money,

        #[arg(long, default_value = DEFAULT_EXPENSE_CATEGORY)]
        category: String,

        /// cash | multicaixa | transfer
        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,
    },

    /// List expenses
    List,

    /// Delete an expense
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// Add a product
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        /// Selling price in Kz
        #[arg(long, value_parser = Money::parse)]
        price: Money,

        /// Cost price in Kz
        #[arg(long, value_parser = Money::parse)]
        cost: Money,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        stock: i64,

        /// Image URL (default: generated placeholder)
        #[arg(long)]
        image: Option<String>,
    },

    /// Change fields of a product
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_parser = Money::parse)]
        price: Option<Money>,

        #[arg(long, value_parser = Money::parse)]
        cost: Option<Money>,

        #[arg(long, allow_negative_numbers = true)]
        stock: Option<i64>,

        /// Image URL; an empty value removes it
        #[arg(long)]
        image: Option<String>,
    },

    /// Delete a product
    Delete { id: String },

    /// List products
    List {
        /// Name or category contains
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    /// Add a customer
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        nif: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Delete a customer
    Delete { id: String },

    /// List customers
    List {
        /// Name or NIF contains
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Ledger with KPIs
    List {
        /// Description, id or category contains
        #[arg(long, default_value = "")]
        search: String,

        /// all | income | expense
        #[arg(long = "type", default_value = "all")]
        kind: KindFilter,
    },

    /// Printable statement on stdout
    Print {
        #[arg(long, default_value = "")]
        search: String,

        #[arg(long = "type", default_value = "all")]
        kind: KindFilter,
    },

    /// Delete a ledger entry
    Delete { id: String },
}

// =============================================================================
// Startup
// =============================================================================

/// Runs one CLI invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber on stderr, RUST_LOG overrides                  │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • ConfigState::from_env (APPLEMAR_*)                                │
/// │                                                                         │
/// │  3. Determine Database Path ──────────────────────────────────────────► │
/// │     • --db, then APPLEMAR_DB_PATH, then the platform data dir           │
/// │                                                                         │
/// │  4. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │                                                                         │
/// │  5. Dispatch the subcommand, print its result, close the pool           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    init_tracing(cli.verbose);

    info!("Starting Applemar");

    let config = ConfigState::from_env();
    let db_path = get_database_path(cli.db.clone())?;
    info!(?db_path, "Database path determined");

    let db_state = DbState::open(db_path).await?;
    let out = Output::new(cli.json, &config);

    let result = dispatch(cli.command, db_state.inner(), &config, out, cli.yes).await;

    db_state.close().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - Default: warnings only, so command output stays clean
/// - `--verbose`: `info,applemar=debug,sqlx=warn`
/// - `RUST_LOG` overrides both
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    log_subscriber(filter, io::stderr).init();
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,applemar=debug,sqlx=warn"
    } else {
        "warn"
    }
}

/// The EnvFilter is the only level gate; adding a max level on top would
/// replace it.
fn log_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/ao.applemar.applemar/applemar.db`
/// - **Windows**: `%APPDATA%\applemar\applemar\data\applemar.db`
/// - **Linux**: `~/.local/share/applemar/applemar.db`
///
/// ## Overrides
/// `--db` wins over the `APPLEMAR_DB_PATH` environment variable.
pub fn get_database_path(explicit: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    if let Ok(path) = std::env::var("APPLEMAR_DB_PATH") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let proj_dirs = ProjectDirs::from("ao", "applemar", "applemar")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir).map_err(|e| {
        ApiError::internal(format!(
            "Could not create {}: {}",
            data_dir.display(),
            e
        ))
    })?;

    Ok(data_dir.join("applemar.db"))
}

/// Asks `question` on stderr and waits for "s"/"sim".
///
/// `assume_yes` skips the prompt. Anything else, including end of input,
/// cancels.
pub fn confirm(question: &str, assume_yes: bool) -> Result<(), ApiError> {
    if assume_yes {
        return Ok(());
    }

    let stdin = io::stdin();
    confirm_with(question, &mut stdin.lock(), &mut io::stderr())
}

fn confirm_with<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    prompt: &mut W,
) -> Result<(), ApiError> {
    let _ = write!(prompt, "{} [s/N] ", question);
    let _ = prompt.flush();

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| ApiError::internal(format!("Could not read answer: {}", e)))?;

    match answer.trim().to_lowercase().as_str() {
        "s" | "sim" | "y" | "yes" => Ok(()),
        _ => {
            debug!("Confirmation declined");
            Err(ApiError::cancelled())
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

async fn dispatch(
    command: Commands,
    db: &Database,
    config: &ConfigState,
    out: Output<'_>,
    yes: bool,
) -> Result<(), ApiError> {
    let threshold = config.low_stock_threshold;

    match command {
        Commands::Dashboard { period, target } => {
            let view = commands::dashboard::dashboard(db, config, period, target, Utc::now()).await?;
            out.show(&view)
        }

        Commands::Sale(SaleCommand::Checkout {
            items,
            customer,
            payment,
        }) => {
            let request = CheckoutRequest {
                items,
                payment_method: payment,
                customer_id: customer,
            };
            let receipt = commands::sale::checkout(db, config, request, Utc::now()).await?;
            out.done("Venda finalizada com sucesso! Recibo gerado.", &receipt)
        }
        Commands::Sale(SaleCommand::List) => out.show(&commands::sale::list_sales(db).await?),
        Commands::Sale(SaleCommand::Delete { id }) => {
            confirm("Tem certeza que deseja anular esta venda?", yes)?;
            let sale = commands::sale::void_sale(db, &id).await?;
            out.done("Venda anulada.", &sale)
        }

        Commands::Expense(ExpenseCommand::Add {
            description,
            amount,
            category,
            payment,
        }) => {
            let input = NewExpense {
                description,
                amount,
                category,
                payment_method: payment,
            };
            let expense = commands::expense::add_expense(db, input, Utc::now()).await?;
            out.done("Despesa registada.", &expense)
        }
        Commands::Expense(ExpenseCommand::List) => {
            out.show(&commands::expense::list_expenses(db).await?)
        }
        Commands::Expense(ExpenseCommand::Delete { id }) => {
            confirm("Eliminar registo de despesa?", yes)?;
            let expense = commands::expense::delete_expense(db, &id).await?;
            out.done("Despesa eliminada.", &expense)
        }

        Commands::Product(ProductCommand::Add {
            name,
            category,
            price,
            cost,
            stock,
            image,
        }) => {
            let input = NewProduct {
                name,
                category,
                price,
                cost_price: cost,
                stock,
                image,
            };
            let product = commands::product::add_product(db, input, threshold).await?;
            out.done("Produto registado.", &product)
        }
        Commands::Product(ProductCommand::Edit {
            id,
            name,
            category,
            price,
            cost,
            stock,
            image,
        }) => {
            let changes = ProductChanges {
                name,
                category,
                price,
                cost_price: cost,
                stock,
                image,
            };
            let product = commands::product::edit_product(db, &id, changes, threshold).await?;
            out.done("Produto atualizado.", &product)
        }
        Commands::Product(ProductCommand::Delete { id }) => {
            confirm(
                "Atenção Applemar: Deseja excluir este item permanentemente do inventário?",
                yes,
            )?;
            let product = commands::product::delete_product(db, &id, threshold).await?;
            out.done("Produto removido.", &product)
        }
        Commands::Product(ProductCommand::List { search }) => {
            let view = commands::product::list_products(db, search.as_deref(), threshold).await?;
            out.show(&view)
        }

        Commands::Customer(CustomerCommand::Add {
            name,
            nif,
            email,
            phone,
        }) => {
            let input = NewCustomer {
                name,
                nif,
                email,
                phone,
            };
            let customer = commands::customer::add_customer(db, input).await?;
            out.done("Cliente registado.", &customer)
        }
        Commands::Customer(CustomerCommand::Delete { id }) => {
            confirm("Eliminar cliente?", yes)?;
            let customer = commands::customer::delete_customer(db, &id).await?;
            out.done("Cliente eliminado.", &customer)
        }
        Commands::Customer(CustomerCommand::List { search }) => {
            out.show(&commands::customer::list_customers(db, search.as_deref()).await?)
        }

        Commands::Report(ReportCommand::List { search, kind }) => {
            let filter = TransactionFilter::new(search, kind);
            out.show(&commands::report::list_transactions(db, filter).await?)
        }
        Commands::Report(ReportCommand::Print { search, kind }) => {
            let filter = TransactionFilter::new(search, kind);
            let statement =
                commands::report::print_statement(db, config, filter, Utc::now()).await?;
            out.text("statement", &statement)
        }
        Commands::Report(ReportCommand::Delete { id }) => {
            confirm(
                "Atenção Applemar: A remoção deste registo irá alterar o saldo global da empresa. Continuar?",
                yes,
            )?;
            let txn = commands::report::delete_transaction(db, &id).await?;
            out.done("Registo removido.", &txn)
        }

        Commands::Insights => {
            let advisor = Advisor::from_env();
            let view = commands::insight::generate_insights(db, config, &advisor).await?;
            out.show(&view)
        }

        Commands::Reset => {
            confirm(
                "Atenção: Todos os dados financeiros serão apagados permanentemente. Deseja continuar?",
                yes,
            )?;
            out.show(&commands::data::reset_data(db).await?)
        }
    }
}
