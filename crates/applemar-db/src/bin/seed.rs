//! # Seed Data Generator
//!
//! Populates the local store with a demo Luanda shop.
//!
//! ## Usage
//! ```bash
//! # Seed ./applemar_dev.db
//! cargo run -p applemar-db --bin seed
//!
//! # Specify database path
//! cargo run -p applemar-db --bin seed -- --db ./data/applemar.db
//!
//! # Wipe and reseed
//! cargo run -p applemar-db --bin seed -- --force
//! ```
//!
//! ## Generated Data
//! - Products across Bebidas, Mercearia, Higiene and Limpeza, a couple of
//!   them below the critical stock level
//! - Business customers with NIFs
//! - A few operating expenses
//! - Demo sales recorded through the normal checkout path, so stock and
//!   IVA figures are consistent

use chrono::{Duration, Utc};
use clap::Parser;
use std::path::PathBuf;

use applemar_core::{Cart, Customer, Money, PaymentMethod, Product, Transaction};
use applemar_db::{Database, DbConfig};

/// (name, category, price Kz, cost Kz, stock)
const PRODUCTS: &[(&str, &str, i64, i64, i64)] = &[
    ("Água Pura 1.5L", "Bebidas", 250, 150, 120),
    ("Cuca Lata 350ml", "Bebidas", 500, 320, 96),
    ("Sumo Compal 1L", "Bebidas", 1_200, 800, 36),
    ("Coca-Cola 330ml", "Bebidas", 450, 290, 4),
    ("Arroz Tio Lucas 5kg", "Mercearia", 6_500, 5_000, 25),
    ("Óleo Fula 1L", "Mercearia", 2_200, 1_600, 40),
    ("Fuba de Milho 1kg", "Mercearia", 900, 600, 60),
    ("Açúcar Branco 1kg", "Mercearia", 1_100, 750, 2),
    ("Café Ginga 250g", "Mercearia", 2_800, 1_900, 18),
    ("Sabão Macaco", "Higiene", 350, 200, 80),
    ("Pasta Dentífrica Colgate", "Higiene", 1_500, 1_000, 22),
    ("Lixívia 1L", "Limpeza", 900, 550, 30),
];

/// (name, nif, email, phone)
const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    (
        "Sonangol Distribuição",
        "5000000338",
        "compras@sonangol.co.ao",
        "+244 222 000 001",
    ),
    (
        "Hotel Presidente Luanda",
        "5410002345",
        "reservas@hotelpresidente.ao",
        "+244 222 311 900",
    ),
    ("Maria João Fernandes", "004567890LA042", "", "+244 923 456 789"),
];

/// (category, description, amount Kz, days ago)
const EXPENSES: &[(&str, &str, i64, i64)] = &[
    ("Instalações", "Renda do armazém", 150_000, 20),
    ("Operacional", "Combustível do gerador", 35_000, 9),
    ("Pessoal", "Salários do mês", 280_000, 3),
];

/// Applemar Seed Data Generator
#[derive(Debug, Parser)]
#[command(name = "seed", about = "Populates the Applemar store with demo data")]
struct SeedArgs {
    /// Database file path
    #[arg(short, long, default_value = "./applemar_dev.db")]
    db: PathBuf,

    /// Clear the store before seeding
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = SeedArgs::parse();
    let db_path = args.db;

    println!("🌱 Applemar Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path.display());
    println!();

    let db = Database::new(DbConfig::new(db_path.clone())).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if args.force {
        let removed = db.clear_all().await?;
        println!("✓ Cleared {} storage keys", removed);
    }

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Store already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Run with --force to reseed.");
        return Ok(());
    }

    let products: Vec<Product> = PRODUCTS
        .iter()
        .map(|(name, category, price, cost, stock)| {
            Product::new(
                *name,
                Money::from_kwanza(*price),
                Money::from_kwanza(*cost),
                *stock,
                *category,
            )
        })
        .collect();
    db.products().replace_all(&products).await?;
    println!("✓ {} products", products.len());

    let customers: Vec<Customer> = CUSTOMERS
        .iter()
        .map(|(name, nif, email, phone)| Customer::new(*name, *nif, *email, *phone))
        .collect();
    db.customers().replace_all(&customers).await?;
    println!("✓ {} customers", customers.len());

    let now = Utc::now();
    for (category, description, amount, days_ago) in EXPENSES {
        let expense = Transaction::expense(
            *category,
            *description,
            Money::from_kwanza(*amount),
            PaymentMethod::Transfer,
            now - Duration::days(*days_ago),
        );
        db.transactions().prepend(expense).await?;
    }
    println!("✓ {} expenses", EXPENSES.len());

    // (product indices with quantities, payment, customer index, days ago)
    let sales: &[(&[(usize, i64)], PaymentMethod, Option<usize>, i64)] = &[
        (&[(0, 12), (1, 6)], PaymentMethod::Cash, None, 15),
        (&[(4, 2), (5, 3), (6, 5)], PaymentMethod::Multicaixa, Some(2), 6),
        (&[(2, 10), (8, 4)], PaymentMethod::Transfer, Some(1), 1),
    ];

    for (lines, method, customer, days_ago) in sales {
        let mut cart = Cart::new();
        for (index, quantity) in lines.iter() {
            cart.add_item(&products[*index], *quantity)?;
        }
        let customer_id = customer.map(|c| customers[c].id.clone());
        let sale = cart.to_sale(*method, customer_id, now - Duration::days(*days_ago))?;
        db.sales().record(sale).await?;
    }
    println!("✓ {} sales", sales.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
