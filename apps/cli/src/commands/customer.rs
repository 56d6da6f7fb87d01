//! # Customer Commands
//!
//! CRM list: add, delete and search business customers.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use applemar_core::report::search_customers;
use applemar_core::validation::{
    validate_customer_name, validate_email, validate_nif, validate_search_query,
};
use applemar_core::Customer;
use applemar_db::Database;

/// Fields of a new customer. Only the name is required.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub nif: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerList {
    pub customers: Vec<Customer>,
    /// Size of the whole list, before searching.
    pub total: usize,
}

/// Appends a customer to the CRM list.
pub async fn add_customer(db: &Database, input: NewCustomer) -> Result<Customer, ApiError> {
    debug!(name = %input.name, "add_customer command");

    let name = validate_customer_name(&input.name)?;
    let nif = validate_nif(&input.nif)?;
    let email = validate_email(&input.email)?;

    let customer = Customer::new(name, nif, email, input.phone.trim());
    db.customers().append(customer.clone()).await?;

    info!(id = %customer.id, name = %customer.name, "Customer added");
    Ok(customer)
}

/// Removes a customer. Sales that referenced it keep the id.
pub async fn delete_customer(db: &Database, id: &str) -> Result<Customer, ApiError> {
    debug!(id = %id, "delete_customer command");

    let removed = db.customers().delete(id).await?;

    info!(id = %removed.id, "Customer deleted");
    Ok(removed)
}

/// Lists customers whose name or NIF matches `query`.
pub async fn list_customers(db: &Database, query: Option<&str>) -> Result<CustomerList, ApiError> {
    let query = validate_search_query(query.unwrap_or_default())?;
    debug!(query = %query, "list_customers command");

    let all = db.customers().list().await?;
    let customers = search_customers(&all, &query)
        .into_iter()
        .cloned()
        .collect();

    Ok(CustomerList {
        customers,
        total: all.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use applemar_db::DbConfig;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn hotel() -> NewCustomer {
        NewCustomer {
            name: "Hotel Presidente Luanda".to_string(),
            nif: "5410002345".to_string(),
            email: "reservas@hotelpresidente.ao".to_string(),
            phone: "+244 222 311 900".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_search() {
        let db = db().await;
        add_customer(&db, hotel()).await.unwrap();
        add_customer(
            &db,
            NewCustomer {
                name: "Maria Kiala".to_string(),
                ..NewCustomer::default()
            },
        )
        .await
        .unwrap();

        let by_name = list_customers(&db, Some("presidente")).await.unwrap();
        assert_eq!(by_name.customers.len(), 1);
        assert_eq!(by_name.total, 2);

        let by_nif = list_customers(&db, Some("541000")).await.unwrap();
        assert_eq!(by_nif.customers[0].name, "Hotel Presidente Luanda");

        let all = list_customers(&db, None).await.unwrap();
        assert_eq!(all.customers.len(), 2);
        assert_eq!(all.customers[1].name, "Maria Kiala");
    }

    #[tokio::test]
    async fn test_add_validates_fields() {
        let db = db().await;

        let mut input = hotel();
        input.email = "reservas.hotel.ao".to_string();
        let err = add_customer(&db, input).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let mut input = hotel();
        input.name = String::new();
        assert!(add_customer(&db, input).await.is_err());

        assert_eq!(db.customers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = db().await;
        let customer = add_customer(&db, hotel()).await.unwrap();

        let removed = delete_customer(&db, &customer.id).await.unwrap();
        assert_eq!(removed, customer);
        assert_eq!(db.customers().count().await.unwrap(), 0);

        let err = delete_customer(&db, &customer.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
