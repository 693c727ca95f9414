use mongodb::bson::doc;
use mongodb::error::{Error, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::env;

use crate::models::employee::Employee;
use crate::models::payroll::PaymentRequest;
use crate::models::task::Task;

/// Handle to the three document collections. Constructed once at startup
/// and injected into handlers through `web::Data`.
#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    pub async fn connect() -> mongodb::error::Result<Self> {
        let uri = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let client = Client::with_uri_str(&uri).await?;
        let name = env::var("DATABASE_NAME").unwrap_or_else(|_| "TeamLoom-db".to_string());
        Ok(Store {
            db: client.database(&name),
        })
    }

    pub fn employees(&self) -> Collection<Employee> {
        self.db.collection("employee")
    }

    pub fn tasks(&self) -> Collection<Task> {
        self.db.collection("tasks")
    }

    pub fn payroll(&self) -> Collection<PaymentRequest> {
        self.db.collection("payroll")
    }

    /// Unique indexes close the check-then-insert races: one employee per
    /// email, one payroll request per (employee_id, month, year).
    pub async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let unique = IndexOptions::builder().unique(true).build();

        self.employees()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;

        self.payroll()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "employee_id": 1, "month": 1, "year": 1 })
                    .options(unique)
                    .build(),
            )
            .await?;

        Ok(())
    }
}

pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => write_err.code == 11000,
        _ => false,
    }
}
