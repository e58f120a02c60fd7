//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Repositories own the transaction boundaries: every compound operation
//! (document save + numbering + stock adjustment + total recalculation, or a
//! single item mutation with its side effects) executes inside one database
//! transaction.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CustomerRepository, InvoiceRepository, ProductRepository, ReportRepository,
    SaleDocumentRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
