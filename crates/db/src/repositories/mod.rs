//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Each compound operation runs inside a single database transaction so the
//! numbering, stock, and total rules land together or not at all.

pub mod customer;
pub mod invoice;
pub mod product;
pub mod report;
pub mod sale_document;

pub use customer::{CreateCustomerInput, CustomerError, CustomerRepository, UpdateCustomerInput};
pub use invoice::{CreateInvoiceInput, InvoiceError, InvoiceRepository, InvoiceWithItems};
pub use product::{CreateProductInput, ProductError, ProductRepository, UpdateProductInput};
pub use report::{ReportRepository, ReportRepositoryError};
pub use sale_document::{
    CreateSaleDocumentInput, DocumentWithItems, JournalFilter, SaleDocumentError,
    SaleDocumentRepository,
};
