//! `SeaORM` entity definitions for the Lavka schema.

pub mod customers;
pub mod document_items;
pub mod invoice_items;
pub mod invoices;
pub mod products;
pub mod sale_documents;
pub mod sales_reports;
pub mod sea_orm_active_enums;
