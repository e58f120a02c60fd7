//! Initial database migration.
//!
//! Creates the enum, all core tables, and their indexes. Reference rules:
//! line items cascade with their parent document; customers, products,
//! invoices, and original sales are protected while referenced.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_ITEMS_SQL).await?;
        db.execute_unprepared(SALE_DOCUMENTS_SQL).await?;
        db.execute_unprepared(DOCUMENT_ITEMS_SQL).await?;
        db.execute_unprepared(SALES_REPORTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Sale document types
CREATE TYPE doc_type AS ENUM (
    'cashless',
    'cash',
    'return'
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    is_company BOOLEAN NOT NULL DEFAULT FALSE,
    contact TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_customers_name ON customers (name);
CREATE INDEX idx_customers_is_company ON customers (is_company);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
    quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_products_name ON products (name);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    number VARCHAR(20) NOT NULL UNIQUE,
    date DATE NOT NULL,
    customer_id UUID NOT NULL REFERENCES customers (id) ON DELETE RESTRICT,
    is_paid BOOLEAN NOT NULL DEFAULT FALSE,
    total NUMERIC(12, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_invoices_date ON invoices (date);
CREATE INDEX idx_invoices_is_paid ON invoices (is_paid);
CREATE INDEX idx_invoices_customer ON invoices (customer_id);
";

const INVOICE_ITEMS_SQL: &str = r"
CREATE TABLE invoice_items (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices (id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products (id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL CHECK (quantity >= 1),
    price NUMERIC(10, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT unique_invoice_product UNIQUE (invoice_id, product_id)
);

CREATE INDEX idx_invoice_items_invoice ON invoice_items (invoice_id);
";

const SALE_DOCUMENTS_SQL: &str = r"
CREATE TABLE sale_documents (
    id UUID PRIMARY KEY,
    doc_type doc_type NOT NULL,
    number VARCHAR(20) NOT NULL UNIQUE,
    date DATE NOT NULL,
    total NUMERIC(12, 2) NOT NULL DEFAULT 0,
    customer_id UUID NOT NULL REFERENCES customers (id) ON DELETE RESTRICT,
    -- cashless sales: the settled invoice, at most one document per invoice
    invoice_id UUID UNIQUE REFERENCES invoices (id) ON DELETE RESTRICT,
    -- cash sales
    cash_register VARCHAR(50),
    -- returns: the original sale, at most one return per sale
    original_sale_id UUID UNIQUE REFERENCES sale_documents (id) ON DELETE RESTRICT,
    reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_sale_documents_type_date ON sale_documents (doc_type, date);
CREATE INDEX idx_sale_documents_customer ON sale_documents (customer_id);
";

const DOCUMENT_ITEMS_SQL: &str = r"
CREATE TABLE document_items (
    id UUID PRIMARY KEY,
    document_id UUID NOT NULL REFERENCES sale_documents (id) ON DELETE CASCADE,
    product_id UUID NOT NULL REFERENCES products (id) ON DELETE RESTRICT,
    quantity INTEGER NOT NULL CHECK (quantity >= 1),
    price NUMERIC(10, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT unique_product_per_document UNIQUE (document_id, product_id)
);

CREATE INDEX idx_document_items_document ON document_items (document_id);
";

const SALES_REPORTS_SQL: &str = r"
CREATE TABLE sales_reports (
    id UUID PRIMARY KEY,
    report_type doc_type,
    start_date DATE,
    end_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS sales_reports;
DROP TABLE IF EXISTS document_items;
DROP TABLE IF EXISTS sale_documents;
DROP TABLE IF EXISTS invoice_items;
DROP TABLE IF EXISTS invoices;
DROP TABLE IF EXISTS products;
DROP TABLE IF EXISTS customers;
DROP TYPE IF EXISTS doc_type;
";
