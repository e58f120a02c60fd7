//! `SeaORM` active enums mirroring the Postgres enum types.

use lavka_core::documents::DocumentKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale document type (`doc_type` Postgres enum).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "doc_type")]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Cashless sale backed by a paid invoice.
    #[sea_orm(string_value = "cashless")]
    Cashless,
    /// Cash sale rung up on a register.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Return of goods against an earlier sale.
    #[sea_orm(string_value = "return")]
    Return,
}

impl From<DocumentKind> for DocType {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Cashless => Self::Cashless,
            DocumentKind::Cash => Self::Cash,
            DocumentKind::Return => Self::Return,
        }
    }
}

impl From<DocType> for DocumentKind {
    fn from(doc_type: DocType) -> Self {
        match doc_type {
            DocType::Cashless => Self::Cashless,
            DocType::Cash => Self::Cash,
            DocType::Return => Self::Return,
        }
    }
}
