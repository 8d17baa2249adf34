use std::fmt;

use thiserror::Error;

/// Why a header row could not be mapped onto the transaction fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The file contained no non-blank line to use as a header.
    MissingHeader,
    /// Required fields with no matching column, in canonical order.
    MissingFields(Vec<&'static str>),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "CSV is empty (no header row)"),
            Self::MissingFields(fields) => {
                write!(f, "CSV missing required field: {}", fields.join(", "))
            }
        }
    }
}

/// The rule a data row broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRule {
    MissingField(&'static str),
    InvalidDate(String),
    InvalidType(String),
    InvalidAmount(String),
}

impl fmt::Display for RowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field '{field}'"),
            Self::InvalidDate(v) => write!(f, "invalid date format '{v}'"),
            Self::InvalidType(v) => {
                write!(f, "type must be either \"expense\" or \"income\" (got '{v}')")
            }
            Self::InvalidAmount(v) => write!(f, "amount '{v}' is not a number"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TenCentsError {
    #[error("Schema error: {0}")]
    Schema(SchemaError),

    #[error("Row {line}: {rule}")]
    Row { line: usize, rule: RowRule },

    #[error("Error reading file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Not a CSV file: {0}")]
    NotCsv(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl From<SchemaError> for TenCentsError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

pub type Result<T> = std::result::Result<T, TenCentsError>;
