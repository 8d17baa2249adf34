//! Ten Cents: read transaction exports and break them down by category and
//! note, ready to draw as an expandable bar chart.
//!
//! The pipeline is [`resolve_schema`] → [`decode_row`] (per row, or
//! [`importer::decode_csv`] for a whole file) → [`aggregate`] → [`flatten`].

pub mod aggregate;
pub mod error;
pub mod export;
pub mod flatten;
pub mod fmt;
pub mod importer;
pub mod models;
pub mod schema;
pub mod session;
pub mod settings;
pub mod store;

pub use aggregate::aggregate;
pub use error::{Result, TenCentsError};
pub use flatten::{flatten, toggle, ExpandedSet, RenderRow};
pub use importer::{decode_row, AmountPolicy};
pub use models::{Category, DateRange, Filters, Kind, KindFilter, Subcategory, Transaction};
pub use schema::{resolve_schema, ColumnMap, Field};
pub use session::{LoadOutcome, LoadTicket, Session};
