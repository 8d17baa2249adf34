//! Header resolution: map whichever export format's header row onto the
//! canonical transaction fields.

use std::collections::HashMap;

use tracing::debug;

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Date,
    Icon,
    Name,
    DestinationName,
    DestinationIcon,
    Note,
    Amount,
    Currency,
    Type,
    Recurring,
}

impl Field {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Icon => "icon",
            Self::Name => "name",
            Self::DestinationName => "destinationName",
            Self::DestinationIcon => "destinationIcon",
            Self::Note => "note",
            Self::Amount => "amount",
            Self::Currency => "currency",
            Self::Type => "type",
            Self::Recurring => "recurring",
        }
    }
}

/// Lower-cased header text -> canonical field. Legacy exports use the
/// short names, newer ones the source/destination variants.
const ALIASES: &[(&str, Field)] = &[
    ("date", Field::Date),
    ("icon", Field::Icon),
    ("source icon", Field::Icon),
    ("name", Field::Name),
    ("source name", Field::Name),
    ("destination name", Field::DestinationName),
    ("destination icon", Field::DestinationIcon),
    ("note", Field::Note),
    ("amount", Field::Amount),
    ("currency", Field::Currency),
    ("type", Field::Type),
    ("recurring", Field::Recurring),
];

pub const REQUIRED: &[Field] = &[Field::Date, Field::Name, Field::Amount, Field::Type];

fn field_for_header(header: &str) -> Option<Field> {
    let normalized = header.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, field)| *field)
}

/// Canonical field -> column index for one file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMap {
    columns: HashMap<Field, usize>,
}

impl ColumnMap {
    pub fn index(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Resolved fields in canonical order.
    pub fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = self.columns.keys().copied().collect();
        fields.sort();
        fields
    }
}

/// Build the column map for a header row. The first column matching a field
/// wins; unknown headers are ignored. Fails when any of date, name, amount
/// or type has no column.
pub fn resolve_schema<S: AsRef<str>>(header: &[S]) -> Result<ColumnMap, SchemaError> {
    if header.iter().all(|h| h.as_ref().trim().is_empty()) {
        return Err(SchemaError::MissingHeader);
    }

    let mut columns = HashMap::new();
    for (i, cell) in header.iter().enumerate() {
        if let Some(field) = field_for_header(cell.as_ref()) {
            columns.entry(field).or_insert(i);
        }
    }

    let missing: Vec<&'static str> = REQUIRED
        .iter()
        .filter(|f| !columns.contains_key(*f))
        .map(|f| f.key())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingFields(missing));
    }

    let map = ColumnMap { columns };
    debug!(fields = ?map.fields(), "resolved CSV schema");
    Ok(map)
}
