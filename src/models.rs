use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TenCentsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Expense,
    Income,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact match only: "Expense" or " income" are not valid kinds.
impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(other.to_string()),
        }
    }
}

/// One ingested row. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: String,
    #[serde(default)]
    pub icon: String,
    pub name: String,
    #[serde(default)]
    pub note: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(default)]
    pub recurring: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_icon: Option<String>,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    All,
    #[default]
    Expense,
    Income,
}

impl KindFilter {
    pub fn admits(&self, kind: Kind) -> bool {
        match self {
            Self::All => true,
            Self::Expense => kind == Kind::Expense,
            Self::Income => kind == Kind::Income,
        }
    }

    /// expense -> income -> all -> expense
    pub fn next(&self) -> Self {
        match self {
            Self::Expense => Self::Income,
            Self::Income => Self::All,
            Self::All => Self::Expense,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KindFilter {
    type Err = TenCentsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "expense" | "expenses" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(TenCentsError::Other(format!(
                "Unknown kind filter '{other}' (expected expense, income or all)"
            ))),
        }
    }
}

/// Inclusive date bounds, kept as the raw strings the caller typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self { start, end }
    }

    /// The range only constrains anything when both bounds are non-empty.
    pub fn is_active(&self) -> bool {
        let filled = |b: &Option<String>| b.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.start) && filled(&self.end)
    }

    /// Whether a transaction date passes the range. Unparsable bounds or an
    /// unparsable date never pass an active range.
    pub fn admits(&self, date: &str) -> bool {
        if !self.is_active() {
            return true;
        }
        let start = self.start.as_deref().and_then(parse_date);
        let end = self.end.as_deref().and_then(parse_date);
        match (start, end, parse_date(date)) {
            (Some(s), Some(e), Some(d)) => s <= d && d <= e,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    pub range: DateRange,
    pub kind: KindFilter,
}

impl Filters {
    pub fn admits(&self, txn: &Transaction) -> bool {
        self.range.admits(&txn.date) && self.kind.admits(txn.kind)
    }

    pub fn describe(&self) -> String {
        let mut parts = vec![format!("kind: {}", self.kind)];
        if self.range.is_active() {
            parts.push(format!(
                "{} .. {}",
                self.range.start.as_deref().unwrap_or(""),
                self.range.end.as_deref().unwrap_or("")
            ));
        }
        parts.join(" | ")
    }
}

// ---------------------------------------------------------------------------
// Aggregated view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Subcategory {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub total_amount: f64,
    /// `None` until some transaction in the category carries a note.
    pub subcategories: Option<Vec<Subcategory>>,
}

impl Category {
    pub fn has_subcategories(&self) -> bool {
        self.subcategories.as_ref().is_some_and(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%d %b %Y",
];

// `%.f` also matches when there is no fractional part.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date from the formats exports are known to use.
/// Time of day, when present, is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}
