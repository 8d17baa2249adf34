use std::path::Path;

use crate::error::Result;
use crate::models::Transaction;

pub const EXPORT_HEADER: &str = "Date,Icon,Name,Note,Amount,Currency,Type,Recurring";

pub const DEFAULT_EXPORT_NAME: &str = "saved-expenses.csv";

/// Render transactions in the legacy export layout. Values are joined as-is:
/// a comma inside a value is not quoted.
pub fn to_csv(txns: &[Transaction]) -> String {
    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');
    for t in txns {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            t.date, t.icon, t.name, t.note, t.amount, t.currency, t.kind, t.recurring
        ));
    }
    out
}

pub fn write_csv(txns: &[Transaction], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_csv(txns))?;
    Ok(())
}
