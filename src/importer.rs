use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Result, RowRule, SchemaError, TenCentsError};
use crate::models::{parse_date, Kind, Transaction};
use crate::schema::{resolve_schema, ColumnMap, Field};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// What to do with an amount cell that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountPolicy {
    /// Treat it as 0, matching files exported by older versions.
    #[default]
    Lenient,
    /// Reject the row.
    Strict,
}

/// The whole cell as a finite number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The longest number at the start of the cell, ignoring whatever follows:
/// `12.50 KES` reads as 12.5. A cell that does not start with a number
/// gives `None`.
pub fn leading_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    let mut has_digits = int_end > end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        has_digits |= frac_end > int_end + 1;
        mantissa_end = frac_end;
    }
    if !has_digits {
        return None;
    }
    end = mantissa_end;

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn cell<'a, S: AsRef<str>>(cells: &'a [S], map: &ColumnMap, field: Field) -> &'a str {
    map.index(field)
        .and_then(|i| cells.get(i))
        .map(|c| c.as_ref().trim())
        .unwrap_or("")
}

pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

/// Turn one data row into a transaction using a resolved column map.
pub fn decode_row<S: AsRef<str>>(
    cells: &[S],
    map: &ColumnMap,
    policy: AmountPolicy,
) -> std::result::Result<Transaction, RowRule> {
    let date = cell(cells, map, Field::Date);
    let destination_name = cell(cells, map, Field::DestinationName);
    let name = if destination_name.is_empty() {
        cell(cells, map, Field::Name)
    } else {
        destination_name
    };
    let amount_raw = cell(cells, map, Field::Amount);
    let kind_raw = cell(cells, map, Field::Type);

    for (value, field) in [(date, "date"), (name, "name"), (amount_raw, "amount"), (kind_raw, "type")] {
        if value.is_empty() {
            return Err(RowRule::MissingField(field));
        }
    }

    if parse_date(date).is_none() {
        return Err(RowRule::InvalidDate(date.to_string()));
    }
    let kind: Kind = kind_raw.parse().map_err(RowRule::InvalidType)?;

    let amount = match (parse_amount(amount_raw), policy) {
        (Some(v), _) => v,
        (None, AmountPolicy::Strict) => return Err(RowRule::InvalidAmount(amount_raw.to_string())),
        (None, AmountPolicy::Lenient) => match leading_amount(amount_raw) {
            Some(v) => {
                warn!(value = amount_raw, amount = v, "amount has trailing text, using leading number");
                v
            }
            None => {
                warn!(value = amount_raw, "amount is not a number, using 0");
                0.0
            }
        },
    };

    Ok(Transaction {
        date: date.to_string(),
        icon: cell(cells, map, Field::Icon).to_string(),
        name: name.to_string(),
        note: cell(cells, map, Field::Note).to_string(),
        amount,
        currency: cell(cells, map, Field::Currency).to_string(),
        kind,
        recurring: cell(cells, map, Field::Recurring).to_string(),
        destination_icon: map
            .contains(Field::DestinationIcon)
            .then(|| cell(cells, map, Field::DestinationIcon).to_string()),
    })
}

/// Decode a whole CSV document. The first non-blank line is the header;
/// blank lines are skipped. Any bad row fails the whole file.
pub fn decode_csv(text: &str, policy: AmountPolicy) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let is_blank = |r: &csv::StringRecord| r.iter().all(|f| f.is_empty());
    let mut records = rdr.records();

    let header = loop {
        match records.next() {
            None => return Err(SchemaError::MissingHeader.into()),
            Some(result) => {
                let record = result?;
                if !is_blank(&record) {
                    break record;
                }
            }
        }
    };
    let header: Vec<&str> = header.iter().collect();
    let map = resolve_schema(&header)?;

    let mut txns = Vec::new();
    let mut line = 0usize;
    for result in records {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        line += 1;
        let fields: Vec<&str> = record.iter().collect();
        let txn = decode_row(&fields, &map, policy).map_err(|rule| TenCentsError::Row { line, rule })?;
        txns.push(txn);
    }
    debug!(rows = txns.len(), "decoded CSV");
    Ok(txns)
}

// ---------------------------------------------------------------------------
// File import
// ---------------------------------------------------------------------------

/// Fetch the raw text of an export. Only `.csv` files are accepted.
pub fn read_csv_file(file_path: &Path) -> Result<String> {
    let is_csv = file_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(TenCentsError::NotCsv(file_path.display().to_string()));
    }
    Ok(std::fs::read_to_string(file_path)?)
}

/// Earliest and latest parsable dates in a transaction set, as YYYY-MM-DD.
pub fn date_span(txns: &[Transaction]) -> Option<(String, String)> {
    let dates: Vec<_> = txns.iter().filter_map(|t| parse_date(&t.date)).collect();
    let min = dates.iter().min()?;
    let max = dates.iter().max()?;
    Some((min.format("%Y-%m-%d").to_string(), max.format("%Y-%m-%d").to_string()))
}
