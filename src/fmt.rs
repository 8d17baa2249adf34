/// Format an amount with thousands separators behind a currency label:
/// `KES 1,234.56`. An empty label gives just the number.
pub fn money(label: &str, val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();
    let sign = if negative { "-" } else { "" };

    if label.is_empty() {
        format!("{sign}{with_commas}.{dec_part}")
    } else {
        format!("{label} {sign}{with_commas}.{dec_part}")
    }
}

const EIGHTHS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// Horizontal bar for `value` scaled against `max`, at most `width` cells.
/// Non-positive values and a non-positive max draw nothing.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if value <= 0.0 || max <= 0.0 || width == 0 {
        return String::new();
    }
    let eighths = ((value / max).min(1.0) * (width * 8) as f64).round() as usize;
    let mut out = "█".repeat(eighths / 8);
    let rest = eighths % 8;
    if rest > 0 {
        out.push(EIGHTHS[rest]);
    }
    out
}
