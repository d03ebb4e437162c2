//! Amount parsing for loosely formatted spreadsheet values

use crate::reader::CellValue;
use once_cell::sync::Lazy;
use regex::Regex;

// Keep only digits, comma, dot and hyphen once spaces are gone
static NON_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d,.\-]").expect("Failed to compile NON_AMOUNT"));

/// Parse a cell as a monetary amount.
///
/// Numbers pass through. Strings are cleaned of spaces and currency
/// symbols; a comma followed by one or two digits is read as the decimal
/// separator, any other comma as a thousands separator. Anything
/// unparseable yields 0.
pub fn parse_amount(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_amount_str(s),
        _ => 0.0,
    }
}

fn parse_amount_str(raw: &str) -> f64 {
    let compact: String = raw.split_whitespace().collect();
    let mut cleaned = NON_AMOUNT.replace_all(&compact, "").into_owned();

    let negative = cleaned.starts_with('-');
    if negative {
        cleaned.remove(0);
    }

    if cleaned.contains(',') {
        let fraction = cleaned.split(',').nth(1).unwrap_or("");
        if !fraction.is_empty() && fraction.len() <= 2 {
            cleaned = cleaned.replacen(',', ".", 1);
        } else {
            cleaned = cleaned.replace(',', "");
        }
    }

    match cleaned.parse::<f64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => 0.0,
    }
}
