//! Date handling for spreadsheet cells

use crate::reader::CellValue;
use chrono::{Duration, NaiveDate};

/// Days between the Excel epoch (1899-12-30) and the Unix epoch
const EXCEL_UNIX_OFFSET_DAYS: f64 = 25569.0;

const TEXT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y", "%d-%m-%Y"];

/// Interpret a cell as a date, falling back to the supplied import date.
///
/// Numbers are Excel serial dates; text is tried against common formats
/// (ISO first, then the French day-first spellings).
pub fn cell_to_date(value: &CellValue, fallback: NaiveDate) -> NaiveDate {
    match value {
        CellValue::Number(serial) => serial_to_date(*serial).unwrap_or(fallback),
        CellValue::Text(s) => parse_text_date(s).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Convert an Excel serial number to a calendar date
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = (serial - EXCEL_UNIX_OFFSET_DAYS).trunc();
    // Far outside any calendar a spreadsheet can hold
    if days.abs() > 3_000_000.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days as i64))
}

fn parse_text_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    // ISO datetimes keep only their date part
    let candidate = trimmed.split('T').next().unwrap_or(trimmed);
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_serial_conversion() {
        // 45139 is 2023-08-01
        assert_eq!(
            serial_to_date(45139.0),
            NaiveDate::from_ymd_opt(2023, 8, 1)
        );
        assert_eq!(
            serial_to_date(25569.0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
    }

    #[test]
    fn test_text_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(cell_to_date(&CellValue::text("2024-03-15"), fallback()), expected);
        assert_eq!(cell_to_date(&CellValue::text("15/03/2024"), fallback()), expected);
        assert_eq!(cell_to_date(&CellValue::text("15-03-2024"), fallback()), expected);
        assert_eq!(
            cell_to_date(&CellValue::text("2024-03-15T10:30:00"), fallback()),
            expected
        );
    }

    #[test]
    fn test_fallback_on_missing_or_invalid() {
        assert_eq!(cell_to_date(&CellValue::Empty, fallback()), fallback());
        assert_eq!(cell_to_date(&CellValue::text("demain"), fallback()), fallback());
        assert_eq!(
            cell_to_date(&CellValue::Number(f64::NAN), fallback()),
            fallback()
        );
    }
}
