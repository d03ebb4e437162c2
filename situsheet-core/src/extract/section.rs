//! Record extraction over resolved section bounds

use super::{Record, SectionBounds, locate_sections};
use crate::reader::{CellValue, Sheet};
use std::collections::BTreeMap;
use tracing::debug;

/// Build records for the half-open data range `[start, end)` under the
/// header at `header_row`.
///
/// Rows whose first cell is empty are skipped as blank separators. A key is
/// produced only for non-empty header columns; a data row shorter than the
/// header yields `Empty` for the missing columns. Records whose values are
/// all empty are discarded. Never fails: out-of-range indices simply
/// produce fewer records.
pub fn extract_section(sheet: &Sheet, header_row: usize, start: usize, end: usize) -> Vec<Record> {
    extract_windowed(sheet, header_row, start, end, None)
}

/// Extract the records of one located section
pub fn extract_bounded(sheet: &Sheet, bounds: &SectionBounds) -> Vec<Record> {
    extract_windowed(
        sheet,
        bounds.header_row,
        bounds.data_start,
        bounds.data_end,
        bounds.columns,
    )
}

/// Locate every marker and extract each section's records.
///
/// The result maps each found label (lowercased) to its records; labels
/// without a marker are absent. Adjacent markers produce an empty section.
pub fn extract_all_sections(sheet: &Sheet, labels: &[String]) -> BTreeMap<String, Vec<Record>> {
    locate_sections(sheet, labels)
        .into_iter()
        .map(|bounds| {
            let records = extract_bounded(sheet, &bounds);
            debug!(label = %bounds.label, records = records.len(), "section extracted");
            (bounds.label, records)
        })
        .collect()
}

fn extract_windowed(
    sheet: &Sheet,
    header_row: usize,
    start: usize,
    end: usize,
    columns: Option<(usize, usize)>,
) -> Vec<Record> {
    let Some(header) = sheet.row(header_row).map(|row| window(row, columns)) else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for index in start..end.min(sheet.row_count()) {
        let Some(row) = sheet.row(index).map(|row| window(row, columns)) else {
            continue;
        };

        // Blank separator, not data
        if row.first().map(|c| c.is_empty()).unwrap_or(true) {
            continue;
        }

        let mut record = Record::new();
        for (col, label) in header.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            let value = row.get(col).cloned().unwrap_or(CellValue::Empty);
            record.set(label.to_string(), value);
        }

        if record.is_blank() {
            continue;
        }
        records.push(record);
    }
    records
}

/// Slice a row to a section's column window, clamped to the row's length
fn window(row: &[CellValue], columns: Option<(usize, usize)>) -> &[CellValue] {
    match columns {
        None => row,
        Some((start, end)) => {
            let start = start.min(row.len());
            let end = end.min(row.len());
            &row[start..end]
        }
    }
}
