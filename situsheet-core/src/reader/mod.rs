//! Excel/ODS file reader using calamine

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;
use tracing::debug;

pub mod workbook;

pub use workbook::{CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut excel = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let mut sheets = Vec::new();
    for sheet_name in excel.sheet_names() {
        let range = excel
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;
        let sheet = sheet_from_range(&sheet_name, &range);
        debug!(sheet = %sheet.name, rows = sheet.row_count(), "sheet loaded");
        sheets.push(sheet);
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

/// Densify a calamine range into ordered rows, preserving the original row
/// and column indices (blank leading rows/columns stay in place).
fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }

    Sheet::from_rows(name, rows)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Keep the serial number; the import layer converts to dates
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        // Cached errors carry no usable value for imports
        Data::Error(_) => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(
            cell_from_data(&Data::String("ACHAT AVEC TVA".into())),
            CellValue::text("ACHAT AVEC TVA")
        );
        assert_eq!(cell_from_data(&Data::Float(12.5)), CellValue::Number(12.5));
        assert_eq!(cell_from_data(&Data::Int(-3)), CellValue::Number(-3.0));
        assert_eq!(cell_from_data(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cell_from_data(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Empty
        );
    }

    #[test]
    fn test_sheet_from_range_preserves_indices() {
        // Used range starting at B3: rows 0-1 and column A must stay blank
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Date".into()));
        range.set_value((2, 2), Data::String("Montant".into()));
        range.set_value((3, 1), Data::Float(45139.0));
        range.set_value((3, 2), Data::Float(100.0));

        let sheet = sheet_from_range("Feuille1", &range);
        assert_eq!(sheet.row_count(), 4);
        assert!(sheet.rows[0].is_empty());
        assert!(sheet.first_cell(2).is_empty());
        assert_eq!(sheet.rows[2][1], CellValue::text("Date"));
        assert_eq!(sheet.rows[3][2], CellValue::Number(100.0));
    }
}
