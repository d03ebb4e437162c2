//! Section-bounded tabular extraction.
//!
//! A marker row names a section. The row immediately below it is the header
//! row, and every row after that belongs to the section until the next
//! marker or the end of the sheet. Some files lay the two tables side by
//! side instead; markers are then searched across the first row and each
//! section owns a column window.

pub mod record;
pub mod section;

pub use record::Record;
pub use section::{extract_all_sections, extract_section};

use crate::reader::{CellValue, Sheet};
use std::collections::BTreeMap;
use tracing::debug;

/// Resolved bounds of one section, ready for record extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBounds {
    /// Lowercased marker label that identified the section
    pub label: String,
    pub header_row: usize,
    /// Half-open data range [data_start, data_end)
    pub data_start: usize,
    pub data_end: usize,
    /// Half-open column window for side-by-side tables; full width when None
    pub columns: Option<(usize, usize)>,
}

/// Scan rows in order and return the first row index whose first cell
/// contains each label (case-insensitive, substring semantics).
///
/// Later occurrences of an already-found label are ignored. Labels that
/// never match are simply absent from the result.
pub fn find_markers(sheet: &Sheet, labels: &[String]) -> BTreeMap<String, usize> {
    let mut found = BTreeMap::new();
    for index in 0..sheet.row_count() {
        let Some(first) = cell_text_lower(sheet.first_cell(index)) else {
            continue;
        };
        for label in labels {
            let label = label.to_lowercase();
            if !found.contains_key(&label) && first.contains(&label) {
                debug!(row = index, label = %label, "section marker found");
                found.insert(label, index);
            }
        }
    }
    found
}

/// Resolve section bounds for the given marker labels.
///
/// Markers are looked up down the first column; when none match at all, the
/// first row is scanned instead for tables laid out side by side. Sections
/// never overlap: each one ends where the next marker (any label) begins.
pub fn locate_sections(sheet: &Sheet, labels: &[String]) -> Vec<SectionBounds> {
    let markers = find_markers(sheet, labels);
    if !markers.is_empty() {
        return vertical_bounds(sheet, markers);
    }

    let columns = find_markers_in_first_row(sheet, labels);
    if !columns.is_empty() {
        debug!("no vertical markers, using side-by-side layout");
        return horizontal_bounds(sheet, columns);
    }

    Vec::new()
}

fn vertical_bounds(sheet: &Sheet, markers: BTreeMap<String, usize>) -> Vec<SectionBounds> {
    let mut by_row: Vec<(usize, String)> =
        markers.into_iter().map(|(label, row)| (row, label)).collect();
    by_row.sort();

    let mut bounds = Vec::with_capacity(by_row.len());
    for (position, (marker_row, label)) in by_row.iter().enumerate() {
        let data_end = by_row
            .get(position + 1)
            .map(|(next_row, _)| *next_row)
            .unwrap_or_else(|| sheet.row_count());
        bounds.push(SectionBounds {
            label: label.clone(),
            header_row: marker_row + 1,
            data_start: marker_row + 2,
            data_end,
            columns: None,
        });
    }
    bounds
}

fn horizontal_bounds(sheet: &Sheet, columns: BTreeMap<String, usize>) -> Vec<SectionBounds> {
    let width = sheet.width();
    let mut by_col: Vec<(usize, String)> =
        columns.into_iter().map(|(label, col)| (col, label)).collect();
    by_col.sort();

    let mut bounds = Vec::with_capacity(by_col.len());
    for (position, (marker_col, label)) in by_col.iter().enumerate() {
        let col_end = by_col
            .get(position + 1)
            .map(|(next_col, _)| *next_col)
            .unwrap_or(width);
        bounds.push(SectionBounds {
            label: label.clone(),
            header_row: 1,
            data_start: 2,
            data_end: sheet.row_count(),
            columns: Some((*marker_col, col_end)),
        });
    }
    bounds
}

/// First-match-wins marker search across the columns of row 0
fn find_markers_in_first_row(sheet: &Sheet, labels: &[String]) -> BTreeMap<String, usize> {
    let Some(first_row) = sheet.row(0) else {
        return BTreeMap::new();
    };

    let mut found = BTreeMap::new();
    for (col, cell) in first_row.iter().enumerate() {
        let Some(text) = cell_text_lower(cell) else {
            continue;
        };
        for label in labels {
            let label = label.to_lowercase();
            if !found.contains_key(&label) && text.contains(&label) {
                debug!(col, label = %label, "section marker found in first row");
                found.insert(label, col);
            }
        }
    }
    found
}

/// Lowercased text rendering of a non-empty cell
fn cell_text_lower(cell: &CellValue) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::CellValue as CV;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn marker_sheet() -> Sheet {
        Sheet::from_rows(
            "Feuille1",
            vec![
                vec![CV::text("Situation mars")],
                vec![CV::text("ACHAT AVEC TVA")],
                vec![CV::text("Raison sociale"), CV::text("Montant HT")],
                vec![CV::text("Fournisseur A"), CV::Number(100.0)],
                vec![CV::text("ACHAT SANS TVA")],
                vec![CV::text("Raison sociale"), CV::text("Montant")],
                vec![CV::text("Fournisseur B"), CV::Number(50.0)],
            ],
        )
    }

    #[test]
    fn test_find_markers_case_insensitive_contains() {
        let found = find_markers(&marker_sheet(), &labels(&["achat avec tva", "achat sans tva"]));
        assert_eq!(found.get("achat avec tva"), Some(&1));
        assert_eq!(found.get("achat sans tva"), Some(&4));
    }

    #[test]
    fn test_find_markers_first_match_wins() {
        let sheet = Sheet::from_rows(
            "Feuille1",
            vec![
                vec![CV::text("TOTAL ACHAT AVEC TVA 2024")],
                vec![CV::text("achat avec tva")],
            ],
        );
        let found = find_markers(&sheet, &labels(&["achat avec tva"]));
        assert_eq!(found.get("achat avec tva"), Some(&0));
    }

    #[test]
    fn test_find_markers_absent_label_is_omitted() {
        let found = find_markers(&marker_sheet(), &labels(&["achat sans tva", "ventes"]));
        assert_eq!(found.len(), 1);
        assert!(!found.contains_key("ventes"));
    }

    #[test]
    fn test_find_markers_ignores_empty_first_cell() {
        let sheet = Sheet::from_rows(
            "Feuille1",
            vec![
                vec![CV::Empty, CV::text("achat avec tva")],
                vec![CV::text(""), CV::text("achat avec tva")],
            ],
        );
        assert!(find_markers(&sheet, &labels(&["achat avec tva"])).is_empty());
    }

    #[test]
    fn test_find_markers_empty_sheet() {
        let sheet = Sheet::new("Feuille1");
        assert!(find_markers(&sheet, &labels(&["achat avec tva"])).is_empty());
    }

    #[test]
    fn test_vertical_bounds_end_at_next_marker() {
        let bounds = locate_sections(&marker_sheet(), &labels(&["achat avec tva", "achat sans tva"]));
        assert_eq!(bounds.len(), 2);

        assert_eq!(bounds[0].label, "achat avec tva");
        assert_eq!(bounds[0].header_row, 2);
        assert_eq!(bounds[0].data_start, 3);
        assert_eq!(bounds[0].data_end, 4);
        assert_eq!(bounds[0].columns, None);

        assert_eq!(bounds[1].label, "achat sans tva");
        assert_eq!(bounds[1].data_end, 7);
    }

    #[test]
    fn test_horizontal_fallback_windows() {
        // No marker in the first column: the first row is scanned instead
        let sheet = Sheet::from_rows(
            "Feuille1",
            vec![
                vec![
                    CV::Empty,
                    CV::text("ACHAT AVEC TVA"),
                    CV::Empty,
                    CV::Empty,
                    CV::text("ACHAT SANS TVA"),
                ],
                vec![
                    CV::Empty,
                    CV::text("Raison sociale"),
                    CV::text("Montant HT"),
                    CV::Empty,
                    CV::text("Raison sociale"),
                    CV::text("Montant"),
                ],
                vec![
                    CV::Empty,
                    CV::text("Fournisseur A"),
                    CV::Number(100.0),
                    CV::Empty,
                    CV::text("Fournisseur B"),
                    CV::Number(50.0),
                ],
            ],
        );

        let bounds = locate_sections(&sheet, &labels(&["achat avec tva", "achat sans tva"]));
        assert_eq!(bounds.len(), 2);
        assert_eq!(bounds[0].columns, Some((1, 4)));
        assert_eq!(bounds[0].header_row, 1);
        assert_eq!(bounds[0].data_start, 2);
        assert_eq!(bounds[1].columns, Some((4, 6)));
    }

    #[test]
    fn test_vertical_markers_suppress_horizontal_search() {
        // A marker in the first column wins even if row 0 also contains one
        let sheet = Sheet::from_rows(
            "Feuille1",
            vec![
                vec![CV::text("ACHAT AVEC TVA"), CV::text("ACHAT SANS TVA")],
                vec![CV::text("Raison sociale")],
            ],
        );
        let bounds = locate_sections(&sheet, &labels(&["achat avec tva", "achat sans tva"]));
        assert_eq!(bounds.len(), 1);
        assert_eq!(bounds[0].columns, None);
    }
}
