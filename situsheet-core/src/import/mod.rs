//! Turns extracted records into typed charge / revenue lines

pub mod amount;
pub mod charge;
pub mod columns;
pub mod date;

pub use amount::parse_amount;
pub use charge::{ChargeLine, DocumentKind, EntreeLine};
pub use columns::find_column;
pub use date::{cell_to_date, serial_to_date};

use crate::config::ImportConfig;
use crate::extract::{self, Record};
use crate::reader::Sheet;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

/// Why a row was rejected. Rejections never abort the import; they are
/// collected on the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("row {row}: no usable amount")]
    MissingAmount { row: usize },

    #[error("row {row}: no supplier name")]
    MissingName { row: usize },
}

/// Result of importing one sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    pub charges: Vec<ChargeLine>,
    pub entrees: Vec<EntreeLine>,
    pub errors: Vec<ImportError>,
}

impl ImportOutcome {
    pub fn total_created(&self) -> usize {
        self.charges.len() + self.entrees.len()
    }
}

/// Import one sheet's rows as typed lines.
///
/// Records come from the marker-bounded sections when any exist, otherwise
/// from a flat header-at-top parse. `import_date` stands in for rows
/// without a usable date, the way the original files date an upload batch.
pub fn import_sheet(
    sheet: &Sheet,
    config: &ImportConfig,
    kind: DocumentKind,
    import_date: NaiveDate,
) -> ImportOutcome {
    let tagged = collect_records(sheet, config);
    debug!(records = tagged.len(), "records collected for import");

    let mut outcome = ImportOutcome::default();
    for (position, (record, avec_tva)) in tagged.iter().enumerate() {
        match build_line(record, *avec_tva, config, kind, import_date, position + 1) {
            Ok(Line::Charge(charge)) => outcome.charges.push(charge),
            Ok(Line::Entree(entree)) => outcome.entrees.push(entree),
            Err(error) => {
                debug!(%error, "row skipped");
                outcome.errors.push(error);
            }
        }
    }
    outcome
}

enum Line {
    Charge(ChargeLine),
    Entree(EntreeLine),
}

/// Records tagged with their VAT flag: true for the "avec TVA" section,
/// false for "sans TVA". Falls back to a flat parse when the sections
/// yield nothing at all.
fn collect_records(sheet: &Sheet, config: &ImportConfig) -> Vec<(Record, bool)> {
    let sections = extract::extract_all_sections(sheet, &config.marker_labels());

    let mut tagged = Vec::new();
    if let Some(records) = sections.get(&config.sections.with_vat.to_lowercase()) {
        tagged.extend(records.iter().cloned().map(|r| (r, true)));
    }
    if let Some(records) = sections.get(&config.sections.without_vat.to_lowercase()) {
        tagged.extend(records.iter().cloned().map(|r| (r, false)));
    }

    if tagged.is_empty() {
        return flat_records(sheet, config);
    }
    tagged
}

/// Single-table fallback: first non-empty row is the header, every row a
/// record, VAT flag decided by whether the row carries a VAT column.
fn flat_records(sheet: &Sheet, config: &ImportConfig) -> Vec<(Record, bool)> {
    debug!("no sectioned records, falling back to flat table parse");
    let Some(header_row) = sheet
        .rows
        .iter()
        .position(|row| row.iter().any(|cell| !cell.is_empty()))
    else {
        return Vec::new();
    };

    let records = extract::extract_section(sheet, header_row, header_row + 1, sheet.row_count());
    records
        .into_iter()
        .filter_map(|record| {
            // Only headers with an actual value count, as a sparse row has
            // no say about columns it does not fill
            let keys: Vec<String> = record
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, _)| key.to_lowercase())
                .collect();

            let has_amount = keys
                .iter()
                .any(|k| contains_any(k, &config.fallback.amount_keywords));
            if !has_amount {
                debug!("row without amount column skipped");
                return None;
            }

            let avec_tva = keys
                .iter()
                .any(|k| contains_any(k, &config.fallback.vat_keywords));
            Some((record, avec_tva))
        })
        .collect()
}

fn contains_any(key: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| key.contains(&kw.to_lowercase()))
}

fn build_line(
    record: &Record,
    avec_tva: bool,
    config: &ImportConfig,
    kind: DocumentKind,
    import_date: NaiveDate,
    row: usize,
) -> Result<Line, ImportError> {
    let date = find_column(record, &config.columns.date)
        .map(|cell| cell_to_date(cell, import_date))
        .unwrap_or(import_date);

    let fournisseur = find_column(record, &config.columns.supplier)
        .map(|value| value.to_string())
        .filter(|name| !name.trim().is_empty());

    let montant_ht = find_column(record, &config.columns.amount_ht)
        .map(parse_amount)
        .unwrap_or(0.0);
    let montant_tva = find_column(record, &config.columns.amount_tva)
        .map(parse_amount)
        .unwrap_or(0.0);
    let mut montant_ttc = find_column(record, &config.columns.amount_ttc)
        .map(parse_amount)
        .unwrap_or(0.0);
    if montant_ttc == 0.0 && (montant_ht > 0.0 || montant_tva > 0.0) {
        montant_ttc = montant_ht + montant_tva;
    }

    if montant_ht <= 0.0 && montant_tva <= 0.0 && montant_ttc <= 0.0 {
        return Err(ImportError::MissingAmount { row });
    }
    let Some(fournisseur) = fournisseur else {
        return Err(ImportError::MissingName { row });
    };

    match kind {
        DocumentKind::Charge => {
            let taux_tva = (montant_tva > 0.0 && montant_ht > 0.0)
                .then(|| montant_tva / montant_ht * 100.0);
            Ok(Line::Charge(ChargeLine {
                date,
                fournisseur,
                montant_ht,
                montant_tva: (montant_tva > 0.0).then_some(montant_tva),
                montant_ttc,
                taux_tva,
                avec_tva,
            }))
        }
        DocumentKind::Entree => Ok(Line::Entree(EntreeLine {
            date,
            description: fournisseur,
            montant: if montant_ttc != 0.0 { montant_ttc } else { montant_ht },
        })),
    }
}
