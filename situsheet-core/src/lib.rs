//! situsheet-core: sectioned extraction and import of situation spreadsheets
//!
//! Accounting "situation" files carry two tables bounded by the markers
//! ACHAT AVEC TVA and ACHAT SANS TVA. This library loads such a file,
//! rebuilds header-keyed records from each section and turns them into
//! typed charge or revenue lines for the caller to persist.

pub mod config;
pub mod extract;
pub mod import;
pub mod reader;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

pub use config::ImportConfig;
pub use extract::{
    Record, SectionBounds, extract_all_sections, extract_section, find_markers, locate_sections,
};
pub use import::{ChargeLine, DocumentKind, EntreeLine, ImportError, ImportOutcome};
pub use reader::{CellValue, Sheet, Workbook, read_workbook};

/// Main import interface
pub struct SituationImporter {
    config: ImportConfig,
}

impl SituationImporter {
    /// Create an importer with default configuration
    pub fn new() -> Self {
        Self::with_config(ImportConfig::default())
    }

    /// Create an importer with custom configuration
    pub fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import the first sheet of a spreadsheet file
    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        kind: DocumentKind,
        import_date: NaiveDate,
    ) -> Result<ImportOutcome> {
        let workbook = reader::read_workbook(&path)?;
        let sheet = workbook
            .first_sheet()
            .with_context(|| format!("No sheets in {}", workbook.path.display()))?;
        Ok(self.import_sheet(sheet, kind, import_date))
    }

    /// Import an already-loaded sheet. Infallible: rejected rows are
    /// collected on the outcome.
    pub fn import_sheet(
        &self,
        sheet: &Sheet,
        kind: DocumentKind,
        import_date: NaiveDate,
    ) -> ImportOutcome {
        import::import_sheet(sheet, &self.config, kind, import_date)
    }
}

impl Default for SituationImporter {
    fn default() -> Self {
        Self::new()
    }
}
