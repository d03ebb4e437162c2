//! Import configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main import configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub sections: SectionConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl ImportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ImportConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Marker labels in priority order, VAT section first
    pub fn marker_labels(&self) -> Vec<String> {
        vec![
            self.sections.with_vat.clone(),
            self.sections.without_vat.clone(),
        ]
    }
}

/// Section marker labels, matched case-insensitively as substrings of a
/// row's first cell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub with_vat: String,
    pub without_vat: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            with_vat: "achat avec tva".to_string(),
            without_vat: "achat sans tva".to_string(),
        }
    }
}

/// Candidate column names per logical field, tried in order.
///
/// Lookups are case-insensitive and word-fuzzy, so one spelling per
/// variant family is enough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub date: Vec<String>,
    pub supplier: Vec<String>,
    pub amount_ht: Vec<String>,
    pub amount_tva: Vec<String>,
    pub amount_ttc: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            date: to_vec(&["Date", "Dates"]),
            supplier: to_vec(&["Raison sociale", "Raison social", "Fournisseur", "Client"]),
            amount_ht: to_vec(&["Montant HT", "Montant"]),
            amount_tva: to_vec(&["Montant TVA", "TVA"]),
            amount_ttc: to_vec(&["Montant TTC", "TTC"]),
        }
    }
}

/// Keywords used to classify rows when no section marker exists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// A header containing one of these makes the row importable at all
    pub amount_keywords: Vec<String>,
    /// A header containing one of these marks the row as VAT-bearing
    pub vat_keywords: Vec<String>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            amount_keywords: to_vec(&["montant"]),
            vat_keywords: to_vec(&["tva"]),
        }
    }
}

fn to_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(
            config.marker_labels(),
            vec!["achat avec tva", "achat sans tva"]
        );
        assert!(config.columns.supplier.contains(&"Fournisseur".to_string()));
        assert_eq!(config.fallback.vat_keywords, vec!["tva"]);
    }

    #[test]
    fn test_from_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[sections]
with_vat = "achats ttc"
without_vat = "achats ht"

[columns]
date = ["Date facture"]
"#
        )
        .unwrap();

        let config = ImportConfig::from_file(file.path()).unwrap();
        assert_eq!(config.marker_labels(), vec!["achats ttc", "achats ht"]);
        assert_eq!(config.columns.date, vec!["Date facture"]);
        // Untouched sections keep their defaults
        assert_eq!(config.columns.amount_ht, vec!["Montant HT", "Montant"]);
        assert_eq!(config.fallback.amount_keywords, vec!["montant"]);
    }

    #[test]
    fn test_from_file_missing_path_errors() {
        assert!(ImportConfig::from_file("/nonexistent/situsheet.toml").is_err());
    }
}
