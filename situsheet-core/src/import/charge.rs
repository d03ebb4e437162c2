//! Typed lines produced by an import

use chrono::NaiveDate;
use serde::Serialize;

/// What the rows of a situation file get turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    Charge,
    Entree,
}

/// One expense line, VAT-tagged by the section it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeLine {
    pub date: NaiveDate,
    pub fournisseur: String,
    pub montant_ht: f64,
    /// Absent when the row carries no VAT amount
    pub montant_tva: Option<f64>,
    pub montant_ttc: f64,
    /// Derived rate in percent, only when both HT and TVA are positive
    pub taux_tva: Option<f64>,
    pub avec_tva: bool,
}

/// One revenue line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntreeLine {
    pub date: NaiveDate,
    pub description: String,
    pub montant: f64,
}
