//! Output formatters for the diagnostic report

use anyhow::Result;
use colored::*;
use situsheet_core::{CellValue, ImportOutcome, Record, Sheet, find_markers};
use std::collections::BTreeMap;
use std::path::Path;

/// Dump every row with its index, the way the sheet reads top to bottom
pub fn print_rows(sheet: &Sheet) {
    println!(
        "{}",
        format!("Rows in '{}': {}", sheet.name, sheet.row_count()).bold()
    );
    for (index, row) in sheet.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(render_cell).collect();
        println!("  {:>4}  [{}]", index, cells.join(", "));
    }
    println!();
}

/// Print marker discovery, each section's records and the import result
pub fn print_report(
    file_path: &Path,
    sheet: &Sheet,
    labels: &[String],
    sections: &BTreeMap<String, Vec<Record>>,
    outcome: &ImportOutcome,
) {
    println!(
        "{}",
        format!("Extracting: {} (sheet '{}')", file_path.display(), sheet.name).bold()
    );
    println!();

    // Marker discovery
    println!("{}", "Markers:".bold().underline());
    let markers = find_markers(sheet, labels);
    for label in labels {
        let label = label.to_lowercase();
        match markers.get(&label) {
            Some(row) => println!("  {} {} at row {}", "✓".green(), label.cyan(), row),
            None => println!("  {} {} not found", "✗".red(), label.cyan()),
        }
    }
    println!();

    // Sections
    if sections.is_empty() {
        println!("{}", "No sections found, flat table fallback applies".yellow());
        println!();
    }
    for (label, records) in sections {
        println!(
            "{} {} ({} record(s))",
            "Section:".bold(),
            label.cyan().bold(),
            records.len()
        );
        for record in records {
            let fields: Vec<String> = record
                .iter()
                .map(|(key, value)| format!("{}: {}", key.bright_black(), render_cell(value)))
                .collect();
            println!("  {}", fields.join("  "));
        }
        println!();
    }

    // Import summary
    println!("{}", "Import:".bold().underline());
    if !outcome.charges.is_empty() {
        println!("  {} {}", "Charges:".green().bold(), outcome.charges.len());
        for charge in &outcome.charges {
            let tag = if charge.avec_tva {
                "avec TVA".green()
            } else {
                "sans TVA".blue()
            };
            println!(
                "    {} | {} | HT {} | TTC {} | {}",
                charge.date,
                charge.fournisseur,
                charge.montant_ht,
                charge.montant_ttc,
                tag
            );
        }
    }
    if !outcome.entrees.is_empty() {
        println!("  {} {}", "Entrées:".green().bold(), outcome.entrees.len());
        for entree in &outcome.entrees {
            println!(
                "    {} | {} | {}",
                entree.date, entree.description, entree.montant
            );
        }
    }
    if !outcome.errors.is_empty() {
        println!("  {} {}", "Skipped:".yellow().bold(), outcome.errors.len());
        for error in &outcome.errors {
            println!("    {}", error.to_string().yellow());
        }
    }
    if outcome.total_created() == 0 && outcome.errors.is_empty() {
        println!("  {}", "Nothing to import".yellow());
    }
}

/// Print the whole report as one JSON document
pub fn print_json(
    file_path: &Path,
    sheet: &Sheet,
    sections: &BTreeMap<String, Vec<Record>>,
    outcome: &ImportOutcome,
) -> Result<()> {
    let output = serde_json::json!({
        "file": file_path.display().to_string(),
        "sheet": sheet.name,
        "rows": sheet.row_count(),
        "sections": sections,
        "charges": outcome.charges,
        "entrees": outcome.entrees,
        "errors": outcome.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn render_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => "·".to_string(),
        CellValue::Text(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}
