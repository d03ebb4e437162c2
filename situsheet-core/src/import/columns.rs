//! Header name resolution against extracted records

use crate::extract::Record;
use crate::reader::CellValue;
use tracing::trace;

/// Find the first non-empty value under any of the candidate column names.
///
/// Tries, in order: exact header match, case-insensitive trimmed match,
/// then word-wise fuzzy match where every word of the candidate must be
/// contained in (or contain) some word of the header. Spreadsheets spell
/// "Raison sociale" a dozen ways; the fuzzy pass absorbs them.
pub fn find_column<'a>(record: &'a Record, names: &[String]) -> Option<&'a CellValue> {
    for name in names {
        if let Some(value) = record.get(name) {
            if !value.is_empty() {
                return Some(value);
            }
        }

        let wanted = name.to_lowercase();
        let wanted = wanted.trim();
        for (key, value) in record.iter() {
            if value.is_empty() {
                continue;
            }
            let have = key.to_lowercase();
            let have = have.trim();
            if have == wanted {
                return Some(value);
            }
            if words_match(have, wanted) {
                trace!(header = key, candidate = %name, "fuzzy column match");
                return Some(value);
            }
        }
    }
    None
}

/// Every word of `wanted` matches some word of `key` by substring
/// containment in either direction
fn words_match(key: &str, wanted: &str) -> bool {
    let key_words: Vec<&str> = split_words(key);
    let wanted_words: Vec<&str> = split_words(wanted);

    !wanted_words.is_empty()
        && wanted_words
            .iter()
            .all(|w| key_words.iter().any(|k| k.contains(w) || w.contains(k)))
}

fn split_words(s: &str) -> Vec<&str> {
    s.split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn record(fields: &[(&str, CellValue)]) -> Record {
        let mut record = Record::new();
        for (key, value) in fields {
            record.set(*key, value.clone());
        }
        record
    }

    #[test]
    fn test_exact_match() {
        let r = record(&[("Montant HT", CellValue::Number(10.0))]);
        assert_eq!(
            find_column(&r, &names(&["Montant HT"])),
            Some(&CellValue::Number(10.0))
        );
    }

    #[test]
    fn test_case_insensitive_match() {
        let r = record(&[("MONTANT HT ", CellValue::Number(10.0))]);
        assert_eq!(
            find_column(&r, &names(&["montant ht"])),
            Some(&CellValue::Number(10.0))
        );
    }

    #[test]
    fn test_fuzzy_word_match() {
        // "raison social" should find "Raison sociale"
        let r = record(&[("Raison sociale", CellValue::text("ACME"))]);
        assert_eq!(
            find_column(&r, &names(&["raison social"])),
            Some(&CellValue::text("ACME"))
        );
    }

    #[test]
    fn test_candidate_priority_order() {
        let r = record(&[
            ("Fournisseur", CellValue::text("B")),
            ("Raison sociale", CellValue::text("A")),
        ]);
        let found = find_column(&r, &names(&["Raison sociale", "Fournisseur"]));
        assert_eq!(found, Some(&CellValue::text("A")));
    }

    #[test]
    fn test_empty_values_never_satisfy_a_lookup() {
        let r = record(&[
            ("Montant HT", CellValue::Empty),
            ("Montant", CellValue::Number(3.0)),
        ]);
        // The first candidate exists but is empty; the next one wins
        assert_eq!(
            find_column(&r, &names(&["Montant HT", "Montant"])),
            Some(&CellValue::Number(3.0))
        );
    }

    #[test]
    fn test_no_match() {
        let r = record(&[("Date", CellValue::Number(45139.0))]);
        assert_eq!(find_column(&r, &names(&["Montant HT"])), None);
    }
}
