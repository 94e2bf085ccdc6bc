//! Chronic-medication extraction from the treatment narrative.
//!
//! Doctors end the treatment plan with a "continue" marker line followed by
//! the patient's ongoing medications, one per line. These lines are display
//! data, not structured fields, so they are re-derived on every render.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Marker word that opens the chronic-medication block.
const MARKER: &str = "continue";

/// Section-header restatement to skip inside the block.
const HEADER_RESTATEMENT: &str = "chronic medication";

/// A chronic-medication line with a content-derived key.
///
/// The key is stable across renders and line reordering, so completion-toggle
/// state held outside the record can follow the entry. Identical lines share
/// a key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChronicEntry {
    /// sha256 prefix of the normalized line
    pub key: String,
    pub text: String,
}

/// Extract the chronic-medication lines from a treatment narrative.
///
/// Scans for a case-insensitive line containing "continue" and returns every
/// non-blank line after it, minus restatements of the section header. Order
/// is preserved; no marker line means an empty list.
pub fn extract_chronic_medications(treatment_text: &str) -> Vec<String> {
    let mut lines = treatment_text.lines();
    if !lines.any(|line| line.to_lowercase().contains(MARKER)) {
        return Vec::new();
    }

    lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.to_lowercase().contains(HEADER_RESTATEMENT))
        .map(str::to_string)
        .collect()
}

/// [`extract_chronic_medications`] with stable keys attached.
pub fn chronic_entries(treatment_text: &str) -> Vec<ChronicEntry> {
    extract_chronic_medications(treatment_text)
        .into_iter()
        .map(|text| ChronicEntry {
            key: entry_key(&text),
            text,
        })
        .collect()
}

fn entry_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.trim().to_lowercase().as_bytes());
    let mut key = hex::encode(hasher.finalize());
    key.truncate(12);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_after_marker_are_extracted() {
        let text = "Metformin 500mg\nContinue\nAspirin 75mg\nAtorvastatin 10mg";
        assert_eq!(
            extract_chronic_medications(text),
            vec!["Aspirin 75mg".to_string(), "Atorvastatin 10mg".to_string()]
        );
    }

    #[test]
    fn test_no_marker_yields_empty() {
        assert!(extract_chronic_medications("Metformin 500mg\nAspirin 75mg").is_empty());
        assert!(extract_chronic_medications("").is_empty());
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let text = "Plan as discussed\nCONTINUE chronic medication:\nTelmisartan 40mg";
        assert_eq!(
            extract_chronic_medications(text),
            vec!["Telmisartan 40mg".to_string()]
        );
    }

    #[test]
    fn test_blank_and_header_lines_are_skipped() {
        let text = "Continue\n\n  Chronic Medication  \nAspirin 75mg\n   \n";
        assert_eq!(
            extract_chronic_medications(text),
            vec!["Aspirin 75mg".to_string()]
        );
    }

    #[test]
    fn test_entry_keys_survive_reordering() {
        let forward = chronic_entries("Continue\nAspirin 75mg\nAtorvastatin 10mg");
        let reversed = chronic_entries("Continue\nAtorvastatin 10mg\nAspirin 75mg");

        let key_of = |entries: &[ChronicEntry], text: &str| {
            entries.iter().find(|e| e.text == text).map(|e| e.key.clone())
        };
        assert_eq!(
            key_of(&forward, "Aspirin 75mg"),
            key_of(&reversed, "Aspirin 75mg")
        );
        assert_ne!(forward[0].key, forward[1].key);
        assert_eq!(forward[0].key.len(), 12);
    }
}
