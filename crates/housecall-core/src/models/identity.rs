//! Local patient identity, persisted across sessions.

use serde::{Deserialize, Serialize};

use super::record::VisitRecord;

/// The patient's self-entered contact details plus a linked relative.
///
/// Loaded at startup, written on every change; all fields default to empty
/// when nothing has been stored yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatientIdentity {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub relative_name: String,
    pub relative_phone: String,
}

impl PatientIdentity {
    /// True when the primary contact fields are all filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.phone.is_empty() && !self.email.is_empty()
    }

    /// Fill empty contact fields from an imported record.
    ///
    /// Fields already set locally are left alone. Returns whether anything
    /// changed, so callers know to persist.
    pub fn adopt_from_record(&mut self, record: &VisitRecord) -> bool {
        let mut changed = false;
        if self.name.is_empty() && !record.patient_name.is_empty() {
            self.name = record.patient_name.clone();
            changed = true;
        }
        if self.phone.is_empty() && !record.contact.is_empty() {
            self.phone = record.contact.clone();
            changed = true;
        }
        if self.email.is_empty() && !record.email.is_empty() {
            self.email = record.email.clone();
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imported_record() -> VisitRecord {
        let mut record = VisitRecord::new();
        record.patient_name = "Asha Rao".into();
        record.contact = "9800011122".into();
        record.email = "asha@example.com".into();
        record
    }

    #[test]
    fn test_adopt_fills_empty_fields() {
        let mut identity = PatientIdentity::default();
        assert!(identity.adopt_from_record(&imported_record()));
        assert_eq!(identity.name, "Asha Rao");
        assert_eq!(identity.phone, "9800011122");
        assert!(identity.is_complete());
    }

    #[test]
    fn test_adopt_keeps_existing_fields() {
        let mut identity = PatientIdentity {
            name: "A. Rao".into(),
            phone: "9999999999".into(),
            email: "me@example.com".into(),
            ..PatientIdentity::default()
        };
        assert!(!identity.adopt_from_record(&imported_record()));
        assert_eq!(identity.name, "A. Rao");
        assert_eq!(identity.phone, "9999999999");
    }
}
