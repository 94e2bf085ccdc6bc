//! Medication and patient-education advice entries.

use serde::{Deserialize, Serialize};

/// One prescribed medication line on a visit record.
///
/// The id is generated at creation, never changes, and is never reused; it is
/// the correlation key for completion-toggle state kept outside the record.
/// Every other field is replaced wholesale on edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Stable correlation id
    pub id: String,
    pub name: String,
    pub dose: String,
    /// Route of administration
    pub route: String,
    /// Free text or shorthand such as "1-0-1"
    pub timing: String,
    /// Doses per day
    pub frequency_per_day: u32,
    pub duration_days: u32,
}

impl Medication {
    /// Create a medication entry with a fresh id.
    pub fn new(
        name: String,
        dose: String,
        route: String,
        timing: String,
        frequency_per_day: u32,
        duration_days: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            dose,
            route,
            timing,
            frequency_per_day,
            duration_days,
        }
    }
}

/// Patient-education analog of [`Medication`], phrased for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineAdviceItem {
    /// Stable correlation id
    pub id: String,
    pub medicine_name: String,
    /// Clock-time display, e.g. "09:00 AM"
    pub display_time: String,
    /// e.g. "After food"
    pub duration_label: String,
    /// e.g. "5 days"
    pub day_count_label: String,
}

impl MedicineAdviceItem {
    /// Create an advice item with a fresh id.
    pub fn new(
        medicine_name: String,
        display_time: String,
        duration_label: String,
        day_count_label: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            medicine_name,
            display_time,
            duration_label,
            day_count_label,
        }
    }
}
