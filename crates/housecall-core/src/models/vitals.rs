//! Patient-recorded daily vitals.

use serde::{Deserialize, Serialize};

/// The readings captured in one daily-vitals entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VitalReadings {
    pub blood_pressure: String,
    pub temperature: String,
    pub spo2: String,
    pub heart_rate: String,
    /// Random blood sugar
    pub rbs: String,
    pub weight: String,
    pub waist: String,
}

/// One patient-entered vitals entry.
///
/// The id is immutable for the entry's lifetime; readings and the display
/// timestamp are replaceable via edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyVital {
    /// Stable entry id
    pub id: String,
    /// Display timestamp, local time
    pub recorded_at: String,
    pub readings: VitalReadings,
}

impl DailyVital {
    /// Create an entry stamped now.
    pub fn new(readings: VitalReadings) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recorded_at: chrono::Local::now().format("%d %b %Y, %I:%M %p").to_string(),
            readings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vital() {
        let vital = DailyVital::new(VitalReadings {
            blood_pressure: "120/80".into(),
            spo2: "98".into(),
            ..VitalReadings::default()
        });
        assert_eq!(vital.id.len(), 36);
        assert!(!vital.recorded_at.is_empty());
        assert_eq!(vital.readings.blood_pressure, "120/80");
    }
}
