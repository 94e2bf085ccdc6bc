//! The visit record: one home-healthcare consultation.

use serde::{Deserialize, Serialize};

use super::medication::{Medication, MedicineAdviceItem};

/// A single clinical visit, as captured by the doctor-facing form.
///
/// Field values mirror the capture surface: free text stays free text, so the
/// record survives encode/decode without normalization loss. `visit_id` is
/// assigned by the store at save time and is empty on fresh, loaded, and
/// imported records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisitRecord {
    // Identity
    /// Assigned exactly once per save; empty until then
    pub visit_id: String,
    /// Attending staff member
    pub staff_name: String,
    pub patient_name: String,
    pub age: String,
    pub gender: String,
    /// Phone number
    pub contact: String,
    pub email: String,
    pub address: String,
    /// Display date of the visit
    pub visit_date: String,

    // Anthropometrics
    /// Weight in kg, as entered
    pub weight: String,
    /// Height in cm, as entered
    pub height: String,
    /// Derived from weight and height; empty when either is unusable
    pub bmi: String,

    // Clinical narrative
    pub complaints: String,
    pub illness_duration: String,
    pub history: String,
    pub surgical_history: String,
    pub investigations_advised: String,
    pub provisional_diagnosis: String,
    /// Coding-system code for the provisional diagnosis
    pub diagnosis_code: String,
    pub examination_findings: String,
    pub treatment_plan: String,
    /// Non-medicinal advice
    pub advice: String,

    // Vitals snapshot at visit time
    pub temperature: String,
    pub blood_pressure: String,
    pub spo2: String,
    pub heart_rate: String,
    /// Random blood sugar
    pub rbs: String,

    // Billing
    pub service_name: String,
    pub service_charge: String,
    pub service_quantity: u32,

    // Follow-up
    pub follow_up_required: bool,
    pub follow_up_date: String,

    // Consultant affiliation
    pub consultant_name: String,
    /// Logo asset reference
    pub consultant_logo: String,

    /// Ordered image references; pixel data travels outside the record
    pub attachments: Vec<String>,

    pub medications: Vec<Medication>,
    pub medicine_advice: Vec<MedicineAdviceItem>,
}

impl VisitRecord {
    /// Create an empty record dated today.
    pub fn new() -> Self {
        Self {
            visit_date: chrono::Local::now().format("%d %b %Y").to_string(),
            service_quantity: 1,
            ..Self::default()
        }
    }

    /// Replace weight and height together, keeping BMI in step.
    pub fn set_anthropometrics(&mut self, weight: String, height: String) {
        self.weight = weight;
        self.height = height;
        self.refresh_bmi();
    }

    /// Recompute `bmi` from the current weight and height.
    pub fn refresh_bmi(&mut self) {
        self.bmi = compute_bmi(&self.weight, &self.height);
    }

    /// Drop the persisted identity so the next save assigns a fresh one.
    pub fn clear_visit_id(&mut self) {
        self.visit_id.clear();
    }
}

/// BMI from weight (kg) and height (cm), formatted to one decimal.
///
/// Returns the empty string when either input is non-positive or unparseable.
pub fn compute_bmi(weight: &str, height: &str) -> String {
    let kg: f64 = match weight.trim().parse() {
        Ok(v) => v,
        Err(_) => return String::new(),
    };
    let cm: f64 = match height.trim().parse() {
        Ok(v) => v,
        Err(_) => return String::new(),
    };
    if kg <= 0.0 || cm <= 0.0 {
        return String::new();
    }
    let meters = cm / 100.0;
    format!("{:.1}", kg / (meters * meters))
}
