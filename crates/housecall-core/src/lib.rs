//! Housecall Core Library
//!
//! Local-first clinical workflow core for a home-healthcare practice. A
//! doctor records a visit and exports a report; a patient tracks vitals and
//! medications. There is no backend: an exported report carries its own
//! record as an invisible metadata capsule and can be re-imported anywhere.
//!
//! # Architecture
//!
//! ```text
//! Visit form ──▶ VisitRecord ──▶ capsule::encode ─┐
//!                     │                           │
//!                     ▼                           ▼
//!              report::render ──────▶ PDF + embedded capsule
//!                                              │
//!                                     (file leaves the device,
//!                                      comes back any time later)
//!                                              │
//!              report::import ◀────────────────┘
//!                     │
//!          doctor: follow-up prefill     patient: read-only view,
//!          (fresh visit id, default      identity adoption,
//!           follow-up billing)           derived display
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (VisitRecord, Medication, DailyVital, etc.)
//! - [`capsule`]: Record ⇄ opaque-token codec with integrity guarding
//! - [`report`]: PDF rendering, metadata embedding, and import
//! - [`display`]: Pure derived views (chronic medications, clock times)
//! - [`db`]: SQLite store for saved visits, daily vitals, and identity
//! - [`access`]: Static shared-code role gate

pub mod access;
pub mod capsule;
pub mod db;
pub mod display;
pub mod models;
pub mod report;

// Re-export commonly used types
pub use access::{verify_access_code, Role};
pub use capsule::CapsuleFormatError;
pub use db::{Database, VisitSummary, MAX_DAILY_VITALS, MAX_SAVED_VISITS};
pub use display::{chronic_entries, clock_display, extract_chronic_medications, ChronicEntry};
pub use models::{
    compute_bmi, DailyVital, Medication, MedicineAdviceItem, PatientIdentity, VisitRecord,
    VitalReadings,
};
pub use report::{
    import_report, prepare_follow_up, render_report, AttachmentImage, ImportError, RenderError,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HousecallError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Import error: {0}")]
    ImportError(String),
}

impl From<db::DbError> for HousecallError {
    fn from(e: db::DbError) -> Self {
        HousecallError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for HousecallError {
    fn from(e: serde_json::Error) -> Self {
        HousecallError::InvalidInput(e.to_string())
    }
}

impl From<report::RenderError> for HousecallError {
    fn from(e: report::RenderError) -> Self {
        HousecallError::RenderError(e.to_string())
    }
}

impl From<report::ImportError> for HousecallError {
    fn from(e: report::ImportError) -> Self {
        HousecallError::ImportError(e.to_string())
    }
}

impl From<capsule::CapsuleFormatError> for HousecallError {
    fn from(e: capsule::CapsuleFormatError) -> Self {
        HousecallError::ImportError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for HousecallError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HousecallError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the local store at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<HousecallCore>, HousecallError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(HousecallCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory store (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<HousecallCore>, HousecallError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(HousecallCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Stateless Functions (exported to FFI)
// =========================================================================

/// Resolve an access code to a role, or nothing.
#[uniffi::export]
pub fn access_role(code: String) -> Option<FfiRole> {
    verify_access_code(&code).map(|role| role.into())
}

/// Derived BMI display for the entry form.
#[uniffi::export]
pub fn bmi_display(weight: String, height: String) -> String {
    compute_bmi(&weight, &height)
}

/// Chronic-medication lines derived from the treatment narrative.
#[uniffi::export]
pub fn chronic_medication_lines(treatment_text: String) -> Vec<String> {
    extract_chronic_medications(&treatment_text)
}

/// Chronic-medication lines with stable toggle keys.
#[uniffi::export]
pub fn chronic_medication_entries(treatment_text: String) -> Vec<FfiChronicEntry> {
    chronic_entries(&treatment_text)
        .into_iter()
        .map(|e| e.into())
        .collect()
}

/// Clock-time display for a medication timing description.
#[uniffi::export]
pub fn timing_clock_display(timing_text: String) -> String {
    clock_display(&timing_text)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct HousecallCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl HousecallCore {
    // =========================================================================
    // Visit Operations
    // =========================================================================

    /// Save a visit snapshot and return the assigned visit id.
    pub fn save_visit(&self, record: FfiVisitRecord) -> Result<String, HousecallError> {
        let db = self.db.lock()?;
        let mut record: VisitRecord = record.into();
        record.refresh_bmi();
        Ok(db.save_visit(&mut record)?)
    }

    /// List saved visits, most recent first.
    pub fn list_visits(&self) -> Result<Vec<FfiVisitSummary>, HousecallError> {
        let db = self.db.lock()?;
        let visits = db.list_visits()?;
        Ok(visits.into_iter().map(|v| v.into()).collect())
    }

    /// Load a saved visit as the starting point for a new one.
    pub fn load_visit(&self, visit_id: String) -> Result<Option<FfiVisitRecord>, HousecallError> {
        let db = self.db.lock()?;
        let record = db.load_visit(&visit_id)?;
        Ok(record.map(|r| r.into()))
    }

    /// Delete a saved visit.
    pub fn delete_visit(&self, visit_id: String) -> Result<bool, HousecallError> {
        let db = self.db.lock()?;
        Ok(db.delete_visit(&visit_id)?)
    }

    // =========================================================================
    // Daily Vitals Operations
    // =========================================================================

    /// Record a new vitals entry stamped now.
    pub fn record_vitals(
        &self,
        readings: FfiVitalReadings,
    ) -> Result<FfiDailyVital, HousecallError> {
        let db = self.db.lock()?;
        let vital = DailyVital::new(readings.into());
        db.insert_vital(&vital)?;
        Ok(vital.into())
    }

    /// Replace the readings of an existing entry.
    pub fn update_vitals(&self, vital: FfiDailyVital) -> Result<bool, HousecallError> {
        let db = self.db.lock()?;
        Ok(db.update_vital(&vital.into())?)
    }

    /// List vitals entries, most recent first.
    pub fn list_vitals(&self) -> Result<Vec<FfiDailyVital>, HousecallError> {
        let db = self.db.lock()?;
        let vitals = db.list_vitals()?;
        Ok(vitals.into_iter().map(|v| v.into()).collect())
    }

    /// Delete a vitals entry.
    pub fn delete_vitals_entry(&self, vital_id: String) -> Result<bool, HousecallError> {
        let db = self.db.lock()?;
        Ok(db.delete_vital(&vital_id)?)
    }

    // =========================================================================
    // Identity Operations
    // =========================================================================

    /// Load the locally stored patient identity.
    pub fn identity(&self) -> Result<FfiPatientIdentity, HousecallError> {
        let db = self.db.lock()?;
        Ok(db.load_identity()?.into())
    }

    /// Persist the patient identity.
    pub fn set_identity(&self, identity: FfiPatientIdentity) -> Result<(), HousecallError> {
        let db = self.db.lock()?;
        Ok(db.save_identity(&identity.into())?)
    }

    // =========================================================================
    // Report Operations
    // =========================================================================

    /// Render a visit record into a capsule-carrying PDF.
    pub fn render_report(
        &self,
        record: FfiVisitRecord,
        attachments: Vec<FfiAttachment>,
    ) -> Result<Vec<u8>, HousecallError> {
        let mut record: VisitRecord = record.into();
        record.refresh_bmi();
        let attachments: Vec<AttachmentImage> =
            attachments.into_iter().map(|a| a.into()).collect();
        Ok(render_report(&record, &attachments)?)
    }

    /// Recover the record embedded in an artifact, with role post-processing.
    ///
    /// A doctor gets a follow-up prefill (cleared visit id, default follow-up
    /// billing). A patient gets the record as-is, and any empty local
    /// identity fields adopt the embedded contact details.
    pub fn import_report(
        &self,
        artifact: Vec<u8>,
        role: FfiRole,
    ) -> Result<FfiVisitRecord, HousecallError> {
        let record = import_report(&artifact)?;
        let record = match role {
            FfiRole::Doctor => prepare_follow_up(record),
            FfiRole::Patient => {
                let db = self.db.lock()?;
                let mut identity = db.load_identity()?;
                if identity.adopt_from_record(&record) {
                    db.save_identity(&identity)?;
                }
                record
            }
        };
        Ok(record.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe role.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiRole {
    Doctor,
    Patient,
}

impl From<Role> for FfiRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Doctor => FfiRole::Doctor,
            Role::Patient => FfiRole::Patient,
        }
    }
}

/// FFI-safe visit record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitRecord {
    pub visit_id: String,
    pub staff_name: String,
    pub patient_name: String,
    pub age: String,
    pub gender: String,
    pub contact: String,
    pub email: String,
    pub address: String,
    pub visit_date: String,
    pub weight: String,
    pub height: String,
    pub bmi: String,
    pub complaints: String,
    pub illness_duration: String,
    pub history: String,
    pub surgical_history: String,
    pub investigations_advised: String,
    pub provisional_diagnosis: String,
    pub diagnosis_code: String,
    pub examination_findings: String,
    pub treatment_plan: String,
    pub advice: String,
    pub temperature: String,
    pub blood_pressure: String,
    pub spo2: String,
    pub heart_rate: String,
    pub rbs: String,
    pub service_name: String,
    pub service_charge: String,
    pub service_quantity: u32,
    pub follow_up_required: bool,
    pub follow_up_date: String,
    pub consultant_name: String,
    pub consultant_logo: String,
    pub attachments: Vec<String>,
    pub medications: Vec<FfiMedication>,
    pub medicine_advice: Vec<FfiAdviceItem>,
}

impl From<VisitRecord> for FfiVisitRecord {
    fn from(record: VisitRecord) -> Self {
        Self {
            visit_id: record.visit_id,
            staff_name: record.staff_name,
            patient_name: record.patient_name,
            age: record.age,
            gender: record.gender,
            contact: record.contact,
            email: record.email,
            address: record.address,
            visit_date: record.visit_date,
            weight: record.weight,
            height: record.height,
            bmi: record.bmi,
            complaints: record.complaints,
            illness_duration: record.illness_duration,
            history: record.history,
            surgical_history: record.surgical_history,
            investigations_advised: record.investigations_advised,
            provisional_diagnosis: record.provisional_diagnosis,
            diagnosis_code: record.diagnosis_code,
            examination_findings: record.examination_findings,
            treatment_plan: record.treatment_plan,
            advice: record.advice,
            temperature: record.temperature,
            blood_pressure: record.blood_pressure,
            spo2: record.spo2,
            heart_rate: record.heart_rate,
            rbs: record.rbs,
            service_name: record.service_name,
            service_charge: record.service_charge,
            service_quantity: record.service_quantity,
            follow_up_required: record.follow_up_required,
            follow_up_date: record.follow_up_date,
            consultant_name: record.consultant_name,
            consultant_logo: record.consultant_logo,
            attachments: record.attachments,
            medications: record.medications.into_iter().map(|m| m.into()).collect(),
            medicine_advice: record
                .medicine_advice
                .into_iter()
                .map(|a| a.into())
                .collect(),
        }
    }
}

impl From<FfiVisitRecord> for VisitRecord {
    fn from(record: FfiVisitRecord) -> Self {
        Self {
            visit_id: record.visit_id,
            staff_name: record.staff_name,
            patient_name: record.patient_name,
            age: record.age,
            gender: record.gender,
            contact: record.contact,
            email: record.email,
            address: record.address,
            visit_date: record.visit_date,
            weight: record.weight,
            height: record.height,
            bmi: record.bmi,
            complaints: record.complaints,
            illness_duration: record.illness_duration,
            history: record.history,
            surgical_history: record.surgical_history,
            investigations_advised: record.investigations_advised,
            provisional_diagnosis: record.provisional_diagnosis,
            diagnosis_code: record.diagnosis_code,
            examination_findings: record.examination_findings,
            treatment_plan: record.treatment_plan,
            advice: record.advice,
            temperature: record.temperature,
            blood_pressure: record.blood_pressure,
            spo2: record.spo2,
            heart_rate: record.heart_rate,
            rbs: record.rbs,
            service_name: record.service_name,
            service_charge: record.service_charge,
            service_quantity: record.service_quantity,
            follow_up_required: record.follow_up_required,
            follow_up_date: record.follow_up_date,
            consultant_name: record.consultant_name,
            consultant_logo: record.consultant_logo,
            attachments: record.attachments,
            medications: record.medications.into_iter().map(|m| m.into()).collect(),
            medicine_advice: record
                .medicine_advice
                .into_iter()
                .map(|a| a.into())
                .collect(),
        }
    }
}

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub name: String,
    pub dose: String,
    pub route: String,
    pub timing: String,
    pub frequency_per_day: u32,
    pub duration_days: u32,
}

impl From<Medication> for FfiMedication {
    fn from(med: Medication) -> Self {
        Self {
            id: med.id,
            name: med.name,
            dose: med.dose,
            route: med.route,
            timing: med.timing,
            frequency_per_day: med.frequency_per_day,
            duration_days: med.duration_days,
        }
    }
}

impl From<FfiMedication> for Medication {
    fn from(med: FfiMedication) -> Self {
        Self {
            id: med.id,
            name: med.name,
            dose: med.dose,
            route: med.route,
            timing: med.timing,
            frequency_per_day: med.frequency_per_day,
            duration_days: med.duration_days,
        }
    }
}

/// FFI-safe medicine-advice item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAdviceItem {
    pub id: String,
    pub medicine_name: String,
    pub display_time: String,
    pub duration_label: String,
    pub day_count_label: String,
}

impl From<MedicineAdviceItem> for FfiAdviceItem {
    fn from(item: MedicineAdviceItem) -> Self {
        Self {
            id: item.id,
            medicine_name: item.medicine_name,
            display_time: item.display_time,
            duration_label: item.duration_label,
            day_count_label: item.day_count_label,
        }
    }
}

impl From<FfiAdviceItem> for MedicineAdviceItem {
    fn from(item: FfiAdviceItem) -> Self {
        Self {
            id: item.id,
            medicine_name: item.medicine_name,
            display_time: item.display_time,
            duration_label: item.duration_label,
            day_count_label: item.day_count_label,
        }
    }
}

/// FFI-safe vital readings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVitalReadings {
    pub blood_pressure: String,
    pub temperature: String,
    pub spo2: String,
    pub heart_rate: String,
    pub rbs: String,
    pub weight: String,
    pub waist: String,
}

impl From<VitalReadings> for FfiVitalReadings {
    fn from(readings: VitalReadings) -> Self {
        Self {
            blood_pressure: readings.blood_pressure,
            temperature: readings.temperature,
            spo2: readings.spo2,
            heart_rate: readings.heart_rate,
            rbs: readings.rbs,
            weight: readings.weight,
            waist: readings.waist,
        }
    }
}

impl From<FfiVitalReadings> for VitalReadings {
    fn from(readings: FfiVitalReadings) -> Self {
        Self {
            blood_pressure: readings.blood_pressure,
            temperature: readings.temperature,
            spo2: readings.spo2,
            heart_rate: readings.heart_rate,
            rbs: readings.rbs,
            weight: readings.weight,
            waist: readings.waist,
        }
    }
}

/// FFI-safe daily-vital entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDailyVital {
    pub id: String,
    pub recorded_at: String,
    pub readings: FfiVitalReadings,
}

impl From<DailyVital> for FfiDailyVital {
    fn from(vital: DailyVital) -> Self {
        Self {
            id: vital.id,
            recorded_at: vital.recorded_at,
            readings: vital.readings.into(),
        }
    }
}

impl From<FfiDailyVital> for DailyVital {
    fn from(vital: FfiDailyVital) -> Self {
        Self {
            id: vital.id,
            recorded_at: vital.recorded_at,
            readings: vital.readings.into(),
        }
    }
}

/// FFI-safe visit-list entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitSummary {
    pub visit_id: String,
    pub patient_name: String,
    pub saved_at: String,
}

impl From<VisitSummary> for FfiVisitSummary {
    fn from(summary: VisitSummary) -> Self {
        Self {
            visit_id: summary.visit_id,
            patient_name: summary.patient_name,
            saved_at: summary.saved_at,
        }
    }
}

/// FFI-safe patient identity.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientIdentity {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub relative_name: String,
    pub relative_phone: String,
}

impl From<PatientIdentity> for FfiPatientIdentity {
    fn from(identity: PatientIdentity) -> Self {
        Self {
            name: identity.name,
            phone: identity.phone,
            email: identity.email,
            relative_name: identity.relative_name,
            relative_phone: identity.relative_phone,
        }
    }
}

impl From<FfiPatientIdentity> for PatientIdentity {
    fn from(identity: FfiPatientIdentity) -> Self {
        Self {
            name: identity.name,
            phone: identity.phone,
            email: identity.email,
            relative_name: identity.relative_name,
            relative_phone: identity.relative_phone,
        }
    }
}

/// FFI-safe attachment image.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAttachment {
    pub name: String,
    pub data: Vec<u8>,
}

impl From<FfiAttachment> for AttachmentImage {
    fn from(attachment: FfiAttachment) -> Self {
        Self {
            name: attachment.name,
            data: attachment.data,
        }
    }
}

/// FFI-safe chronic-medication entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChronicEntry {
    pub key: String,
    pub text: String,
}

impl From<ChronicEntry> for FfiChronicEntry {
    fn from(entry: ChronicEntry) -> Self {
        Self {
            key: entry.key,
            text: entry.text,
        }
    }
}
