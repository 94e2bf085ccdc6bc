//! Flat relay payloads derived from core models.
//!
//! Every integration endpoint takes a flat field set; nothing here keeps a
//! reference back into the record, so payloads outlive the screens that
//! produced them.

use serde::{Deserialize, Serialize};

use housecall_core::{DailyVital, PatientIdentity, VisitRecord};

/// Lead-capture submission, sent when a patient completes signup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadPayload {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Where the lead came from, e.g. "patient-app"
    pub source: String,
}

impl LeadPayload {
    pub fn from_identity(identity: &PatientIdentity, source: &str) -> Self {
        Self {
            name: identity.name.clone(),
            phone: identity.phone.clone(),
            email: identity.email.clone(),
            source: source.to_string(),
        }
    }
}

/// Daily-vitals row for the sheet sync endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalsSyncPayload {
    pub patient_name: String,
    pub patient_phone: String,
    pub recorded_at: String,
    pub blood_pressure: String,
    pub temperature: String,
    pub spo2: String,
    pub heart_rate: String,
    pub rbs: String,
    pub weight: String,
    pub waist: String,
}

impl VitalsSyncPayload {
    pub fn from_vital(vital: &DailyVital, identity: &PatientIdentity) -> Self {
        Self {
            patient_name: identity.name.clone(),
            patient_phone: identity.phone.clone(),
            recorded_at: vital.recorded_at.clone(),
            blood_pressure: vital.readings.blood_pressure.clone(),
            temperature: vital.readings.temperature.clone(),
            spo2: vital.readings.spo2.clone(),
            heart_rate: vital.readings.heart_rate.clone(),
            rbs: vital.readings.rbs.clone(),
            weight: vital.readings.weight.clone(),
            waist: vital.readings.waist.clone(),
        }
    }
}

/// Clinical-report summary for the practice's sync endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportSyncPayload {
    pub visit_id: String,
    pub visit_date: String,
    pub staff_name: String,
    pub patient_name: String,
    pub contact: String,
    pub provisional_diagnosis: String,
    pub service_name: String,
    pub service_charge: String,
    pub medication_count: u32,
}

impl ReportSyncPayload {
    pub fn from_record(record: &VisitRecord) -> Self {
        Self {
            visit_id: record.visit_id.clone(),
            visit_date: record.visit_date.clone(),
            staff_name: record.staff_name.clone(),
            patient_name: record.patient_name.clone(),
            contact: record.contact.clone(),
            provisional_diagnosis: record.provisional_diagnosis.clone(),
            service_name: record.service_name.clone(),
            service_charge: record.service_charge.clone(),
            medication_count: record.medications.len() as u32,
        }
    }
}

/// Named workflow trigger with arbitrary flat context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowTrigger {
    pub event: String,
    pub fields: Vec<RelayField>,
}

/// One key/value pair of workflow context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayField {
    pub key: String,
    pub value: String,
}

impl WorkflowTrigger {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(RelayField {
            key: key.into(),
            value: value.into(),
        });
        self
    }
}

/// One queued outbound message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RelayEvent {
    Lead(LeadPayload),
    Vitals(VitalsSyncPayload),
    Report(ReportSyncPayload),
    Workflow(WorkflowTrigger),
}

impl RelayEvent {
    /// Short kind tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayEvent::Lead(_) => "lead",
            RelayEvent::Vitals(_) => "vitals",
            RelayEvent::Report(_) => "report",
            RelayEvent::Workflow(_) => "workflow",
        }
    }

    /// Wire form handed to sinks.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use housecall_core::{VitalReadings, VisitRecord};

    fn identity() -> PatientIdentity {
        PatientIdentity {
            name: "Asha Rao".into(),
            phone: "9800011122".into(),
            email: "asha@example.com".into(),
            ..PatientIdentity::default()
        }
    }

    #[test]
    fn test_lead_payload_from_identity() {
        let lead = LeadPayload::from_identity(&identity(), "patient-app");
        assert_eq!(lead.name, "Asha Rao");
        assert_eq!(lead.source, "patient-app");
    }

    #[test]
    fn test_vitals_payload_flattens_readings() {
        let vital = DailyVital::new(VitalReadings {
            blood_pressure: "120/80".into(),
            spo2: "98".into(),
            ..VitalReadings::default()
        });
        let payload = VitalsSyncPayload::from_vital(&vital, &identity());
        assert_eq!(payload.blood_pressure, "120/80");
        assert_eq!(payload.patient_phone, "9800011122");
        assert_eq!(payload.recorded_at, vital.recorded_at);
    }

    #[test]
    fn test_report_payload_counts_medications() {
        let mut record = VisitRecord::new();
        record.patient_name = "Asha Rao".into();
        record.medications.push(housecall_core::Medication::new(
            "Metformin".into(),
            "500mg".into(),
            "Oral".into(),
            "1-0-1".into(),
            2,
            30,
        ));
        let payload = ReportSyncPayload::from_record(&record);
        assert_eq!(payload.medication_count, 1);
        assert_eq!(payload.patient_name, "Asha Rao");
    }

    #[test]
    fn test_workflow_trigger_builder() {
        let trigger = WorkflowTrigger::new("report-exported")
            .field("patient", "Asha Rao")
            .field("pages", "3");
        assert_eq!(trigger.fields.len(), 2);

        let event = RelayEvent::Workflow(trigger);
        assert_eq!(event.kind(), "workflow");
        assert!(event.to_json().unwrap().contains("report-exported"));
    }
}
