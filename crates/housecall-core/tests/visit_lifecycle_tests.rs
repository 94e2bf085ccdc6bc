//! Store lifecycle tests: visit identity, caps, persistence across reopen,
//! and the FFI surface end to end.

use housecall_core::models::VisitRecord;
use housecall_core::{
    open_store_in_memory, render_report, Database, FfiRole, FfiVisitRecord, FfiVitalReadings,
    MAX_SAVED_VISITS,
};

fn record_for(patient: &str) -> VisitRecord {
    let mut record = VisitRecord::new();
    record.patient_name = patient.into();
    record.contact = "9800011122".into();
    record.email = "asha@example.com".into();
    record.provisional_diagnosis = "Hypertension".into();
    record
}

#[test]
fn test_save_twice_yields_distinct_ids() {
    let db = Database::open_in_memory().unwrap();
    let mut record = record_for("Asha Rao");

    let first = db.save_visit(&mut record).unwrap();
    let second = db.save_visit(&mut record).unwrap();

    assert!(!first.is_empty());
    assert!(!second.is_empty());
    assert_ne!(first, second);
}

#[test]
fn test_loaded_record_is_unsaved_until_next_save() {
    let db = Database::open_in_memory().unwrap();
    let mut record = record_for("Asha Rao");
    let saved_id = db.save_visit(&mut record).unwrap();

    let mut loaded = db.load_visit(&saved_id).unwrap().unwrap();
    assert!(loaded.visit_id.is_empty());

    let new_id = db.save_visit(&mut loaded).unwrap();
    assert!(!new_id.is_empty());
    assert_ne!(new_id, saved_id);
    // Both rows remain addressable
    assert_eq!(db.list_visits().unwrap().len(), 2);
}

#[test]
fn test_visits_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("housecall.db");

    let saved_id = {
        let db = Database::open(&path).unwrap();
        db.save_visit(&mut record_for("Asha Rao")).unwrap()
    };

    let db = Database::open(&path).unwrap();
    let visits = db.list_visits().unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].visit_id, saved_id);

    let loaded = db.load_visit(&saved_id).unwrap().unwrap();
    assert_eq!(loaded.patient_name, "Asha Rao");
}

#[test]
fn test_visit_cap_holds_after_many_saves() {
    let db = Database::open_in_memory().unwrap();
    for i in 0..(MAX_SAVED_VISITS * 2) {
        db.save_visit(&mut record_for(&format!("Patient {i}"))).unwrap();
    }
    assert_eq!(db.list_visits().unwrap().len(), MAX_SAVED_VISITS);
}

// =========================================================================
// FFI surface
// =========================================================================

#[test]
fn test_ffi_visit_round_trip() {
    let core = open_store_in_memory().unwrap();

    let record: FfiVisitRecord = record_for("Asha Rao").into();
    let visit_id = core.save_visit(record).unwrap();

    let listed = core.list_visits().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].visit_id, visit_id);

    let loaded = core.load_visit(visit_id.clone()).unwrap().unwrap();
    assert!(loaded.visit_id.is_empty());
    assert_eq!(loaded.patient_name, "Asha Rao");

    assert!(core.delete_visit(visit_id).unwrap());
    assert!(core.list_visits().unwrap().is_empty());
}

#[test]
fn test_ffi_vitals_round_trip() {
    let core = open_store_in_memory().unwrap();

    let readings = FfiVitalReadings {
        blood_pressure: "120/80".into(),
        temperature: "98.4".into(),
        spo2: "98".into(),
        heart_rate: "72".into(),
        rbs: "110".into(),
        weight: "70".into(),
        waist: "34".into(),
    };
    let vital = core.record_vitals(readings).unwrap();
    assert!(!vital.id.is_empty());

    let mut edited = vital.clone();
    edited.readings.blood_pressure = "130/85".into();
    assert!(core.update_vitals(edited).unwrap());

    let listed = core.list_vitals().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, vital.id);
    assert_eq!(listed[0].readings.blood_pressure, "130/85");

    assert!(core.delete_vitals_entry(vital.id).unwrap());
}

#[test]
fn test_ffi_doctor_import_prepares_follow_up() {
    let core = open_store_in_memory().unwrap();

    let mut record = record_for("Asha Rao");
    record.visit_id = "previously-saved".into();
    record.service_name = "Home Visit".into();
    record.service_charge = "1500".into();
    let artifact = render_report(&record, &[]).unwrap();

    let imported = core.import_report(artifact, FfiRole::Doctor).unwrap();
    assert!(imported.visit_id.is_empty());
    assert_eq!(imported.service_name, "Follow-up Consultation");
    assert_eq!(imported.service_charge, "500");
    assert_eq!(imported.provisional_diagnosis, "Hypertension");
}

#[test]
fn test_ffi_patient_import_adopts_identity() {
    let core = open_store_in_memory().unwrap();

    let artifact = render_report(&record_for("Asha Rao"), &[]).unwrap();
    let imported = core.import_report(artifact, FfiRole::Patient).unwrap();

    // Clinical content untouched for the patient view
    assert_eq!(imported.patient_name, "Asha Rao");
    assert_eq!(imported.service_charge, "");

    let identity = core.identity().unwrap();
    assert_eq!(identity.name, "Asha Rao");
    assert_eq!(identity.phone, "9800011122");
    assert_eq!(identity.email, "asha@example.com");
}
