//! Report importer: recover the record embedded in an artifact.

use super::{metadata, ImportError};
use crate::capsule;
use crate::models::VisitRecord;

/// Billing defaults applied when a doctor reopens a report for a follow-up.
pub const FOLLOW_UP_SERVICE_NAME: &str = "Follow-up Consultation";
pub const FOLLOW_UP_SERVICE_CHARGE: &str = "500";

/// Recover the embedded record from artifact bytes.
///
/// Fails with [`ImportError::NoCapsuleFound`] when there is nothing to
/// recover, and with the capsule's own error when the embedded data is
/// malformed. Neither failure yields a partial record.
pub fn import_report(artifact: &[u8]) -> Result<VisitRecord, ImportError> {
    let capsule = metadata::extract_capsule(artifact).ok_or(ImportError::NoCapsuleFound)?;
    Ok(capsule::decode(&capsule)?)
}

/// Doctor-side post-processing: turn an imported record into the starting
/// point for a follow-up visit.
///
/// Clinical fields carry over untouched. The visit id is cleared so the next
/// save assigns a fresh one, billing resets to the follow-up defaults, and
/// the visit date moves to today.
pub fn prepare_follow_up(mut record: VisitRecord) -> VisitRecord {
    record.clear_visit_id();
    record.service_name = FOLLOW_UP_SERVICE_NAME.into();
    record.service_charge = FOLLOW_UP_SERVICE_CHARGE.into();
    record.service_quantity = 1;
    record.visit_date = chrono::Local::now().format("%d %b %Y").to_string();
    record
}
