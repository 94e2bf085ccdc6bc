//! Capsule codec: the record ⇄ opaque-token round trip.
//!
//! A capsule is the serialized form of a [`VisitRecord`] packed for travel
//! inside a document metadata field:
//!
//! ```text
//! HCCAP.1.<base64(record json)>.<first 16 hex chars of sha256(record json)>
//! ```
//!
//! - `HCCAP` is the magic marker separating "not our data" from "our data,
//!   corrupted". Always validated before any parse attempt.
//! - `1` is the envelope version.
//! - The base64 stage makes the token binary-safe for any Unicode field value:
//!   no control characters, no unescaped delimiters.
//! - The checksum covers the JSON payload, so truncation inside the base64
//!   body is caught even when it still decodes.

use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::VisitRecord;

/// Magic marker opening every capsule.
const MAGIC: &str = "HCCAP";

/// Current envelope version.
const VERSION: &str = "1";

/// Hex chars of the payload digest carried in the envelope.
const CHECKSUM_LEN: usize = 16;

/// Decode failures. Callers treat every variant as "no usable record found".
#[derive(Error, Debug)]
pub enum CapsuleFormatError {
    #[error("missing capsule marker")]
    MissingMarker,

    #[error("malformed capsule envelope")]
    Envelope,

    #[error("unsupported capsule version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid capsule transport encoding: {0}")]
    Transport(#[from] base64::DecodeError),

    #[error("capsule checksum mismatch")]
    ChecksumMismatch,

    #[error("malformed record payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Serialize a record into its capsule token.
///
/// The token is a verbatim encoding of the record at call time; re-encoding
/// after further edits produces a different capsule.
pub fn encode(record: &VisitRecord) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_string(record)?;
    let body = general_purpose::STANDARD.encode(payload.as_bytes());
    let digest = payload_digest(payload.as_bytes());
    Ok(format!("{MAGIC}.{VERSION}.{body}.{digest}"))
}

/// Parse a capsule token back into a record.
pub fn decode(capsule: &str) -> Result<VisitRecord, CapsuleFormatError> {
    let mut parts = capsule.trim().splitn(4, '.');
    let magic = parts.next().unwrap_or_default();
    if magic != MAGIC {
        return Err(CapsuleFormatError::MissingMarker);
    }

    let version = parts.next().ok_or(CapsuleFormatError::Envelope)?;
    if version != VERSION {
        return Err(CapsuleFormatError::UnsupportedVersion(version.to_string()));
    }

    let body = parts.next().ok_or(CapsuleFormatError::Envelope)?;
    let digest = parts.next().ok_or(CapsuleFormatError::Envelope)?;
    if digest.len() != CHECKSUM_LEN {
        return Err(CapsuleFormatError::Envelope);
    }

    let payload = general_purpose::STANDARD.decode(body)?;
    if payload_digest(&payload) != digest {
        return Err(CapsuleFormatError::ChecksumMismatch);
    }

    Ok(serde_json::from_slice(&payload)?)
}

fn payload_digest(payload: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(CHECKSUM_LEN);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Medication, VisitRecord};

    fn sample_record() -> VisitRecord {
        let mut record = VisitRecord::new();
        record.staff_name = "Dr. Meera Nair".into();
        record.patient_name = "Svetlana Жукова".into();
        record.address = "12/4, Jayanagar 4th Block, Bengaluru".into();
        record.set_anthropometrics("70".into(), "175".into());
        record.provisional_diagnosis = "Type 2 Diabetes Mellitus".into();
        record.medications.push(Medication::new(
            "Metformin".into(),
            "500mg".into(),
            "Oral".into(),
            "1-0-1".into(),
            2,
            30,
        ));
        record
    }

    #[test]
    fn test_round_trip() {
        let record = sample_record();
        let capsule = encode(&record).unwrap();
        let recovered = decode(&capsule).unwrap();
        assert_eq!(recovered, record);
    }

    #[test]
    fn test_round_trip_empty_record() {
        let record = VisitRecord::default();
        let recovered = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(recovered, record);
    }

    #[test]
    fn test_token_has_no_control_characters() {
        let capsule = encode(&sample_record()).unwrap();
        assert!(capsule.chars().all(|c| c.is_ascii() && !c.is_ascii_control()));
        assert!(capsule.starts_with("HCCAP.1."));
    }

    #[test]
    fn test_foreign_data_is_rejected() {
        assert!(matches!(
            decode("not a capsule at all"),
            Err(CapsuleFormatError::MissingMarker)
        ));
        assert!(matches!(decode(""), Err(CapsuleFormatError::MissingMarker)));
    }

    #[test]
    fn test_unsupported_version() {
        let capsule = encode(&sample_record()).unwrap();
        let bumped = capsule.replacen("HCCAP.1.", "HCCAP.9.", 1);
        assert!(matches!(
            decode(&bumped),
            Err(CapsuleFormatError::UnsupportedVersion(v)) if v == "9"
        ));
    }

    #[test]
    fn test_truncated_capsule_is_rejected() {
        let capsule = encode(&sample_record()).unwrap();
        let truncated = &capsule[..capsule.len() / 2];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let record = sample_record();
        let payload = serde_json::to_string(&record).unwrap();
        let other = payload.replace("Metformin", "Metforminn");
        let body = base64::engine::general_purpose::STANDARD.encode(other.as_bytes());
        let digest = payload_digest(payload.as_bytes());
        let forged = format!("HCCAP.1.{body}.{digest}");
        assert!(matches!(
            decode(&forged),
            Err(CapsuleFormatError::ChecksumMismatch)
        ));
    }
}
