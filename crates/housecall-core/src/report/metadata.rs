//! The artifact metadata channel.
//!
//! The capsule token rides in the PDF Info dictionary under `Keywords`: a
//! standard field that viewers preserve across open/print/re-save cycles and
//! never paint onto a page. Reads and writes happen on finished PDF bytes, so
//! the channel is independent of how the pages were produced.

use lopdf::{Dictionary, Document, Object, StringFormat};

/// Info-dictionary key carrying the capsule.
const CAPSULE_KEY: &[u8] = b"Keywords";

/// Write the capsule into a finished artifact, returning the new bytes.
pub fn embed_capsule(artifact: &[u8], capsule: &str) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::load_mem(artifact)?;

    let info_id = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => *id,
        _ => {
            let id = doc.add_object(Dictionary::new());
            doc.trailer.set("Info", Object::Reference(id));
            id
        }
    };

    let value = Object::String(capsule.as_bytes().to_vec(), StringFormat::Literal);
    match doc.get_object_mut(info_id)? {
        Object::Dictionary(info) => info.set(CAPSULE_KEY, value),
        other => {
            let mut info = Dictionary::new();
            info.set(CAPSULE_KEY, value);
            *other = Object::Dictionary(info);
        }
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

/// Read the capsule back out of an artifact.
///
/// `None` covers every "not ours" case: bytes that are not a PDF, a PDF
/// without an Info dictionary, and an absent or empty capsule field.
pub fn extract_capsule(artifact: &[u8]) -> Option<String> {
    let doc = match Document::load_mem(artifact) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::debug!(%err, "artifact is not readable as a PDF");
            return None;
        }
    };

    let capsule = doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| obj.as_reference().ok())
        .and_then(|id| doc.get_object(id).ok())
        .and_then(|obj| obj.as_dict().ok())
        .and_then(|info| info.get(CAPSULE_KEY).ok())
        .and_then(|obj| obj.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())?;

    if capsule.trim().is_empty() {
        None
    } else {
        Some(capsule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A one-page PDF is enough to exercise the channel.
    fn blank_pdf() -> Vec<u8> {
        let (doc, _, _) =
            printpdf::PdfDocument::new("test", printpdf::Mm(210.0), printpdf::Mm(297.0), "Layer 1");
        let mut buffer = std::io::BufWriter::new(Vec::new());
        doc.save(&mut buffer).unwrap();
        buffer.into_inner().unwrap()
    }

    #[test]
    fn test_embed_then_extract() {
        let artifact = embed_capsule(&blank_pdf(), "HCCAP.1.e30.0000000000000000").unwrap();
        assert_eq!(
            extract_capsule(&artifact).as_deref(),
            Some("HCCAP.1.e30.0000000000000000")
        );
    }

    #[test]
    fn test_extract_without_capsule() {
        assert!(extract_capsule(&blank_pdf()).is_none());
    }

    #[test]
    fn test_extract_from_non_pdf() {
        assert!(extract_capsule(b"plain text, not a document").is_none());
        assert!(extract_capsule(&[]).is_none());
    }

    #[test]
    fn test_embed_survives_resave() {
        let artifact = embed_capsule(&blank_pdf(), "HCCAP.1.e30.0000000000000000").unwrap();

        // Round the bytes through another parse/save cycle, as a viewer would.
        let mut doc = Document::load_mem(&artifact).unwrap();
        let mut resaved = Vec::new();
        doc.save_to(&mut resaved).unwrap();

        assert_eq!(
            extract_capsule(&resaved).as_deref(),
            Some("HCCAP.1.e30.0000000000000000")
        );
    }
}
