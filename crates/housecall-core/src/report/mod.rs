//! Report artifact generation and recovery.
//!
//! The renderer turns a [`crate::models::VisitRecord`] into a paginated PDF
//! and embeds the record's capsule in the document metadata; the importer
//! reads that capsule back out of a previously rendered artifact. Between the
//! two, an exported report file is the system's only persistence format that
//! leaves the device.

mod import;
mod layout;
mod metadata;
mod render;

pub use import::*;
pub use layout::*;
pub use metadata::*;
pub use render::*;

use thiserror::Error;

use crate::capsule::CapsuleFormatError;

/// Artifact generation failures. Recoverable; the caller may retry.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("record serialization failed: {0}")]
    Capsule(#[from] serde_json::Error),

    #[error("attachment image unreadable: {0}")]
    Attachment(String),

    #[error("PDF build failed: {0}")]
    Pdf(String),

    #[error("metadata embed failed: {0}")]
    Metadata(#[from] lopdf::Error),
}

/// Artifact recovery failures. Both variants mean "no usable record".
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file carries no capsule: foreign PDF, attachments-only export, or
    /// bytes that are not a PDF at all.
    #[error("no embedded record found in artifact")]
    NoCapsuleFound,

    #[error(transparent)]
    Capsule(#[from] CapsuleFormatError),
}
