//! Derived display views computed from a record at read time.
//!
//! Pure and stateless: nothing here touches the store or mutates a record.
//! The patient-facing renderer calls these on every refresh.

mod chronic;
mod clock;

pub use chronic::*;
pub use clock::*;
