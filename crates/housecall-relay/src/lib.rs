//! Fire-and-forget outbound relays for the housecall system.
//!
//! Lead capture, vitals sheet sync, clinical-report sync, and workflow
//! triggers all reduce to the same shape: build a flat payload from a core
//! model, queue it, move on. Delivery is best effort; failures are logged and
//! swallowed, never retried, and never surfaced to the caller.

pub mod dispatch;
pub mod payload;

pub use dispatch::*;
pub use payload::*;
