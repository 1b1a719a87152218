//! Use Cases
//!
//! | Use Case | Description |
//! |----------|-------------|
//! | [`WiringService`] | Schedules a declaration set and exposes binding |

/// Wiring resolution use case
pub mod wiring_service;

pub use wiring_service::{ResolutionOptions, Wiring, WiringService};
