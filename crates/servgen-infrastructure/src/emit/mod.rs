//! Go source emission
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`imports`] | Per-file import alias allocation |
//! | [`wiring`] | Wiring and test-export file rendering |

pub mod imports;
pub mod wiring;

pub use imports::{Import, ImportTable};
pub use wiring::{EmitOptions, GeneratedFile, WiringEmitter, export_identifier};
