//! Input/output helpers.
//!
//! - dataset exports (CSV) and report downloads (Markdown) (`export`)
//! - dashboard snapshot JSON read/write (`snapshot`)

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
