//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `FileSystem` boundary trait but are themselves
//! concrete structs, not traits.

mod extract;
mod pivots;

pub use extract::{Extraction, ExtractService};
pub use pivots::{PivotService, Pivots};
