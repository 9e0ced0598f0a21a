//! Domain Services
//!
//! Stateless services over the remote executor port.
//!
//! - `VersionStore` - naming and enumerating version directories
//! - `PointerManager` - atomic swaps of the four pointers
//! - `Retention` - protected-set aware deletion

mod pointers;
mod retention;
mod versions;

pub use pointers::{PointerManager, PointerPaths};
pub use retention::{DeletionReport, Retention, SkipReason, SkippedVersion};
pub use versions::VersionStore;
