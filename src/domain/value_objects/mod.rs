//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod commit;
mod identity;
mod phase;
mod pointer;
mod version_name;

pub use commit::CommitRef;
pub use identity::Identity;
pub use phase::Phase;
pub use pointer::Pointer;
pub use version_name::{VersionName, TIMESTAMP_FORMAT};
