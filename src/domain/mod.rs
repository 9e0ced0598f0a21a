//! Domain Layer
//!
//! Versions, pointers and the commands that manipulate them on the host.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (VersionName, CommitRef, Pointer)
//! - `commands/` - Typed remote commands with explicit quoting slots
//! - `services/` - Domain services (VersionStore, PointerManager, Retention)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No transport** - every remote effect goes through `RemoteExecutor`
//! 2. **Typed commands** - nothing here formats a shell line by hand
//! 3. **Ports & Adapters** - ssh, HTTP and the clock are trait-defined ports

pub mod commands;
pub mod ports;
pub mod services;
pub mod value_objects;
