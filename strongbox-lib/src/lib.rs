//! Strongbox library.
//!
//! Stores, retrieves and deletes string values by key in the platform secure
//! credential store, scoped to a service namespace. Encryption and access
//! control are left entirely to the platform; this crate builds the item
//! descriptor, makes one call and translates the status.
//!
//! # Features
//!
//! - **String store**: [`SecureStringStore`] with idempotent delete and
//!   in-place overwrite
//! - **Access policies**: [`AccessRequirement`] controls when a value is
//!   readable; optional cross-device synchronization
//! - **Facility abstraction**: trait-based backends for Apple Keychain,
//!   desktop credential stores and in-memory testing
//! - **Tracing**: enable the `tracing` feature to instrument every operation
//!
//! # Example
//!
//! ```ignore
//! use strongbox_lib::{AccessRequirement, SecureStringStore, StoreOptions};
//!
//! let options = StoreOptions::new(AccessRequirement::AfterFirstUnlock, false)?;
//! let store = SecureStringStore::with_options("com.example.app", options);
//!
//! store.set_value("example@example.com", "username")?;
//! let username = store.get_value("username")?;
//! ```

pub mod errors;
pub mod options;
pub mod prelude;
pub mod secure_storage;
mod store;

pub use errors::{StrongboxError, StrongboxErrorCode};
pub use options::{AccessRequirement, StoreOptions};
pub use store::SecureStringStore;

#[cfg(any(target_vendor = "apple", target_os = "linux", target_os = "windows"))]
pub use store::PlatformStore;

/// Common result alias for strongbox operations.
pub type Result<T> = std::result::Result<T, StrongboxError>;
