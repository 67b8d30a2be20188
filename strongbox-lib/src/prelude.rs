//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use strongbox_lib::prelude::*;
//! ```

// Store
pub use crate::options::{AccessRequirement, StoreOptions};
pub use crate::SecureStringStore;

#[cfg(any(target_vendor = "apple", target_os = "linux", target_os = "windows"))]
pub use crate::PlatformStore;

// Error handling
pub use crate::errors::{StrongboxError, StrongboxErrorCode};
pub use crate::Result;

// Facilities
pub use crate::secure_storage::{InMemoryFacility, SecureFacility};

#[cfg(any(target_vendor = "apple", target_os = "linux", target_os = "windows"))]
pub use crate::secure_storage::PlatformFacility;
