//! Secure storage facility abstraction.
//!
//! The [`SecureFacility`] trait is the seam between the string store and the
//! platform credential store, with implementations for:
//! - In-memory storage (for testing)
//! - Apple Keychain (iOS, macOS and other Apple targets)
//! - Desktop OS credential stores (Windows, Linux) via `keyring`
//!
//! ## Usage
//!
//! ```rust
//! use strongbox_lib::secure_storage::{InMemoryFacility, ItemQuery, ItemRecord, SecureFacility};
//!
//! let facility = InMemoryFacility::new();
//! let query = ItemQuery::new("com.example.app", "username");
//!
//! facility.insert(&ItemRecord::new(query.clone(), "alice"))?;
//! assert_eq!(facility.query(&query)?, Some(b"alice".to_vec()));
//! facility.delete(&query)?;
//! # Ok::<(), strongbox_lib::secure_storage::FacilityError>(())
//! ```
//!
//! ## Security Considerations
//!
//! - Encryption and access control belong to the platform store
//! - Value bytes are never logged or included in debug output

mod memory;
mod traits;

#[cfg(target_vendor = "apple")]
mod keychain;

#[cfg(any(target_os = "linux", target_os = "windows"))]
mod desktop;

pub use memory::InMemoryFacility;
pub use traits::{FacilityError, FacilityResult, ItemQuery, ItemRecord, SecureFacility};

#[cfg(target_vendor = "apple")]
pub use keychain::KeychainFacility;

#[cfg(any(target_os = "linux", target_os = "windows"))]
pub use desktop::DesktopFacility;

/// Facility backed by the credential store of the compile target.
#[cfg(target_vendor = "apple")]
pub type PlatformFacility = KeychainFacility;

/// Facility backed by the credential store of the compile target.
#[cfg(any(target_os = "linux", target_os = "windows"))]
pub type PlatformFacility = DesktopFacility;
