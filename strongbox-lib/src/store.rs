//! The string store facade.

use std::fmt;

use crate::errors::StrongboxError;
use crate::options::StoreOptions;
use crate::secure_storage::{FacilityError, ItemQuery, ItemRecord, SecureFacility};
use crate::Result;

#[cfg(any(target_vendor = "apple", target_os = "linux", target_os = "windows"))]
use crate::secure_storage::PlatformFacility;

/// Key-value store for strings, scoped to a service namespace.
///
/// Each operation is a direct round trip to the facility; nothing is cached.
/// A write to an existing key updates the entry in place, so concurrent
/// readers never observe the key as absent during an overwrite.
///
/// # Example
///
/// ```
/// use strongbox_lib::{SecureStringStore, StoreOptions};
/// use strongbox_lib::secure_storage::InMemoryFacility;
///
/// let store = SecureStringStore::with_facility(
///     "acct",
///     StoreOptions::default(),
///     InMemoryFacility::new(),
/// );
///
/// store.set_value("example@example.com", "username")?;
/// assert_eq!(store.get_value("username")?.as_deref(), Some("example@example.com"));
///
/// store.delete_value("username")?;
/// assert_eq!(store.get_value("username")?, None);
/// # Ok::<(), strongbox_lib::StrongboxError>(())
/// ```
#[derive(Clone)]
pub struct SecureStringStore<F> {
    service: String,
    options: StoreOptions,
    facility: F,
}

/// Store backed by the credential store of the compile target.
#[cfg(any(target_vendor = "apple", target_os = "linux", target_os = "windows"))]
pub type PlatformStore = SecureStringStore<PlatformFacility>;

#[cfg(any(target_vendor = "apple", target_os = "linux", target_os = "windows"))]
impl SecureStringStore<PlatformFacility> {
    /// Create a store on the platform facility with default options.
    pub fn new(service: impl Into<String>) -> Self {
        Self::with_options(service, StoreOptions::default())
    }

    /// Create a store on the platform facility.
    pub fn with_options(service: impl Into<String>, options: StoreOptions) -> Self {
        Self::with_facility(service, options, PlatformFacility::default())
    }
}

impl<F: SecureFacility> SecureStringStore<F> {
    /// Create a store on an explicit facility.
    pub fn with_facility(service: impl Into<String>, options: StoreOptions, facility: F) -> Self {
        Self {
            service: service.into(),
            options,
            facility,
        }
    }

    /// Namespace shared by every entry of this store.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Options applied to written entries.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The underlying facility.
    pub fn facility(&self) -> &F {
        &self.facility
    }

    fn item_query(&self, key: &str) -> ItemQuery {
        ItemQuery::new(self.service.as_str(), key)
    }

    /// Create or overwrite the value stored under `key`.
    ///
    /// The entry is first inserted; if the facility already holds one, its
    /// value, accessibility and synchronization are updated in place.
    ///
    /// # Errors
    ///
    /// Returns [`StrongboxError::UnderlyingStore`] for any facility failure.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, value), fields(service = %self.service, value_len = value.len())))]
    pub fn set_value(&self, value: &str, key: &str) -> Result<()> {
        let query = self.item_query(key);
        let record = ItemRecord::new(query.clone(), value.as_bytes())
            .with_accessibility(self.options.access_requirement())
            .with_synchronizable(self.options.synchronization_enabled());

        match self.facility.insert(&record) {
            Ok(()) => Ok(()),
            Err(FacilityError::DuplicateItem) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("entry exists, updating in place");

                self.facility.update(&query, &record).map_err(|e| {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(code = e.code(), "in-place update failed: {e}");
                    StrongboxError::from(e)
                })
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(code = e.code(), "insert failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Get the value stored under `key`, or `None` if there is no entry.
    ///
    /// # Errors
    ///
    /// - [`StrongboxError::UnexpectedItemData`] if the entry is not UTF-8 text
    /// - [`StrongboxError::UnderlyingStore`] for any other facility failure
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(service = %self.service)))]
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        match self.facility.query(&self.item_query(key)) {
            Ok(Some(bytes)) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StrongboxError::UnexpectedItemData),
            Ok(None) => Err(StrongboxError::UnexpectedItemData),
            Err(FacilityError::ItemNotFound) => Ok(None),
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(code = e.code(), "query failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Remove the value stored under `key`.
    ///
    /// Deleting a key with no entry succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StrongboxError::UnderlyingStore`] for any facility failure
    /// other than "not found".
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), fields(service = %self.service)))]
    pub fn delete_value(&self, key: &str) -> Result<()> {
        match self.facility.delete(&self.item_query(key)) {
            Ok(()) => Ok(()),
            Err(FacilityError::ItemNotFound) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("no entry to delete");
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(code = e.code(), "delete failed: {e}");
                Err(e.into())
            }
        }
    }
}

impl<F> fmt::Debug for SecureStringStore<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureStringStore")
            .field("service", &self.service)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
