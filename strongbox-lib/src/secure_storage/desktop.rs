//! Desktop secure storage facility for non-Apple platforms.
//!
//! Uses the `keyring` crate to reach the OS credential store:
//! - **Windows**: Windows Credential Manager
//! - **Linux**: Secret Service over D-Bus (GNOME Keyring, KWallet)
//!
//! These stores have no notion of accessibility classes or cloud
//! synchronization, so both attributes are accepted and ignored. Duplicate
//! detection is a read before the write.
//!
//! `keyring` errors carry no numeric status; they are mapped onto the
//! Keychain status values so callers see one vocabulary on every platform.

use keyring::Entry;

use super::traits::{FacilityError, FacilityResult, ItemQuery, ItemRecord, SecureFacility};

/// `errSecParam`
const STATUS_PARAM: i32 = -50;
/// `errSecInteractionNotAllowed`
const STATUS_INTERACTION_NOT_ALLOWED: i32 = -25308;
/// `errSecInternalComponent`
const STATUS_INTERNAL_COMPONENT: i32 = -2070;

/// OS credential store facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopFacility;

fn translate(err: keyring::Error) -> FacilityError {
    let code = match &err {
        keyring::Error::NoEntry => return FacilityError::ItemNotFound,
        keyring::Error::NoStorageAccess(_) => STATUS_INTERACTION_NOT_ALLOWED,
        keyring::Error::TooLong(..) | keyring::Error::Invalid(..) => STATUS_PARAM,
        _ => STATUS_INTERNAL_COMPONENT,
    };
    FacilityError::failure(code, format!("credential store: {}", err))
}

impl DesktopFacility {
    /// Create a desktop facility.
    pub fn new() -> Self {
        Self
    }

    fn entry(query: &ItemQuery) -> FacilityResult<Entry> {
        Entry::new(&query.service, &query.account).map_err(translate)
    }
}

impl SecureFacility for DesktopFacility {
    fn insert(&self, record: &ItemRecord) -> FacilityResult<()> {
        let entry = Self::entry(&record.query)?;

        match entry.get_secret() {
            Ok(_) => Err(FacilityError::DuplicateItem),
            Err(keyring::Error::NoEntry) => entry.set_secret(&record.value).map_err(translate),
            Err(e) => Err(translate(e)),
        }
    }

    fn update(&self, query: &ItemQuery, record: &ItemRecord) -> FacilityResult<()> {
        let entry = Self::entry(query)?;

        // Surface ItemNotFound instead of silently creating the entry.
        entry.get_secret().map_err(translate)?;
        entry.set_secret(&record.value).map_err(translate)
    }

    fn query(&self, query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        let entry = Self::entry(query)?;
        entry.get_secret().map(Some).map_err(translate)
    }

    fn delete(&self, query: &ItemQuery) -> FacilityResult<()> {
        let entry = Self::entry(query)?;
        entry.delete_credential().map_err(translate)
    }
}
