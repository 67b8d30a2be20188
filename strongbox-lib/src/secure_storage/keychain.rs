//! Apple Keychain implementation of the secure storage facility.
//!
//! Entries are generic-password items keyed by `kSecAttrService` and
//! `kSecAttrAccount`, written through the `SecItem*` Keychain Services calls.
//! Every non-success `OSStatus` is passed back unchanged.

use std::ptr;

use core_foundation::base::{CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use security_framework_sys::access_control::{
    kSecAttrAccessibleAfterFirstUnlock, kSecAttrAccessibleAfterFirstUnlockThisDeviceOnly,
    kSecAttrAccessibleWhenPasscodeSetThisDeviceOnly, kSecAttrAccessibleWhenUnlocked,
    kSecAttrAccessibleWhenUnlockedThisDeviceOnly,
};
use security_framework_sys::item::{
    kSecAttrAccount, kSecAttrService, kSecAttrSynchronizable, kSecAttrSynchronizableAny, kSecClass,
    kSecClassGenericPassword, kSecMatchLimit, kSecReturnData, kSecValueData,
};
use security_framework_sys::keychain_item::{
    SecItemAdd, SecItemCopyMatching, SecItemDelete, SecItemUpdate,
};

use super::traits::{FacilityError, FacilityResult, ItemQuery, ItemRecord, SecureFacility};
use crate::options::AccessRequirement;

const ERR_SEC_SUCCESS: i32 = 0;

// Not exported by security-framework-sys.
#[link(name = "Security", kind = "framework")]
extern "C" {
    static kSecAttrAccessible: CFStringRef;
    static kSecAttrAccessibleAlways: CFStringRef;
    static kSecAttrAccessibleAlwaysThisDeviceOnly: CFStringRef;
}

/// Wrap a Security framework constant without taking ownership.
fn constant(value: CFStringRef) -> CFString {
    unsafe { CFString::wrap_under_get_rule(value) }
}

#[allow(deprecated)]
fn accessibility_constant(requirement: AccessRequirement) -> CFString {
    let value = unsafe {
        match requirement {
            AccessRequirement::AfterFirstUnlock => kSecAttrAccessibleAfterFirstUnlock,
            AccessRequirement::AfterFirstUnlockThisDeviceOnly => {
                kSecAttrAccessibleAfterFirstUnlockThisDeviceOnly
            }
            AccessRequirement::WhenUnlocked => kSecAttrAccessibleWhenUnlocked,
            AccessRequirement::WhenUnlockedThisDeviceOnly => {
                kSecAttrAccessibleWhenUnlockedThisDeviceOnly
            }
            AccessRequirement::WhenPasscodeSetThisDeviceOnly => {
                kSecAttrAccessibleWhenPasscodeSetThisDeviceOnly
            }
            AccessRequirement::Always => kSecAttrAccessibleAlways,
            AccessRequirement::AlwaysThisDeviceOnly => kSecAttrAccessibleAlwaysThisDeviceOnly,
        }
    };
    constant(value)
}

/// Translate an `OSStatus` into a facility result.
fn check(status: i32) -> FacilityResult<()> {
    match status {
        ERR_SEC_SUCCESS => Ok(()),
        FacilityError::DUPLICATE_ITEM => Err(FacilityError::DuplicateItem),
        FacilityError::ITEM_NOT_FOUND => Err(FacilityError::ItemNotFound),
        code => Err(FacilityError::failure(
            code,
            format!(
                "Keychain: {}",
                security_framework::base::Error::from_code(code)
            ),
        )),
    }
}

fn match_limit_one() -> (CFString, CFType) {
    (
        unsafe { constant(kSecMatchLimit) },
        CFNumber::from(1i32).as_CFType(),
    )
}

/// Apple Keychain-backed facility.
///
/// Items use the generic-password class. Lookups pass
/// `kSecAttrSynchronizableAny` so synchronized and local items are both
/// matched. The Keychain treats the synchronizable flag as part of an item's
/// identity, so `insert` looks for an existing entry under either flag before
/// adding and reports it as a duplicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeychainFacility;

impl KeychainFacility {
    /// Create a Keychain facility.
    pub fn new() -> Self {
        Self
    }

    fn match_pairs(query: &ItemQuery) -> Vec<(CFString, CFType)> {
        unsafe {
            vec![
                (
                    constant(kSecClass),
                    constant(kSecClassGenericPassword).as_CFType(),
                ),
                (
                    constant(kSecAttrService),
                    CFString::new(&query.service).as_CFType(),
                ),
                (
                    constant(kSecAttrAccount),
                    CFString::new(&query.account).as_CFType(),
                ),
                (
                    constant(kSecAttrSynchronizable),
                    constant(kSecAttrSynchronizableAny).as_CFType(),
                ),
            ]
        }
    }

    fn insert_pairs(record: &ItemRecord) -> Vec<(CFString, CFType)> {
        let mut pairs = unsafe {
            vec![
                (
                    constant(kSecClass),
                    constant(kSecClassGenericPassword).as_CFType(),
                ),
                (
                    constant(kSecAttrService),
                    CFString::new(&record.query.service).as_CFType(),
                ),
                (
                    constant(kSecAttrAccount),
                    CFString::new(&record.query.account).as_CFType(),
                ),
                (
                    constant(kSecAttrAccessible),
                    accessibility_constant(record.accessibility).as_CFType(),
                ),
                (
                    constant(kSecValueData),
                    CFData::from_buffer(&record.value).as_CFType(),
                ),
            ]
        };

        // Only present when set: device-only items reject the attribute.
        if record.synchronizable {
            pairs.push(unsafe {
                (
                    constant(kSecAttrSynchronizable),
                    CFBoolean::true_value().as_CFType(),
                )
            });
        }
        pairs
    }

    // The flag is always written on update so an overwrite can also turn
    // synchronization off.
    fn update_pairs(record: &ItemRecord) -> Vec<(CFString, CFType)> {
        unsafe {
            vec![
                (
                    constant(kSecAttrAccessible),
                    accessibility_constant(record.accessibility).as_CFType(),
                ),
                (
                    constant(kSecAttrSynchronizable),
                    CFBoolean::from(record.synchronizable).as_CFType(),
                ),
                (
                    constant(kSecValueData),
                    CFData::from_buffer(&record.value).as_CFType(),
                ),
            ]
        }
    }

    /// Whether any item, synchronized or local, matches `query`.
    fn exists(query: &ItemQuery) -> FacilityResult<bool> {
        let mut pairs = Self::match_pairs(query);
        pairs.push(match_limit_one());
        let matching = CFDictionary::from_CFType_pairs(&pairs);

        let status =
            unsafe { SecItemCopyMatching(matching.as_concrete_TypeRef(), ptr::null_mut()) };
        match check(status) {
            Ok(()) => Ok(true),
            Err(FacilityError::ItemNotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl SecureFacility for KeychainFacility {
    fn insert(&self, record: &ItemRecord) -> FacilityResult<()> {
        if Self::exists(&record.query)? {
            return Err(FacilityError::DuplicateItem);
        }

        let attributes = CFDictionary::from_CFType_pairs(&Self::insert_pairs(record));
        let status = unsafe { SecItemAdd(attributes.as_concrete_TypeRef(), ptr::null_mut()) };
        check(status)
    }

    fn update(&self, query: &ItemQuery, record: &ItemRecord) -> FacilityResult<()> {
        let matching = CFDictionary::from_CFType_pairs(&Self::match_pairs(query));
        let attributes = CFDictionary::from_CFType_pairs(&Self::update_pairs(record));
        let status = unsafe {
            SecItemUpdate(
                matching.as_concrete_TypeRef(),
                attributes.as_concrete_TypeRef(),
            )
        };
        check(status)
    }

    fn query(&self, query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        let mut pairs = Self::match_pairs(query);
        pairs.push(match_limit_one());
        pairs.push(unsafe {
            (
                constant(kSecReturnData),
                CFBoolean::true_value().as_CFType(),
            )
        });
        let matching = CFDictionary::from_CFType_pairs(&pairs);

        let mut result: CFTypeRef = ptr::null();
        let status = unsafe { SecItemCopyMatching(matching.as_concrete_TypeRef(), &mut result) };
        check(status)?;

        if result.is_null() {
            return Ok(None);
        }
        let item = unsafe { CFType::wrap_under_create_rule(result) };
        Ok(item.downcast::<CFData>().map(|data| data.bytes().to_vec()))
    }

    fn delete(&self, query: &ItemQuery) -> FacilityResult<()> {
        let matching = CFDictionary::from_CFType_pairs(&Self::match_pairs(query));
        let status = unsafe { SecItemDelete(matching.as_concrete_TypeRef()) };
        check(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_translation() {
        assert!(check(0).is_ok());
        assert_eq!(check(-25299).unwrap_err(), FacilityError::DuplicateItem);
        assert_eq!(check(-25300).unwrap_err(), FacilityError::ItemNotFound);

        let err = check(-25308).unwrap_err();
        assert_eq!(err.code(), -25308);
        assert!(err.to_string().starts_with("Keychain: "));
    }

    #[test]
    fn test_sync_attribute_only_when_enabled() {
        let record = ItemRecord::new(ItemQuery::new("acct", "username"), "value");
        assert_eq!(KeychainFacility::insert_pairs(&record).len(), 5);

        let record = record.with_synchronizable(true);
        assert_eq!(KeychainFacility::insert_pairs(&record).len(), 6);
    }

    #[test]
    fn test_update_always_carries_sync_flag() {
        let record = ItemRecord::new(ItemQuery::new("acct", "username"), "value");
        assert_eq!(KeychainFacility::update_pairs(&record).len(), 3);
        assert_eq!(
            KeychainFacility::update_pairs(&record.with_synchronizable(true)).len(),
            3
        );
    }

    #[test]
    #[ignore] // Requires actual keychain access
    fn test_keychain_sync_change_updates_single_item() {
        let facility = KeychainFacility::new();
        let query = ItemQuery::new("strongbox-test", "sync-change");
        let _ = facility.delete(&query);

        facility
            .insert(&ItemRecord::new(query.clone(), "local"))
            .unwrap();

        // A synchronized write must find the local item rather than add a second one
        let synced = ItemRecord::new(query.clone(), "synced").with_synchronizable(true);
        assert_eq!(facility.insert(&synced), Err(FacilityError::DuplicateItem));
        facility.update(&query, &synced).unwrap();
        assert_eq!(facility.query(&query).unwrap(), Some(b"synced".to_vec()));

        // And back to local-only
        let local = ItemRecord::new(query.clone(), "local again")
            .with_accessibility(AccessRequirement::WhenUnlockedThisDeviceOnly);
        assert_eq!(facility.insert(&local), Err(FacilityError::DuplicateItem));
        facility.update(&query, &local).unwrap();
        assert_eq!(facility.query(&query).unwrap(), Some(b"local again".to_vec()));

        facility.delete(&query).unwrap();
        assert!(!KeychainFacility::exists(&query).unwrap());
    }

    #[test]
    #[ignore] // Requires actual keychain access
    fn test_keychain_round_trip() {
        let facility = KeychainFacility::new();
        let query = ItemQuery::new("strongbox-test", "round-trip");
        let _ = facility.delete(&query);

        facility
            .insert(&ItemRecord::new(query.clone(), "first"))
            .unwrap();
        assert_eq!(
            facility.insert(&ItemRecord::new(query.clone(), "again")),
            Err(FacilityError::DuplicateItem)
        );
        facility
            .update(&query, &ItemRecord::new(query.clone(), "second"))
            .unwrap();
        assert_eq!(facility.query(&query).unwrap(), Some(b"second".to_vec()));

        facility.delete(&query).unwrap();
        assert!(facility.query(&query).unwrap_err().is_not_found());
    }
}
