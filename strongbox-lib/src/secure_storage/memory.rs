//! In-memory secure storage facility.
//!
//! This implementation is for testing and development only.
//! In production, use the platform facility.
//!
//! # Thread Safety
//!
//! Entries live behind an `Arc<RwLock<..>>`, so clones share state. Lock
//! poisoning is reported as a facility failure rather than panicking.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::traits::{FacilityError, FacilityResult, ItemQuery, ItemRecord, SecureFacility};
use crate::options::AccessRequirement;

/// Status reported when the lock is poisoned (`errSecInternalComponent`).
const INTERNAL_COMPONENT: i32 = -2070;

#[derive(Clone)]
struct StoredItem {
    value: Vec<u8>,
    accessibility: AccessRequirement,
    synchronizable: bool,
}

/// In-memory implementation of the secure storage facility.
///
/// **Warning**: This is for testing only. Values are not encrypted and are
/// lost when the process exits. Accessibility and synchronization are
/// recorded but not enforced.
#[derive(Clone, Default)]
pub struct InMemoryFacility {
    items: Arc<RwLock<HashMap<ItemQuery, StoredItem>>>,
}

fn lock_error(context: &str) -> FacilityError {
    FacilityError::failure(
        INTERNAL_COMPONENT,
        format!("InMemoryFacility: lock poisoned during {}", context),
    )
}

impl InMemoryFacility {
    /// Create an empty facility.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored entries across all services.
    ///
    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Check if the facility holds no entries.
    ///
    /// Returns true if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.items.read().map(|items| items.is_empty()).unwrap_or(true)
    }

    /// Accessibility and synchronizable attributes recorded for an entry.
    pub fn attributes(&self, query: &ItemQuery) -> Option<(AccessRequirement, bool)> {
        let items = self.items.read().ok()?;
        items
            .get(query)
            .map(|item| (item.accessibility, item.synchronizable))
    }
}

impl SecureFacility for InMemoryFacility {
    fn insert(&self, record: &ItemRecord) -> FacilityResult<()> {
        let mut items = self.items.write().map_err(|_| lock_error("insert"))?;

        if items.contains_key(&record.query) {
            return Err(FacilityError::DuplicateItem);
        }

        items.insert(
            record.query.clone(),
            StoredItem {
                value: record.value.clone(),
                accessibility: record.accessibility,
                synchronizable: record.synchronizable,
            },
        );
        Ok(())
    }

    fn update(&self, query: &ItemQuery, record: &ItemRecord) -> FacilityResult<()> {
        let mut items = self.items.write().map_err(|_| lock_error("update"))?;

        let item = items.get_mut(query).ok_or(FacilityError::ItemNotFound)?;
        item.value = record.value.clone();
        item.accessibility = record.accessibility;
        item.synchronizable = record.synchronizable;
        Ok(())
    }

    fn query(&self, query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        let items = self.items.read().map_err(|_| lock_error("query"))?;

        items
            .get(query)
            .map(|item| Some(item.value.clone()))
            .ok_or(FacilityError::ItemNotFound)
    }

    fn delete(&self, query: &ItemQuery) -> FacilityResult<()> {
        let mut items = self.items.write().map_err(|_| lock_error("delete"))?;

        items
            .remove(query)
            .map(|_| ())
            .ok_or(FacilityError::ItemNotFound)
    }
}
