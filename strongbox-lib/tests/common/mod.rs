//! Common test utilities for strongbox-lib integration tests

use std::sync::{Arc, Mutex};

use strongbox_lib::secure_storage::{
    FacilityError, FacilityResult, InMemoryFacility, ItemQuery, ItemRecord, SecureFacility,
};

/// Facility call observed by [`RecordingFacility`]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Insert,
    Update,
    Query,
    Delete,
}

/// In-memory facility that records every call made against it
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingFacility {
    pub inner: InMemoryFacility,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[allow(dead_code)]
impl RecordingFacility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SecureFacility for RecordingFacility {
    fn insert(&self, record: &ItemRecord) -> FacilityResult<()> {
        self.record(Call::Insert);
        self.inner.insert(record)
    }

    fn update(&self, query: &ItemQuery, record: &ItemRecord) -> FacilityResult<()> {
        self.record(Call::Update);
        self.inner.update(query, record)
    }

    fn query(&self, query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        self.record(Call::Query);
        self.inner.query(query)
    }

    fn delete(&self, query: &ItemQuery) -> FacilityResult<()> {
        self.record(Call::Delete);
        self.inner.delete(query)
    }
}

/// Facility that fails every call with the configured error
#[allow(dead_code)]
pub struct FailingFacility {
    pub error: FacilityError,
}

#[allow(dead_code)]
impl FailingFacility {
    pub fn new(code: i32, message: &str) -> Self {
        Self {
            error: FacilityError::failure(code, message),
        }
    }
}

impl SecureFacility for FailingFacility {
    fn insert(&self, _record: &ItemRecord) -> FacilityResult<()> {
        Err(self.error.clone())
    }

    fn update(&self, _query: &ItemQuery, _record: &ItemRecord) -> FacilityResult<()> {
        Err(self.error.clone())
    }

    fn query(&self, _query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        Err(self.error.clone())
    }

    fn delete(&self, _query: &ItemQuery) -> FacilityResult<()> {
        Err(self.error.clone())
    }
}

/// Facility whose matched items carry no value data
#[allow(dead_code)]
pub struct DatalessFacility;

impl SecureFacility for DatalessFacility {
    fn insert(&self, _record: &ItemRecord) -> FacilityResult<()> {
        Ok(())
    }

    fn update(&self, _query: &ItemQuery, _record: &ItemRecord) -> FacilityResult<()> {
        Ok(())
    }

    fn query(&self, _query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn delete(&self, _query: &ItemQuery) -> FacilityResult<()> {
        Ok(())
    }
}

/// Facility that reports a duplicate on every insert and fails every update
/// with the configured error
#[allow(dead_code)]
pub struct ConflictingFacility {
    pub update_error: FacilityError,
}

#[allow(dead_code)]
impl ConflictingFacility {
    pub fn new(update_error: FacilityError) -> Self {
        Self { update_error }
    }
}

impl SecureFacility for ConflictingFacility {
    fn insert(&self, _record: &ItemRecord) -> FacilityResult<()> {
        Err(FacilityError::DuplicateItem)
    }

    fn update(&self, _query: &ItemQuery, _record: &ItemRecord) -> FacilityResult<()> {
        Err(self.update_error.clone())
    }

    fn query(&self, _query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        Err(FacilityError::ItemNotFound)
    }

    fn delete(&self, _query: &ItemQuery) -> FacilityResult<()> {
        Ok(())
    }
}
