//! Core traits for the secure storage facility.

use std::fmt;

use crate::options::AccessRequirement;

/// Failure reported by a [`SecureFacility`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacilityError {
    /// An item for the same service and account already exists.
    DuplicateItem,
    /// No item matched the query.
    ItemNotFound,
    /// Any other non-success status.
    Failure {
        /// Raw status code
        code: i32,
        /// Human-readable description of the status
        message: String,
    },
}

impl FacilityError {
    /// Status reported for a duplicate item (`errSecDuplicateItem`).
    pub const DUPLICATE_ITEM: i32 = -25299;

    /// Status reported when nothing matched (`errSecItemNotFound`).
    pub const ITEM_NOT_FOUND: i32 = -25300;

    /// Create a failure from a raw status and message.
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
        }
    }

    /// Raw status code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::DuplicateItem => Self::DUPLICATE_ITEM,
            Self::ItemNotFound => Self::ITEM_NOT_FOUND,
            Self::Failure { code, .. } => *code,
        }
    }

    /// Check if this error indicates nothing matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound)
    }
}

impl fmt::Display for FacilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateItem => write!(f, "the specified item already exists"),
            Self::ItemNotFound => write!(f, "the specified item could not be found"),
            Self::Failure { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for FacilityError {}

/// Result type for facility operations.
pub type FacilityResult<T> = Result<T, FacilityError>;

/// Attributes identifying a single entry: the generic-password class is
/// implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemQuery {
    /// Namespace the entry belongs to
    pub service: String,
    /// Key of the entry within the service
    pub account: String,
}

impl ItemQuery {
    /// Create a query for `account` within `service`.
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }
}

/// Full attribute set written for an entry.
#[derive(Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// Identifying attributes
    pub query: ItemQuery,
    /// When the value may be read
    pub accessibility: AccessRequirement,
    /// Whether the entry is replicated across the user's devices
    pub synchronizable: bool,
    /// Raw value bytes
    pub value: Vec<u8>,
}

impl ItemRecord {
    /// Create a record with default accessibility and no synchronization.
    pub fn new(query: ItemQuery, value: impl Into<Vec<u8>>) -> Self {
        Self {
            query,
            accessibility: AccessRequirement::default(),
            synchronizable: false,
            value: value.into(),
        }
    }

    /// Set the access requirement.
    pub fn with_accessibility(mut self, accessibility: AccessRequirement) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Set whether the entry synchronizes across devices.
    pub fn with_synchronizable(mut self, synchronizable: bool) -> Self {
        self.synchronizable = synchronizable;
        self
    }
}

// Value bytes stay out of debug output.
impl fmt::Debug for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRecord")
            .field("query", &self.query)
            .field("accessibility", &self.accessibility)
            .field("synchronizable", &self.synchronizable)
            .field("value_len", &self.value.len())
            .finish()
    }
}

/// Platform secure storage facility.
///
/// Each operation is a single blocking round trip to the underlying store,
/// which is trusted to be atomic and to serialize concurrent access.
/// Lookups match an entry regardless of its synchronizable flag.
pub trait SecureFacility: Send + Sync {
    /// Add a new entry.
    ///
    /// # Errors
    /// - `DuplicateItem` if an entry already matches `record.query`
    fn insert(&self, record: &ItemRecord) -> FacilityResult<()>;

    /// Replace the value and attributes of the entry matching `query` in place.
    ///
    /// # Errors
    /// - `ItemNotFound` if no entry matches
    fn update(&self, query: &ItemQuery, record: &ItemRecord) -> FacilityResult<()>;

    /// Fetch the value bytes of at most one matching entry.
    ///
    /// Returns `Ok(None)` when an entry matched but carried no value data.
    ///
    /// # Errors
    /// - `ItemNotFound` if no entry matches
    fn query(&self, query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>>;

    /// Remove the entry matching `query`.
    ///
    /// # Errors
    /// - `ItemNotFound` if no entry matches
    fn delete(&self, query: &ItemQuery) -> FacilityResult<()>;
}

impl<T: SecureFacility + ?Sized> SecureFacility for std::sync::Arc<T> {
    fn insert(&self, record: &ItemRecord) -> FacilityResult<()> {
        (**self).insert(record)
    }

    fn update(&self, query: &ItemQuery, record: &ItemRecord) -> FacilityResult<()> {
        (**self).update(query, record)
    }

    fn query(&self, query: &ItemQuery) -> FacilityResult<Option<Vec<u8>>> {
        (**self).query(query)
    }

    fn delete(&self, query: &ItemQuery) -> FacilityResult<()> {
        (**self).delete(query)
    }
}
