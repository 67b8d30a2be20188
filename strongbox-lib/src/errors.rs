//! Error types for strongbox operations.
//!
//! Every failure reported by the secure storage facility is translated into a
//! [`StrongboxError`] before it reaches the caller. The raw facility status is
//! preserved in [`StrongboxError::UnderlyingStore`] for diagnostics.

use crate::secure_storage::FacilityError;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StrongboxErrorCode {
    /// Value could not be encoded before writing
    Conversion = 1000,
    /// Entry already exists
    ItemAlreadyExists = 2000,
    /// Stored bytes are not valid text
    UnexpectedItemData = 3000,
    /// Options are inconsistent or malformed
    InvalidConfiguration = 4000,
    /// The secure storage facility reported a failure
    UnderlyingStore = 9000,
}

/// Error type for strongbox operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrongboxError {
    /// The value could not be encoded to bytes before writing.
    ///
    /// Reserved for FFI parity: `&str` input is always valid UTF-8, so the
    /// string API never produces it.
    #[error("value could not be encoded for storage")]
    Conversion,

    /// An entry for the (service, key) pair already exists.
    ///
    /// Reserved for FFI parity. A duplicate on insert is resolved by an
    /// in-place update inside `set_value`; a duplicate status from any other
    /// facility call surfaces as [`StrongboxError::UnderlyingStore`].
    #[error("an entry for this key already exists")]
    ItemAlreadyExists,

    /// The facility returned an entry whose bytes are not valid UTF-8 text.
    #[error("stored entry does not contain valid text")]
    UnexpectedItemData,

    /// The options requested an unsupported combination.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The facility reported a failure.
    #[error("secure storage error {code}: {message}")]
    UnderlyingStore {
        /// Raw status code reported by the facility
        code: i32,
        /// Facility-provided description of the status
        message: String,
    },
}

impl StrongboxError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> StrongboxErrorCode {
        match self {
            Self::Conversion => StrongboxErrorCode::Conversion,
            Self::ItemAlreadyExists => StrongboxErrorCode::ItemAlreadyExists,
            Self::UnexpectedItemData => StrongboxErrorCode::UnexpectedItemData,
            Self::InvalidConfiguration(_) => StrongboxErrorCode::InvalidConfiguration,
            Self::UnderlyingStore { .. } => StrongboxErrorCode::UnderlyingStore,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Raw facility status, if this error came from the facility.
    pub fn status(&self) -> Option<i32> {
        match self {
            Self::UnderlyingStore { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if the error was caused by the store's options.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create an underlying store error from a raw status.
    pub fn underlying(code: i32, message: impl Into<String>) -> Self {
        Self::UnderlyingStore {
            code,
            message: message.into(),
        }
    }
}

impl From<FacilityError> for StrongboxError {
    fn from(err: FacilityError) -> Self {
        Self::UnderlyingStore {
            code: err.code(),
            message: err.to_string(),
        }
    }
}
