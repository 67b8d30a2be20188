//! Configuration types for a [`SecureStringStore`](crate::SecureStringStore).
//!
//! # Environment Variables
//!
//! [`StoreOptions::from_env`] reads:
//! - `STRONGBOX_ACCESS_REQUIREMENT` - policy name, e.g. `after_first_unlock`
//! - `STRONGBOX_SYNCHRONIZATION` - `true`/`false` (also `1`/`0`, `yes`/`no`)
//!
//! Unset variables fall back to the defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::StrongboxError;

/// Environment variable selecting the access requirement.
pub const ENV_ACCESS_REQUIREMENT: &str = "STRONGBOX_ACCESS_REQUIREMENT";

/// Environment variable enabling synchronization.
pub const ENV_SYNCHRONIZATION: &str = "STRONGBOX_SYNCHRONIZATION";

/// When an entry's value may be read, relative to device lock state and
/// backup/restore behavior.
///
/// When a read is attempted while the policy does not allow it, the facility
/// reports an "interaction not allowed" status, surfaced as
/// [`StrongboxError::UnderlyingStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum AccessRequirement {
    /// Readable once the device has been unlocked after a restart.
    ///
    /// Recommended for entries needed by background work. Migrates to a new
    /// device with encrypted backups.
    AfterFirstUnlock,

    /// Readable once the device has been unlocked after a restart.
    ///
    /// Never migrates to a new device; missing after a restore.
    AfterFirstUnlockThisDeviceOnly,

    /// Readable only while the device is unlocked.
    ///
    /// Recommended for entries only needed in the foreground. Migrates to a
    /// new device with encrypted backups.
    #[default]
    WhenUnlocked,

    /// Readable only while the device is unlocked. Never migrates.
    WhenUnlockedThisDeviceOnly,

    /// Readable only while the device is unlocked, and only when a passcode is
    /// set.
    ///
    /// Never migrates. Unavailable on devices without a passcode; removing the
    /// passcode deletes every entry stored with this policy.
    WhenPasscodeSetThisDeviceOnly,

    /// Always readable regardless of lock state. Migrates with backups.
    #[deprecated(note = "offers no lock-state protection; use AfterFirstUnlock")]
    Always,

    /// Always readable regardless of lock state. Never migrates.
    #[deprecated(note = "offers no lock-state protection; use AfterFirstUnlockThisDeviceOnly")]
    AlwaysThisDeviceOnly,
}

#[allow(deprecated)]
impl AccessRequirement {
    /// Every policy, legacy ones included.
    pub const ALL: [AccessRequirement; 7] = [
        Self::AfterFirstUnlock,
        Self::AfterFirstUnlockThisDeviceOnly,
        Self::WhenUnlocked,
        Self::WhenUnlockedThisDeviceOnly,
        Self::WhenPasscodeSetThisDeviceOnly,
        Self::Always,
        Self::AlwaysThisDeviceOnly,
    ];

    /// Whether entries stored under this policy are bound to the current device.
    pub fn is_this_device_only(&self) -> bool {
        match self {
            Self::AfterFirstUnlock | Self::WhenUnlocked | Self::Always => false,
            Self::AfterFirstUnlockThisDeviceOnly
            | Self::WhenUnlockedThisDeviceOnly
            | Self::WhenPasscodeSetThisDeviceOnly
            | Self::AlwaysThisDeviceOnly => true,
        }
    }

    /// Whether this is a legacy policy kept only for existing entries.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Always | Self::AlwaysThisDeviceOnly)
    }

    /// Stable name used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AfterFirstUnlock => "after_first_unlock",
            Self::AfterFirstUnlockThisDeviceOnly => "after_first_unlock_this_device_only",
            Self::WhenUnlocked => "when_unlocked",
            Self::WhenUnlockedThisDeviceOnly => "when_unlocked_this_device_only",
            Self::WhenPasscodeSetThisDeviceOnly => "when_passcode_set_this_device_only",
            Self::Always => "always",
            Self::AlwaysThisDeviceOnly => "always_this_device_only",
        }
    }
}

impl fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessRequirement {
    type Err = StrongboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|requirement| requirement.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                StrongboxError::invalid_configuration(format!("unknown access requirement: {s}"))
            })
    }
}

impl TryFrom<String> for AccessRequirement {
    type Error = StrongboxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccessRequirement> for &'static str {
    fn from(requirement: AccessRequirement) -> Self {
        requirement.as_str()
    }
}

/// Options applied to every entry a store writes.
///
/// Always consistent: a device-local [`AccessRequirement`] can never be
/// combined with synchronization, whether the options are built in code or
/// deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawStoreOptions")]
pub struct StoreOptions {
    access_requirement: AccessRequirement,
    synchronization_enabled: bool,
}

/// Unvalidated form used for deserialization.
#[derive(Deserialize)]
#[serde(default)]
struct RawStoreOptions {
    access_requirement: AccessRequirement,
    synchronization_enabled: bool,
}

impl Default for RawStoreOptions {
    fn default() -> Self {
        let defaults = StoreOptions::default();
        Self {
            access_requirement: defaults.access_requirement,
            synchronization_enabled: defaults.synchronization_enabled,
        }
    }
}

impl TryFrom<RawStoreOptions> for StoreOptions {
    type Error = StrongboxError;

    fn try_from(raw: RawStoreOptions) -> Result<Self, Self::Error> {
        Self::new(raw.access_requirement, raw.synchronization_enabled)
    }
}

impl StoreOptions {
    /// Create validated options.
    ///
    /// # Errors
    ///
    /// Returns [`StrongboxError::InvalidConfiguration`] when synchronization is
    /// requested together with a device-local access requirement.
    pub fn new(
        access_requirement: AccessRequirement,
        synchronization_enabled: bool,
    ) -> Result<Self, StrongboxError> {
        if synchronization_enabled && access_requirement.is_this_device_only() {
            return Err(StrongboxError::invalid_configuration(format!(
                "synchronization cannot be combined with the device-local access requirement `{}`",
                access_requirement
            )));
        }
        Ok(Self {
            access_requirement,
            synchronization_enabled,
        })
    }

    /// Options with the given access requirement and no synchronization.
    pub fn with_access_requirement(access_requirement: AccessRequirement) -> Self {
        Self {
            access_requirement,
            synchronization_enabled: false,
        }
    }

    /// Load options from `STRONGBOX_*` environment variables.
    pub fn from_env() -> Result<Self, StrongboxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load options using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StrongboxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let access_requirement = match lookup(ENV_ACCESS_REQUIREMENT) {
            Some(value) => value.parse()?,
            None => defaults.access_requirement,
        };

        let synchronization_enabled = match lookup(ENV_SYNCHRONIZATION) {
            Some(value) => parse_flag(ENV_SYNCHRONIZATION, &value)?,
            None => defaults.synchronization_enabled,
        };

        Self::new(access_requirement, synchronization_enabled)
    }

    /// Policy stored with each entry.
    pub fn access_requirement(&self) -> AccessRequirement {
        self.access_requirement
    }

    /// Whether entries are marked for cross-device synchronization.
    pub fn synchronization_enabled(&self) -> bool {
        self.synchronization_enabled
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, StrongboxError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(StrongboxError::invalid_configuration(format!(
            "{name} must be a boolean, got `{other}`"
        ))),
    }
}
