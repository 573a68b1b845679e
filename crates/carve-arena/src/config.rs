//! Arena configuration parameters.

use std::error::Error;
use std::fmt;

use crate::align::{is_power_of_two, DEFAULT_ALIGNMENT};

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Alignment used by the non-`_aligned` allocation methods.
    ///
    /// Default: [`DEFAULT_ALIGNMENT`]. Must be a power of two.
    pub default_alignment: usize,

    /// Whether [`Arena::deinitialize`](crate::Arena::deinitialize) wipes
    /// the live bytes before unbinding.
    ///
    /// Default: `true`.
    pub zero_on_deinit: bool,
}

impl ArenaConfig {
    /// Create a config with default values.
    pub const fn new() -> Self {
        Self {
            default_alignment: DEFAULT_ALIGNMENT,
            zero_on_deinit: true,
        }
    }

    /// Override the default alignment.
    pub const fn with_default_alignment(mut self, alignment: usize) -> Self {
        self.default_alignment = alignment;
        self
    }

    /// Override whether deinitialization wipes live bytes.
    pub const fn with_zero_on_deinit(mut self, zero: bool) -> Self {
        self.zero_on_deinit = zero;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_power_of_two(self.default_alignment) {
            return Err(ConfigError::InvalidAlignment {
                value: self.default_alignment,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors detected during [`ArenaConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured default alignment is not a power of two.
    InvalidAlignment {
        /// The rejected value.
        value: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlignment { value } => {
                write!(f, "default alignment must be a power of two, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
