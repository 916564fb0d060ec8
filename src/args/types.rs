use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

/// How a completed HTTP exchange is classified. Transport failures never
/// reach classification; they are failed outcomes by definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRule {
    /// Any non-error status (< 400) counts as success.
    Under400,
    /// Only the exact expected status counts as success.
    Exact(u16),
}

impl SuccessRule {
    #[must_use]
    pub const fn accepts(self, status: u16) -> bool {
        // Matches only real response statuses; transport failures are
        // classified before this is consulted.
        match self {
            SuccessRule::Under400 => status < 400,
            SuccessRule::Exact(expected) => status == expected,
        }
    }
}

/// Integer argument restricted to an inclusive range; out-of-range input
/// is rejected while parsing, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedU64<const MIN: u64, const MAX: u64>(u64);

impl<const MIN: u64, const MAX: u64> BoundedU64<MIN, MAX> {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl<const MIN: u64, const MAX: u64> TryFrom<u64> for BoundedU64<MIN, MAX> {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value >= MIN && value <= MAX {
            Ok(Self(value))
        } else {
            Err(ValidationError::ValueOutOfRange { min: MIN, max: MAX })
        }
    }
}

impl<const MIN: u64, const MAX: u64> std::str::FromStr for BoundedU64<MIN, MAX> {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        Self::try_from(value)
    }
}

impl<const MIN: u64, const MAX: u64> From<BoundedU64<MIN, MAX>> for u64 {
    fn from(value: BoundedU64<MIN, MAX>) -> Self {
        value.get()
    }
}

/// Concurrent worker slots allowed for one run.
pub type Concurrency = BoundedU64<1, 500>;

/// Run duration in whole seconds.
pub type DurationSecs = BoundedU64<1, 600>;
