// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while interpreting demand matrix input.
///
/// None of these escape the filter pipeline; they surface only from the
/// explicit parsing entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A month key is not of the form `YYYY-MM`.
    InvalidMonthKey {
        /// The offending key.
        key: String,
        /// Why the key was rejected.
        reason: String,
    },
    /// A preferred staff filter mode string is not recognized.
    InvalidFilterMode(String),
    /// A selection dimension string is not recognized.
    InvalidDimension(String),
    /// Date arithmetic left the representable range.
    DateOutOfRange {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonthKey { key, reason } => {
                write!(f, "Invalid month key '{key}': {reason}")
            }
            Self::InvalidFilterMode(mode) => {
                write!(
                    f,
                    "Invalid preferred staff filter mode '{mode}'. Must be all, specific, or none"
                )
            }
            Self::InvalidDimension(dimension) => {
                write!(
                    f,
                    "Invalid selection dimension '{dimension}'. Must be skill, client, or preferred_staff"
                )
            }
            Self::DateOutOfRange { operation } => {
                write!(f, "Date out of range while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
