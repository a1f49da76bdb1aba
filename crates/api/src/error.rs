// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use demand_matrix::CoreError;
use demand_matrix_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A dataset envelope could not be decoded.
    DatasetDecode {
        /// A description of the decoding failure.
        message: String,
    },
    /// The filtered dataset could not be exported.
    ExportFailed {
        /// A description of the export failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::DatasetDecode { message } => {
                write!(f, "Failed to decode dataset: {message}")
            }
            Self::ExportFailed { message } => {
                write!(f, "Export failed: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidMonthKey { key, reason } => ApiError::InvalidInput {
            field: String::from("month"),
            message: format!("Invalid month key '{key}': {reason}"),
        },
        DomainError::InvalidFilterMode(mode) => ApiError::InvalidInput {
            field: String::from("mode"),
            message: format!(
                "Unknown preferred staff filter mode '{mode}'. Must be all, specific, or none"
            ),
        },
        DomainError::InvalidDimension(dimension) => ApiError::InvalidInput {
            field: String::from("dimension"),
            message: format!(
                "Unknown selection dimension '{dimension}'. Must be skill, client, or preferred_staff"
            ),
        },
        DomainError::DateOutOfRange { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date out of range while {operation}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::InvalidConfiguration { field, reason } => ApiError::InvalidInput {
            field: field.to_string(),
            message: reason,
        },
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}
