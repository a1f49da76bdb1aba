// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary for the demand matrix.
//!
//! Wraps the controls state, filter pipeline and diagnostics behind a
//! controller with serializable requests and responses.

mod controller;
mod csv_export;
mod error;
mod request_response;

#[cfg(test)]
mod tests;

pub use controller::{DemandMatrixController, PendingRun};
pub use csv_export::{CapacityFigures, CapacityLookup, EXPORT_HEADERS, export_csv};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use request_response::{
    CapacityEntry, CommandResponse, ControlsSnapshot, DatasetEnvelope, FilterModeRequest,
    MatrixResponse, MonthRangeRequest, ToggleClientRequest, TogglePreferredStaffRequest,
    ToggleSkillRequest,
};
