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

mod aggregate;
mod clock;
mod decode;
mod error;
mod staff;
mod time_horizon;
mod types;

#[cfg(test)]
mod tests;

pub use aggregate::{HOURS_EPSILON, recompute_point, recompute_totals, unique_client_count};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::DomainError;
pub use staff::{StaffId, StaffRef, normalize_staff_ref, staff_refs_match};
pub use time_horizon::{
    HorizonFallback, HorizonResolution, MonthRangeResolution, RangeAdjustment, TimeHorizon,
    build_time_horizon, current_month_horizon, resolve_months, validate_month_range,
};
pub use types::{
    ClientId, DataPoint, DatasetTotals, DemandDataset, FilterSelection, MonthInfo, MonthKey,
    MonthRange, PreferredStaffFilterMode, ReferenceEntry, SelectionDimension, SkillName,
    TaskAssignment,
};
