// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::state::AvailableOptions;
use demand_matrix_domain::{MonthRange, PreferredStaffFilterMode, SelectionDimension};

/// A control command represents user or fetch-layer intent as data only.
///
/// Commands are the only way to change controls state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// A dataset (and its reference lists) has been observed.
    ObserveDataset {
        /// Options derived from the dataset and reference lists.
        available: AvailableOptions,
        /// Whether the dataset carries any data points.
        has_data: bool,
    },
    /// Add an id to a dimension's selection, or remove it if present.
    Toggle {
        /// The dimension to toggle in.
        dimension: SelectionDimension,
        /// The raw id; normalized per dimension.
        id: String,
    },
    /// Store a month range verbatim.
    SetMonthRange {
        /// The requested range.
        range: MonthRange,
    },
    /// Change how the preferred staff dimension is interpreted.
    SetPreferredStaffFilterMode {
        /// The new mode.
        mode: PreferredStaffFilterMode,
    },
    /// Restore every selection to "everything available".
    Reset,
}

impl ControlCommand {
    /// Builds a toggle command from wire strings.
    ///
    /// # Errors
    ///
    /// Returns an error if `dimension` is not a known selection dimension.
    pub fn toggle(dimension: &str, id: &str) -> Result<Self, CoreError> {
        Ok(Self::Toggle {
            dimension: dimension.parse()?,
            id: id.to_string(),
        })
    }

    /// Builds a filter mode command from a wire string.
    ///
    /// # Errors
    ///
    /// Returns an error if `mode` is not all, specific, or none.
    pub fn filter_mode(mode: &str) -> Result<Self, CoreError> {
        Ok(Self::SetPreferredStaffFilterMode {
            mode: mode.parse()?,
        })
    }

    /// Returns whether this command arrives in high-frequency bursts and
    /// should be coalesced before the pipeline reruns.
    #[must_use]
    pub const fn coalesces(&self) -> bool {
        matches!(self, Self::Toggle { .. })
    }

    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ObserveDataset { .. } => "ObserveDataset",
            Self::Toggle { .. } => "Toggle",
            Self::SetMonthRange { .. } => "SetMonthRange",
            Self::SetPreferredStaffFilterMode { .. } => "SetPreferredStaffFilterMode",
            Self::Reset => "Reset",
        }
    }
}
