// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use crate::error::ApiError;
use demand_matrix::{AvailableOptions, CacheStats, ControlsPhase, ControlsState, PipelineReport};
use demand_matrix_domain::{DemandDataset, FilterSelection, MonthRange, ReferenceEntry};

/// A planned capacity figure for one (skill, month) cell.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityEntry {
    /// The skill.
    pub skill: String,
    /// The month key (`YYYY-MM`).
    pub month: String,
    /// Available hours.
    pub hours: f64,
}

/// Everything the fetch layer delivers for one view.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetEnvelope {
    /// The demand matrix.
    #[serde(default)]
    pub dataset: DemandDataset,
    /// Clients the user can select.
    #[serde(default)]
    pub available_clients: Vec<ReferenceEntry>,
    /// Preferred staff the user can select.
    #[serde(default)]
    pub available_preferred_staff: Vec<ReferenceEntry>,
    /// Planned capacity used by the CSV export.
    #[serde(default)]
    pub capacity: Vec<CapacityEntry>,
}

impl DatasetEnvelope {
    /// Decodes an envelope from JSON.
    ///
    /// Malformed data points, tasks, hours and counts inside the dataset
    /// do not fail decoding. They are skipped or decoded as values that the
    /// pipeline sanitation and the structure diagnostics flag.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::DatasetDecode` if the JSON is malformed or the
    /// envelope's outer shape is wrong.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        serde_json::from_str(json).map_err(|e| ApiError::DatasetDecode {
            message: e.to_string(),
        })
    }
}

/// API request to toggle a skill.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ToggleSkillRequest {
    /// The skill name.
    pub skill: String,
}

/// API request to toggle a client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleClientRequest {
    /// The client identifier.
    pub client_id: String,
}

/// API request to toggle a preferred staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TogglePreferredStaffRequest {
    /// The staff identifier, in any casing.
    pub staff_id: String,
}

/// API request to change the preferred staff filter mode.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FilterModeRequest {
    /// One of `all`, `specific`, `none`.
    pub mode: String,
}

/// API request to change the month range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthRangeRequest {
    /// First month index.
    pub start: i32,
    /// Last month index (inclusive).
    pub end: i32,
}

impl From<MonthRangeRequest> for MonthRange {
    fn from(request: MonthRangeRequest) -> Self {
        Self::new(request.start, request.end)
    }
}

/// API response for any controls command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    /// Whether the live selection changed.
    pub changed: bool,
    /// Whether a debounced commit is still outstanding.
    pub pending: bool,
}

/// The controls as a UI would render them.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsSnapshot {
    /// The live selection.
    pub selection: FilterSelection,
    /// The selection the current result was computed from.
    pub committed_selection: FilterSelection,
    /// The options the selection is drawn from.
    pub available: AvailableOptions,
    /// The lifecycle phase.
    pub phase: ControlsPhase,
    /// Whether every available skill is selected.
    pub is_all_skills_selected: bool,
    /// Whether every available client is selected.
    pub is_all_clients_selected: bool,
    /// Whether every available preferred staff member is selected.
    pub is_all_preferred_staff_selected: bool,
    /// Whether a debounced commit is outstanding.
    pub pending: bool,
}

impl ControlsSnapshot {
    /// Builds a snapshot from the live controls and the committed selection.
    #[must_use]
    pub fn new(
        controls: &ControlsState,
        committed_selection: &FilterSelection,
        pending: bool,
    ) -> Self {
        Self {
            selection: controls.snapshot(),
            committed_selection: committed_selection.clone(),
            available: controls.available().clone(),
            phase: controls.phase(),
            is_all_skills_selected: controls.is_all_skills_selected(),
            is_all_clients_selected: controls.is_all_clients_selected(),
            is_all_preferred_staff_selected: controls.is_all_preferred_staff_selected(),
            pending,
        }
    }
}

/// API response carrying the filtered matrix.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResponse {
    /// The filtered dataset.
    pub dataset: DemandDataset,
    /// How the dataset was produced.
    pub report: PipelineReport,
    /// The controls the dataset was produced from.
    pub controls: ControlsSnapshot,
    /// Memoization counters, when caching is enabled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cache: Option<CacheStats>,
}
