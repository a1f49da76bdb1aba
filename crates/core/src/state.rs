// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use demand_matrix_domain::{
    ClientId, DemandDataset, FilterSelection, MonthRange, PreferredStaffFilterMode,
    ReferenceEntry, SkillName, StaffId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The lifecycle phase of a controls state.
///
/// Valid transitions are:
/// - `Uninitialized` → `Initialized` (first non-empty dataset, once)
/// - `Initialized` → `UserModified` (any toggle or set)
/// - any → `Initialized` (reset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlsPhase {
    /// No dataset with data has been observed yet.
    #[default]
    Uninitialized,
    /// Selections hold the "everything available" defaults.
    Initialized,
    /// The user has changed at least one selection since the last reset.
    UserModified,
}

/// The values a user can choose from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableOptions {
    /// Skills on the dataset's skill axis.
    pub skills: BTreeSet<SkillName>,
    /// Clients from the reference list.
    pub clients: BTreeSet<ClientId>,
    /// Preferred staff from the reference list (canonical identities).
    pub preferred_staff: BTreeSet<StaffId>,
    /// Length of the dataset's month axis.
    pub total_months: usize,
}

impl AvailableOptions {
    /// Derives the available options from a dataset and its reference lists.
    ///
    /// Staff entries whose id is blank are ignored.
    #[must_use]
    pub fn from_dataset(
        dataset: &DemandDataset,
        available_clients: &[ReferenceEntry],
        available_preferred_staff: &[ReferenceEntry],
    ) -> Self {
        Self {
            skills: dataset.skills.clone(),
            clients: available_clients
                .iter()
                .map(|entry| ClientId::new(&entry.id))
                .collect(),
            preferred_staff: available_preferred_staff
                .iter()
                .filter_map(|entry| StaffId::new(&entry.id))
                .collect(),
            total_months: dataset.months.len(),
        }
    }

    /// The selection that picks everything available.
    #[must_use]
    pub fn everything(&self) -> FilterSelection {
        FilterSelection {
            selected_skills: self.skills.clone(),
            selected_clients: self.clients.clone(),
            selected_preferred_staff: self.preferred_staff.clone(),
            preferred_staff_filter_mode: PreferredStaffFilterMode::All,
            month_range: MonthRange::full(self.total_months),
        }
    }
}

/// Returns whether `selected` holds exactly the `available` values.
///
/// Sizes must match and every available value must be selected, so the
/// answer never depends on the order values were selected in.
#[must_use]
pub fn is_all_selected<T: Ord>(selected: &BTreeSet<T>, available: &BTreeSet<T>) -> bool {
    selected.len() == available.len() && available.iter().all(|value| selected.contains(value))
}

/// The controls state for one view.
///
/// Owns the current `FilterSelection` exclusively; the pipeline only ever
/// sees snapshots of it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsState {
    /// The current selection.
    pub(crate) selection: FilterSelection,
    /// The options the selection is drawn from.
    pub(crate) available: AvailableOptions,
    /// The lifecycle phase.
    pub(crate) phase: ControlsPhase,
}

impl ControlsState {
    /// Creates an uninitialized controls state with empty selections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current selection.
    #[must_use]
    pub const fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Returns a copy of the current selection for handing to the pipeline.
    #[must_use]
    pub fn snapshot(&self) -> FilterSelection {
        self.selection.clone()
    }

    /// Returns the available options.
    #[must_use]
    pub const fn available(&self) -> &AvailableOptions {
        &self.available
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> ControlsPhase {
        self.phase
    }

    /// Returns whether every available skill is selected.
    #[must_use]
    pub fn is_all_skills_selected(&self) -> bool {
        is_all_selected(&self.selection.selected_skills, &self.available.skills)
    }

    /// Returns whether every available client is selected.
    #[must_use]
    pub fn is_all_clients_selected(&self) -> bool {
        is_all_selected(&self.selection.selected_clients, &self.available.clients)
    }

    /// Returns whether every available preferred staff member is selected.
    #[must_use]
    pub fn is_all_preferred_staff_selected(&self) -> bool {
        is_all_selected(
            &self.selection.selected_preferred_staff,
            &self.available.preferred_staff,
        )
    }

    /// Replaces the selection with the "everything available" defaults.
    pub(crate) fn apply_defaults(&mut self) {
        self.selection = self.available.everything();
    }
}
