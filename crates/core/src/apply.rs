// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::ControlCommand;
use crate::state::{AvailableOptions, ControlsPhase, ControlsState};
use demand_matrix_domain::{
    ClientId, FilterSelection, PreferredStaffFilterMode, SelectionDimension, SkillName, StaffId,
};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The result of applying a control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsTransition {
    /// The controls state after the command.
    pub new_state: ControlsState,
    /// Whether the selection differs from the one before the command.
    pub changed: bool,
    /// Whether the pipeline rerun may be deferred to coalesce a burst.
    pub coalesce: bool,
}

/// Applies a control command to the controls state.
///
/// This function is pure: it never mutates `state` and never fails.
/// Inputs that cannot be applied (a blank staff id, for example) produce
/// an unchanged transition.
///
/// # Arguments
///
/// * `state` - The current controls state (immutable)
/// * `command` - The command to apply
///
/// # Returns
///
/// The new state, whether the selection changed, and whether the rerun
/// may be coalesced.
#[must_use]
pub fn apply(state: &ControlsState, command: ControlCommand) -> ControlsTransition {
    let coalesce: bool = command.coalesces();
    let name: &'static str = command.name();
    let mut new_state: ControlsState = state.clone();

    match command {
        ControlCommand::ObserveDataset {
            available,
            has_data,
        } => observe_dataset(&mut new_state, available, has_data),
        ControlCommand::Toggle { dimension, id } => {
            toggle(&mut new_state.selection, dimension, &id);
            mark_modified(&mut new_state);
        }
        ControlCommand::SetMonthRange { range } => {
            new_state.selection.month_range = range;
            mark_modified(&mut new_state);
        }
        ControlCommand::SetPreferredStaffFilterMode { mode } => {
            new_state.selection.preferred_staff_filter_mode = mode;
            if matches!(
                mode,
                PreferredStaffFilterMode::All | PreferredStaffFilterMode::None
            ) {
                new_state.selection.selected_preferred_staff.clear();
            }
            mark_modified(&mut new_state);
        }
        ControlCommand::Reset => {
            new_state.apply_defaults();
            if new_state.phase != ControlsPhase::Uninitialized {
                new_state.phase = ControlsPhase::Initialized;
            }
        }
    }

    let changed: bool = new_state.selection != state.selection;
    debug!(
        command = name,
        changed,
        phase = ?new_state.phase,
        "Applied control command"
    );

    ControlsTransition {
        new_state,
        changed,
        coalesce,
    }
}

fn observe_dataset(state: &mut ControlsState, available: AvailableOptions, has_data: bool) {
    state.available = available;

    if state.phase != ControlsPhase::Uninitialized || !has_data {
        return;
    }

    if state.selection.is_empty() {
        state.apply_defaults();
        state.phase = ControlsPhase::Initialized;
        info!(
            skills = state.available.skills.len(),
            clients = state.available.clients.len(),
            preferred_staff = state.available.preferred_staff.len(),
            months = state.available.total_months,
            "Controls initialized with all available options"
        );
    } else {
        // Selections made before the first dataset are kept.
        state.phase = ControlsPhase::UserModified;
    }
}

fn toggle(selection: &mut FilterSelection, dimension: SelectionDimension, id: &str) {
    match dimension {
        SelectionDimension::Skill => {
            toggle_value(&mut selection.selected_skills, SkillName::new(id));
        }
        SelectionDimension::Client => {
            toggle_value(&mut selection.selected_clients, ClientId::new(id));
        }
        SelectionDimension::PreferredStaff => match StaffId::new(id) {
            Some(staff_id) => toggle_value(&mut selection.selected_preferred_staff, staff_id),
            None => debug!("Ignoring toggle of a blank preferred staff id"),
        },
    }
}

fn toggle_value<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

/// Moves an initialized state between `Initialized` and `UserModified`.
///
/// A state whose selection is back at the defaults counts as `Initialized`.
/// An uninitialized state stays uninitialized until a dataset arrives.
fn mark_modified(state: &mut ControlsState) {
    if state.phase == ControlsPhase::Uninitialized {
        return;
    }

    state.phase = if state.selection == state.available.everything() {
        ControlsPhase::Initialized
    } else {
        ControlsPhase::UserModified
    };
}
