// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    apply_all, create_initialized_state, create_test_clients, create_test_dataset,
    create_test_staff,
};
use crate::{
    AvailableOptions, ControlCommand, ControlsPhase, ControlsState, ControlsTransition, CoreError,
    apply,
};
use demand_matrix_domain::{
    DemandDataset, DomainError, MonthRange, PreferredStaffFilterMode, SelectionDimension,
    SkillName, StaffId,
};

fn toggle(dimension: SelectionDimension, id: &str) -> ControlCommand {
    ControlCommand::Toggle {
        dimension,
        id: id.to_string(),
    }
}

fn test_available() -> AvailableOptions {
    AvailableOptions::from_dataset(
        &create_test_dataset(),
        &create_test_clients(),
        &create_test_staff(),
    )
}

#[test]
fn test_first_dataset_initializes_everything() {
    let state: ControlsState = create_initialized_state();

    assert_eq!(state.phase(), ControlsPhase::Initialized);
    assert!(state.is_all_skills_selected());
    assert!(state.is_all_clients_selected());
    assert!(state.is_all_preferred_staff_selected());
    assert_eq!(
        state.selection().preferred_staff_filter_mode,
        PreferredStaffFilterMode::All
    );
    assert_eq!(state.selection().month_range, MonthRange::new(0, 2));
}

#[test]
fn test_available_staff_is_normalized() {
    let available: AvailableOptions = test_available();

    let staff: Vec<&str> = available
        .preferred_staff
        .iter()
        .map(StaffId::as_str)
        .collect();
    assert_eq!(staff, vec!["a", "b"]);
    assert_eq!(available.total_months, 3);
}

#[test]
fn test_empty_dataset_does_not_initialize() {
    let transition: ControlsTransition = apply(
        &ControlsState::new(),
        ControlCommand::ObserveDataset {
            available: AvailableOptions::from_dataset(&DemandDataset::default(), &[], &[]),
            has_data: false,
        },
    );

    assert_eq!(transition.new_state.phase(), ControlsPhase::Uninitialized);
    assert!(transition.new_state.selection().is_empty());
    assert!(!transition.changed);
}

#[test]
fn test_initialization_happens_only_once() {
    let state: ControlsState = apply_all(
        &create_initialized_state(),
        vec![toggle(SelectionDimension::Skill, "Audit")],
    );
    assert_eq!(state.phase(), ControlsPhase::UserModified);

    let reloaded: ControlsTransition = apply(
        &state,
        ControlCommand::ObserveDataset {
            available: test_available(),
            has_data: true,
        },
    );

    assert!(!reloaded.changed);
    assert_eq!(reloaded.new_state.phase(), ControlsPhase::UserModified);
    assert!(
        !reloaded
            .new_state
            .selection()
            .selected_skills
            .contains(&SkillName::new("Audit"))
    );
}

#[test]
fn test_toggle_marks_user_modified_and_coalesces() {
    let state: ControlsState = create_initialized_state();

    let transition: ControlsTransition =
        apply(&state, toggle(SelectionDimension::Client, "c2"));

    assert!(transition.changed);
    assert!(transition.coalesce);
    assert_eq!(transition.new_state.phase(), ControlsPhase::UserModified);
    assert!(!transition.new_state.is_all_clients_selected());
    assert!(transition.new_state.is_all_skills_selected());
}

#[test]
fn test_toggling_back_returns_to_initialized() {
    let state: ControlsState = apply_all(
        &create_initialized_state(),
        vec![
            toggle(SelectionDimension::Skill, "Audit"),
            toggle(SelectionDimension::Skill, "Bookkeeping"),
            toggle(SelectionDimension::Skill, "Bookkeeping"),
            toggle(SelectionDimension::Skill, "Audit"),
        ],
    );

    assert_eq!(state.phase(), ControlsPhase::Initialized);
    assert!(state.is_all_skills_selected());
}

#[test]
fn test_staff_toggle_uses_canonical_identity() {
    let state: ControlsState = apply_all(
        &create_initialized_state(),
        vec![toggle(SelectionDimension::PreferredStaff, " A ")],
    );

    let staff: Vec<&str> = state
        .selection()
        .selected_preferred_staff
        .iter()
        .map(StaffId::as_str)
        .collect();
    assert_eq!(staff, vec!["b"]);
}

#[test]
fn test_blank_staff_toggle_is_ignored() {
    let state: ControlsState = create_initialized_state();

    let transition: ControlsTransition =
        apply(&state, toggle(SelectionDimension::PreferredStaff, "   "));

    assert!(!transition.changed);
    assert_eq!(transition.new_state.selection(), state.selection());
}

#[test]
fn test_staff_toggle_never_changes_mode() {
    let state: ControlsState = apply_all(
        &create_initialized_state(),
        vec![
            ControlCommand::SetPreferredStaffFilterMode {
                mode: PreferredStaffFilterMode::Specific,
            },
            toggle(SelectionDimension::PreferredStaff, "a"),
            toggle(SelectionDimension::PreferredStaff, "b"),
        ],
    );

    assert_eq!(
        state.selection().preferred_staff_filter_mode,
        PreferredStaffFilterMode::Specific
    );
    assert!(state.selection().selected_preferred_staff.is_empty());
}

#[test]
fn test_switching_to_all_or_none_clears_staff_selection() {
    for mode in [PreferredStaffFilterMode::All, PreferredStaffFilterMode::None] {
        let state: ControlsState = apply_all(
            &create_initialized_state(),
            vec![
                ControlCommand::SetPreferredStaffFilterMode {
                    mode: PreferredStaffFilterMode::Specific,
                },
                ControlCommand::SetPreferredStaffFilterMode { mode },
            ],
        );

        assert!(state.selection().selected_preferred_staff.is_empty());
        assert_eq!(state.selection().preferred_staff_filter_mode, mode);
        assert_eq!(state.phase(), ControlsPhase::UserModified);
    }
}

#[test]
fn test_switching_to_specific_keeps_staff_selection() {
    let state: ControlsState = apply_all(
        &create_initialized_state(),
        vec![ControlCommand::SetPreferredStaffFilterMode {
            mode: PreferredStaffFilterMode::Specific,
        }],
    );

    assert!(state.is_all_preferred_staff_selected());
}

#[test]
fn test_month_range_is_stored_verbatim() {
    let transition: ControlsTransition = apply(
        &create_initialized_state(),
        ControlCommand::SetMonthRange {
            range: MonthRange::new(-1, 10),
        },
    );

    assert_eq!(
        transition.new_state.selection().month_range,
        MonthRange::new(-1, 10)
    );
    assert!(!transition.coalesce);
}

#[test]
fn test_reset_restores_defaults() {
    let initialized: ControlsState = create_initialized_state();
    let modified: ControlsState = apply_all(
        &initialized,
        vec![
            toggle(SelectionDimension::Skill, "Audit"),
            toggle(SelectionDimension::Client, "c1"),
            ControlCommand::SetPreferredStaffFilterMode {
                mode: PreferredStaffFilterMode::None,
            },
            ControlCommand::SetMonthRange {
                range: MonthRange::new(1, 1),
            },
        ],
    );

    let transition: ControlsTransition = apply(&modified, ControlCommand::Reset);

    assert!(transition.changed);
    assert_eq!(transition.new_state, initialized);
    assert_eq!(transition.new_state.phase(), ControlsPhase::Initialized);
}

#[test]
fn test_reset_before_any_data_stays_uninitialized() {
    let transition: ControlsTransition = apply(&ControlsState::new(), ControlCommand::Reset);

    assert_eq!(transition.new_state.phase(), ControlsPhase::Uninitialized);
    assert!(!transition.changed);
}

#[test]
fn test_selection_made_before_data_survives_first_dataset() {
    let early: ControlsState = apply_all(
        &ControlsState::new(),
        vec![toggle(SelectionDimension::Skill, "Audit")],
    );
    assert_eq!(early.phase(), ControlsPhase::Uninitialized);

    let state: ControlsState = apply_all(
        &early,
        vec![ControlCommand::ObserveDataset {
            available: test_available(),
            has_data: true,
        }],
    );

    assert_eq!(state.phase(), ControlsPhase::UserModified);
    assert_eq!(state.selection().selected_skills.len(), 1);
}

#[test]
fn test_all_flags_are_order_independent() {
    let state: ControlsState = apply_all(
        &create_initialized_state(),
        vec![
            toggle(SelectionDimension::Client, "c1"),
            toggle(SelectionDimension::Client, "c3"),
            toggle(SelectionDimension::Client, "c3"),
            toggle(SelectionDimension::Client, "c1"),
        ],
    );

    assert!(state.is_all_clients_selected());
}

#[test]
fn test_wire_commands_parse() {
    assert_eq!(
        ControlCommand::toggle("preferred-staff", "A").unwrap(),
        toggle(SelectionDimension::PreferredStaff, "A")
    );
    assert_eq!(
        ControlCommand::filter_mode(" SPECIFIC ").unwrap(),
        ControlCommand::SetPreferredStaffFilterMode {
            mode: PreferredStaffFilterMode::Specific
        }
    );
}

#[test]
fn test_unknown_wire_values_are_rejected() {
    let dimension: Result<ControlCommand, CoreError> = ControlCommand::toggle("region", "x");
    assert_eq!(
        dimension.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidDimension(String::from("region")))
    );

    let mode: Result<ControlCommand, CoreError> = ControlCommand::filter_mode("some");
    assert!(matches!(
        mode,
        Err(CoreError::DomainViolation(DomainError::InvalidFilterMode(_)))
    ));
}
