// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AvailableOptions, ControlCommand, ControlsState, apply};
use demand_matrix_domain::{
    DataPoint, DemandDataset, FilterSelection, MonthInfo, ReferenceEntry, SkillName, StaffRef,
    TaskAssignment,
};
use std::collections::BTreeSet;
use time::{Date, Month};

pub fn test_today() -> Date {
    Date::from_calendar_date(2026, Month::January, 15).unwrap()
}

pub fn create_test_months() -> Vec<MonthInfo> {
    vec![
        MonthInfo::new("2026-01", "Jan 2026"),
        MonthInfo::new("2026-02", "Feb 2026"),
        MonthInfo::new("2026-03", "Mar 2026"),
    ]
}

pub fn skills(names: &[&str]) -> BTreeSet<SkillName> {
    names.iter().map(|name| SkillName::new(name)).collect()
}

/// Tax Prep/Jan carries three tasks, two preferred for staff `A`.
/// Bookkeeping/Jan carries one unassigned task.
pub fn create_scenario_dataset() -> DemandDataset {
    DemandDataset::new(
        create_test_months(),
        skills(&["Bookkeeping", "Tax Prep"]),
        vec![
            DataPoint::new(
                "Tax Prep",
                "2026-01",
                vec![
                    TaskAssignment::new("t1", "c1", "Acme", 5.0, Some(StaffRef::plain("A"))),
                    TaskAssignment::new(
                        "t2",
                        "c2",
                        "Globex",
                        3.5,
                        Some(StaffRef::structured(Some(" a "), Some("Alice Adams"))),
                    ),
                    TaskAssignment::new("t3", "c1", "Acme", 2.0, Some(StaffRef::plain("B"))),
                ],
            ),
            DataPoint::new(
                "Bookkeeping",
                "2026-01",
                vec![TaskAssignment::new("t4", "c3", "Initech", 4.0, None)],
            ),
        ],
    )
}

/// Three skills over three months with mixed clients and staff shapes.
pub fn create_test_dataset() -> DemandDataset {
    DemandDataset::new(
        create_test_months(),
        skills(&["Audit", "Bookkeeping", "Tax Prep"]),
        vec![
            DataPoint::new(
                "Tax Prep",
                "2026-01",
                vec![
                    TaskAssignment::new("t1", "c1", "Acme", 5.0, Some(StaffRef::plain("A"))),
                    TaskAssignment::new("t2", "c2", "Globex", 3.0, None),
                ],
            ),
            DataPoint::new(
                "Tax Prep",
                "2026-02",
                vec![TaskAssignment::new(
                    "t3",
                    "c1",
                    "Acme",
                    6.0,
                    Some(StaffRef::structured(Some("B"), Some("Bob Brown"))),
                )],
            ),
            DataPoint::new(
                "Bookkeeping",
                "2026-02",
                vec![
                    TaskAssignment::new("t4", "c3", "Initech", 2.5, Some(StaffRef::plain("a"))),
                    TaskAssignment::new("t5", "c2", "Globex", 1.5, None),
                ],
            ),
            DataPoint::new(
                "Audit",
                "2026-03",
                vec![TaskAssignment::new(
                    "t6",
                    "c3",
                    "Initech",
                    8.0,
                    Some(StaffRef::plain("B")),
                )],
            ),
        ],
    )
}

pub fn create_test_clients() -> Vec<ReferenceEntry> {
    vec![
        ReferenceEntry::new("c1", "Acme"),
        ReferenceEntry::new("c2", "Globex"),
        ReferenceEntry::new("c3", "Initech"),
    ]
}

pub fn create_test_staff() -> Vec<ReferenceEntry> {
    vec![
        ReferenceEntry::new("A", "Alice Adams"),
        ReferenceEntry::new("B", "Bob Brown"),
    ]
}

/// A controls state that has observed `create_test_dataset`.
pub fn create_initialized_state() -> ControlsState {
    let dataset: DemandDataset = create_test_dataset();
    let available: AvailableOptions =
        AvailableOptions::from_dataset(&dataset, &create_test_clients(), &create_test_staff());
    apply(
        &ControlsState::new(),
        ControlCommand::ObserveDataset {
            available,
            has_data: true,
        },
    )
    .new_state
}

/// Applies a sequence of commands and returns the final state.
pub fn apply_all(state: &ControlsState, commands: Vec<ControlCommand>) -> ControlsState {
    commands
        .into_iter()
        .fold(state.clone(), |state, command| apply(&state, command).new_state)
}

/// The selection that picks everything in `create_test_dataset`.
pub fn select_everything() -> FilterSelection {
    create_initialized_state().snapshot()
}

pub fn assert_aggregates_consistent(dataset: &DemandDataset) {
    for point in &dataset.data_points {
        assert!(
            point.aggregates_consistent(),
            "aggregates for {}/{} disagree with the breakdown",
            point.skill_type,
            point.month
        );
    }

    let hours: f64 = dataset.data_points.iter().map(|p| p.demand_hours).sum();
    let tasks: usize = dataset.data_points.iter().map(|p| p.task_count).sum();
    assert!((dataset.totals.total_demand_hours - hours).abs() < 1e-9);
    assert_eq!(dataset.totals.total_tasks, tasks);
    assert_eq!(dataset.totals.total_clients, dataset.client_ids().len());
}
