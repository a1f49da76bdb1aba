// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The individual filter stages.
//!
//! Each stage consumes the points produced by the previous one and returns
//! the survivors. Stages never recompute aggregates themselves; the
//! pipeline does that after every stage.

use crate::pipeline::SanitationReport;
use demand_matrix_domain::{
    ClientId, DataPoint, FilterSelection, MonthInfo, MonthKey, PreferredStaffFilterMode, SkillName,
    StaffId, TaskAssignment, TimeHorizon,
};
use std::collections::BTreeSet;
use tracing::warn;

/// Drops tasks with non-finite hours and points whose breakdown is missing
/// while their stale aggregates still claim work.
pub(crate) fn sanitize(points: Vec<DataPoint>) -> (Vec<DataPoint>, SanitationReport) {
    let mut report: SanitationReport = SanitationReport::default();
    let mut kept: Vec<DataPoint> = Vec::with_capacity(points.len());

    for mut point in points {
        if point.task_breakdown.is_empty() && point.claims_work() {
            warn!(
                skill = %point.skill_type,
                month = %point.month,
                task_count = point.task_count,
                "Skipping data point with a missing task breakdown"
            );
            report.skipped_points += 1;
            continue;
        }

        let before: usize = point.task_breakdown.len();
        point.task_breakdown.retain(|task| {
            let finite: bool = task.monthly_hours.is_finite();
            if !finite {
                warn!(
                    task_id = %task.task_id,
                    skill = %point.skill_type,
                    month = %point.month,
                    "Skipping task with non-finite monthly hours"
                );
            }
            finite
        });
        let dropped: usize = before - point.task_breakdown.len();
        report.skipped_tasks += dropped;

        if dropped > 0 && point.task_breakdown.is_empty() {
            report.skipped_points += 1;
            continue;
        }

        kept.push(point);
    }

    (kept, report)
}

/// Keeps points whose skill is selected.
///
/// Returns the points unchanged (and `false`) when the selection covers
/// every skill present in the input.
pub(crate) fn filter_by_skill(
    points: Vec<DataPoint>,
    selected: &BTreeSet<SkillName>,
    skill_axis: &BTreeSet<SkillName>,
) -> (Vec<DataPoint>, bool) {
    let all_selected: bool = skill_axis
        .iter()
        .chain(points.iter().map(|point| &point.skill_type))
        .all(|skill| selected.contains(skill));
    if all_selected {
        return (points, false);
    }

    let kept: Vec<DataPoint> = points
        .into_iter()
        .filter(|point| selected.contains(&point.skill_type))
        .collect();
    (kept, true)
}

/// Reduces breakdowns to tasks of selected clients.
///
/// Returns the points unchanged (and `false`) when the selection covers
/// every client present in the input.
pub(crate) fn filter_by_client(
    points: Vec<DataPoint>,
    selected: &BTreeSet<ClientId>,
) -> (Vec<DataPoint>, bool) {
    let all_selected: bool = points
        .iter()
        .flat_map(|point| point.task_breakdown.iter())
        .all(|task| selected.contains(&task.client_id));
    if all_selected {
        return (points, false);
    }

    let kept: Vec<DataPoint> = retain_tasks(points, |task| selected.contains(&task.client_id));
    (kept, true)
}

/// Reduces breakdowns according to the preferred staff filter mode.
///
/// An empty selection in `Specific` mode matches nothing.
pub(crate) fn filter_by_preferred_staff(
    points: Vec<DataPoint>,
    selection: &FilterSelection,
) -> (Vec<DataPoint>, bool) {
    match selection.preferred_staff_filter_mode {
        PreferredStaffFilterMode::All => (points, false),
        PreferredStaffFilterMode::Specific => {
            let selected: &BTreeSet<StaffId> = &selection.selected_preferred_staff;
            let kept: Vec<DataPoint> = retain_tasks(points, |task| {
                task.preferred_staff()
                    .is_some_and(|staff_id| selected.contains(&staff_id))
            });
            (kept, true)
        }
        PreferredStaffFilterMode::None => {
            let kept: Vec<DataPoint> =
                retain_tasks(points, |task| task.preferred_staff().is_none());
            (kept, true)
        }
    }
}

/// Keeps points whose month is inside the resolved range.
///
/// Points whose month is not on the axis at all are kept only when the
/// month lies inside `horizon`.
pub(crate) fn filter_by_time(
    points: Vec<DataPoint>,
    axis: &[MonthInfo],
    visible: &[MonthInfo],
    horizon: &TimeHorizon,
) -> Vec<DataPoint> {
    let axis_keys: BTreeSet<&MonthKey> = axis.iter().map(|month| &month.key).collect();
    let visible_keys: BTreeSet<&MonthKey> = visible.iter().map(|month| &month.key).collect();

    points
        .into_iter()
        .filter(|point| {
            if visible_keys.contains(&point.month) {
                return true;
            }
            if axis_keys.contains(&point.month) {
                return false;
            }
            let inside: bool = horizon.contains_month(&point.month);
            warn!(
                skill = %point.skill_type,
                month = %point.month,
                kept = inside,
                "Data point month is not on the month axis"
            );
            inside
        })
        .collect()
}

fn retain_tasks<F>(points: Vec<DataPoint>, keep: F) -> Vec<DataPoint>
where
    F: Fn(&TaskAssignment) -> bool,
{
    points
        .into_iter()
        .filter_map(|mut point| {
            point.task_breakdown.retain(&keep);
            if point.task_breakdown.is_empty() {
                None
            } else {
                Some(point)
            }
        })
        .collect()
}
