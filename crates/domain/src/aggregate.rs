// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate recomputation.
//!
//! Aggregates are **derived**, never trusted. Every function here rebuilds
//! them from the task breakdowns currently present.

use crate::types::{ClientId, DataPoint, DatasetTotals, DemandDataset, TaskAssignment};
use std::collections::BTreeSet;

/// Tolerance used when comparing stored hours against recomputed hours.
pub const HOURS_EPSILON: f64 = 1e-9;

/// Counts the distinct clients in a task breakdown.
#[must_use]
pub fn unique_client_count(tasks: &[TaskAssignment]) -> usize {
    tasks
        .iter()
        .map(|task| &task.client_id)
        .collect::<BTreeSet<&ClientId>>()
        .len()
}

/// Recomputes a data point's aggregates from its breakdown.
pub fn recompute_point(point: &mut DataPoint) {
    point.demand_hours = point
        .task_breakdown
        .iter()
        .map(|task| task.monthly_hours)
        .sum();
    point.task_count = point.task_breakdown.len();
    point.client_count = unique_client_count(&point.task_breakdown);
}

/// Recomputes the dataset-level totals from its data points.
///
/// Point aggregates are assumed current; callers recompute points first.
pub fn recompute_totals(dataset: &mut DemandDataset) {
    let total_demand_hours: f64 = dataset.data_points.iter().map(|p| p.demand_hours).sum();
    let total_tasks: usize = dataset.data_points.iter().map(|p| p.task_count).sum();
    let total_clients: usize = dataset.client_ids().len();

    dataset.totals = DatasetTotals {
        total_demand_hours,
        total_tasks,
        total_clients,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MonthInfo, SkillName};

    fn task(id: &str, client: &str, hours: f64) -> TaskAssignment {
        TaskAssignment::new(id, client, client, hours, None)
    }

    #[test]
    fn test_recompute_point_replaces_stale_values() {
        let mut point: DataPoint = DataPoint::new(
            "Audit",
            "2026-01",
            vec![task("t1", "c1", 4.0), task("t2", "c1", 6.5)],
        );
        point.demand_hours = 999.0;
        point.task_count = 17;
        point.client_count = 9;

        recompute_point(&mut point);

        assert!((point.demand_hours - 10.5).abs() < HOURS_EPSILON);
        assert_eq!(point.task_count, 2);
        assert_eq!(point.client_count, 1);
    }

    #[test]
    fn test_empty_breakdown_yields_zero_aggregates() {
        let point: DataPoint = DataPoint::new("Audit", "2026-01", vec![]);
        assert!(point.demand_hours.abs() < HOURS_EPSILON);
        assert_eq!(point.task_count, 0);
        assert_eq!(point.client_count, 0);
    }

    #[test]
    fn test_totals_count_clients_across_points_once() {
        let dataset: DemandDataset = DemandDataset::new(
            vec![MonthInfo::new("2026-01", "Jan 2026")],
            [SkillName::new("Audit"), SkillName::new("Tax")]
                .into_iter()
                .collect(),
            vec![
                DataPoint::new("Audit", "2026-01", vec![task("t1", "c1", 2.0)]),
                DataPoint::new(
                    "Tax",
                    "2026-01",
                    vec![task("t2", "c1", 3.0), task("t3", "c2", 1.0)],
                ),
            ],
        );

        assert!((dataset.totals.total_demand_hours - 6.0).abs() < HOURS_EPSILON);
        assert_eq!(dataset.totals.total_tasks, 3);
        assert_eq!(dataset.totals.total_clients, 2);
    }
}
