// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dataset structure diagnostics and the empty-result fallback.
//!
//! Diagnostics are informational only. Nothing here rejects a dataset; the
//! pipeline runs regardless of what the report says.

use demand_matrix_domain::{
    DatasetTotals, DemandDataset, MonthInfo, MonthKey, SkillName, StaffRef, TaskAssignment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A single structural observation about a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureFinding {
    /// A point claims tasks or hours but carries no breakdown.
    MissingBreakdown {
        /// The point's skill.
        skill: SkillName,
        /// The point's month.
        month: MonthKey,
        /// The stale task count.
        claimed_tasks: usize,
    },
    /// A point's demand hours are NaN or infinite.
    NonFiniteAggregate {
        /// The point's skill.
        skill: SkillName,
        /// The point's month.
        month: MonthKey,
    },
    /// A task's hours are NaN or infinite.
    NonFiniteTaskHours {
        /// The task.
        task_id: String,
        /// The month of the point holding the task.
        month: MonthKey,
    },
    /// A month key appears more than once on the axis.
    DuplicateMonthKey {
        /// The repeated key.
        key: MonthKey,
    },
    /// A month key on the axis is not `YYYY-MM`.
    UnparsableMonthKey {
        /// The offending key.
        key: MonthKey,
    },
    /// A task's preferred staff reference is present but unresolvable.
    UnresolvableStaffRef {
        /// The task.
        task_id: String,
    },
    /// A point's stored aggregates disagree with its breakdown.
    StaleAggregates {
        /// The point's skill.
        skill: SkillName,
        /// The point's month.
        month: MonthKey,
    },
    /// A task carries negative hours.
    NegativeTaskHours {
        /// The task.
        task_id: String,
        /// The hours value.
        hours: f64,
    },
    /// The month axis is not in chronological order.
    MonthsOutOfOrder {
        /// The key that precedes its predecessor.
        key: MonthKey,
    },
    /// A point's month is not on the month axis.
    OrphanMonth {
        /// The point's skill.
        skill: SkillName,
        /// The point's month.
        month: MonthKey,
    },
    /// A point's skill is not in the dataset's skill set.
    UnknownSkill {
        /// The unknown skill.
        skill: SkillName,
    },
}

impl StructureFinding {
    /// Returns whether this finding makes the dataset structurally invalid.
    #[must_use]
    pub const fn is_issue(&self) -> bool {
        matches!(
            self,
            Self::MissingBreakdown { .. }
                | Self::NonFiniteAggregate { .. }
                | Self::NonFiniteTaskHours { .. }
                | Self::DuplicateMonthKey { .. }
                | Self::UnparsableMonthKey { .. }
        )
    }
}

impl std::fmt::Display for StructureFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBreakdown {
                skill,
                month,
                claimed_tasks,
            } => write!(
                f,
                "Data point {skill}/{month} claims {claimed_tasks} tasks but has no task breakdown"
            ),
            Self::NonFiniteAggregate { skill, month } => {
                write!(f, "Data point {skill}/{month} has non-finite demand hours")
            }
            Self::NonFiniteTaskHours { task_id, month } => {
                write!(f, "Task '{task_id}' in {month} has non-finite monthly hours")
            }
            Self::DuplicateMonthKey { key } => {
                write!(f, "Month key '{key}' appears more than once")
            }
            Self::UnparsableMonthKey { key } => write!(f, "Month key '{key}' is not YYYY-MM"),
            Self::UnresolvableStaffRef { task_id } => {
                write!(f, "Task '{task_id}' has an unresolvable preferred staff reference")
            }
            Self::StaleAggregates { skill, month } => write!(
                f,
                "Data point {skill}/{month} aggregates disagree with its task breakdown"
            ),
            Self::NegativeTaskHours { task_id, hours } => {
                write!(f, "Task '{task_id}' has negative monthly hours ({hours})")
            }
            Self::MonthsOutOfOrder { key } => {
                write!(f, "Month key '{key}' is out of chronological order")
            }
            Self::OrphanMonth { skill, month } => {
                write!(f, "Data point {skill}/{month} is not on the month axis")
            }
            Self::UnknownSkill { skill } => {
                write!(f, "Skill '{skill}' is not in the dataset skill set")
            }
        }
    }
}

/// The result of validating a dataset's structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport {
    /// `false` when any issue was found.
    pub is_valid: bool,
    /// Findings that make the dataset invalid.
    pub issues: Vec<StructureFinding>,
    /// Findings worth surfacing that do not invalidate the dataset.
    pub warnings: Vec<StructureFinding>,
}

/// Validates the structure of a dataset.
///
/// Never fails. The report is informational; callers decide what to do
/// with it.
#[must_use]
pub fn validate_structure(dataset: &DemandDataset) -> StructureReport {
    let mut findings: Vec<StructureFinding> = Vec::new();

    check_month_axis(&dataset.months, &mut findings);

    let axis_keys: BTreeSet<&MonthKey> = dataset.months.iter().map(|m| &m.key).collect();
    let mut unknown_skills: BTreeSet<&SkillName> = BTreeSet::new();

    for point in &dataset.data_points {
        if point.task_breakdown.is_empty() && point.claims_work() {
            findings.push(StructureFinding::MissingBreakdown {
                skill: point.skill_type.clone(),
                month: point.month.clone(),
                claimed_tasks: point.task_count,
            });
        } else if !point.demand_hours.is_finite() {
            findings.push(StructureFinding::NonFiniteAggregate {
                skill: point.skill_type.clone(),
                month: point.month.clone(),
            });
        } else if !point.aggregates_consistent() {
            findings.push(StructureFinding::StaleAggregates {
                skill: point.skill_type.clone(),
                month: point.month.clone(),
            });
        }

        if !axis_keys.contains(&point.month) {
            findings.push(StructureFinding::OrphanMonth {
                skill: point.skill_type.clone(),
                month: point.month.clone(),
            });
        }

        if !dataset.skills.contains(&point.skill_type) {
            unknown_skills.insert(&point.skill_type);
        }

        for task in &point.task_breakdown {
            check_task(task, &point.month, &mut findings);
        }
    }

    findings.extend(
        unknown_skills
            .into_iter()
            .map(|skill| StructureFinding::UnknownSkill {
                skill: skill.clone(),
            }),
    );

    let (issues, warnings): (Vec<StructureFinding>, Vec<StructureFinding>) =
        findings.into_iter().partition(StructureFinding::is_issue);

    for issue in &issues {
        warn!(%issue, "Dataset structure issue");
    }
    debug!(
        issues = issues.len(),
        warnings = warnings.len(),
        "Validated dataset structure"
    );

    StructureReport {
        is_valid: issues.is_empty(),
        issues,
        warnings,
    }
}

fn check_month_axis(months: &[MonthInfo], findings: &mut Vec<StructureFinding>) {
    let mut seen: BTreeSet<&MonthKey> = BTreeSet::new();
    let mut previous: Option<&MonthKey> = None;

    for month in months {
        if !seen.insert(&month.key) {
            findings.push(StructureFinding::DuplicateMonthKey {
                key: month.key.clone(),
            });
        }

        if month.key.parse().is_err() {
            findings.push(StructureFinding::UnparsableMonthKey {
                key: month.key.clone(),
            });
            continue;
        }

        if previous.is_some_and(|prev| month.key < *prev) {
            findings.push(StructureFinding::MonthsOutOfOrder {
                key: month.key.clone(),
            });
        }
        previous = Some(&month.key);
    }
}

fn check_task(task: &TaskAssignment, month: &MonthKey, findings: &mut Vec<StructureFinding>) {
    if !task.monthly_hours.is_finite() {
        findings.push(StructureFinding::NonFiniteTaskHours {
            task_id: task.task_id.clone(),
            month: month.clone(),
        });
    } else if task.monthly_hours < 0.0 {
        findings.push(StructureFinding::NegativeTaskHours {
            task_id: task.task_id.clone(),
            hours: task.monthly_hours,
        });
    }

    if task
        .preferred_staff_ref
        .as_ref()
        .is_some_and(StaffRef::is_unresolvable)
    {
        findings.push(StructureFinding::UnresolvableStaffRef {
            task_id: task.task_id.clone(),
        });
    }
}

/// Builds the dataset returned when filtering removed every data point.
///
/// The result keeps `resolved_months` as its month axis, or the first month
/// of the original axis when nothing resolved. It has no data points and
/// zeroed totals. Never fails.
#[must_use]
pub fn build_fallback(dataset: &DemandDataset, resolved_months: &[MonthInfo]) -> DemandDataset {
    let months: Vec<MonthInfo> = if resolved_months.is_empty() {
        dataset.months.first().cloned().into_iter().collect()
    } else {
        resolved_months.to_vec()
    };

    warn!(
        months = months.len(),
        input_points = dataset.data_points.len(),
        "Filtering removed all data, returning empty fallback dataset"
    );

    DemandDataset {
        months,
        skills: dataset.skills.clone(),
        data_points: Vec::new(),
        totals: DatasetTotals::default(),
    }
}
