// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The demand matrix filter pipeline.
//!
//! Stages run in a fixed order against a read-only input dataset:
//!
//! 1. Ingestion sanitation
//! 2. Skill
//! 3. Client
//! 4. Preferred staff
//! 5. Time horizon
//!
//! ## Invariants
//!
//! - The input dataset is never mutated
//! - Point aggregates are recomputed after every stage
//! - Dataset totals are recomputed from the final points
//! - A non-empty input that filters down to nothing yields the diagnostics
//!   fallback, never an error
//! - The output keeps the input's month axis, so running the pipeline on
//!   its own output with the same selection changes nothing

use crate::cache::{CacheKey, CacheStats, FilterCache};
use crate::config::EngineConfig;
use crate::diagnostics::build_fallback;
use crate::error::CoreError;
use crate::stages::{
    filter_by_client, filter_by_preferred_staff, filter_by_skill, filter_by_time, sanitize,
};
use demand_matrix_domain::{
    Clock, DataPoint, DemandDataset, FilterSelection, HorizonResolution, MonthInfo, MonthKey,
    MonthRangeResolution, SkillName, build_time_horizon, recompute_point, recompute_totals,
    resolve_months,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use time::Date;
use tracing::{debug, warn};

/// A stage of the filter pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStage {
    /// Skill filtering.
    Skill,
    /// Client filtering.
    Client,
    /// Preferred staff filtering.
    PreferredStaff,
    /// Month range filtering.
    TimeHorizon,
}

impl FilterStage {
    /// Returns the stage name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Client => "client",
            Self::PreferredStaff => "preferred_staff",
            Self::TimeHorizon => "time_horizon",
        }
    }
}

/// Before/after counts for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReport {
    /// The stage.
    pub stage: FilterStage,
    /// Whether the stage filtered anything (`false` for pass-through).
    pub applied: bool,
    /// Data points entering the stage.
    pub points_before: usize,
    /// Data points leaving the stage.
    pub points_after: usize,
    /// Tasks entering the stage.
    pub tasks_before: usize,
    /// Tasks leaving the stage.
    pub tasks_after: usize,
}

/// What ingestion sanitation removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitationReport {
    /// Tasks dropped for non-finite hours.
    pub skipped_tasks: usize,
    /// Data points dropped for a missing breakdown or for losing every task.
    pub skipped_points: usize,
}

/// Everything the pipeline observed while producing a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    /// Ingestion sanitation counts.
    pub sanitation: SanitationReport,
    /// Per-stage counts, in stage order.
    pub stages: Vec<StageReport>,
    /// The validated month range and any corrections applied to it.
    pub range: MonthRangeResolution,
    /// The months inside the validated range.
    pub visible_months: Vec<MonthInfo>,
    /// The calendar window spanned by `visible_months`.
    pub horizon: HorizonResolution,
    /// Whether the result is the empty fallback dataset.
    pub used_fallback: bool,
}

/// A filtered dataset together with the report that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    /// The filtered dataset.
    pub dataset: DemandDataset,
    /// How it was produced.
    pub report: PipelineReport,
}

fn task_total(points: &[DataPoint]) -> usize {
    points.iter().map(|point| point.task_breakdown.len()).sum()
}

fn run_stage<F>(
    stage: FilterStage,
    points: Vec<DataPoint>,
    stages: &mut Vec<StageReport>,
    filter: F,
) -> Vec<DataPoint>
where
    F: FnOnce(Vec<DataPoint>) -> (Vec<DataPoint>, bool),
{
    let points_before: usize = points.len();
    let tasks_before: usize = task_total(&points);

    let (mut points, applied) = filter(points);
    for point in &mut points {
        recompute_point(point);
    }

    let report: StageReport = StageReport {
        stage,
        applied,
        points_before,
        points_after: points.len(),
        tasks_before,
        tasks_after: task_total(&points),
    };
    debug!(
        stage = stage.as_str(),
        applied,
        before = points_before,
        after = report.points_after,
        "Filter stage complete"
    );
    stages.push(report);

    points
}

/// Runs the filter pipeline once, without memoization.
///
/// # Arguments
///
/// * `dataset` - The input dataset (never mutated)
/// * `selection` - A snapshot of the current selection
/// * `today` - Used for the current-month horizon fallback
///
/// # Returns
///
/// The filtered dataset and a report of each stage. This function does not
/// fail.
#[must_use]
pub fn run_pipeline(
    dataset: &DemandDataset,
    selection: &FilterSelection,
    today: Date,
) -> PipelineOutcome {
    let mut stages: Vec<StageReport> = Vec::with_capacity(4);

    let (points, sanitation) = sanitize(dataset.data_points.clone());

    let points: Vec<DataPoint> = run_stage(FilterStage::Skill, points, &mut stages, |points| {
        filter_by_skill(points, &selection.selected_skills, &dataset.skills)
    });
    let skill_filtered: bool = stages.last().is_some_and(|stage| stage.applied);

    let points: Vec<DataPoint> = run_stage(FilterStage::Client, points, &mut stages, |points| {
        filter_by_client(points, &selection.selected_clients)
    });

    let points: Vec<DataPoint> =
        run_stage(FilterStage::PreferredStaff, points, &mut stages, |points| {
            filter_by_preferred_staff(points, selection)
        });

    let (visible_months, range) = resolve_months(&dataset.months, selection.month_range);
    let horizon: HorizonResolution = build_time_horizon(&visible_months, today);

    let points: Vec<DataPoint> =
        run_stage(FilterStage::TimeHorizon, points, &mut stages, |points| {
            if dataset.months.is_empty() {
                warn!("Dataset has no month axis, skipping time horizon filter");
                return (points, false);
            }
            let kept: Vec<DataPoint> =
                filter_by_time(points, &dataset.months, &visible_months, &horizon.horizon);
            (kept, true)
        });

    let skills: BTreeSet<SkillName> = if skill_filtered {
        dataset
            .skills
            .intersection(&selection.selected_skills)
            .cloned()
            .collect()
    } else {
        dataset.skills.clone()
    };

    let used_fallback: bool = !dataset.data_points.is_empty() && points.is_empty();
    let filtered: DemandDataset = if used_fallback {
        let mut fallback: DemandDataset = build_fallback(dataset, &visible_months);
        fallback.skills = skills;
        fallback
    } else {
        let mut output: DemandDataset = DemandDataset {
            months: dataset.months.clone(),
            skills,
            data_points: points,
            totals: dataset.totals,
        };
        recompute_totals(&mut output);
        output
    };

    debug!(
        points_in = dataset.data_points.len(),
        points_out = filtered.data_points.len(),
        used_fallback,
        "Filter pipeline complete"
    );

    PipelineOutcome {
        dataset: filtered,
        report: PipelineReport {
            sanitation,
            stages,
            range,
            visible_months,
            horizon,
            used_fallback,
        },
    }
}

/// A filter pipeline instance with its own memoization cache.
///
/// Instances are independent: two views each holding a `FilterPipeline`
/// never observe each other's cached results.
#[derive(Debug)]
pub struct FilterPipeline {
    cache: Option<FilterCache>,
    clock: Arc<dyn Clock>,
}

impl FilterPipeline {
    /// Creates a pipeline without memoization.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { cache: None, clock }
    }

    /// Creates a pipeline that memoizes results.
    #[must_use]
    pub fn with_cache(clock: Arc<dyn Clock>, ttl: std::time::Duration, capacity: usize) -> Self {
        let cache: FilterCache = FilterCache::new(ttl, capacity, Arc::clone(&clock));
        Self {
            cache: Some(cache),
            clock,
        }
    }

    /// Creates a memoizing pipeline from an engine configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &EngineConfig, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self::with_cache(
            clock,
            config.cache_ttl,
            config.cache_capacity,
        ))
    }

    /// Filters `dataset` by `selection`.
    pub fn apply(&mut self, dataset: &DemandDataset, selection: &FilterSelection) -> DemandDataset {
        self.apply_with_report(dataset, selection).dataset
    }

    /// Filters `dataset` by `selection` and reports how.
    ///
    /// Results are served from the cache when an unexpired entry exists for
    /// the same dataset content and selection in the same calendar month.
    pub fn apply_with_report(
        &mut self,
        dataset: &DemandDataset,
        selection: &FilterSelection,
    ) -> PipelineOutcome {
        let today: Date = self.clock.today();
        let Some(cache) = self.cache.as_mut() else {
            return run_pipeline(dataset, selection, today);
        };

        let key: CacheKey = CacheKey {
            dataset: dataset.fingerprint(),
            selection: selection.clone(),
            month: MonthKey::from_date(today),
        };
        if let Some(outcome) = cache.get(&key) {
            debug!(dataset = key.dataset, "Filter cache hit");
            return outcome;
        }

        let outcome: PipelineOutcome = run_pipeline(dataset, selection, today);
        cache.insert(key, outcome.clone());
        outcome
    }

    /// Returns cache counters, or `None` when memoization is disabled.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(FilterCache::stats)
    }

    /// Drops every memoized result.
    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }
}
