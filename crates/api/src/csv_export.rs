// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of a filtered demand matrix.
//!
//! One row is written per data point:
//!
//! ```text
//! Skill,Month,Demand,Capacity,Gap,Utilization
//! Tax Prep,2026-01,8.5,10.0,1.5,85.0
//! ```
//!
//! Rows follow the month axis order, then skill name. Points whose month is
//! not on the axis are written last, ordered by month key.

use crate::error::ApiError;
use crate::request_response::CapacityEntry;
use demand_matrix_domain::{DataPoint, DemandDataset, MonthKey, SkillName};
use std::collections::HashMap;

/// The CSV header row.
pub const EXPORT_HEADERS: [&str; 6] = [
    "Skill",
    "Month",
    "Demand",
    "Capacity",
    "Gap",
    "Utilization",
];

/// Planned capacity keyed by (skill, month). Missing cells have zero capacity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapacityLookup {
    hours: HashMap<(SkillName, MonthKey), f64>,
}

impl CapacityLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a lookup from envelope entries. Later entries for the same
    /// cell replace earlier ones.
    #[must_use]
    pub fn from_entries(entries: &[CapacityEntry]) -> Self {
        let mut lookup: Self = Self::new();
        for entry in entries {
            lookup.insert(&entry.skill, &entry.month, entry.hours);
        }
        lookup
    }

    /// Sets the capacity for one cell.
    pub fn insert(&mut self, skill: &str, month: &str, hours: f64) {
        self.hours
            .insert((SkillName::new(skill), MonthKey::new(month)), hours);
    }

    /// Returns the capacity for one cell, or zero.
    #[must_use]
    pub fn get(&self, skill: &SkillName, month: &MonthKey) -> f64 {
        self.hours
            .get(&(skill.clone(), month.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Returns whether no capacity is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// Demand, capacity and derived figures for one exported row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityFigures {
    /// Demand hours.
    pub demand: f64,
    /// Capacity hours.
    pub capacity: f64,
    /// `capacity - demand`.
    pub gap: f64,
    /// `demand / capacity * 100`, or zero without capacity.
    pub utilization: f64,
}

impl CapacityFigures {
    /// Computes the derived figures.
    #[must_use]
    pub fn new(demand: f64, capacity: f64) -> Self {
        let utilization: f64 = if capacity > 0.0 {
            demand / capacity * 100.0
        } else {
            0.0
        };
        Self {
            demand,
            capacity,
            gap: capacity - demand,
            utilization,
        }
    }
}

fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

/// Serializes a filtered dataset to CSV.
///
/// # Arguments
///
/// * `dataset` - The filtered dataset
/// * `capacity` - Planned capacity per (skill, month)
///
/// # Errors
///
/// Returns `ApiError::ExportFailed` if the CSV writer fails.
pub fn export_csv(dataset: &DemandDataset, capacity: &CapacityLookup) -> Result<String, ApiError> {
    let axis_position: HashMap<&MonthKey, usize> = dataset
        .months
        .iter()
        .enumerate()
        .map(|(index, month)| (&month.key, index))
        .collect();

    let mut rows: Vec<&DataPoint> = dataset.data_points.iter().collect();
    rows.sort_by(|a, b| {
        let a_position: usize = axis_position.get(&a.month).copied().unwrap_or(usize::MAX);
        let b_position: usize = axis_position.get(&b.month).copied().unwrap_or(usize::MAX);
        a_position
            .cmp(&b_position)
            .then_with(|| a.month.cmp(&b.month))
            .then_with(|| a.skill_type.cmp(&b.skill_type))
    });

    let mut writer: csv::Writer<Vec<u8>> = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| ApiError::ExportFailed {
            message: e.to_string(),
        })?;

    for point in rows {
        let figures: CapacityFigures = CapacityFigures::new(
            point.demand_hours,
            capacity.get(&point.skill_type, &point.month),
        );
        let record: [String; 6] = [
            point.skill_type.to_string(),
            point.month.to_string(),
            one_decimal(figures.demand),
            one_decimal(figures.capacity),
            one_decimal(figures.gap),
            one_decimal(figures.utilization),
        ];
        writer
            .write_record(&record)
            .map_err(|e| ApiError::ExportFailed {
                message: e.to_string(),
            })?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| ApiError::ExportFailed {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| ApiError::ExportFailed {
        message: e.to_string(),
    })
}
