// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::aggregate::{recompute_point, recompute_totals};
use crate::error::DomainError;
use crate::staff::{StaffId, StaffRef, normalize_staff_ref};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::str::FromStr;
use time::{Date, Month};

/// Represents a skill name (the row dimension of the demand matrix).
///
/// Skill names are compared exactly after trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillName(String);

impl SkillName {
    /// Creates a new `SkillName`.
    ///
    /// # Arguments
    ///
    /// * `value` - The skill name (surrounding whitespace is removed)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns the skill name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SkillName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new `ClientId`.
    ///
    /// # Arguments
    ///
    /// * `value` - The client identifier (surrounding whitespace is removed)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Returns the client identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A month key of the form `YYYY-MM`.
///
/// Keys are stored verbatim (trimmed) so that an unparsable key survives
/// ingestion and can be reported by diagnostics. Lexicographic order of
/// well-formed keys is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    /// Creates a new `MonthKey` without validating it.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Builds the key for the calendar month containing `date`.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self(format!("{:04}-{:02}", date.year(), u8::from(date.month())))
    }

    /// Returns the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the key into a year and month.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMonthKey` if the key is not `YYYY-MM`
    /// with a month between 01 and 12.
    pub fn parse(&self) -> Result<(i32, Month), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidMonthKey {
            key: self.0.clone(),
            reason: reason.to_string(),
        };

        let (year_str, month_str) = self
            .0
            .split_once('-')
            .ok_or_else(|| invalid("expected YYYY-MM"))?;

        if year_str.len() != 4 || !year_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("year must be four digits"));
        }
        if month_str.len() != 2 || !month_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("month must be two digits"));
        }

        let year: i32 = year_str
            .parse()
            .map_err(|_| invalid("year is not a number"))?;
        let month_number: u8 = month_str
            .parse()
            .map_err(|_| invalid("month is not a number"))?;
        let month: Month =
            Month::try_from(month_number).map_err(|_| invalid("month must be between 01 and 12"))?;

        Ok((year, month))
    }

    /// Returns the first calendar day of this month.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be parsed.
    pub fn first_day(&self) -> Result<Date, DomainError> {
        let (year, month) = self.parse()?;
        Date::from_calendar_date(year, month, 1).map_err(|err| DomainError::DateOutOfRange {
            operation: format!("computing first day of {}: {err}", self.0),
        })
    }

    /// Returns the last calendar day of this month.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be parsed or the following month
    /// is not representable.
    pub fn last_day(&self) -> Result<Date, DomainError> {
        let (year, month) = self.parse()?;
        let (next_year, next_month) = if month == Month::December {
            (year + 1, Month::January)
        } else {
            (year, month.next())
        };

        Date::from_calendar_date(next_year, next_month, 1)
            .ok()
            .and_then(Date::previous_day)
            .ok_or_else(|| DomainError::DateOutOfRange {
                operation: format!("computing last day of {}", self.0),
            })
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One column of the demand matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthInfo {
    /// The month key (`YYYY-MM`), unique within a dataset.
    pub key: MonthKey,
    /// Display label, e.g. "Jan 2026".
    #[serde(default)]
    pub label: String,
}

impl MonthInfo {
    /// Creates a new `MonthInfo`.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: MonthKey::new(key),
            label: label.to_string(),
        }
    }
}

/// A single task contributing hours to a data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    /// The task identifier.
    pub task_id: String,
    /// The client the task is performed for.
    pub client_id: ClientId,
    /// The client's display name.
    #[serde(default)]
    pub client_name: String,
    /// Hours of work this task contributes to the month. `NaN` when the
    /// payload did not carry a number.
    #[serde(
        default = "crate::decode::missing_hours",
        deserialize_with = "crate::decode::hours"
    )]
    pub monthly_hours: f64,
    /// The intended assignee, if any. `None` means unassigned.
    #[serde(default)]
    pub preferred_staff_ref: Option<StaffRef>,
}

impl TaskAssignment {
    /// Creates a new `TaskAssignment`.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The task identifier
    /// * `client_id` - The client identifier
    /// * `client_name` - The client display name
    /// * `monthly_hours` - Hours contributed to the month
    /// * `preferred_staff_ref` - The preferred staff reference, if any
    #[must_use]
    pub fn new(
        task_id: &str,
        client_id: &str,
        client_name: &str,
        monthly_hours: f64,
        preferred_staff_ref: Option<StaffRef>,
    ) -> Self {
        Self {
            task_id: task_id.to_string(),
            client_id: ClientId::new(client_id),
            client_name: client_name.to_string(),
            monthly_hours,
            preferred_staff_ref,
        }
    }

    /// Returns the canonical identity of the preferred staff member.
    #[must_use]
    pub fn preferred_staff(&self) -> Option<StaffId> {
        normalize_staff_ref(self.preferred_staff_ref.as_ref())
    }
}

/// One (skill, month) cell of the demand matrix.
///
/// The aggregate fields are derived from `task_breakdown` and are
/// recomputed whenever the breakdown changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// The skill this cell belongs to.
    pub skill_type: SkillName,
    /// The month this cell belongs to.
    pub month: MonthKey,
    /// Sum of `monthly_hours` over the breakdown.
    #[serde(default, deserialize_with = "crate::decode::hours")]
    pub demand_hours: f64,
    /// Number of tasks in the breakdown.
    #[serde(default, deserialize_with = "crate::decode::count")]
    pub task_count: usize,
    /// Number of distinct clients in the breakdown.
    #[serde(default, deserialize_with = "crate::decode::count")]
    pub client_count: usize,
    /// The tasks underlying this cell. A null or malformed breakdown
    /// decodes as empty.
    #[serde(default, deserialize_with = "crate::decode::task_breakdown")]
    pub task_breakdown: Vec<TaskAssignment>,
}

impl DataPoint {
    /// Creates a data point with aggregates computed from `task_breakdown`.
    #[must_use]
    pub fn new(skill: &str, month: &str, task_breakdown: Vec<TaskAssignment>) -> Self {
        let mut point = Self {
            skill_type: SkillName::new(skill),
            month: MonthKey::new(month),
            demand_hours: 0.0,
            task_count: 0,
            client_count: 0,
            task_breakdown,
        };
        recompute_point(&mut point);
        point
    }

    /// Returns whether the stored aggregates claim any work.
    ///
    /// Non-finite demand hours count as a claim: the real value is unknown.
    #[must_use]
    pub fn claims_work(&self) -> bool {
        self.task_count > 0
            || !self.demand_hours.is_finite()
            || self.demand_hours.abs() > crate::HOURS_EPSILON
    }

    /// Returns whether the stored aggregates agree with the breakdown.
    #[must_use]
    pub fn aggregates_consistent(&self) -> bool {
        let mut recomputed: Self = self.clone();
        recompute_point(&mut recomputed);
        recomputed.task_count == self.task_count
            && recomputed.client_count == self.client_count
            && (recomputed.demand_hours - self.demand_hours).abs() <= crate::HOURS_EPSILON
    }
}

/// Dataset-level totals, always derivable from the data points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetTotals {
    /// Sum of demand hours over all data points.
    #[serde(default, deserialize_with = "crate::decode::hours")]
    pub total_demand_hours: f64,
    /// Sum of task counts over all data points.
    #[serde(default, deserialize_with = "crate::decode::count")]
    pub total_tasks: usize,
    /// Number of distinct clients across all data points.
    #[serde(default, deserialize_with = "crate::decode::count")]
    pub total_clients: usize,
}

/// The demand matrix as delivered by the fetch layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandDataset {
    /// The month axis, in chronological order.
    #[serde(default)]
    pub months: Vec<MonthInfo>,
    /// The skill axis.
    #[serde(default)]
    pub skills: BTreeSet<SkillName>,
    /// The populated cells. Cells that fail to decode are skipped.
    #[serde(default, deserialize_with = "crate::decode::data_points")]
    pub data_points: Vec<DataPoint>,
    /// Pre-aggregated totals.
    #[serde(default)]
    pub totals: DatasetTotals,
}

impl DemandDataset {
    /// Creates a dataset with totals computed from `data_points`.
    #[must_use]
    pub fn new(
        months: Vec<MonthInfo>,
        skills: BTreeSet<SkillName>,
        data_points: Vec<DataPoint>,
    ) -> Self {
        let mut dataset = Self {
            months,
            skills,
            data_points,
            totals: DatasetTotals::default(),
        };
        recompute_totals(&mut dataset);
        dataset
    }

    /// Returns whether the dataset has no data points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }

    /// Returns every client id present in a task breakdown.
    #[must_use]
    pub fn client_ids(&self) -> BTreeSet<ClientId> {
        self.data_points
            .iter()
            .flat_map(|point| point.task_breakdown.iter())
            .map(|task| task.client_id.clone())
            .collect()
    }

    /// Returns the keys of the month axis, in axis order.
    #[must_use]
    pub fn month_keys(&self) -> Vec<MonthKey> {
        self.months.iter().map(|m| m.key.clone()).collect()
    }

    /// Computes a content fingerprint identifying this dataset.
    ///
    /// Two datasets with the same content produce the same fingerprint
    /// within a process. Staff references contribute their raw form, so a
    /// changed display name changes the fingerprint.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher: DefaultHasher = DefaultHasher::new();

        self.months.hash(&mut hasher);
        self.skills.hash(&mut hasher);
        self.data_points.len().hash(&mut hasher);
        for point in &self.data_points {
            point.skill_type.hash(&mut hasher);
            point.month.hash(&mut hasher);
            point.demand_hours.to_bits().hash(&mut hasher);
            point.task_count.hash(&mut hasher);
            point.client_count.hash(&mut hasher);
            point.task_breakdown.len().hash(&mut hasher);
            for task in &point.task_breakdown {
                task.task_id.hash(&mut hasher);
                task.client_id.hash(&mut hasher);
                task.client_name.hash(&mut hasher);
                task.monthly_hours.to_bits().hash(&mut hasher);
                task.preferred_staff_ref.hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}

/// A `{id, name}` pair from the reference lists that populate selection UIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// The identifier.
    pub id: String,
    /// The display name.
    #[serde(default)]
    pub name: String,
}

impl ReferenceEntry {
    /// Creates a new `ReferenceEntry`.
    #[must_use]
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// How the preferred staff dimension is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredStaffFilterMode {
    /// No filtering on preferred staff.
    #[default]
    All,
    /// Only tasks whose preferred staff is selected.
    Specific,
    /// Only tasks without a preferred staff member.
    None,
}

impl PreferredStaffFilterMode {
    /// Converts this mode to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Specific => "specific",
            Self::None => "none",
        }
    }
}

impl FromStr for PreferredStaffFilterMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "specific" => Ok(Self::Specific),
            "none" => Ok(Self::None),
            _ => Err(DomainError::InvalidFilterMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for PreferredStaffFilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive range of indices into a dataset's month axis.
///
/// Stored verbatim as the user entered it; out-of-range or inverted values
/// are corrected only when the range is resolved against a month axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MonthRange {
    /// First month index.
    pub start: i32,
    /// Last month index (inclusive).
    pub end: i32,
}

impl MonthRange {
    /// Creates a new `MonthRange`.
    #[must_use]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// The range covering every month of an axis with `total_months` entries.
    #[must_use]
    pub fn full(total_months: usize) -> Self {
        let last: i32 = i32::try_from(total_months.saturating_sub(1)).unwrap_or(i32::MAX);
        Self::new(0, last)
    }
}

/// The user's current filter selection.
///
/// Sets are ordered so that a selection snapshot hashes and compares the
/// same regardless of the order items were toggled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Selected skills.
    pub selected_skills: BTreeSet<SkillName>,
    /// Selected clients.
    pub selected_clients: BTreeSet<ClientId>,
    /// Selected preferred staff (canonical identities).
    pub selected_preferred_staff: BTreeSet<StaffId>,
    /// How the preferred staff dimension is interpreted.
    pub preferred_staff_filter_mode: PreferredStaffFilterMode,
    /// Selected month index range.
    pub month_range: MonthRange,
}

impl FilterSelection {
    /// Returns whether every set in the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_skills.is_empty()
            && self.selected_clients.is_empty()
            && self.selected_preferred_staff.is_empty()
    }
}

/// A selectable dimension of the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionDimension {
    /// The skill dimension.
    Skill,
    /// The client dimension.
    Client,
    /// The preferred staff dimension.
    PreferredStaff,
}

impl SelectionDimension {
    /// Converts this dimension to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skill => "skill",
            Self::Client => "client",
            Self::PreferredStaff => "preferred_staff",
        }
    }
}

impl FromStr for SelectionDimension {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "skill" | "skills" => Ok(Self::Skill),
            "client" | "clients" => Ok(Self::Client),
            "preferred_staff" | "staff" => Ok(Self::PreferredStaff),
            _ => Err(DomainError::InvalidDimension(s.to_string())),
        }
    }
}

impl std::fmt::Display for SelectionDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
