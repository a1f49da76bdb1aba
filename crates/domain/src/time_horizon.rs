// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Month range validation and time horizon derivation.
//!
//! ## Invariants
//!
//! - Validation never fails: out-of-bounds and inverted ranges are corrected
//!   and each correction is reported as a [`RangeAdjustment`]
//! - A horizon is never zero-width: it always spans whole calendar months
//! - An empty axis or an unparsable key falls back to the current month
//!
//! ## Example
//!
//! ```text
//! range = { start: -1, end: 10 }, total_months = 5
//!
//! -> { start: 0, end: 4 }
//!    adjustments: StartClamped(-1 -> 0), EndClamped(10 -> 4)
//! ```

use crate::types::{MonthInfo, MonthKey, MonthRange};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use time::Date;
use tracing::warn;

/// A correction applied while validating a month range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeAdjustment {
    /// The month axis is empty; the range was reset to `{0, 0}`.
    NoMonthsAvailable,
    /// `start` was outside the axis and has been clamped.
    StartClamped {
        /// The requested value.
        from: i32,
        /// The corrected value.
        to: i32,
    },
    /// `end` was outside the axis and has been clamped.
    EndClamped {
        /// The requested value.
        from: i32,
        /// The corrected value.
        to: i32,
    },
    /// `start` was after `end`; `start` has been moved to `end`.
    InvertedRangeCollapsed {
        /// The `start` value before collapsing.
        from: i32,
        /// The new `start` value (equal to `end`).
        to: i32,
    },
}

impl std::fmt::Display for RangeAdjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMonthsAvailable => write!(f, "no months available, range reset to 0..=0"),
            Self::StartClamped { from, to } => write!(f, "start clamped from {from} to {to}"),
            Self::EndClamped { from, to } => write!(f, "end clamped from {from} to {to}"),
            Self::InvertedRangeCollapsed { from, to } => {
                write!(f, "start {from} was after end, moved to {to}")
            }
        }
    }
}

/// The outcome of validating a month range against an axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRangeResolution {
    /// The corrected range, guaranteed `0 <= start <= end < total_months`
    /// whenever the axis is non-empty.
    pub range: MonthRange,
    /// Corrections that were applied, in order.
    pub adjustments: Vec<RangeAdjustment>,
}

impl MonthRangeResolution {
    /// Returns whether any correction was applied.
    #[must_use]
    pub fn is_adjusted(&self) -> bool {
        !self.adjustments.is_empty()
    }

    /// Returns the validated range as axis indices.
    #[must_use]
    pub fn indices(&self) -> RangeInclusive<usize> {
        let start: usize = usize::try_from(self.range.start).unwrap_or(0);
        let end: usize = usize::try_from(self.range.end).unwrap_or(0);
        start..=end
    }
}

/// Clamps a month range into `[0, total_months - 1]` and forces
/// `start <= end`.
///
/// # Arguments
///
/// * `range` - The range as entered by the user
/// * `total_months` - The length of the month axis
///
/// # Returns
///
/// The corrected range and the list of corrections applied. This function
/// does not fail.
#[must_use]
pub fn validate_month_range(range: MonthRange, total_months: usize) -> MonthRangeResolution {
    let mut adjustments: Vec<RangeAdjustment> = Vec::new();

    if total_months == 0 {
        if range != MonthRange::new(0, 0) {
            adjustments.push(RangeAdjustment::NoMonthsAvailable);
        }
        log_adjustments(&adjustments);
        return MonthRangeResolution {
            range: MonthRange::new(0, 0),
            adjustments,
        };
    }

    let last: i32 = i32::try_from(total_months - 1).unwrap_or(i32::MAX);

    let start: i32 = range.start.clamp(0, last);
    if start != range.start {
        adjustments.push(RangeAdjustment::StartClamped {
            from: range.start,
            to: start,
        });
    }

    let end: i32 = range.end.clamp(0, last);
    if end != range.end {
        adjustments.push(RangeAdjustment::EndClamped {
            from: range.end,
            to: end,
        });
    }

    let start: i32 = if start > end {
        adjustments.push(RangeAdjustment::InvertedRangeCollapsed {
            from: start,
            to: end,
        });
        end
    } else {
        start
    };

    log_adjustments(&adjustments);

    MonthRangeResolution {
        range: MonthRange::new(start, end),
        adjustments,
    }
}

fn log_adjustments(adjustments: &[RangeAdjustment]) {
    for adjustment in adjustments {
        warn!(%adjustment, "Month range corrected");
    }
}

/// Validates `range` against `months` and returns the months inside it.
#[must_use]
pub fn resolve_months(
    months: &[MonthInfo],
    range: MonthRange,
) -> (Vec<MonthInfo>, MonthRangeResolution) {
    let resolution: MonthRangeResolution = validate_month_range(range, months.len());
    if months.is_empty() {
        return (Vec::new(), resolution);
    }

    let selected: Vec<MonthInfo> = months
        .get(resolution.indices())
        .map(<[MonthInfo]>::to_vec)
        .unwrap_or_default();

    (selected, resolution)
}

/// An inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeHorizon {
    /// First day of the window.
    pub start: Date,
    /// Last day of the window (inclusive).
    pub end: Date,
}

impl TimeHorizon {
    /// Returns whether `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns whether the calendar month named by `key` lies entirely inside
    /// the window. Unparsable keys are never contained.
    #[must_use]
    pub fn contains_month(&self, key: &MonthKey) -> bool {
        match (key.first_day(), key.last_day()) {
            (Ok(first), Ok(last)) => self.contains(first) && self.contains(last),
            _ => false,
        }
    }

    /// Number of days in the window, counting both ends.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}

/// Why a horizon fell back to the current month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HorizonFallback {
    /// The month list was empty.
    EmptyMonths,
    /// A boundary month key could not be parsed.
    UnparsableKey {
        /// The offending key.
        key: String,
    },
}

/// A derived horizon plus the fallback that produced it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonResolution {
    /// The resolved window.
    pub horizon: TimeHorizon,
    /// Set when the window is the current-month fallback.
    pub fallback: Option<HorizonFallback>,
}

/// Returns the window covering the calendar month containing `today`.
#[must_use]
pub fn current_month_horizon(today: Date) -> TimeHorizon {
    let key: MonthKey = MonthKey::from_date(today);
    let start: Date = key.first_day().unwrap_or(today);
    let end: Date = key.last_day().unwrap_or(today);
    TimeHorizon { start, end }
}

/// Derives the calendar window spanned by `months`.
///
/// The window runs from the first day of the first month to the last day
/// of the last month, so a single month yields a full month span.
///
/// # Arguments
///
/// * `months` - The selected months, in axis order
/// * `today` - Used for the current-month fallback
#[must_use]
pub fn build_time_horizon(months: &[MonthInfo], today: Date) -> HorizonResolution {
    let (Some(first), Some(last)) = (months.first(), months.last()) else {
        warn!("No months to derive a time horizon from, using current month");
        return HorizonResolution {
            horizon: current_month_horizon(today),
            fallback: Some(HorizonFallback::EmptyMonths),
        };
    };

    match (first.key.first_day(), last.key.last_day()) {
        (Ok(start), Ok(end)) => {
            let horizon: TimeHorizon = if start <= end {
                TimeHorizon { start, end }
            } else {
                // Axis out of order: widen to cover both boundary months.
                TimeHorizon {
                    start: last.key.first_day().unwrap_or(end),
                    end: first.key.last_day().unwrap_or(start),
                }
            };
            HorizonResolution {
                horizon,
                fallback: None,
            }
        }
        (Err(err), _) | (_, Err(err)) => {
            warn!(error = %err, "Unparsable month key, using current month");
            let key: String = if first.key.parse().is_err() {
                first.key.as_str().to_string()
            } else {
                last.key.as_str().to_string()
            };
            HorizonResolution {
                horizon: current_month_horizon(today),
                fallback: Some(HorizonFallback::UnparsableKey { key }),
            }
        }
    }
}
