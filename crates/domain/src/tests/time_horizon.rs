// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    HorizonFallback, HorizonResolution, MonthInfo, MonthKey, MonthRange, MonthRangeResolution,
    RangeAdjustment, TimeHorizon, build_time_horizon, current_month_horizon, resolve_months,
    validate_month_range,
};
use time::{Date, Month};

fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).unwrap()
}

fn create_test_months() -> Vec<MonthInfo> {
    vec![
        MonthInfo::new("2026-01", "Jan 2026"),
        MonthInfo::new("2026-02", "Feb 2026"),
        MonthInfo::new("2026-03", "Mar 2026"),
        MonthInfo::new("2026-04", "Apr 2026"),
        MonthInfo::new("2026-05", "May 2026"),
    ]
}

#[test]
fn test_range_clamped_into_axis() {
    let resolution: MonthRangeResolution = validate_month_range(MonthRange::new(-1, 10), 5);
    assert_eq!(resolution.range, MonthRange::new(0, 4));
    assert_eq!(
        resolution.adjustments,
        vec![
            RangeAdjustment::StartClamped { from: -1, to: 0 },
            RangeAdjustment::EndClamped { from: 10, to: 4 },
        ]
    );
}

#[test]
fn test_valid_range_untouched() {
    let resolution: MonthRangeResolution = validate_month_range(MonthRange::new(1, 3), 5);
    assert_eq!(resolution.range, MonthRange::new(1, 3));
    assert!(!resolution.is_adjusted());
    assert_eq!(resolution.indices(), 1..=3);
}

#[test]
fn test_inverted_range_collapses_to_end() {
    let resolution: MonthRangeResolution = validate_month_range(MonthRange::new(4, 2), 5);
    assert_eq!(resolution.range, MonthRange::new(2, 2));
    assert_eq!(
        resolution.adjustments,
        vec![RangeAdjustment::InvertedRangeCollapsed { from: 4, to: 2 }]
    );
}

#[test]
fn test_inverted_after_clamping() {
    let resolution: MonthRangeResolution = validate_month_range(MonthRange::new(9, -3), 5);
    assert_eq!(resolution.range, MonthRange::new(0, 0));
    assert_eq!(resolution.adjustments.len(), 3);
}

#[test]
fn test_empty_axis_resets_range() {
    let resolution: MonthRangeResolution = validate_month_range(MonthRange::new(2, 7), 0);
    assert_eq!(resolution.range, MonthRange::new(0, 0));
    assert_eq!(
        resolution.adjustments,
        vec![RangeAdjustment::NoMonthsAvailable]
    );
}

#[test]
fn test_resolve_months_selects_slice() {
    let (months, resolution) = resolve_months(&create_test_months(), MonthRange::new(1, 2));
    let keys: Vec<&str> = months.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["2026-02", "2026-03"]);
    assert!(!resolution.is_adjusted());
}

#[test]
fn test_resolve_months_on_empty_axis() {
    let (months, _) = resolve_months(&[], MonthRange::new(0, 3));
    assert!(months.is_empty());
}

#[test]
fn test_horizon_spans_first_to_last_month() {
    let resolution: HorizonResolution =
        build_time_horizon(&create_test_months(), date(2026, Month::October, 19));
    assert_eq!(resolution.fallback, None);
    assert_eq!(resolution.horizon.start, date(2026, Month::January, 1));
    assert_eq!(resolution.horizon.end, date(2026, Month::May, 31));
}

#[test]
fn test_single_month_horizon_is_full_month() {
    let months: Vec<MonthInfo> = vec![MonthInfo::new("2026-02", "Feb 2026")];
    let resolution: HorizonResolution =
        build_time_horizon(&months, date(2026, Month::October, 19));
    assert_eq!(resolution.horizon.start, date(2026, Month::February, 1));
    assert_eq!(resolution.horizon.end, date(2026, Month::February, 28));
    assert_eq!(resolution.horizon.span_days(), 28);
}

#[test]
fn test_empty_months_fall_back_to_current_month() {
    let today: Date = date(2026, Month::October, 19);
    let resolution: HorizonResolution = build_time_horizon(&[], today);
    assert_eq!(resolution.fallback, Some(HorizonFallback::EmptyMonths));
    assert_eq!(resolution.horizon, current_month_horizon(today));
    assert_eq!(resolution.horizon.start, date(2026, Month::October, 1));
    assert_eq!(resolution.horizon.end, date(2026, Month::October, 31));
}

#[test]
fn test_unparsable_key_falls_back_to_current_month() {
    let today: Date = date(2026, Month::October, 19);
    let months: Vec<MonthInfo> = vec![
        MonthInfo::new("2026-01", "Jan 2026"),
        MonthInfo::new("not-a-month", "??"),
    ];
    let resolution: HorizonResolution = build_time_horizon(&months, today);
    assert_eq!(
        resolution.fallback,
        Some(HorizonFallback::UnparsableKey {
            key: String::from("not-a-month")
        })
    );
    assert_eq!(resolution.horizon, current_month_horizon(today));
}

#[test]
fn test_horizon_contains_month() {
    let horizon: TimeHorizon = TimeHorizon {
        start: date(2026, Month::February, 1),
        end: date(2026, Month::March, 31),
    };
    assert!(horizon.contains_month(&MonthKey::new("2026-02")));
    assert!(horizon.contains_month(&MonthKey::new("2026-03")));
    assert!(!horizon.contains_month(&MonthKey::new("2026-04")));
    assert!(!horizon.contains_month(&MonthKey::new("garbage")));
}

#[test]
fn test_current_month_horizon_handles_december() {
    let horizon: TimeHorizon = current_month_horizon(date(2026, Month::December, 5));
    assert_eq!(horizon.start, date(2026, Month::December, 1));
    assert_eq!(horizon.end, date(2026, Month::December, 31));
}
