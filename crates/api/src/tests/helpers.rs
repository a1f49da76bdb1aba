// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::{DatasetEnvelope, DemandMatrixController};
use demand_matrix::EngineConfig;
use demand_matrix_domain::{Clock, ManualClock};
use std::sync::Arc;
use std::time::Duration;
use time::{Date, Month};

/// Two months, two skills, four tasks.
///
/// Tax Prep/Jan: t1 (c1, "A") and t2 (c2, structured " a ").
/// Tax Prep/Feb: t3 (c1, structured "B").
/// Audit/Feb: t4 (c3, unassigned).
pub const TEST_ENVELOPE_JSON: &str = r#"{
    "dataset": {
        "months": [
            { "key": "2026-01", "label": "Jan 2026" },
            { "key": "2026-02", "label": "Feb 2026" }
        ],
        "skills": ["Audit", "Tax Prep"],
        "dataPoints": [
            {
                "skillType": "Tax Prep",
                "month": "2026-01",
                "demandHours": 8.5,
                "taskCount": 2,
                "clientCount": 2,
                "taskBreakdown": [
                    { "taskId": "t1", "clientId": "c1", "clientName": "Acme", "monthlyHours": 5.0, "preferredStaffRef": "A" },
                    { "taskId": "t2", "clientId": "c2", "clientName": "Globex", "monthlyHours": 3.5, "preferredStaffRef": { "staffId": " a ", "fullName": "Alice Adams" } }
                ]
            },
            {
                "skillType": "Tax Prep",
                "month": "2026-02",
                "demandHours": 4.0,
                "taskCount": 1,
                "clientCount": 1,
                "taskBreakdown": [
                    { "taskId": "t3", "clientId": "c1", "clientName": "Acme", "monthlyHours": 4.0, "preferredStaffRef": { "staffId": "B", "fullName": "Bob Brown" } }
                ]
            },
            {
                "skillType": "Audit",
                "month": "2026-02",
                "demandHours": 6.0,
                "taskCount": 1,
                "clientCount": 1,
                "taskBreakdown": [
                    { "taskId": "t4", "clientId": "c3", "clientName": "Initech", "monthlyHours": 6.0, "preferredStaffRef": null }
                ]
            }
        ],
        "totals": { "totalDemandHours": 18.5, "totalTasks": 4, "totalClients": 3 }
    },
    "availableClients": [
        { "id": "c1", "name": "Acme" },
        { "id": "c2", "name": "Globex" },
        { "id": "c3", "name": "Initech" }
    ],
    "availablePreferredStaff": [
        { "id": "A", "name": "Alice Adams" },
        { "id": "B", "name": "Bob Brown" }
    ],
    "capacity": [
        { "skill": "Tax Prep", "month": "2026-01", "hours": 10.0 }
    ]
}"#;

pub fn test_today() -> Date {
    Date::from_calendar_date(2026, Month::January, 15).unwrap()
}

pub fn create_test_envelope() -> DatasetEnvelope {
    DatasetEnvelope::from_json(TEST_ENVELOPE_JSON).unwrap()
}

pub fn create_test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(test_today()))
}

/// A controller with default tunables driven by `clock`.
pub fn create_controller(clock: &Arc<ManualClock>) -> DemandMatrixController {
    let clock: Arc<dyn Clock> = clock.clone();
    DemandMatrixController::new(&EngineConfig::default(), clock).unwrap()
}

/// A controller that has loaded `TEST_ENVELOPE_JSON`.
pub fn create_loaded_controller(clock: &Arc<ManualClock>) -> DemandMatrixController {
    let mut controller: DemandMatrixController = create_controller(clock);
    controller.load_dataset(create_test_envelope());
    controller
}

pub const fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
