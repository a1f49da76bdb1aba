// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_controller, create_loaded_controller, create_test_clock, create_test_envelope,
};
use crate::{
    ApiError, DatasetEnvelope, DemandMatrixController, MonthRangeRequest,
    TogglePreferredStaffRequest,
};
use demand_matrix::{PipelineOutcome, StructureFinding, StructureReport};
use demand_matrix_domain::{DataPoint, ManualClock, MonthRange, StaffId, StaffRef, TaskAssignment};
use std::sync::Arc;

fn tasks(envelope: &DatasetEnvelope) -> Vec<&TaskAssignment> {
    envelope
        .dataset
        .data_points
        .iter()
        .flat_map(|point| point.task_breakdown.iter())
        .collect()
}

#[test]
fn test_envelope_decodes_every_staff_reference_shape() {
    let envelope: DatasetEnvelope = create_test_envelope();

    let refs: Vec<Option<StaffRef>> = tasks(&envelope)
        .into_iter()
        .map(|task| task.preferred_staff_ref.clone())
        .collect();

    assert_eq!(
        refs,
        vec![
            Some(StaffRef::plain("A")),
            Some(StaffRef::structured(Some(" a "), Some("Alice Adams"))),
            Some(StaffRef::structured(Some("B"), Some("Bob Brown"))),
            None,
        ]
    );
    assert_eq!(envelope.available_clients.len(), 3);
    assert_eq!(envelope.available_preferred_staff.len(), 2);
    assert_eq!(envelope.capacity.len(), 1);
}

#[test]
fn test_plain_and_structured_references_share_an_identity() {
    let envelope: DatasetEnvelope = create_test_envelope();

    let identities: Vec<Option<StaffId>> = tasks(&envelope)
        .into_iter()
        .map(TaskAssignment::preferred_staff)
        .collect();

    assert_eq!(identities[0], identities[1]);
    assert_eq!(identities[0], StaffId::new("a"));
    assert_eq!(identities[2], StaffId::new("b"));
    assert_eq!(identities[3], None);
}

#[test]
fn test_unrecognized_staff_reference_normalizes_to_unassigned() {
    let envelope: DatasetEnvelope = DatasetEnvelope::from_json(
        r#"{
            "dataset": {
                "months": [{ "key": "2026-01" }],
                "skills": ["Audit"],
                "dataPoints": [{
                    "skillType": "Audit",
                    "month": "2026-01",
                    "taskBreakdown": [
                        { "taskId": "t1", "clientId": "c1", "monthlyHours": 2.0, "preferredStaffRef": 42 }
                    ]
                }]
            }
        }"#,
    )
    .unwrap();

    let task: &TaskAssignment = tasks(&envelope)[0];
    let staff_ref: &StaffRef = task.preferred_staff_ref.as_ref().unwrap();

    assert!(staff_ref.is_unresolvable());
    assert_eq!(task.preferred_staff(), None);
}

#[test]
fn test_missing_sections_default_to_empty() {
    let envelope: DatasetEnvelope = DatasetEnvelope::from_json("{}").unwrap();

    assert_eq!(envelope, DatasetEnvelope::default());
}

#[test]
fn test_malformed_json_is_a_decode_error() {
    let result: Result<DatasetEnvelope, ApiError> =
        DatasetEnvelope::from_json(r#"{ "dataset": { "months": 7 } }"#);

    assert!(matches!(result, Err(ApiError::DatasetDecode { .. })));
}

#[test]
fn test_malformed_fields_do_not_block_loading() {
    let envelope: DatasetEnvelope = DatasetEnvelope::from_json(
        r#"{
            "dataset": {
                "months": [{ "key": "2026-01" }],
                "skills": ["Audit", "Tax Prep"],
                "dataPoints": [
                    {
                        "skillType": "Tax Prep",
                        "month": "2026-01",
                        "demandHours": 5.0,
                        "taskCount": 2,
                        "taskBreakdown": [
                            { "taskId": "t1", "clientId": "c1", "monthlyHours": 5.0 },
                            { "taskId": "t2", "clientId": "c2", "monthlyHours": null }
                        ]
                    },
                    {
                        "skillType": "Audit",
                        "month": "2026-01",
                        "demandHours": "n/a",
                        "taskCount": 1,
                        "taskBreakdown": null
                    }
                ]
            },
            "availableClients": [{ "id": "c1", "name": "Acme" }, { "id": "c2", "name": "Globex" }]
        }"#,
    )
    .unwrap();

    let clock: Arc<ManualClock> = create_test_clock();
    let mut controller: DemandMatrixController = create_controller(&clock);
    controller.load_dataset(envelope);

    let report: StructureReport = controller.diagnostics();
    assert!(!report.is_valid);
    assert!(
        report
            .issues
            .iter()
            .any(|issue| matches!(issue, StructureFinding::MissingBreakdown { .. }))
    );
    assert!(report.issues.iter().any(|issue| matches!(
        issue,
        StructureFinding::NonFiniteTaskHours { task_id, .. } if task_id == "t2"
    )));

    let outcome: PipelineOutcome = controller.get_filtered_outcome();
    assert_eq!(outcome.report.sanitation.skipped_points, 1);
    assert_eq!(outcome.report.sanitation.skipped_tasks, 1);
    assert_eq!(outcome.dataset.data_points.len(), 1);

    let point: &DataPoint = &outcome.dataset.data_points[0];
    assert_eq!(point.task_count, 1);
    assert!((point.demand_hours - 5.0).abs() < f64::EPSILON);
}

#[test]
fn test_requests_use_camel_case_field_names() {
    let request: TogglePreferredStaffRequest =
        serde_json::from_str(r#"{ "staffId": "A" }"#).unwrap();
    assert_eq!(request.staff_id, "A");

    let range: MonthRangeRequest = serde_json::from_str(r#"{ "start": -1, "end": 4 }"#).unwrap();
    assert_eq!(MonthRange::from(range), MonthRange::new(-1, 4));
}

#[test]
fn test_matrix_response_serializes_for_the_view() {
    let clock: Arc<ManualClock> = create_test_clock();
    let mut controller: DemandMatrixController = create_loaded_controller(&clock);

    let value: serde_json::Value = serde_json::to_value(controller.matrix()).unwrap();

    assert_eq!(value["dataset"]["dataPoints"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["controls"]["phase"], "initialized");
    assert_eq!(value["controls"]["isAllSkillsSelected"], true);
    assert_eq!(
        value["controls"]["selection"]["preferredStaffFilterMode"],
        "all"
    );
    assert_eq!(value["report"]["usedFallback"], false);
    assert_eq!(value["cache"]["misses"], 1);
}
