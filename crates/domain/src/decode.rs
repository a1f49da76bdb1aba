// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lenient decoding of fetch-layer payloads.
//!
//! A malformed field degrades to a value the pipeline sanitation and the
//! structure diagnostics recognize, instead of rejecting the whole dataset:
//!
//! - hours that are null or not numbers decode as `NaN`
//! - counts that are not non-negative integers decode as `0`
//! - a list that is null or not an array decodes as empty
//! - list entries that fail to decode are skipped
//!
//! Every degradation is logged as a warning.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Default for a task's hours when the field is absent.
pub(crate) const fn missing_hours() -> f64 {
    f64::NAN
}

/// Decodes an hours field. Anything but a JSON number becomes `NaN`.
pub(crate) fn hours<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Value::deserialize(deserializer)?;
    if let Some(number) = value.as_f64() {
        return Ok(number);
    }

    warn!(found = %value, "Non-numeric hours decoded as NaN");
    Ok(f64::NAN)
}

/// Decodes a count field. Anything but a non-negative integer becomes `0`.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Value::deserialize(deserializer)?;
    if let Some(number) = value.as_u64().and_then(|n| usize::try_from(n).ok()) {
        return Ok(number);
    }

    warn!(found = %value, "Invalid count decoded as 0");
    Ok(0)
}

/// Decodes a task breakdown, skipping tasks that fail to decode.
pub(crate) fn task_breakdown<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Value = Value::deserialize(deserializer)?;
    Ok(decode_each(value, "task"))
}

/// Decodes the data point list, skipping points that fail to decode.
pub(crate) fn data_points<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value: Value = Value::deserialize(deserializer)?;
    Ok(decode_each(value, "data point"))
}

fn decode_each<T: DeserializeOwned>(value: Value, kind: &'static str) -> Vec<T> {
    let elements: Vec<Value> = match value {
        Value::Array(elements) => elements,
        other => {
            warn!(kind, found = %other, "Expected a list, decoded as empty");
            return Vec::new();
        }
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value::<T>(element) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!(kind, index, error = %err, "Skipping malformed entry");
                None
            }
        })
        .collect()
}
