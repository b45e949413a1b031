//! Tolerant extraction of update records from free-form model output.
//!
//! The model is asked for a bare JSON array but may wrap it in prose or code
//! fences. The first `[` through the last `]` is taken as the array. Each
//! element is normalized and then deserialized on its own, so one malformed
//! record does not discard the rest.

use pulse_core::{Category, Impact, UpdateRecord};
use serde_json::Value;

use crate::SummaryOutcome;

/// Soft error reported when the input text is empty.
pub const NO_INPUT: &str = "no input";

/// Soft error reported when no JSON array can be read from the response.
pub const PARSE_FAILURE: &str = "parse failure";

/// Slice from the first `[` to the last `]`, if both exist in that order.
#[must_use]
pub fn find_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a model response into an outcome. Never fails; problems are
/// reported through `error` and `dropped`.
#[must_use]
pub fn parse_response(response: &str) -> SummaryOutcome {
    let Some(array) = find_json_array(response) else {
        tracing::error!(raw = %response, "could not locate a JSON array in model response");
        return SummaryOutcome::soft_error(PARSE_FAILURE, Some(response.to_string()));
    };

    let elements: Vec<Value> = match serde_json::from_str(array) {
        Ok(elements) => elements,
        Err(error) => {
            tracing::error!(%error, raw = %response, "model response array is not valid JSON");
            return SummaryOutcome::soft_error(PARSE_FAILURE, Some(response.to_string()));
        }
    };

    let total = elements.len();
    let summaries: Vec<UpdateRecord> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| match record_from_value(element) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(index = idx, %error, "dropping malformed update record");
                None
            }
        })
        .collect();

    SummaryOutcome {
        dropped: total - summaries.len(),
        summaries,
        error: None,
        raw_response: Some(response.to_string()),
    }
}

/// Normalize one array element and deserialize it.
///
/// - `category` is matched case-insensitively; unknown labels become `other`
/// - `impact` is matched case-insensitively; unknown labels are left to fail
/// - missing or `null` `key_points` become `[]`; a lone string becomes `[s]`
fn record_from_value(mut value: Value) -> Result<UpdateRecord, serde_json::Error> {
    if let Value::Object(map) = &mut value {
        let category = map
            .get("category")
            .and_then(Value::as_str)
            .map_or(Category::Other, Category::from_label);
        map.insert("category".into(), Value::String(category.as_str().into()));

        if let Some(Value::String(label)) = map.get_mut("impact")
            && let Some(impact) = Impact::from_label(label)
        {
            *label = impact.as_str().to_string();
        }

        match map.get("key_points") {
            None | Some(Value::Null) => {
                map.insert("key_points".into(), Value::Array(Vec::new()));
            }
            Some(Value::String(point)) => {
                let point = point.clone();
                map.insert("key_points".into(), Value::Array(vec![Value::String(point)]));
            }
            Some(_) => {}
        }
    }
    serde_json::from_value(value)
}
