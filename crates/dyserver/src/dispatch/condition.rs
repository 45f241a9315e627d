//! Condition evaluation for conditional mode.

use super::request::RequestView;
use crate::model::{ConditionTarget, ResponseCondition};

/// Whether `condition` holds for the request.
///
/// Exact string equality only. Header and query values are always strings;
/// body values match only when the JSON value is a string equal to
/// `condition.value` (a number `1` never equals `"1"`). Absent keys are false.
pub fn condition_matches(view: &RequestView, condition: &ResponseCondition) -> bool {
    let expected = condition.value.as_str();
    match condition.target {
        ConditionTarget::Header => view.header.get(&condition.key).map(String::as_str) == Some(expected),
        ConditionTarget::Query => view.query.get(&condition.key).map(String::as_str) == Some(expected),
        ConditionTarget::Body => {
            view.body.get(&condition.key).and_then(|v| v.as_str()) == Some(expected)
        }
    }
}
