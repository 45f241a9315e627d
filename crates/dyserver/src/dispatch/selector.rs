//! Response-set selection.

use super::condition::condition_matches;
use super::request::RequestView;
use crate::model::{MethodConfig, ResponseMode, ResponseSet};
use rand::Rng;
use std::fmt;

/// Why a response set was (or was not) chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionReason {
    /// Uniform draw in random mode
    Random,
    /// First matching condition in conditional mode
    Condition { key: String, value: String },
    /// The configured active response set
    Active,
    /// First declared response set
    FirstDeclared,
    /// No response sets are declared
    Unavailable,
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionReason::Random => f.write_str("random"),
            SelectionReason::Condition { key, value } => write!(f, "condition:{key}={value}"),
            SelectionReason::Active => f.write_str("default"),
            SelectionReason::FirstDeclared => f.write_str("fallback"),
            SelectionReason::Unavailable => f.write_str("none"),
        }
    }
}

/// Outcome of [`select`]
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub response_set: Option<&'a ResponseSet>,
    pub reason: SelectionReason,
}

impl<'a> Selection<'a> {
    fn chosen(response_set: &'a ResponseSet, reason: SelectionReason) -> Self {
        Self {
            response_set: Some(response_set),
            reason,
        }
    }
}

/// Choose the response set for a request.
///
/// Precedence: random draw (random mode) -> first matching condition whose
/// target set exists (conditional mode) -> active set -> first declared set.
/// Only an empty `response_sets` yields no selection. `rng` is only consulted
/// in random mode.
pub fn select<'a, R: Rng + ?Sized>(
    config: &'a MethodConfig,
    view: &RequestView,
    rng: &mut R,
) -> Selection<'a> {
    let sets = &config.response_sets;

    if config.mode == ResponseMode::Random && !sets.is_empty() {
        let index = rng.gen_range(0..sets.len());
        return Selection::chosen(&sets[index], SelectionReason::Random);
    }

    if config.mode == ResponseMode::Conditional {
        let matched = config
            .conditions
            .iter()
            .filter(|condition| condition_matches(view, condition))
            .find_map(|condition| {
                config
                    .response_set(&condition.response_set_id)
                    .map(|set| (condition, set))
            });

        if let Some((condition, set)) = matched {
            return Selection::chosen(
                set,
                SelectionReason::Condition {
                    key: condition.key.clone(),
                    value: condition.value.clone(),
                },
            );
        }
    }

    if let Some(set) = config.active_response_set() {
        return Selection::chosen(set, SelectionReason::Active);
    }

    match sets.first() {
        Some(set) => Selection::chosen(set, SelectionReason::FirstDeclared),
        None => Selection {
            response_set: None,
            reason: SelectionReason::Unavailable,
        },
    }
}
