//! Explicit decoding of backend text into a [`LessonPlan`].
//!
//! The backend is asked to honor the response schema, but nothing on this
//! side of the wire trusts that. Decoding checks:
//! - Every field of the schema is present with the declared type.
//! - `difficulty` is one of the declared members.
//! - Numeric fields are non-negative whole numbers (`6` and `6.0` both pass).
//! - There is at least one period, numbered from 1 and strictly increasing.
//! - `totalPeriods` is positive.
//!
//! The last two go beyond the response schema, which only declares types.
//! A model that numbers periods `1, 1, 2` is rejected as malformed.

use serde::Deserialize;
use serde::de::{Deserializer, Error as _};
use thiserror::Error;

use super::LessonPlan;

/// Errors from decoding a lesson plan payload.
#[derive(Debug, Error)]
pub enum PlanDecodeError {
    #[error("response is not a well-formed lesson plan: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lesson plan has no periods")]
    NoPeriods,

    #[error("totalPeriods must be at least 1, got {0}")]
    InvalidTotalPeriods(u32),

    #[error("period at index {index} has number {period} (periods are numbered from 1)")]
    InvalidPeriodNumber { index: usize, period: u32 },

    #[error("period at index {index} has number {period}, not after previous period {previous}")]
    PeriodOutOfOrder {
        index: usize,
        previous: u32,
        period: u32,
    },
}

/// Decode and validate a lesson plan from the backend's response text.
///
/// The plan is returned exactly as decoded; nothing is trimmed or reordered.
pub fn decode_lesson_plan(text: &str) -> Result<LessonPlan, PlanDecodeError> {
    let plan: LessonPlan = serde_json::from_str(text)?;
    validate(&plan)?;
    Ok(plan)
}

fn validate(plan: &LessonPlan) -> Result<(), PlanDecodeError> {
    if plan.periods.is_empty() {
        return Err(PlanDecodeError::NoPeriods);
    }

    if plan.basic_info.total_periods == 0 {
        return Err(PlanDecodeError::InvalidTotalPeriods(0));
    }

    let mut previous: Option<u32> = None;
    for (index, p) in plan.periods.iter().enumerate() {
        if p.period == 0 {
            return Err(PlanDecodeError::InvalidPeriodNumber { index, period: 0 });
        }
        if let Some(prev) = previous {
            if p.period <= prev {
                return Err(PlanDecodeError::PeriodOutOfOrder {
                    index,
                    previous: prev,
                    period: p.period,
                });
            }
        }
        previous = Some(p.period);
    }

    Ok(())
}

/// Deserialize a JSON number that must be a whole number fitting in `u32`.
///
/// The schema declares these fields as `NUMBER`, so the backend may emit
/// `6.0` where `6` is meant.
pub(super) fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(deserializer)?;

    if let Some(u) = n.as_u64() {
        return u32::try_from(u).map_err(|_| D::Error::custom(format!("{u} is out of range")));
    }

    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => Ok(f as u32),
        _ => Err(D::Error::custom(format!(
            "expected a non-negative whole number, got {n}"
        ))),
    }
}
