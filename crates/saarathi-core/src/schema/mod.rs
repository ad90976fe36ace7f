//! Lesson plan schema: the typed plan, the enums shared with the form, the
//! explicit decoder, and the response schema declared to the backend.

mod decode;
mod response_schema;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use decode::{PlanDecodeError, decode_lesson_plan};
pub use response_schema::lesson_plan_response_schema;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Middle-school grade the plan is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassLevel {
    #[default]
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
}

impl ClassLevel {
    pub const ALL: [ClassLevel; 3] = [Self::Six, Self::Seven, Self::Eight];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
        }
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLevel {
    type Err = ClassLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "6" => Ok(Self::Six),
            "7" => Ok(Self::Seven),
            "8" => Ok(Self::Eight),
            other => Err(ClassLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ClassLevel`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid class level: {0:?} (expected 6, 7, or 8)")]
pub struct ClassLevelParseError(pub String);

// ---------------------------------------------------------------------------

/// Ability level of the class the plan targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "below basic")]
    BelowBasic,
    #[default]
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "advanced")]
    Advanced,
    #[serde(rename = "mixed")]
    Mixed,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::BelowBasic, Self::Average, Self::Advanced, Self::Mixed];

    /// Wire value, also used in the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BelowBasic => "below basic",
            Self::Average => "average",
            Self::Advanced => "advanced",
            Self::Mixed => "mixed",
        }
    }

    /// Label shown in the difficulty dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BelowBasic => "Below Basic",
            Self::Average => "Average (Standard)",
            Self::Advanced => "Advanced",
            Self::Mixed => "Mixed Ability",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "below basic" | "below-basic" | "below_basic" => Ok(Self::BelowBasic),
            "average" => Ok(Self::Average),
            "advanced" => Ok(Self::Advanced),
            "mixed" => Ok(Self::Mixed),
            other => Err(DifficultyParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Difficulty`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid difficulty: {0:?} (expected below basic, average, advanced, or mixed)")]
pub struct DifficultyParseError(pub String);

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A generated lesson plan, exactly as the backend returned it.
///
/// Every field is required on the wire; see [`decode_lesson_plan`] for the
/// checks applied on top of the field-level decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub basic_info: BasicInfo,
    pub learning_outcomes: Vec<String>,
    /// Teaching-learning materials.
    pub tlm: Vec<String>,
    pub periods: Vec<PeriodPlan>,
    pub assessment_plan: AssessmentPlan,
    pub teacher_reflection: Vec<String>,
}

/// Metadata echoing the request plus the number of periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub class: String,
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(deserialize_with = "decode::whole_number")]
    pub total_periods: u32,
}

/// One 40-minute class period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPlan {
    /// 1-based period number.
    #[serde(deserialize_with = "decode::whole_number")]
    pub period: u32,
    pub objective: String,
    pub activity: String,
    /// Short formative question asked at the end of the period.
    pub quick_check: String,
    pub homework: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPlan {
    pub ongoing: Vec<String>,
    pub summative: String,
}
