use serde_json::{Value, json};

use super::Difficulty;

/// Response schema passed to the backend as `generationConfig.responseSchema`.
///
/// Uses the Gemini OpenAPI subset (upper-case type names). Every object lists
/// all of its properties as required so the backend rejects or repairs
/// output that omits one.
pub fn lesson_plan_response_schema() -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "basicInfo": {
                "type": "OBJECT",
                "properties": {
                    "class": { "type": "STRING" },
                    "subject": { "type": "STRING" },
                    "topic": { "type": "STRING" },
                    "difficulty": {
                        "type": "STRING",
                        "format": "enum",
                        "enum": difficulties
                    },
                    "totalPeriods": { "type": "NUMBER" }
                },
                "required": ["class", "subject", "topic", "difficulty", "totalPeriods"]
            },
            "learningOutcomes": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "tlm": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "periods": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "period": { "type": "NUMBER" },
                        "objective": { "type": "STRING" },
                        "activity": { "type": "STRING" },
                        "quickCheck": { "type": "STRING" },
                        "homework": { "type": "STRING" }
                    },
                    "required": ["period", "objective", "activity", "quickCheck", "homework"]
                }
            },
            "assessmentPlan": {
                "type": "OBJECT",
                "properties": {
                    "ongoing": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" }
                    },
                    "summative": { "type": "STRING" }
                },
                "required": ["ongoing", "summative"]
            },
            "teacherReflection": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": [
            "basicInfo",
            "learningOutcomes",
            "tlm",
            "periods",
            "assessmentPlan",
            "teacherReflection"
        ]
    })
}
