//! Prompt construction for lesson plan generation.
//!
//! Pure string assembly; the structure of the answer is enforced by the
//! response schema, so the prompt only carries content guidelines.

use crate::request::GenerationRequest;

/// Length of every period, in minutes.
pub const PERIOD_MINUTES: u32 = 40;

/// Content guidelines appended to every prompt.
const GUIDELINES: &str = "Guidelines:
- Use simple, teacher-friendly English.
- Include at least 1 innovative/fun activity per period.
- Ensure all examples are from Indian context (e.g., local environment, daily Indian life, Indian scientists, history, or culture).
- No unnecessary explanations.
- Learning Outcomes: 4-6 short, observable outcomes using action verbs.
- TLM: 3-5 low/no-cost materials.
- Period plans: exactly 40 mins each.
- Period activity: 3-5 lines, clearly mentioning teacher & student roles.
";

/// Build the natural-language instruction sent to the backend.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(&format!(
        "Create a concise but complete 5-6 period lesson plan for an Indian middle school \
         (Class {}) aligned with NEP 2020 and NCTE.\n",
        request.class()
    ));
    prompt.push_str(&format!("Subject: {}\n", request.subject()));
    prompt.push_str(&format!("Topic: {}\n", request.topic()));
    prompt.push_str(&format!("Difficulty: {}\n\n", request.difficulty()));
    prompt.push_str(GUIDELINES);

    prompt
}
