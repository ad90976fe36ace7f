//! Core of the Shikshak Saarathi lesson plan generator.
//!
//! ```text
//! RequestController --validate--> GenerationRequest
//!     |
//!     v
//! GenerationClient --prompt + schema--> dyn GenerationBackend (Gemini)
//!     |
//!     v
//! decode_lesson_plan --> LessonPlan --> render::render_page
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod controller;
pub mod prompt;
pub mod render;
pub mod request;
pub mod schema;

pub use backend::{BackendError, BackendRequest, BackendResponse, GenerationBackend};
pub use client::{GenerationClient, GenerationError};
pub use config::{ConfigError, GenerationConfig};
pub use controller::{ControllerSnapshot, RequestController, RequestPhase, SubmitOutcome};
pub use render::{render_document, render_page, render_plan};
pub use request::{GenerationRequest, PlanForm, ValidationError};
pub use schema::{
    AssessmentPlan, BasicInfo, ClassLevel, Difficulty, LessonPlan, PeriodPlan, PlanDecodeError,
    decode_lesson_plan, lesson_plan_response_schema,
};
