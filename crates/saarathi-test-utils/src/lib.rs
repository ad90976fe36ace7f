//! Shared test utilities for saarathi integration tests.
//!
//! Provides a scripted [`FakeBackend`] that stands in for the hosted model,
//! plus sample forms and plan payloads. The backend records every request
//! it receives and can optionally hold calls in flight until the test
//! releases them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{Notify, Semaphore};

use saarathi_core::backend::{BackendError, BackendRequest, BackendResponse, GenerationBackend};
use saarathi_core::config::GenerationConfig;
use saarathi_core::{ClassLevel, Difficulty, GenerationClient, PlanForm, RequestController};

enum Scripted {
    Text(Option<String>),
    Status { status: u16, body: String },
}

/// Scripted generation backend.
///
/// Responses are served in the order they were pushed. A call with nothing
/// scripted gets an empty response (no text).
#[derive(Default)]
pub struct FakeBackend {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<BackendRequest>>,
    gate: Option<Gate>,
}

/// Handle for a gated [`FakeBackend`]: observe calls arriving and let them
/// complete one at a time.
#[derive(Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
    entered: Arc<Notify>,
}

impl Gate {
    /// Wait until a call has reached the backend.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one held call proceed.
    pub fn release(&self) {
        self.permits.add_permits(1);
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose calls block until [`Gate::release`] is called.
    pub fn gated() -> (Self, Gate) {
        let gate = Gate {
            permits: Arc::new(Semaphore::new(0)),
            entered: Arc::new(Notify::new()),
        };
        let backend = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (backend, gate)
    }

    /// Queue a raw text response (`None` = no text part).
    pub fn push_text(&self, text: Option<&str>) -> &Self {
        self.script(Scripted::Text(text.map(str::to_owned)))
    }

    /// Queue a response whose text is `plan` serialized as JSON.
    pub fn push_plan(&self, plan: &Value) -> &Self {
        self.script(Scripted::Text(Some(plan.to_string())))
    }

    /// Queue an HTTP status failure.
    pub fn push_status_error(&self, status: u16, body: &str) -> &Self {
        self.script(Scripted::Status {
            status,
            body: body.to_owned(),
        })
    }

    fn script(&self, item: Scripted) -> &Self {
        self.responses.lock().unwrap().push_back(item);
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate_content(
        &self,
        request: &BackendRequest,
    ) -> Result<BackendResponse, BackendError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.permits
                .acquire()
                .await
                .expect("fake backend gate closed")
                .forget();
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Text(text)) => Ok(BackendResponse { text }),
            Some(Scripted::Status { status, body }) => Err(BackendError::Status { status, body }),
            None => Ok(BackendResponse::default()),
        }
    }
}

/// Config used by test clients.
pub fn test_config() -> GenerationConfig {
    GenerationConfig::new("test-api-key").with_model("test-model")
}

/// A client over `backend` with [`test_config`].
pub fn client_with(backend: Arc<FakeBackend>) -> GenerationClient {
    GenerationClient::new(backend, &test_config())
}

/// A controller over `backend` with [`test_config`].
pub fn controller_with(backend: Arc<FakeBackend>) -> RequestController {
    RequestController::new(client_with(backend))
}

/// A valid form: Class 7 Science, "Photosynthesis", average difficulty.
pub fn sample_form() -> PlanForm {
    PlanForm {
        class: ClassLevel::Seven,
        subject: "Science".to_owned(),
        topic: "Photosynthesis".to_owned(),
        difficulty: Difficulty::Average,
    }
}

/// A well-formed lesson plan payload with `periods` period entries.
pub fn sample_plan_json(periods: u32) -> Value {
    let period_list: Vec<Value> = (1..=periods)
        .map(|n| {
            json!({
                "period": n,
                "objective": format!("Objective for period {n}"),
                "activity": format!("Group activity for period {n}"),
                "quickCheck": format!("Quick check question {n}?"),
                "homework": format!("Homework for period {n}"),
            })
        })
        .collect();

    json!({
        "basicInfo": {
            "class": "7",
            "subject": "Science",
            "topic": "Photosynthesis",
            "difficulty": "average",
            "totalPeriods": periods,
        },
        "learningOutcomes": [
            "Identifies the raw materials of photosynthesis",
            "Explains the role of chlorophyll",
        ],
        "tlm": ["Potted plant", "Iodine solution", "Chart paper"],
        "periods": period_list,
        "assessmentPlan": {
            "ongoing": ["Observation during group work", "Exit tickets"],
            "summative": "Design an experiment showing that light is needed for starch formation.",
        },
        "teacherReflection": [
            "Which students struggled with the starch test?",
            "Did the group activity engage every learner?",
            "What would I change next time?",
        ],
    })
}
