//! Request controller: form state plus the lifecycle of one generation.
//!
//! The controller is the single slot that holds the current form values,
//! plan and error message. It allows at most one outstanding generation;
//! submissions that arrive while one is in flight are ignored.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use crate::client::GenerationClient;
use crate::request::{GenerationRequest, PlanForm, ValidationError};
use crate::schema::LessonPlan;

/// Banner text for every generation failure, whatever the cause.
pub const FAILURE_MESSAGE: &str = "Failed to generate plan. Please try again.";

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of the current request.
///
/// ```text
/// idle       -> validating
/// succeeded  -> validating
/// failed     -> validating
/// validating -> idle        (required field missing)
/// validating -> generating
/// generating -> succeeded
/// generating -> failed
/// generating -> idle        (submit future dropped before completion)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    #[default]
    Idle,
    Validating,
    Generating,
    Succeeded,
    Failed,
}

impl RequestPhase {
    /// Whether `from -> to` is an edge in the phase graph.
    pub fn is_valid_transition(from: RequestPhase, to: RequestPhase) -> bool {
        use RequestPhase::*;
        matches!(
            (from, to),
            (Idle, Validating)
                | (Succeeded, Validating)
                | (Failed, Validating)
                | (Validating, Idle)
                | (Validating, Generating)
                | (Generating, Succeeded)
                | (Generating, Failed)
                | (Generating, Idle)
        )
    }

    /// True while a submission is being processed. `Validating` never
    /// outlives the state lock, so observers only see `Generating`.
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Generating | Self::Validating)
    }
}

// ---------------------------------------------------------------------------
// Snapshot / outcome
// ---------------------------------------------------------------------------

/// Point-in-time copy of the controller state, for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub form: PlanForm,
    pub phase: RequestPhase,
    pub loading: bool,
    pub plan: Option<LessonPlan>,
    pub error: Option<String>,
}

/// What happened to a submission.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// A required field was blank; nothing was sent.
    Rejected {
        #[serde(serialize_with = "serialize_display")]
        error: ValidationError,
    },
    /// Another generation was in flight; the submission was dropped.
    Ignored,
    Succeeded,
    Failed,
    /// The request was settled elsewhere before its result arrived; the
    /// result was discarded.
    Superseded,
}

fn serialize_display<S: serde::Serializer>(
    err: &ValidationError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ControllerState {
    form: PlanForm,
    phase: RequestPhase,
    plan: Option<LessonPlan>,
    error: Option<String>,
    /// Sequence number of the most recently dispatched request.
    sequence: u64,
}

impl ControllerState {
    fn set_phase(&mut self, to: RequestPhase) {
        debug_assert!(
            RequestPhase::is_valid_transition(self.phase, to),
            "invalid phase transition {:?} -> {:?}",
            self.phase,
            to
        );
        tracing::debug!(from = ?self.phase, to = ?to, sequence = self.sequence, "request phase");
        self.phase = to;
    }
}

/// Owns the form state and drives [`GenerationClient`].
///
/// The state lock is never held across an `.await`.
pub struct RequestController {
    client: GenerationClient,
    state: Mutex<ControllerState>,
}

impl RequestController {
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            state: Mutex::new(ControllerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ControllerSnapshot {
        let st = self.lock();
        ControllerSnapshot {
            form: st.form.clone(),
            phase: st.phase,
            loading: st.phase.is_loading(),
            plan: st.plan.clone(),
            error: st.error.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lock().phase.is_loading()
    }

    /// Submit the form.
    ///
    /// Validates synchronously; on success makes exactly one backend call
    /// and awaits it to completion. Returns [`SubmitOutcome::Ignored`]
    /// without touching any state if a generation is already in flight.
    pub async fn submit(&self, form: PlanForm) -> SubmitOutcome {
        let (request, sequence) = {
            let mut st = self.lock();
            if st.phase.is_loading() {
                tracing::info!(
                    sequence = st.sequence,
                    "submission ignored: generation already in flight"
                );
                return SubmitOutcome::Ignored;
            }

            st.form = form;
            st.set_phase(RequestPhase::Validating);

            match GenerationRequest::try_from(&st.form) {
                Err(error) => {
                    tracing::info!(%error, "submission rejected");
                    st.error = Some(error.user_message().to_owned());
                    st.set_phase(RequestPhase::Idle);
                    return SubmitOutcome::Rejected { error };
                }
                Ok(request) => {
                    st.sequence += 1;
                    st.error = None;
                    st.set_phase(RequestPhase::Generating);
                    (request, st.sequence)
                }
            }
        };

        let mut in_flight = InFlight {
            controller: self,
            sequence,
            settled: false,
        };
        let result = self.client.generate(&request).await;
        in_flight.settled = true;

        let mut st = self.lock();
        if st.sequence != sequence || st.phase != RequestPhase::Generating {
            tracing::warn!(
                sequence,
                latest = st.sequence,
                "discarding result of settled request"
            );
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok(plan) => {
                st.plan = Some(plan);
                st.error = None;
                st.set_phase(RequestPhase::Succeeded);
                SubmitOutcome::Succeeded
            }
            Err(error) => {
                tracing::warn!(%error, sequence, "lesson plan generation failed");
                st.error = Some(FAILURE_MESSAGE.to_owned());
                st.set_phase(RequestPhase::Failed);
                SubmitOutcome::Failed
            }
        }
    }
}

/// Settles the controller if a `submit` future is dropped mid-flight.
struct InFlight<'a> {
    controller: &'a RequestController,
    sequence: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut st = self.controller.lock();
        if st.sequence == self.sequence && st.phase == RequestPhase::Generating {
            st.set_phase(RequestPhase::Idle);
            tracing::info!(sequence = self.sequence, "submission dropped before completion");
        }
    }
}
