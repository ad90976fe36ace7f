use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Datelike;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use saarathi_core::render::render_page;
use saarathi_core::{
    ControllerSnapshot, PlanForm, RequestController, SubmitOutcome, lesson_plan_response_schema,
};

type SharedController = Arc<RequestController>;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub outcome: SubmitOutcome,
    pub state: ControllerSnapshot,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(controller: SharedController) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate_form))
        .route("/api/state", get(state))
        .route("/api/generate", post(generate_json))
        .route("/api/schema", get(schema))
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .with_state(controller)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(controller: SharedController, bind: &str, port: u16) -> Result<()> {
    let app = build_router(controller);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("saarathi serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("saarathi serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(controller): State<SharedController>) -> Html<String> {
    let year = chrono::Local::now().year();
    Html(render_page(&controller.snapshot(), year))
}

/// Browser form submit. Waits for the generation to settle, then sends the
/// browser back to the page.
async fn generate_form(
    State(controller): State<SharedController>,
    Form(form): Form<PlanForm>,
) -> Redirect {
    let outcome = controller.submit(form).await;
    tracing::debug!(?outcome, "form submission settled");
    Redirect::to("/")
}

async fn state(State(controller): State<SharedController>) -> Json<ControllerSnapshot> {
    Json(controller.snapshot())
}

async fn generate_json(
    State(controller): State<SharedController>,
    payload: Result<Json<PlanForm>, JsonRejection>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let Json(form) = payload?;
    let outcome = controller.submit(form).await;
    let status = match outcome {
        SubmitOutcome::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Ignored => StatusCode::CONFLICT,
        _ => StatusCode::OK,
    };
    let state = controller.snapshot();
    Ok((status, Json(GenerateResponse { outcome, state })))
}

async fn schema() -> Json<serde_json::Value> {
    Json(lesson_plan_response_schema())
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use saarathi_test_utils::{FakeBackend, controller_with, sample_plan_json};

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn router(backend: Arc<FakeBackend>) -> axum::Router {
        super::build_router(Arc::new(controller_with(backend)))
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(
        app: axum::Router,
        uri: &str,
        body: serde_json::Value,
    ) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    fn valid_form() -> serde_json::Value {
        serde_json::json!({
            "class": "7",
            "subject": "Science",
            "topic": "Photosynthesis",
            "difficulty": "average"
        })
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_returns_html() {
        let resp = get(router(Arc::new(FakeBackend::new())), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap()
            .to_owned();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );
        let html = body_text(resp).await;
        assert!(html.contains("Your lesson plan will appear here"));
    }

    #[tokio::test]
    async fn test_healthz() {
        let resp = get(router(Arc::new(FakeBackend::new())), "/healthz").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "ok");
    }

    #[tokio::test]
    async fn test_schema_endpoint() {
        let resp = get(router(Arc::new(FakeBackend::new())), "/api/schema").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, saarathi_core::lesson_plan_response_schema());
    }

    #[tokio::test]
    async fn test_initial_state() {
        let resp = get(router(Arc::new(FakeBackend::new())), "/api/state").await;
        let json = body_json(resp).await;
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["loading"], false);
        assert!(json["plan"].is_null());
        assert!(json["error"].is_null());
    }

    #[tokio::test]
    async fn test_api_generate_success() {
        let backend = Arc::new(FakeBackend::new());
        backend.push_plan(&sample_plan_json(6));
        let app = router(backend.clone());

        let resp = post_json(app, "/api/generate", valid_form()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["outcome"], "succeeded");
        assert_eq!(json["state"]["phase"], "succeeded");
        assert_eq!(
            json["state"]["plan"]["periods"].as_array().map(Vec::len),
            Some(6)
        );
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_api_generate_rejects_blank_subject() {
        let backend = Arc::new(FakeBackend::new());
        let app = router(backend.clone());
        let mut form = valid_form();
        form["subject"] = serde_json::json!("");

        let resp = post_json(app, "/api/generate", form).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["state"]["error"], "Please fill in both Subject and Topic.");
        assert_eq!(json["state"]["loading"], false);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_generate_failure_message() {
        let backend = Arc::new(FakeBackend::new());
        backend.push_text(Some("{}"));
        let app = router(backend);

        let resp = post_json(app, "/api/generate", valid_form()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["outcome"], "failed");
        assert_eq!(
            json["state"]["error"],
            "Failed to generate plan. Please try again."
        );
        assert_eq!(json["state"]["form"]["topic"], "Photosynthesis");
    }

    #[tokio::test]
    async fn test_api_generate_bad_json_is_client_error() {
        let app = router(Arc::new(FakeBackend::new()));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
        let json = body_json(resp).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_form_post_redirects_and_page_shows_plan() {
        let backend = Arc::new(FakeBackend::new());
        backend.push_plan(&sample_plan_json(6));
        let app = router(backend);

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "class=7&subject=Science&topic=Photosynthesis&difficulty=below+basic",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");

        let html = body_text(get(app, "/").await).await;
        assert!(html.contains("Periods: 6 (40 min each)"));
        assert!(html.contains("value=\"below basic\" selected"));
    }
}
