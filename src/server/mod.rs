use crate::chat::ChatEngine;
use crate::config::Config;
use crate::error::{AskdeskError, Result};
use crate::mailer::Mailer;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// HTTP front end over the chat engine
pub struct HttpServer {
    engine: Arc<ChatEngine>,
    mailer: Option<Arc<Mailer>>,
    config: Config,
}

impl HttpServer {
    /// Wrap an engine for serving. A missing email credential only disables
    /// the form endpoints; chat keeps working.
    pub fn new(engine: Arc<ChatEngine>, config: Config) -> Self {
        let mailer = match Mailer::from_config(&config.email) {
            Ok(m) => Some(Arc::new(m)),
            Err(e) => {
                log::warn!("Email relay disabled: {}", e);
                None
            }
        };

        Self {
            engine,
            mailer,
            config,
        }
    }

    /// Run the HTTP server until shutdown
    pub async fn run(&self) -> Result<()> {
        let app = self.create_router();

        let addr = format!("0.0.0.0:{}", self.config.http_server.port);
        log::info!("Starting HTTP server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            AskdeskError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!("failed to bind to {}: {}", addr, e),
            ))
        })?;

        axum::serve(listener, app).await.map_err(|e| {
            AskdeskError::Io(std::io::Error::other(format!("HTTP server error: {}", e)))
        })?;

        Ok(())
    }

    /// Create the axum router
    fn create_router(&self) -> Router {
        let allowed_origins = &self.config.http_server.allowed_origins;

        // Allow all origins when nothing is configured (local dev), otherwise
        // restrict preflight responses to the configured list
        let cors = if allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/api/chat", post(handle_chat))
            .route("/api/initialize", post(handle_initialize))
            .route("/api/contact_company", post(handle_contact))
            .route("/api/schedule_meeting", post(handle_schedule))
            .route("/api/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
            .with_state(AppState {
                engine: Arc::clone(&self.engine),
                mailer: self.mailer.clone(),
            })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    engine: Arc<ChatEngine>,
    mailer: Option<Arc<Mailer>>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContactForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct MeetingForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    preferred_date: String,
    #[serde(default)]
    meeting_purpose: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}

/// Reject forms with any blank field; field order fixes the reported name
fn first_missing_field<'a>(fields: &[(&'a str, &str)]) -> Option<&'a str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}

async fn handle_chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    if request.message.trim().is_empty() {
        return bad_request("message is required");
    }

    let envelope = state.engine.query(&request.message).await;
    (StatusCode::OK, Json(envelope)).into_response()
}

async fn handle_initialize(State(state): State<AppState>) -> Response {
    match state.engine.initialize_documents().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "System initialized successfully"})),
        )
            .into_response(),
        Err(e) => {
            log::error!("Initialization failed: {}", e);
            internal_error(e.to_string())
        }
    }
}

async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({"status": "healthy"})),
    )
        .into_response()
}

async fn handle_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Response {
    if let Some(field) = first_missing_field(&[
        ("name", &form.name),
        ("email", &form.email),
        ("phone", &form.phone),
        ("message", &form.message),
    ]) {
        return bad_request(&format!("{} is required", field));
    }

    let body = format!(
        "New contact request\n\nName: {}\nEmail: {}\nPhone: {}\n\nMessage:\n{}",
        form.name.trim(),
        form.email.trim(),
        form.phone.trim(),
        form.message.trim()
    );

    relay(&state, "New Contact Request", &body).await
}

async fn handle_schedule(
    State(state): State<AppState>,
    Json(form): Json<MeetingForm>,
) -> Response {
    if let Some(field) = first_missing_field(&[
        ("name", &form.name),
        ("email", &form.email),
        ("phone", &form.phone),
        ("preferred_date", &form.preferred_date),
        ("meeting_purpose", &form.meeting_purpose),
    ]) {
        return bad_request(&format!("{} is required", field));
    }

    let body = format!(
        "New meeting request\n\nName: {}\nEmail: {}\nPhone: {}\nPreferred date: {}\n\nPurpose:\n{}",
        form.name.trim(),
        form.email.trim(),
        form.phone.trim(),
        form.preferred_date.trim(),
        form.meeting_purpose.trim()
    );

    relay(&state, "New Meeting Request", &body).await
}

async fn relay(state: &AppState, subject: &str, body: &str) -> Response {
    let Some(mailer) = &state.mailer else {
        return internal_error("email relay not configured".to_string());
    };

    match mailer.send(subject, body).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "Request sent successfully"})),
        )
            .into_response(),
        Err(e) => {
            log::error!("Email relay failed: {}", e);
            internal_error("failed to send request".to_string())
        }
    }
}
