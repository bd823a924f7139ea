//! Budgetwise Web Server
//!
//! Axum-based JSON API for the Budgetwise financial assistant.
//!
//! - Expense sheets live in in-memory sessions that expire when idle
//! - Prompt compilation works without an advice provider; advice requests
//!   return 503 until one is configured
//! - Restrictive CORS policy and sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use budgetwise_core::{
    AIClient, AdviceBackend, Advisor, AdvisorConfig, Error as CoreError, PromptCompiler,
    PromptLibrary,
};

mod handlers;
mod scheduler;
pub mod sessions;

pub use scheduler::start_session_sweeper;
pub use sessions::{SessionManager, SessionView};

/// Shared application state
pub struct AppState {
    pub config: AdvisorConfig,
    /// Prompt templates (user overrides are read once at startup)
    pub compiler: PromptCompiler,
    /// `None` when no advice provider is configured
    pub advisor: Option<Advisor>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(config: AdvisorConfig, ai: Option<AIClient>, compiler: PromptCompiler) -> Self {
        let advisor = ai.map(|client| Advisor::with_compiler(client, compiler.clone()));
        let sessions = Arc::new(SessionManager::new(config.server.session_timeout()));
        Self {
            config,
            compiler,
            advisor,
            sessions,
        }
    }
}

/// Templates from the prompt library, falling back to the built-in ones
fn load_compiler() -> PromptCompiler {
    let mut library = PromptLibrary::new();
    PromptCompiler::from_library(&mut library).unwrap_or_else(|e| {
        warn!("Failed to load prompt overrides, using defaults: {}", e);
        PromptCompiler::embedded()
    })
}

/// Create the application router
pub fn create_router(config: AdvisorConfig, ai: Option<AIClient>) -> Router {
    create_router_with_state(Arc::new(AppState::new(config, ai, load_compiler())))
}

/// Create the application router around existing state (for testing)
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    match state.advisor {
        Some(ref advisor) => info!(
            "Advice provider configured: {} ({})",
            advisor.client().backend_name(),
            advisor.client().model()
        ),
        None => info!("ℹ️  Advice provider not configured (set GOOGLE_API_KEY or AI_BACKEND)"),
    }

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/options", get(handlers::options))
        // Expense sheet sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/expenses", post(handlers::add_expense))
        .route(
            "/sessions/:id/expenses/:entry_id",
            patch(handlers::update_expense).delete(handlers::remove_expense),
        )
        // Budget pipeline
        .route("/import", post(handlers::import_csv))
        .route("/prompt", post(handlers::compile_prompt))
        .route("/advice", post(handlers::request_advice));

    // Restrictive default: only allow same-origin
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server
pub async fn serve(config: AdvisorConfig, ai: Option<AIClient>) -> anyhow::Result<()> {
    check_provider_connection(ai.as_ref()).await;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, ai, load_compiler()));
    start_session_sweeper(state.sessions.clone());

    let app = create_router_with_state(state);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log advice provider connection status
async fn check_provider_connection(ai: Option<&AIClient>) {
    match ai {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "✅ Advice provider connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "⚠️  Advice provider configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("ℹ️  Advice provider not configured; /api/advice will return 503");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        let (status, message) = match err.downcast_ref::<CoreError>() {
            Some(
                e @ (CoreError::Schema { .. } | CoreError::InvalidData(_) | CoreError::Csv(_)),
            ) => (StatusCode::BAD_REQUEST, e.to_string()),
            Some(e @ CoreError::NotFound(_)) => (StatusCode::NOT_FOUND, e.to_string()),
            Some(e @ CoreError::Provider(_)) => (StatusCode::BAD_GATEWAY, e.to_string()),
            // Transport details stay in the log
            Some(CoreError::Http(_)) => (
                StatusCode::BAD_GATEWAY,
                "Advice provider request failed".to_string(),
            ),
            // Return generic message to client
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            ),
        };

        // Keep full error for logging
        let internal = (status.is_server_error()).then_some(err);

        Self {
            status,
            message,
            internal,
        }
    }
}
