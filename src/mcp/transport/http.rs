//! Streamable HTTP transport for the MCP server.
//!
//! # Endpoints
//!
//! - `POST /mcp` — session creation (no `mcp-session-id` header) or
//!   session-routed message handling
//! - `DELETE /mcp` — session termination (the close event)
//! - `POST /sse` — legacy compatibility endpoint; one standalone,
//!   unregistered server per request, no session continuity
//! - `GET /health` — fixed status payload with a current timestamp
//! - anything else — 404
//!
//! # Session lifecycle
//!
//! A session identifier is minted and registered only once a fresh server
//! has successfully handled an `initialize` request; any other first
//! message leaves the server unregistered and the reply carries no session
//! header. Subsequent requests route by the `mcp-session-id` header;
//! unknown identifiers are not-found, never implicitly recreated.

use std::io;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::mcp::protocol::SERVER_NAME;
use crate::mcp::server::{McpServer, Outbound, ServerState};
use crate::mcp::session::{Session, SessionTable};

/// Header correlating HTTP requests to one logical session.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Shared state handed to every request handler. No globals.
#[derive(Clone)]
struct HttpState {
    config: Config,
    sessions: SessionTable,
}

/// Builds the transport router over an explicit session table.
///
/// The table is injected so tests can observe registration and removal.
#[must_use]
pub fn router(config: Config, sessions: SessionTable) -> Router {
    let state = HttpState { config, sessions };

    Router::new()
        .route("/mcp", post(mcp_post).get(mcp_unsupported).delete(mcp_delete))
        .route("/sse", post(sse_post).get(sse_get))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Binds the listener and serves the transport until process termination.
///
/// # Errors
///
/// Returns an error if binding or serving fails.
pub async fn serve(config: Config) -> io::Result<()> {
    let addr = format!("{}:{}", config.bind_host(), config.port);
    let app = router(config.clone(), SessionTable::new());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log_startup(&config);

    axum::serve(listener, app).await
}

/// Logs the post-bind startup banner.
fn log_startup(config: &Config) {
    if config.is_production {
        info!(port = config.port, "{SERVER_NAME} listening");
        return;
    }

    info!("{SERVER_NAME} listening on http://localhost:{}", config.port);
    eprintln!("Put this in your client config:");
    eprintln!(
        "{:#}",
        json!({
            "mcpServers": {
                "nexar": {
                    "url": format!("http://localhost:{}/mcp", config.port)
                }
            }
        })
    );
    eprintln!("For backward compatibility, you can also use the /sse endpoint.");
}

/// Extracts the session identifier header, if present.
fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// `POST /mcp`: route by session, or create a new session.
async fn mcp_post(State(state): State<HttpState>, headers: HeaderMap, body: String) -> Response {
    match session_id(&headers) {
        Some(id) => match state.sessions.get(&id) {
            Some(session) => handle_session_message(&session, &body).await,
            None => (StatusCode::NOT_FOUND, "Session not found").into_response(),
        },
        None => create_session(&state, &body).await,
    }
}

/// Forwards one message to a registered session's server.
async fn handle_session_message(session: &Arc<Session>, body: &str) -> Response {
    let mut server = session.server.lock().await;
    match server.handle_raw(body).await {
        Some(outbound) => (StatusCode::OK, Json(outbound)).into_response(),
        // Notifications get no reply body.
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Creates a server/session pair for a session-less POST.
///
/// Registration fires only on a successful `initialize`; anything else is
/// answered but never registered (the pending-state semantics).
async fn create_session(state: &HttpState, body: &str) -> Response {
    let Ok(mut server) = McpServer::from_config(&state.config) else {
        // Credentials were validated at startup; reaching this means the
        // config was mutated out from under us.
        error!("Failed to construct server instance for new session");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
    };

    let outbound = server.handle_raw(body).await;

    let initialised = server.state() == ServerState::Initialising
        && matches!(outbound, Some(Outbound::Response(_)));

    let Some(outbound) = outbound else {
        return StatusCode::ACCEPTED.into_response();
    };

    if !initialised {
        warn!("First message on a fresh connection was not a valid initialize");
        return (StatusCode::OK, Json(outbound)).into_response();
    }

    let id = Uuid::new_v4().to_string();
    state
        .sessions
        .insert(Arc::new(Session::new(id.clone(), server)));
    info!(session_id = %id, "New Nexar session created");

    let mut response = (StatusCode::OK, Json(outbound)).into_response();
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}

/// `DELETE /mcp`: the transport close event.
async fn mcp_delete(State(state): State<HttpState>, headers: HeaderMap) -> Response {
    let Some(id) = session_id(&headers) else {
        return (StatusCode::BAD_REQUEST, "Invalid request").into_response();
    };

    if state.sessions.remove(&id).is_some() {
        info!(session_id = %id, "Nexar session closed");
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Session not found").into_response()
    }
}

/// `GET /mcp`: not forwarded to the session handler.
///
/// GET opens a standalone server-to-client response stream in the
/// streamable HTTP scheme, and this transport carries every reply inline
/// on the POST that produced it. There is nothing for a stream to deliver,
/// so a known session gets 405 with an `Allow` header naming the verbs
/// that do something; an unknown session is not-found and a header-less
/// request is invalid.
async fn mcp_unsupported(State(state): State<HttpState>, headers: HeaderMap) -> Response {
    match session_id(&headers) {
        Some(id) if state.sessions.get(&id).is_some() => (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST, DELETE")],
            "Method not allowed",
        )
            .into_response(),
        Some(_) => (StatusCode::NOT_FOUND, "Session not found").into_response(),
        None => (StatusCode::BAD_REQUEST, "Invalid request").into_response(),
    }
}

/// `POST /sse`: legacy endpoint, one unregistered server per request.
async fn sse_post(State(state): State<HttpState>, body: String) -> Response {
    let Ok(mut server) = McpServer::from_config(&state.config) else {
        error!("Failed to construct standalone server instance");
        return (StatusCode::INTERNAL_SERVER_ERROR, "SSE connection failed").into_response();
    };

    info!("SSE connection established (using streamable HTTP)");

    match server.handle_raw(&body).await {
        Some(outbound) => (StatusCode::OK, Json(outbound)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// `GET /sse`: streaming is not offered on the compatibility endpoint.
async fn sse_get() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        "Method not allowed",
    )
        .into_response()
}

/// `GET /health`: fixed status payload, independent of session state.
async fn health() -> Response {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

/// Fallback for unrecognised paths.
async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
