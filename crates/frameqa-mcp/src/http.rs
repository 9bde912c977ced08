use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    error::{ToolError, ToolResult},
    request::{self, InboundRequest},
    tools::{self, ToolCall, SERVER_NAME, SERVER_VERSION},
    AppState,
};

const BODY_LIMIT: usize = 50 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/mcp/tools", get(list_tools))
        .route("/mcp", post(mcp))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": SERVER_VERSION,
        "hasToken": state.has_token(),
        "timestamp": Utc::now().to_rfc3339(),
        "endpoints": {
            "health": "/health",
            "tools": "/mcp/tools",
            "mcp": "/mcp",
        },
    }))
}

async fn list_tools() -> Json<Value> {
    Json(tools::tool_list())
}

async fn not_found(method: Method, uri: axum::http::Uri) -> (StatusCode, Json<Value>) {
    info!(%method, path = uri.path(), "no route");
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "availableEndpoints": {
                "health": "GET /health",
                "tools": "GET /mcp/tools",
                "mcp": "POST /mcp",
            },
        })),
    )
}

async fn mcp(State(state): State<AppState>, body: Bytes) -> Result<Response, ToolError> {
    handle_mcp(&state, &body)
        .await
        .inspect_err(|e| warn!(code = e.code(), error = %e, "mcp request failed"))
}

async fn handle_mcp(state: &AppState, body: &[u8]) -> ToolResult<Response> {
    // The token is required for every call, protocol methods included.
    let source = state.source()?;

    let body: Value = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        serde_json::from_slice(body).map_err(|e| ToolError::InvalidFormat {
            message: format!("Request body is not valid JSON: {e}"),
            received_body: Value::Null,
        })?
    };

    match request::parse(&body)? {
        InboundRequest::Notification { method } => {
            info!(method = method.as_deref().unwrap_or(""), "notification acknowledged");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        InboundRequest::Call {
            shape,
            envelope,
            tool,
            args,
        } => {
            info!(?shape, %tool, "tool call");
            let call = ToolCall::parse(&tool, &args)?;
            let result = tools::execute(source, &call).await?;
            Ok(Json(envelope.wrap(result)?).into_response())
        }
    }
}

/// Binds `addr` and serves until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    info!("  GET  /health    - service status");
    info!("  GET  /mcp/tools - tool catalogue");
    info!("  POST /mcp       - tool calls");
    if !state.has_token() {
        warn!("FIGMA_TOKEN is not set; every /mcp call will fail with NO_TOKEN");
    }

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
