//! RPC server setup.
//!
//! # Responsibilities
//! - Create the Axum Router for the provider RPC surface
//! - Wire up middleware (request ID, tracing)
//! - Dispatch provider calls and map failures to status codes
//! - Stop on the shared shutdown signal, draining in-flight calls
//!
//! # Routes
//! - `GET /health` → `SERVING`
//! - `POST /plugin.Controller/Shutdown` → orderly stop requested by the orchestrator
//! - `POST /provider/{method}` → JSON params in, JSON response out; unknown
//!   methods answer 404 with the supported method list

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::provider::{self, DispatchError, Provider};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub shutdown: Shutdown,
}

/// RPC server for one provider handle.
pub struct RpcServer {
    router: Router,
    shutdown: Shutdown,
}

impl RpcServer {
    /// Create a new RPC server dispatching into `provider`.
    pub fn new(provider: Arc<dyn Provider>, shutdown: Shutdown) -> Self {
        let state = AppState {
            provider,
            shutdown: shutdown.clone(),
        };
        Self {
            router: Self::build_router(state),
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/plugin.Controller/Shutdown", post(controller_shutdown))
            .route("/provider/{method}", post(provider_rpc))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Router without a listener, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until the shutdown signal fires.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "RPC server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(self.shutdown.wait())
            .await?;

        tracing::info!("RPC server stopped");
        Ok(())
    }
}

async fn health() -> &'static str {
    "SERVING"
}

async fn controller_shutdown(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    tracing::info!(request_id = %request_id(&headers), "Shutdown requested by orchestrator");
    state.shutdown.trigger();
    Json(json!({}))
}

async fn provider_rpc(
    State(state): State<AppState>,
    Path(method): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    tracing::debug!(request_id = %request_id, method = %method, "Provider RPC");

    let params = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(request_id = %request_id, method = %method, error = %e, "Malformed RPC body");
                metrics::record_rpc(&method, false, start_time);
                return error_response(StatusCode::BAD_REQUEST, e.to_string());
            }
        }
    };

    match provider::dispatch(state.provider.as_ref(), &method, params).await {
        Ok(value) => {
            metrics::record_rpc(&method, true, start_time);
            Json(value).into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, method = %method, error = %e, "Provider RPC failed");
            metrics::record_rpc(&method, false, start_time);
            match e {
                DispatchError::UnknownMethod(_) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": e.to_string(), "methods": provider::METHODS })),
                )
                    .into_response(),
                DispatchError::InvalidParams { .. } => {
                    error_response(StatusCode::BAD_REQUEST, e.to_string())
                }
                DispatchError::Encode { .. } => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            }
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
