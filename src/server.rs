//! HTTP transport for the query service.
//!
//! A thin axum wrapper that maps request paths onto [`QueryKind`]s and
//! returns plain-text bodies. Every query answer is `200 OK`, the one
//! exception being a dictionary that cannot be read (`500`). Each request
//! runs on its own task and the service call itself runs on the blocking
//! pool, so a slow first load never stalls queries on cached dictionaries.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Query as QueryParams, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::error::{MinidicError, Result};
use crate::query::{QueryKind, QueryService};

/// Path that stops the server when remote shutdown is enabled.
pub const SHUTDOWN_PATH: &str = "/terminar";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether a request to [`SHUTDOWN_PATH`] stops the server.
    pub allow_shutdown: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allow_shutdown: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct ServerState {
    service: QueryService,
    allow_shutdown: bool,
    shutdown: Arc<Notify>,
}

impl ServerState {
    pub fn new(service: QueryService, allow_shutdown: bool) -> Self {
        ServerState {
            service,
            allow_shutdown,
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn service(&self) -> &QueryService {
        &self.service
    }

    /// Resolves once a shutdown has been requested over HTTP.
    pub async fn shutdown_requested(&self) {
        self.shutdown.notified().await;
    }
}

/// A transport-level answer: status code plus plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    fn ok(body: String) -> Self {
        Reply {
            status: StatusCode::OK,
            body,
        }
    }

    fn status(status: StatusCode, body: &str) -> Self {
        Reply {
            status,
            body: body.to_string(),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (
            self.status,
            [
                (header::CONTENT_TYPE, TEXT_PLAIN),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            self.body,
        )
            .into_response()
    }
}

/// Answer a request for `path` with query `params`.
pub async fn reply(state: &ServerState, path: &str, params: HashMap<String, String>) -> Reply {
    debug!("Request: {path} {params:?}");

    if path.contains("../") {
        return Reply::status(StatusCode::BAD_REQUEST, "Invalid request");
    }

    if path == SHUTDOWN_PATH {
        if state.allow_shutdown {
            info!("Shutdown requested");
            state.shutdown.notify_one();
            return Reply::ok(String::new());
        }
        return Reply::status(StatusCode::NOT_FOUND, "Not found");
    }

    let Some(kind) = QueryKind::from_path(path) else {
        return Reply::status(StatusCode::NOT_FOUND, "Not found");
    };

    let service = state.service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.respond(kind, &params)).await;

    match outcome {
        Ok(Ok(body)) => Reply::ok(body),
        Ok(Err(err)) => error_reply(kind, err),
        Err(join_err) => {
            error!("Query task failed: {join_err}");
            Reply::status(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn error_reply(kind: QueryKind, err: MinidicError) -> Reply {
    if err.is_server_error() {
        error!("{kind:?} query failed: {err}");
        Reply {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: err.to_string(),
        }
    } else {
        warn!("{kind:?} query answered empty: {err}");
        Reply::ok(String::new())
    }
}

/// Collapse repeated query parameters, keeping the first value of each.
pub fn first_values(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut params = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    params
}

async fn handle(
    State(state): State<ServerState>,
    uri: Uri,
    QueryParams(pairs): QueryParams<Vec<(String, String)>>,
) -> Reply {
    reply(&state, uri.path(), first_values(pairs)).await
}

/// Build the router serving every query path.
pub fn router(state: ServerState) -> Router {
    Router::new().fallback(handle).with_state(state)
}

/// Bind and serve until Ctrl-C or, when enabled, a shutdown request.
pub async fn serve(config: &ServerConfig, service: QueryService) -> Result<()> {
    let state = ServerState::new(service, config.allow_shutdown);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let local_addr: SocketAddr = listener.local_addr()?;

    info!("minidic serving on http://{local_addr}/");

    let app = router(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    info!("minidic stopped");
    Ok(())
}

async fn shutdown_signal(state: ServerState) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl-C: {e}");
            }
        }
        _ = state.shutdown_requested() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::StoreConfig;
    use crate::storage::memory::MemoryStorage;

    fn state(allow_shutdown: bool) -> ServerState {
        let storage = MemoryStorage::new_default();
        storage.put("f.csv", "apple\tfruit\nbanana\tfruit\ncherry\tfruit\n");
        let service = QueryService::from_storage(Arc::new(storage), StoreConfig::default());
        ServerState::new(service, allow_shutdown)
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(!config.allow_shutdown);
    }

    #[tokio::test]
    async fn test_rejects_parent_paths() {
        let reply = reply(&state(false), "/../secret", HashMap::new()).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let reply = reply(&state(false), "/index.html", HashMap::new()).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shutdown_disabled_by_default() {
        let reply = reply(&state(false), SHUTDOWN_PATH, HashMap::new()).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shutdown_request_notifies() {
        let state = state(true);
        let reply = reply(&state, SHUTDOWN_PATH, HashMap::new()).await;
        assert_eq!(reply.status, StatusCode::OK);

        tokio::time::timeout(std::time::Duration::from_secs(1), state.shutdown_requested())
            .await
            .unwrap();
    }

    #[test]
    fn test_repeated_parameters_keep_first_value() {
        let params = first_values(vec![
            ("dic".to_string(), "a.csv".to_string()),
            ("inicio".to_string(), "0".to_string()),
            ("dic".to_string(), "b.csv".to_string()),
        ]);

        assert_eq!(params.len(), 2);
        assert_eq!(params["dic"], "a.csv");
        assert_eq!(params["inicio"], "0");
    }

    #[tokio::test]
    async fn test_reply_into_response_headers() {
        let response = Reply::ok("3".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], TEXT_PLAIN);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
