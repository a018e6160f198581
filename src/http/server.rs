//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all upstream handler
//! - Wrap it in the prerender middleware
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully
//! - Forward non-prerendered requests to the upstream application

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{ProxyConfig, ValidationError};
use crate::http::middleware::prerender_middleware;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::matching::PrerenderPolicy;
use crate::observability::metrics;
use crate::prerender::{Prerenderer, TransportError};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid prerender policy: {0}")]
    Policy(#[from] ValidationError),

    #[error("failed to build render transport: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid upstream url `{0}`")]
    Upstream(String),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream_scheme: Scheme,
    pub upstream_authority: Authority,
}

/// HTTP server for the prerender proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server with the default render transport and no hooks.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let policy = PrerenderPolicy::from_config(&config.prerender)?;
        let prerenderer = Prerenderer::new(policy)?;
        Self::with_prerenderer(config, prerenderer)
    }

    /// Create a server around a pre-assembled pipeline (custom transport or hooks).
    pub fn with_prerenderer(
        config: ProxyConfig,
        prerenderer: Prerenderer,
    ) -> Result<Self, ServerError> {
        let upstream: Uri = config
            .upstream
            .url
            .parse()
            .map_err(|_| ServerError::Upstream(config.upstream.url.clone()))?;
        let (Some(scheme), Some(authority)) = (upstream.scheme(), upstream.authority()) else {
            return Err(ServerError::Upstream(config.upstream.url.clone()));
        };

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            client,
            upstream_scheme: scheme.clone(),
            upstream_authority: authority.clone(),
        };

        let router = Self::build_router(&config, state, prerenderer);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState, prerenderer: Prerenderer) -> Router {
        Router::new()
            .route("/{*path}", any(upstream_handler))
            .route("/", any(upstream_handler))
            .with_state(state)
            .layer(from_fn_with_state(prerenderer, prerender_middleware))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires or Ctrl+C is received.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            render_service = %self.config.prerender.service_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Forward a request unchanged to the upstream application.
async fn upstream_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(state.upstream_scheme.clone());
    uri_parts.authority = Some(state.upstream_authority.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot rewrite request URI for upstream");
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        }
    };

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_upstream(response.status().as_u16());
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream error");
            metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16());
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Wait for a shutdown broadcast or Ctrl+C.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = shutdown.recv() => {}
        _ = ctrl_c => {}
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_upstream_without_authority() {
        let mut config = ProxyConfig::default();
        config.upstream.url = "/relative".into();
        let err = HttpServer::new(config).err().unwrap();
        assert!(matches!(err, ServerError::Upstream(_)));
    }

    #[test]
    fn test_rejects_invalid_pattern() {
        let mut config = ProxyConfig::default();
        config.prerender.blacklist = vec!["(".into()];
        let err = HttpServer::new(config).err().unwrap();
        assert!(matches!(err, ServerError::Policy(_)));
    }

    #[tokio::test]
    async fn test_builds_from_defaults() {
        let server = HttpServer::new(ProxyConfig::default()).unwrap();
        assert_eq!(server.config().upstream.url, "http://127.0.0.1:3000");
    }
}
