//! Forwarding pipeline errors.

use std::fmt;

use thiserror::Error;

/// Boxed error returned by extension hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by a [`RenderTransport`](crate::prerender::RenderTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The render service did not answer within the client timeout.
    #[error("render service timed out")]
    Timeout,

    /// TCP/TLS connection to the render service failed.
    #[error("connection to render service failed: {0}")]
    Connect(String),

    /// The request could not be sent or the response was not valid HTTP.
    #[error("render request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read render response body: {0}")]
    Body(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build render client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Which extension point failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    PreFetch,
    PostFetch,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::PreFetch => f.write_str("pre-fetch"),
            HookStage::PostFetch => f.write_str("post-fetch"),
        }
    }
}

/// A failure that aborts prerendering of the current request.
///
/// The host is expected to fall back to normal handling.
#[derive(Debug, Error)]
pub enum PrerenderError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{stage} hook failed: {source}")]
    Hook {
        stage: HookStage,
        #[source]
        source: BoxError,
    },
}

impl PrerenderError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PrerenderError::Transport(TransportError::Timeout) => "timeout",
            PrerenderError::Transport(_) => "transport",
            PrerenderError::Hook { .. } => "hook",
        }
    }
}
