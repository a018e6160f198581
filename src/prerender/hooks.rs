//! Pre-fetch and post-fetch extension points.
//!
//! A cache plugs in here: `on_pre_fetch` returns a stored page keyed by URI,
//! `on_post_fetch` persists the fresh one. Each hook runs at most once per
//! request and is awaited inline, so its latency is part of the request.

use async_trait::async_trait;
use axum::http::request::Parts;

use crate::matching::IncomingRequest;
use crate::prerender::error::BoxError;
use crate::prerender::outbound::OutboundRequest;
use crate::prerender::response::RenderedResponse;

/// What a hook gets to see. Everything is borrowed read-only.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionEvent<'a> {
    request: &'a Parts,
    outbound: Option<&'a OutboundRequest>,
    response: Option<&'a RenderedResponse>,
}

impl<'a> ExtensionEvent<'a> {
    pub(crate) fn pre_fetch(request: &'a Parts) -> Self {
        Self {
            request,
            outbound: None,
            response: None,
        }
    }

    pub(crate) fn post_fetch(
        request: &'a Parts,
        outbound: &'a OutboundRequest,
        response: &'a RenderedResponse,
    ) -> Self {
        Self {
            request,
            outbound: Some(outbound),
            response: Some(response),
        }
    }

    /// The original inbound request.
    pub fn request(&self) -> &'a Parts {
        self.request
    }

    /// The inbound URI as received, handy as a cache key.
    pub fn uri(&self) -> String {
        self.request.uri_string()
    }

    /// The request sent to the render service (post-fetch only).
    pub fn outbound(&self) -> Option<&'a OutboundRequest> {
        self.outbound
    }

    /// The render service response (post-fetch only).
    pub fn response(&self) -> Option<&'a RenderedResponse> {
        self.response
    }
}

/// Runs before the outbound fetch.
#[async_trait]
pub trait PreFetchHook: Send + Sync {
    /// Return `Some` to answer the request without contacting the render service.
    async fn on_pre_fetch(
        &self,
        event: &ExtensionEvent<'_>,
    ) -> Result<Option<RenderedResponse>, BoxError>;
}

/// Runs after a successful outbound fetch.
#[async_trait]
pub trait PostFetchHook: Send + Sync {
    /// Return `Some` to replace the fetched response.
    async fn on_post_fetch(
        &self,
        event: &ExtensionEvent<'_>,
    ) -> Result<Option<RenderedResponse>, BoxError>;
}
