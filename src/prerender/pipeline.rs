//! Conditional forwarding pipeline.
//!
//! # States (per request)
//! ```text
//! Idle → Classified{Forward | PassThrough}
//!      Forward → PreHookRun → ShortCircuited            (terminal)
//!      Forward → PreHookRun → Fetching → PostHookRun → Forwarded (terminal)
//! ```
//!
//! # Design Decisions
//! - No state survives a request; the pipeline only holds shared, immutable parts
//! - Transport and hook failures propagate; no retries, no synthetic responses
//! - The default transport is constructed once, by the builder

use std::sync::Arc;
use std::time::Instant;

use axum::http::request::Parts;

use crate::matching::{classify, Decision, PrerenderPolicy};
use crate::observability::metrics;
use crate::prerender::error::{HookStage, PrerenderError, TransportError};
use crate::prerender::hooks::{ExtensionEvent, PostFetchHook, PreFetchHook};
use crate::prerender::outbound::OutboundRequest;
use crate::prerender::response::RenderedResponse;
use crate::prerender::transport::{RenderTransport, ReqwestTransport};

/// Result of running a request through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardOutcome {
    /// Answered by the pre-fetch hook; the render service was not contacted.
    ShortCircuited(RenderedResponse),
    /// Fetched from the render service (possibly replaced by the post-fetch hook).
    Forwarded(RenderedResponse),
    /// Not a prerender candidate; continue with normal handling.
    PassThrough,
}

impl ForwardOutcome {
    pub fn into_rendered(self) -> Option<RenderedResponse> {
        match self {
            ForwardOutcome::ShortCircuited(r) | ForwardOutcome::Forwarded(r) => Some(r),
            ForwardOutcome::PassThrough => None,
        }
    }
}

/// Classifier plus forwarding pipeline, shared by all requests.
#[derive(Clone)]
pub struct Prerenderer {
    policy: Arc<PrerenderPolicy>,
    transport: Arc<dyn RenderTransport>,
    pre_fetch: Option<Arc<dyn PreFetchHook>>,
    post_fetch: Option<Arc<dyn PostFetchHook>>,
}

impl std::fmt::Debug for Prerenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prerenderer")
            .field("policy", &self.policy)
            .field("pre_fetch", &self.pre_fetch.is_some())
            .field("post_fetch", &self.post_fetch.is_some())
            .finish_non_exhaustive()
    }
}

impl Prerenderer {
    /// Pipeline with the default transport and no hooks.
    pub fn new(policy: PrerenderPolicy) -> Result<Self, TransportError> {
        Self::builder(policy).build()
    }

    pub fn builder(policy: PrerenderPolicy) -> PrerendererBuilder {
        PrerendererBuilder {
            policy: Arc::new(policy),
            transport: None,
            pre_fetch: None,
            post_fetch: None,
        }
    }

    pub fn policy(&self) -> &PrerenderPolicy {
        &self.policy
    }

    /// Classify a request without side effects.
    pub fn classify(&self, request: &Parts) -> Decision {
        classify(request, &self.policy)
    }

    /// Classify, then forward when the request qualifies.
    pub async fn handle(&self, request: &Parts) -> Result<ForwardOutcome, PrerenderError> {
        let decision = self.classify(request);
        metrics::record_decision(decision);

        if !decision.should_forward() {
            tracing::debug!(
                uri = %request.uri,
                decision = %decision,
                "Not prerendering"
            );
            return Ok(ForwardOutcome::PassThrough);
        }

        self.forward(request).await
    }

    /// Run the pre-fetch hook, outbound fetch and post-fetch hook.
    ///
    /// Callers are expected to have checked the classifier first.
    pub async fn forward(&self, request: &Parts) -> Result<ForwardOutcome, PrerenderError> {
        if let Some(hook) = &self.pre_fetch {
            let event = ExtensionEvent::pre_fetch(request);
            let cached = hook
                .on_pre_fetch(&event)
                .await
                .map_err(|source| PrerenderError::Hook {
                    stage: HookStage::PreFetch,
                    source,
                })?;

            if let Some(response) = cached {
                tracing::debug!(
                    uri = %request.uri,
                    status = %response.status,
                    "Pre-fetch hook answered"
                );
                return Ok(ForwardOutcome::ShortCircuited(response));
            }
        }

        let outbound = OutboundRequest::build(request, &self.policy);
        tracing::debug!(url = %outbound.url, "Fetching prerendered page");

        let start = Instant::now();
        let fetched = self.transport.fetch(&outbound).await;
        metrics::record_fetch(start);
        let fetched = fetched.inspect_err(|e| {
            tracing::warn!(url = %outbound.url, error = %e, "Render service request failed");
        })?;

        tracing::info!(
            url = %outbound.url,
            status = %fetched.status,
            bytes = fetched.body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Prerendered page fetched"
        );

        let Some(hook) = &self.post_fetch else {
            return Ok(ForwardOutcome::Forwarded(fetched));
        };

        let event = ExtensionEvent::post_fetch(request, &outbound, &fetched);
        let replacement = hook
            .on_post_fetch(&event)
            .await
            .map_err(|source| PrerenderError::Hook {
                stage: HookStage::PostFetch,
                source,
            })?;

        Ok(ForwardOutcome::Forwarded(replacement.unwrap_or(fetched)))
    }
}

/// Assembles a [`Prerenderer`] from a policy, an optional transport and hooks.
pub struct PrerendererBuilder {
    policy: Arc<PrerenderPolicy>,
    transport: Option<Arc<dyn RenderTransport>>,
    pre_fetch: Option<Arc<dyn PreFetchHook>>,
    post_fetch: Option<Arc<dyn PostFetchHook>>,
}

impl PrerendererBuilder {
    pub fn transport(mut self, transport: impl RenderTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn pre_fetch(mut self, hook: impl PreFetchHook + 'static) -> Self {
        self.pre_fetch = Some(Arc::new(hook));
        self
    }

    pub fn post_fetch(mut self, hook: impl PostFetchHook + 'static) -> Self {
        self.post_fetch = Some(Arc::new(hook));
        self
    }

    /// Falls back to a [`ReqwestTransport`] built from the policy's client options.
    pub fn build(self) -> Result<Prerenderer, TransportError> {
        let transport: Arc<dyn RenderTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.policy.client())?),
        };

        Ok(Prerenderer {
            policy: self.policy,
            transport,
            pre_fetch: self.pre_fetch,
            post_fetch: self.post_fetch,
        })
    }
}
