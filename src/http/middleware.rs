//! Prerender middleware for axum.
//!
//! Wire it in front of any axum application:
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/", get(index))
//!     .layer(axum::middleware::from_fn_with_state(prerenderer, prerender_middleware));
//! ```
//!
//! # Design Decisions
//! - The request body is never read; it is handed back untouched on pass-through
//! - Any pipeline failure falls back to the normal handler, never a 5xx

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::observability::metrics;
use crate::prerender::{ForwardOutcome, Prerenderer};

/// Serve prerendered pages to crawlers; defer everything else to `next`.
pub async fn prerender_middleware(
    State(prerenderer): State<Prerenderer>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    match prerenderer.handle(&parts).await {
        Ok(ForwardOutcome::ShortCircuited(page)) => {
            metrics::record_response("hook");
            page.into_response()
        }
        Ok(ForwardOutcome::Forwarded(page)) => {
            metrics::record_response("service");
            page.into_response()
        }
        Ok(ForwardOutcome::PassThrough) => next.run(Request::from_parts(parts, body)).await,
        Err(e) => {
            tracing::warn!(
                uri = %parts.uri,
                error = %e,
                "Prerender failed, falling back to normal handling"
            );
            metrics::record_failure(e.kind());
            next.run(Request::from_parts(parts, body)).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrerenderConfig;
    use crate::matching::PrerenderPolicy;
    use crate::prerender::{OutboundRequest, RenderTransport, RenderedResponse, TransportError};
    use async_trait::async_trait;
    use axum::{body::Body, http::StatusCode, routing::post, Router};
    use tower::ServiceExt;

    struct FixedPage;

    #[async_trait]
    impl RenderTransport for FixedPage {
        async fn fetch(&self, request: &OutboundRequest) -> Result<RenderedResponse, TransportError> {
            Ok(RenderedResponse::html(format!("rendered {}", request.url)))
        }
    }

    struct Down;

    #[async_trait]
    impl RenderTransport for Down {
        async fn fetch(&self, _request: &OutboundRequest) -> Result<RenderedResponse, TransportError> {
            Err(TransportError::Connect("connection refused".into()))
        }
    }

    fn app(transport: impl RenderTransport + 'static) -> Router {
        let policy = PrerenderPolicy::from_config(&PrerenderConfig {
            service_url: "http://render.local".into(),
            ..Default::default()
        })
        .unwrap();
        let prerenderer = Prerenderer::builder(policy).transport(transport).build().unwrap();

        Router::new()
            .fallback(|| async { "app" })
            .route("/echo", post(|body: String| async move { body }))
            .layer(axum::middleware::from_fn_with_state(prerenderer, prerender_middleware))
    }

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str, user_agent: &str) -> Request {
        Request::builder()
            .uri(uri)
            .header("User-Agent", user_agent)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_crawler_gets_rendered_page() {
        let response = app(FixedPage).oneshot(get("/shop?x=1", "Googlebot")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, "rendered http://render.local/shop?x=1");
    }

    #[tokio::test]
    async fn test_browser_reaches_app() {
        let response = app(FixedPage).oneshot(get("/shop", "Firefox")).await.unwrap();
        assert_eq!(body_of(response).await, "app");
    }

    #[tokio::test]
    async fn test_pass_through_keeps_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/echo")
            .header("User-Agent", "Googlebot")
            .body(Body::from("payload"))
            .unwrap();
        let response = app(FixedPage).oneshot(request).await.unwrap();
        assert_eq!(body_of(response).await, "payload");
    }

    #[tokio::test]
    async fn test_render_failure_falls_back() {
        let response = app(Down).oneshot(get("/shop", "Googlebot")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, "app");
    }
}
