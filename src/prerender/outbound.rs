//! Outbound render request construction.
//!
//! # Responsibilities
//! - Join the service base URL with the original request URI
//! - Forward the original User-Agent verbatim
//! - Always ask for gzip; attach the service token when configured
//!
//! # Design Decisions
//! - Built purely from (request, policy) so it can be checked without I/O
//! - Original URI casing and percent-encoding are preserved byte for byte

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};

use crate::matching::{IncomingRequest, PrerenderPolicy};

/// Header carrying the render service token.
pub static X_PRERENDER_TOKEN: HeaderName = HeaderName::from_static("x-prerender-token");

/// The GET request sent to the rendering service.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

impl OutboundRequest {
    /// Build the render request for an inbound request.
    pub fn build<R: IncomingRequest + ?Sized>(request: &R, policy: &PrerenderPolicy) -> Self {
        let target = if policy.absolute_urls() {
            absolute_uri(request)
        } else {
            request.uri_string()
        };

        let mut headers = HeaderMap::new();
        if let Some(user_agent) = request.headers().get(header::USER_AGENT) {
            headers.insert(header::USER_AGENT, user_agent.clone());
        }
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        if let Some(token) = policy.token() {
            headers.insert(X_PRERENDER_TOKEN.clone(), token.clone());
        }

        Self {
            method: Method::GET,
            url: render_url(policy.service_url(), &target),
            headers,
        }
    }
}

/// `base` (trailing slashes stripped) + `/` + `uri`, where a leading `/` on
/// `uri` is the separator itself.
pub fn render_url(base: &str, uri: &str) -> String {
    let base = base.trim_end_matches('/');
    let uri = uri.strip_prefix('/').unwrap_or(uri);
    format!("{base}/{uri}")
}

// Hosted render services expect the page's public URL. Origin-form requests
// only carry the path, so rebuild scheme and host from the headers.
fn absolute_uri<R: IncomingRequest + ?Sized>(request: &R) -> String {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let Some(host) = request.header(header::HOST.as_str()) else {
        return uri.to_string();
    };
    let scheme = request
        .header("x-forwarded-proto")
        .and_then(|p| p.split(',').next())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("http");
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    format!("{scheme}://{host}{path_and_query}")
}
