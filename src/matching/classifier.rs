//! Request classification.
//!
//! # Decision Order (first veto wins)
//! ```text
//! not GET/HEAD or no path    → Malformed
//! not a crawler              → NotCrawler
//! ignored extension          → IgnoredExtension
//! whitelist set, no match    → NotWhitelisted
//! blacklist matches uri/ref  → Blacklisted
//! otherwise                  → Forward
//! ```
//!
//! The blacklist runs last so it overrides a whitelist match.

use std::fmt;

use axum::http::{header::REFERER, Method};

use crate::matching::crawler::is_crawler;
use crate::matching::policy::PrerenderPolicy;
use crate::matching::request::IncomingRequest;
use crate::matching::uri_policy::{has_ignored_extension, is_blacklisted, is_whitelisted};

/// Outcome of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Forward,
    Malformed,
    NotCrawler,
    IgnoredExtension,
    NotWhitelisted,
    Blacklisted,
}

impl Decision {
    pub fn should_forward(self) -> bool {
        self == Decision::Forward
    }

    /// Stable label for logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Forward => "forward",
            Decision::Malformed => "malformed",
            Decision::NotCrawler => "not_crawler",
            Decision::IgnoredExtension => "ignored_extension",
            Decision::NotWhitelisted => "not_whitelisted",
            Decision::Blacklisted => "blacklisted",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a request against the policy.
pub fn classify<R: IncomingRequest + ?Sized>(request: &R, policy: &PrerenderPolicy) -> Decision {
    if !is_http_shaped(request) {
        return Decision::Malformed;
    }

    if !is_crawler(request, policy) {
        return Decision::NotCrawler;
    }

    let uri = request.uri_string();

    if has_ignored_extension(&uri, policy) {
        return Decision::IgnoredExtension;
    }

    if !policy.whitelist().is_empty() && !is_whitelisted(&uri, policy) {
        return Decision::NotWhitelisted;
    }

    if !policy.blacklist().is_empty()
        && is_blacklisted(&uri, request.header(REFERER.as_str()), policy)
    {
        return Decision::Blacklisted;
    }

    Decision::Forward
}

/// Should this request be answered by the rendering service?
pub fn should_forward<R: IncomingRequest + ?Sized>(request: &R, policy: &PrerenderPolicy) -> bool {
    classify(request, policy).should_forward()
}

// Only page loads can be answered with a rendered snapshot; CONNECT targets
// and `*` have no path.
fn is_http_shaped<R: IncomingRequest + ?Sized>(request: &R) -> bool {
    let method = request.method();
    (method == Method::GET || method == Method::HEAD) && request.uri().path().starts_with('/')
}
