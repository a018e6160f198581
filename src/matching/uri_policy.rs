//! URI policy predicates.
//!
//! # Design Decisions
//! - Ignored extensions match as substrings anywhere, query string included
//! - Whitelist/blacklist are regex searches, not full matches
//! - An empty whitelist is "no restriction"; callers check emptiness
//! - A missing referer never matches a blacklist pattern

use crate::matching::policy::PrerenderPolicy;

/// True if the URI contains any ignored extension token.
pub fn has_ignored_extension(uri: &str, policy: &PrerenderPolicy) -> bool {
    policy
        .ignored_extensions()
        .iter()
        .any(|ext| uri.contains(ext.as_str()))
}

/// True if any whitelist pattern matches somewhere in the URI.
///
/// Always false for an empty whitelist; see [`PrerenderPolicy::whitelist`].
pub fn is_whitelisted(uri: &str, policy: &PrerenderPolicy) -> bool {
    policy.whitelist().iter().any(|re| re.is_match(uri))
}

/// True if any blacklist pattern matches the URI or the referer.
pub fn is_blacklisted(uri: &str, referer: Option<&str>, policy: &PrerenderPolicy) -> bool {
    policy
        .blacklist()
        .iter()
        .any(|re| re.is_match(uri) || referer.is_some_and(|r| re.is_match(r)))
}
