//! Crawler detection.
//!
//! # Rules (first match wins)
//! 1. `_escaped_fragment_` present in the query, any value
//! 2. User-Agent, lower-cased, contains a configured crawler fragment
//!
//! A missing User-Agent reads as the empty string and never errors.

use axum::http::header::USER_AGENT;

use crate::matching::policy::PrerenderPolicy;
use crate::matching::request::{IncomingRequest, ESCAPED_FRAGMENT};

/// Returns true if the request comes from a search-engine crawler.
pub fn is_crawler<R: IncomingRequest + ?Sized>(request: &R, policy: &PrerenderPolicy) -> bool {
    if request.has_query_param(ESCAPED_FRAGMENT) {
        return true;
    }

    let user_agent = request
        .header(USER_AGENT.as_str())
        .unwrap_or_default()
        .to_lowercase();

    policy
        .crawler_user_agents()
        .iter()
        .any(|fragment| user_agent.contains(fragment.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrerenderConfig;
    use axum::http::Request;

    fn policy(agents: &[&str]) -> PrerenderPolicy {
        PrerenderPolicy::from_config(&PrerenderConfig {
            crawler_user_agents: agents.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        })
        .unwrap()
    }

    fn request(uri: &str, user_agent: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri(uri);
        if let Some(ua) = user_agent {
            builder = builder.header("User-Agent", ua);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_escaped_fragment_wins_regardless_of_agent() {
        let policy = policy(&["googlebot"]);
        assert!(is_crawler(&request("/?_escaped_fragment_=", None), &policy));
        assert!(is_crawler(&request("/?_escaped_fragment_=x", Some("Mozilla/5.0")), &policy));
        assert!(is_crawler(&request("/page?_escaped_fragment_", Some("")), &policy));
    }

    #[test]
    fn test_user_agent_substring_any_case() {
        let policy = policy(&["Googlebot", "bingbot"]);
        assert!(is_crawler(
            &request(
                "/",
                Some("Mozilla/5.0 (compatible; GOOGLEBOT/2.1; +http://www.google.com/bot.html)")
            ),
            &policy
        ));
        assert!(is_crawler(&request("/", Some("msnbot bingbot/2.0")), &policy));
    }

    #[test]
    fn test_browser_is_not_a_crawler() {
        let policy = policy(&["googlebot", "bingbot"]);
        assert!(!is_crawler(
            &request("/", Some("Mozilla/5.0 (X11; Linux x86_64) Firefox/120.0")),
            &policy
        ));
    }

    #[test]
    fn test_missing_user_agent_is_not_an_error() {
        let policy = policy(&["googlebot"]);
        assert!(!is_crawler(&request("/", None), &policy));
    }

    #[test]
    fn test_empty_agent_list_only_honours_marker() {
        let policy = policy(&[]);
        assert!(!is_crawler(&request("/", Some("Googlebot")), &policy));
        assert!(is_crawler(&request("/?_escaped_fragment_=", Some("Googlebot")), &policy));
    }

    #[test]
    fn test_default_list_detects_common_crawlers() {
        let policy = PrerenderPolicy::from_config(&PrerenderConfig::default()).unwrap();
        for agent in [
            "Mozilla/5.0 (compatible; Googlebot/2.1)",
            "facebookexternalhit/1.1",
            "Twitterbot/1.0",
            "Slackbot-LinkExpanding 1.0",
            "Mozilla/5.0 (compatible; YandexBot/3.0)",
        ] {
            assert!(is_crawler(&request("/", Some(agent)), &policy), "{agent}");
        }
    }
}
