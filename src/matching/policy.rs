//! Compiled prerender policy.

use axum::http::HeaderValue;
use regex::{Regex, RegexBuilder};

use crate::config::{ClientConfig, PrerenderConfig, ValidationError};

/// Immutable per-process policy shared by every matcher and the pipeline.
///
/// Built once from [`PrerenderConfig`]; nothing mutates it afterwards, so it
/// is shared across requests behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct PrerenderPolicy {
    service_url: String,
    token: Option<HeaderValue>,
    crawler_user_agents: Vec<String>,
    ignored_extensions: Vec<String>,
    whitelist: Vec<Regex>,
    blacklist: Vec<Regex>,
    absolute_urls: bool,
    client: ClientConfig,
}

impl PrerenderPolicy {
    /// Compile a policy, failing on the first invalid pattern or token.
    pub fn from_config(config: &PrerenderConfig) -> Result<Self, ValidationError> {
        let token = match config.token.as_deref() {
            None | Some("") => None,
            Some(token) => {
                let mut value =
                    HeaderValue::from_str(token).map_err(|_| ValidationError::InvalidToken)?;
                value.set_sensitive(true);
                Some(value)
            }
        };

        Ok(Self {
            service_url: config.service_url.trim().trim_end_matches('/').to_string(),
            token,
            crawler_user_agents: config
                .crawler_user_agents
                .iter()
                .map(|ua| ua.to_lowercase())
                .collect(),
            ignored_extensions: config.ignored_extensions.clone(),
            whitelist: compile("whitelist", &config.whitelist)?,
            blacklist: compile("blacklist", &config.blacklist)?,
            absolute_urls: config.absolute_urls,
            client: config.client.clone(),
        })
    }

    /// Render service base URL without trailing slash.
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn token(&self) -> Option<&HeaderValue> {
        self.token.as_ref()
    }

    /// Lower-cased crawler User-Agent fragments.
    pub fn crawler_user_agents(&self) -> &[String] {
        &self.crawler_user_agents
    }

    pub fn ignored_extensions(&self) -> &[String] {
        &self.ignored_extensions
    }

    pub fn whitelist(&self) -> &[Regex] {
        &self.whitelist
    }

    pub fn blacklist(&self) -> &[Regex] {
        &self.blacklist
    }

    pub fn absolute_urls(&self) -> bool {
        self.absolute_urls
    }

    /// Options for the default outbound transport. The matchers never read these.
    pub fn client(&self) -> &ClientConfig {
        &self.client
    }
}

fn compile(list: &'static str, patterns: &[String]) -> Result<Vec<Regex>, ValidationError> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| ValidationError::InvalidPattern {
                    list,
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_service_url_and_agents() {
        let policy = PrerenderPolicy::from_config(&PrerenderConfig {
            service_url: "https://render.example//".into(),
            crawler_user_agents: vec!["GoogleBot".into()],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(policy.service_url(), "https://render.example");
        assert_eq!(policy.crawler_user_agents(), &["googlebot".to_string()]);
    }

    #[test]
    fn test_empty_token_is_absent() {
        let policy = PrerenderPolicy::from_config(&PrerenderConfig {
            token: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert!(policy.token().is_none());

        let policy = PrerenderPolicy::from_config(&PrerenderConfig {
            token: Some("abc".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(policy.token().unwrap(), "abc");
    }

    #[test]
    fn test_patterns_compile_case_insensitive() {
        let policy = PrerenderPolicy::from_config(&PrerenderConfig {
            whitelist: vec!["^/blog".into()],
            ..Default::default()
        })
        .unwrap();
        assert!(policy.whitelist()[0].is_match("/BLOG/post"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PrerenderPolicy::from_config(&PrerenderConfig {
            blacklist: vec!["(".into()],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { list: "blacklist", .. }));
    }
}
