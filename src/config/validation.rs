//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile-check every whitelist/blacklist pattern
//! - Validate URLs and value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system, so a bad pattern
//!   never reaches request time

use axum::http::HeaderValue;
use regex::RegexBuilder;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("prerender.service_url must not be empty")]
    MissingServiceUrl,

    #[error("{field} is not a valid URL: {value} ({reason})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must use {expected}, got {actual}")]
    UnsupportedScheme {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("prerender.token contains characters not allowed in a header value")]
    InvalidToken,

    #[error("invalid {list} pattern `{pattern}`: {reason}")]
    InvalidPattern {
        list: &'static str,
        pattern: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error(
        "timeouts.request_secs ({request_secs}) must exceed prerender.client.timeout_secs ({render_secs})"
    )]
    RenderTimeoutExceedsRequest { render_secs: u64, request_secs: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let prerender = &config.prerender;

    let service_url = prerender.service_url.trim();
    if service_url.is_empty() {
        errors.push(ValidationError::MissingServiceUrl);
    } else {
        match Url::parse(service_url) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::UnsupportedScheme {
                    field: "prerender.service_url",
                    expected: "http or https",
                    actual: url.scheme().to_string(),
                });
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidUrl {
                field: "prerender.service_url",
                value: service_url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if let Some(token) = &prerender.token {
        if HeaderValue::from_str(token).is_err() {
            errors.push(ValidationError::InvalidToken);
        }
    }

    check_patterns("whitelist", &prerender.whitelist, &mut errors);
    check_patterns("blacklist", &prerender.blacklist, &mut errors);

    if let Some(proxy) = &prerender.client.proxy {
        if let Err(e) = Url::parse(proxy) {
            errors.push(ValidationError::InvalidUrl {
                field: "prerender.client.proxy",
                value: proxy.clone(),
                reason: e.to_string(),
            });
        }
    }

    if prerender.client.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("prerender.client.timeout_secs"));
    }
    if prerender.client.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("prerender.client.connect_timeout_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    // A render timeout must reach the middleware's fallback before the request timeout fires.
    if config.timeouts.request_secs != 0
        && config.timeouts.request_secs <= prerender.client.timeout_secs
    {
        errors.push(ValidationError::RenderTimeoutExceedsRequest {
            render_secs: prerender.client.timeout_secs,
            request_secs: config.timeouts.request_secs,
        });
    }

    // The pass-through client speaks plain HTTP only.
    match Url::parse(&config.upstream.url) {
        Ok(url) if url.scheme() != "http" => errors.push(ValidationError::UnsupportedScheme {
            field: "upstream.url",
            expected: "http",
            actual: url.scheme().to_string(),
        }),
        Ok(url) if url.host_str().is_none() => errors.push(ValidationError::InvalidUrl {
            field: "upstream.url",
            value: config.upstream.url.clone(),
            reason: "missing host".to_string(),
        }),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field: "upstream.url",
            value: config.upstream.url.clone(),
            reason: e.to_string(),
        }),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_patterns(list: &'static str, patterns: &[String], errors: &mut Vec<ValidationError>) {
    for pattern in patterns {
        if let Err(e) = RegexBuilder::new(pattern).case_insensitive(true).build() {
            errors.push(ValidationError::InvalidPattern {
                list,
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }
}
