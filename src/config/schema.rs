//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the prerender proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Application that serves all non-prerendered traffic.
    pub upstream: UpstreamConfig,

    /// Crawler detection, URI policy and render service settings.
    pub prerender: PrerenderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the application (plain http, e.g. "http://127.0.0.1:3000").
    pub url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

/// Prerender settings.
///
/// Compiled into an immutable [`PrerenderPolicy`](crate::matching::PrerenderPolicy)
/// once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PrerenderConfig {
    /// Base URL of the rendering service.
    pub service_url: String,

    /// Token sent as `X-Prerender-Token`. Empty means no token.
    pub token: Option<String>,

    /// Case-insensitive User-Agent substrings identifying crawlers.
    pub crawler_user_agents: Vec<String>,

    /// Substrings that disqualify a URI (static assets).
    pub ignored_extensions: Vec<String>,

    /// Case-insensitive regexes; when non-empty a URI must match one of them.
    pub whitelist: Vec<String>,

    /// Case-insensitive regexes tested against URI and referer.
    pub blacklist: Vec<String>,

    /// Send `scheme://host/path` to the render service instead of the raw request URI.
    pub absolute_urls: bool,

    /// Options for the outbound render service client.
    pub client: ClientConfig,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            service_url: "http://service.prerender.io".to_string(),
            token: None,
            crawler_user_agents: to_strings(DEFAULT_CRAWLER_USER_AGENTS),
            ignored_extensions: to_strings(DEFAULT_IGNORED_EXTENSIONS),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            absolute_urls: false,
            client: ClientConfig::default(),
        }
    }
}

/// Outbound HTTP client options for the render service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total time allowed for a render fetch in seconds.
    pub timeout_secs: u64,

    /// Optional proxy URL for all outbound traffic.
    pub proxy: Option<String>,

    /// Skip TLS certificate verification (testing only).
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            timeout_secs: 30,
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// User-Agent fragments of the well-known crawlers and link unfurlers.
pub const DEFAULT_CRAWLER_USER_AGENTS: &[&str] = &[
    "googlebot",
    "yahoo",
    "bingbot",
    "yandex",
    "baiduspider",
    "facebookexternalhit",
    "twitterbot",
    "rogerbot",
    "linkedinbot",
    "embedly",
    "quora link preview",
    "showyoubot",
    "outbrain",
    "pinterest",
    "developers.google.com/+/web/snippet",
    "slackbot",
    "vkshare",
    "w3c_validator",
    "redditbot",
    "applebot",
    "whatsapp",
    "flipboard",
    "tumblr",
    "bitlybot",
    "skypeuripreview",
    "nuzzel",
    "discordbot",
    "google page speed",
    "qwantify",
    "chrome-lighthouse",
    "telegrambot",
];

/// Static asset markers that are never worth prerendering.
pub const DEFAULT_IGNORED_EXTENSIONS: &[&str] = &[
    ".js", ".css", ".xml", ".less", ".png", ".jpg", ".jpeg", ".gif", ".pdf", ".doc", ".txt",
    ".ico", ".rss", ".zip", ".mp3", ".rar", ".exe", ".wmv", ".avi", ".ppt", ".mpg", ".mpeg",
    ".tif", ".wav", ".mov", ".psd", ".ai", ".xls", ".mp4", ".m4a", ".swf", ".dat", ".dmg",
    ".iso", ".flv", ".m4v", ".torrent", ".woff", ".ttf", ".svg", ".webmanifest",
];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
