//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, regex compilation)
//!     → ProxyConfig (validated, immutable)
//!     → PrerenderPolicy::from_config (compiled matchers)
//!     → shared via Arc to the pipeline
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no reload while requests are in flight
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::PrerenderConfig;
pub use schema::ProxyConfig;
pub use schema::UpstreamConfig;
pub use validation::ValidationError;
