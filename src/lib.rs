//! Prerender proxy library.
//!
//! Detects search-engine crawlers and answers them with pages pre-rendered
//! by an external rendering service; everyone else goes to the application.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod matching;
pub mod observability;
pub mod prerender;

pub use config::schema::ProxyConfig;
pub use http::{prerender_middleware, HttpServer};
pub use lifecycle::Shutdown;
pub use matching::{should_forward, Decision, IncomingRequest, PrerenderPolicy};
pub use prerender::{ForwardOutcome, Prerenderer, RenderedResponse};
