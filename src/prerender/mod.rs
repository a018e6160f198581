//! Prerender forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Request classified as Forward
//!     → hooks.rs (pre-fetch: may answer from cache)
//!     → outbound.rs (build GET {service_url}/{uri})
//!     → transport.rs (execute against the render service)
//!     → hooks.rs (post-fetch: may observe or replace)
//!     → response.rs (RenderedResponse → client response)
//! ```
//!
//! # Design Decisions
//! - Two explicit optional hooks instead of an event bus
//! - Transport injected; a default reqwest client otherwise
//! - Failures are returned to the host, which falls back to normal handling

pub mod error;
pub mod hooks;
pub mod outbound;
pub mod pipeline;
pub mod response;
pub mod transport;

pub use error::{BoxError, HookStage, PrerenderError, TransportError};
pub use hooks::{ExtensionEvent, PostFetchHook, PreFetchHook};
pub use outbound::{render_url, OutboundRequest, X_PRERENDER_TOKEN};
pub use pipeline::{ForwardOutcome, Prerenderer, PrerendererBuilder};
pub use response::RenderedResponse;
pub use transport::{RenderTransport, ReqwestTransport};
