//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID, request span)
//!     → middleware.rs (classify; prerender or pass through)
//!         crawler  → render service response
//!         everyone → server.rs upstream handler → upstream application
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::prerender_middleware;
pub use request::X_REQUEST_ID;
pub use server::{HttpServer, ServerError};
