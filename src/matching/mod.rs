//! Request matching subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, uri, headers)
//!     → classifier.rs (ordered vetoes)
//!         → crawler.rs (escaped fragment, User-Agent)
//!         → uri_policy.rs (ignored extensions, whitelist, blacklist)
//!     → Return: Decision (Forward or a veto reason)
//!
//! Policy Compilation (at startup):
//!     PrerenderConfig
//!     → Lower-case crawler fragments, compile regexes
//!     → Freeze as immutable PrerenderPolicy
//! ```
//!
//! # Design Decisions
//! - Every matcher is a pure function of (request, policy)
//! - Deterministic: same input always yields the same decision
//! - Invalid patterns are rejected when the policy is built

pub mod classifier;
pub mod crawler;
pub mod policy;
pub mod request;
pub mod uri_policy;

pub use classifier::{classify, should_forward, Decision};
pub use crawler::is_crawler;
pub use policy::PrerenderPolicy;
pub use request::IncomingRequest;
pub use uri_policy::{has_ignored_extension, is_blacklisted, is_whitelisted};
