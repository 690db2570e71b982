//! `GET /go/{slug}`: slug lookup, click logging and platform-aware rewriting
//! of media links.

pub mod handlers;
pub mod media;
pub mod middleware;
pub mod platform;
pub mod resolver;
pub mod routes;

pub use platform::{classify_platform, Platform};
pub use resolver::{decide, RedirectDecision, RedirectOutcome, Resolver};
