//! Clearinghouse adapters
//!
//! Implementations of [`edi_kernel::ClearinghouseApi`]: a live HTTP adapter
//! with bearer-key authentication and bounded retry, and a sandbox adapter
//! that answers from canned payloads. Which one a deployment gets is decided
//! once, from configuration, at construction time.

pub mod config;
pub mod http;
pub mod sandbox;

pub use config::ClearinghouseConfig;
pub use http::HttpClearinghouse;
pub use sandbox::SandboxClearinghouse;
