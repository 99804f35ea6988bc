//! Domain layer containing the proxy's pure types and rules.
//!
//! # Module Organization
//!
//! - `cors` - Origin allow-list and CORS header resolution
//! - `session` - Session credentials, client secrets, and failure taxonomy

pub mod cors;
pub mod session;
