//! Chat Session Proxy - ChatKit widget session issuer
//!
//! This crate implements a single-endpoint edge proxy that creates chat-widget
//! sessions upstream with a server-held API key and hands only the short-lived
//! client secret back to the browser.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
