//! Session command handlers.

mod create_session;

pub use create_session::CreateSessionHandler;
