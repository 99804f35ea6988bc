//! ChatKit adapter - upstream session API over HTTPS.

mod session_issuer;

pub use session_issuer::{
    ChatKitClientConfig, ChatKitSessionIssuer, BETA_HEADER, DEFAULT_BASE_URL,
};
