//! CORS configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::cors::AllowList;

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Allowed origins (comma-separated); the first one is the fallback
    pub allowed_origins: Option<String>,
}

impl CorsConfig {
    /// Get allowed origins as a vector, or `None` to use the built-in list
    pub fn allowed_origins_list(&self) -> Option<Vec<String>> {
        self.allowed_origins.as_ref().map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    /// Build the immutable allow-list
    pub fn allow_list(&self) -> Result<AllowList, ValidationError> {
        match self.allowed_origins_list() {
            Some(origins) => Ok(AllowList::new(origins)?),
            None => Ok(AllowList::default()),
        }
    }

    /// Validate CORS configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.allow_list().map(|_| ())
    }
}
