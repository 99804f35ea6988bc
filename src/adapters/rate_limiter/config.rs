//! Rate limit policy.
//!
//! Resolves which limit applies to an origin and whether the per-client
//! bucket is checked at all.

use std::collections::HashMap;

/// Limits applied to session requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Window length in seconds.
    pub window_secs: u32,
    /// Requests per window for an origin without an override.
    pub default_origin_quota: u32,
    /// Requests per window per client; `0` disables the client bucket.
    pub client_per_window: u32,
    /// Per-origin-host overrides.
    pub origin_quotas: HashMap<String, u32>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window_secs: 60,
            default_origin_quota: 120,
            client_per_window: 0,
            origin_quotas: HashMap::new(),
        }
    }
}

impl RateLimitPolicy {
    /// Limit for all requests coming from `origin_host`.
    pub fn origin_limit(&self, origin_host: &str) -> u32 {
        self.origin_quotas
            .get(origin_host)
            .copied()
            .unwrap_or(self.default_origin_quota)
    }

    pub fn client_limit(&self) -> Option<u32> {
        (self.client_per_window > 0).then_some(self.client_per_window)
    }

    /// Parses a JSON object of `host -> quota` overrides.
    ///
    /// Entries that are not positive integers (numbers or numeric strings)
    /// fall back to `default`. Input that is not a JSON object yields no
    /// overrides.
    pub fn parse_origin_quotas(json: &str, default: u32) -> HashMap<String, u32> {
        let parsed = match serde_json::from_str::<serde_json::Value>(json) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!("Ignoring origin quotas: expected a JSON object");
                return HashMap::new();
            }
        };

        parsed
            .into_iter()
            .map(|(host, value)| {
                let quota = positive_quota(&value).unwrap_or(default);
                (host, quota)
            })
            .collect()
    }
}

fn positive_quota(value: &serde_json::Value) -> Option<u32> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_u64()?,
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_edge_worker() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.window_secs, 60);
        assert_eq!(policy.default_origin_quota, 120);
        assert_eq!(policy.client_limit(), None);
    }

    #[test]
    fn origin_override_takes_precedence() {
        let mut policy = RateLimitPolicy::default();
        policy.origin_quotas.insert("localhost:8000".to_string(), 5);
        assert_eq!(policy.origin_limit("localhost:8000"), 5);
        assert_eq!(policy.origin_limit("digitalhealthcrc.github.io"), 120);
    }

    #[test]
    fn parse_accepts_numbers_and_numeric_strings() {
        let quotas = RateLimitPolicy::parse_origin_quotas(
            r#"{"a.example": 10, "b.example": "20"}"#,
            120,
        );
        assert_eq!(quotas.get("a.example"), Some(&10));
        assert_eq!(quotas.get("b.example"), Some(&20));
    }

    #[test]
    fn parse_replaces_invalid_entries_with_default() {
        let quotas = RateLimitPolicy::parse_origin_quotas(
            r#"{"zero.example": 0, "neg.example": -3, "text.example": "many"}"#,
            120,
        );
        assert_eq!(quotas.get("zero.example"), Some(&120));
        assert_eq!(quotas.get("neg.example"), Some(&120));
        assert_eq!(quotas.get("text.example"), Some(&120));
    }

    #[test]
    fn parse_ignores_malformed_json() {
        assert!(RateLimitPolicy::parse_origin_quotas("{not json", 120).is_empty());
        assert!(RateLimitPolicy::parse_origin_quotas("[1, 2]", 120).is_empty());
    }
}
