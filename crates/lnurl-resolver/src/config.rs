use platform_utils::REQUEST_TIMEOUT;
use serde::{Deserialize, Serialize};

/// Transport settings of a [`LnurlResolver`](crate::LnurlResolver).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Sent as the `User-Agent` header of the endpoint request.
    pub user_agent: Option<String>,
    /// Upper bound for the single endpoint request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: REQUEST_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResolverConfig;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{"user_agent":"wallet/1.0"}"#).unwrap();
        assert_eq!(config.user_agent.as_deref(), Some("wallet/1.0"));
        assert_eq!(config.timeout_secs, 30);
    }
}
