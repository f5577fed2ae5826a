use std::env;
use std::time::Duration;

/// Relay endpoint used when nothing else is configured.
pub const DEFAULT_RELAY_URL: &str = "wss://relay.primal.net";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RELAY_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RelayConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Endpoint from `STREAM_RELAY_URL`, falling back to the default relay.
    pub fn from_env() -> Self {
        match env::var("STREAM_RELAY_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.url, DEFAULT_RELAY_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_new_keeps_default_timeout() {
        let config = RelayConfig::new("wss://relay.example.com");
        assert_eq!(config.url, "wss://relay.example.com");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
