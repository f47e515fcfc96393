//! Client Configuration

/// Environment variable holding the API base URL
pub const BASE_URL_ENV: &str = "INSIGHT_API_BASE_URL";

/// Client configuration
///
/// A single setting: the origin prefix for all endpoint paths. Empty means
/// same-origin relative paths (the endpoint is used as-is and must begin
/// with `/`). Read once at construction, read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://api.insight.example` (no trailing slash)
    pub base_url: String,
}

impl ClientConfig {
    /// Create a configuration with an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Create from environment variables
    ///
    /// Falls back to an empty base URL (same-origin paths) when
    /// `INSIGHT_API_BASE_URL` is unset.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_default();
        Self { base_url }
    }

    /// Whether a base URL is configured
    pub fn has_base_url(&self) -> bool {
        !self.base_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_same_origin() {
        let config = ClientConfig::default();
        assert!(!config.has_base_url());
    }

    #[test]
    fn test_explicit_base_url() {
        let config = ClientConfig::new("https://api.x");
        assert!(config.has_base_url());
        assert_eq!(config.base_url, "https://api.x");
    }
}
