//! Configuration utilities for testing.

use crate::config::PortalConfig;

/// Builder for creating test portal configurations.
#[derive(Debug)]
pub struct TestPortalConfigBuilder {
    url: String,
    user_agent: String,
    timeout_sec: Option<u64>,
}

impl TestPortalConfigBuilder {
    /// Creates a new test config builder with default values.
    pub fn new() -> Self {
        Self {
            url: "http://test.local".to_string(),
            user_agent: "powerplanner-test".to_string(),
            timeout_sec: Some(10),
        }
    }

    /// Sets the portal URL for the test configuration.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the user agent for the test configuration.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets or clears the request timeout.
    pub fn with_timeout_sec(mut self, timeout_sec: Option<u64>) -> Self {
        self.timeout_sec = timeout_sec;
        self
    }

    /// Builds the portal configuration.
    pub fn build(self) -> PortalConfig {
        PortalConfig {
            url: self.url,
            user_agent: self.user_agent,
            timeout_sec: self.timeout_sec,
        }
    }
}

/// Creates a test portal configuration pointing at a mock server.
pub fn test_portal_config_with_url(url: impl Into<String>) -> PortalConfig {
    TestPortalConfigBuilder::new().with_url(url).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portal_config_builder() {
        let config = TestPortalConfigBuilder::new()
            .with_url("http://custom.local")
            .with_user_agent("custom-agent")
            .with_timeout_sec(None)
            .build();

        assert_eq!(config.url, "http://custom.local");
        assert_eq!(config.user_agent, "custom-agent");
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_convenience_function() {
        let config = test_portal_config_with_url("http://mock.local");
        assert_eq!(config.url, "http://mock.local");
        assert_eq!(config.timeout_sec, Some(10));
    }
}
