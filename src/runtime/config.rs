//! Local edge host configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the local edge host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Bare domain the redirect function serves.
    pub domain: String,
    /// Whether to answer `/_health` directly.
    pub enable_health: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            domain: "example.com".to_string(),
            enable_health: true,
        }
    }
}

impl HostConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the redirected domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn enable_health(mut self, enabled: bool) -> Self {
        self.enable_health = enabled;
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostConfig::new();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.domain, "example.com");
        assert!(config.enable_health);
    }

    #[test]
    fn test_builder() {
        let config = HostConfig::new()
            .host("127.0.0.1")
            .port(3000)
            .domain("example.org")
            .enable_health(false);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.domain, "example.org");
        assert!(!config.enable_health);
    }
}
