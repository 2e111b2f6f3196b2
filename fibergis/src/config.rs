//! Service configuration

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Loads the listener configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".into()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }

    /// Socket address string for the TCP listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_addr() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.addr(), "127.0.0.1:8000");
    }
}
