//! Configuration loaded from environment variables.
//!
//! - `GEMINI_API_KEY` - generation-service credential. Optional at startup;
//!   when absent the server still runs but `/api/scrape-news` returns 500.
//! - `LISTEN` - bind address (default: `0.0.0.0:5000`)
//! - `RUST_LOG` - log filter (default: `info`)

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub listen_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(env::var("GEMINI_API_KEY").ok(), env::var("LISTEN").ok())
    }

    fn from_vars(gemini_api_key: Option<String>, listen: Option<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.filter(|k| !k.trim().is_empty()),
            listen_addr: listen.unwrap_or_else(|| "0.0.0.0:5000".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::from_vars(Some("   ".to_string()), None);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_vars(None, None);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.listen_addr, "0.0.0.0:5000");
    }

    #[test]
    fn explicit_values_pass_through() {
        let config = Config::from_vars(
            Some("sk-test".to_string()),
            Some("127.0.0.1:8080".to_string()),
        );
        assert_eq!(config.gemini_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
    }
}
