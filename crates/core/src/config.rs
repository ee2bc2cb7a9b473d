//! Blog credentials and their validation

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Credentials for one Hatena Blog.
///
/// Fields are plain strings so partially filled values from different
/// sources (flags, environment, config file) can be merged before
/// validation. An empty string means "not provided".
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hatena_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub blog_domain: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("hatena_id", &self.hatena_id)
            .field("api_key", &api_key)
            .field("blog_domain", &self.blog_domain)
            .finish()
    }
}

impl Config {
    pub fn new(
        hatena_id: impl Into<String>,
        api_key: impl Into<String>,
        blog_domain: impl Into<String>,
    ) -> Self {
        Self {
            hatena_id: hatena_id.into(),
            api_key: api_key.into(),
            blog_domain: blog_domain.into(),
        }
    }

    /// Fill every empty field from `fallback`.
    pub fn or(self, fallback: Config) -> Self {
        fn pick(value: String, fallback: String) -> String {
            if value.is_empty() {
                fallback
            } else {
                value
            }
        }

        Self {
            hatena_id: pick(self.hatena_id, fallback.hatena_id),
            api_key: pick(self.api_key, fallback.api_key),
            blog_domain: pick(self.blog_domain, fallback.blog_domain),
        }
    }

    /// Check that every field is present, reporting the first missing one
    /// in the order ID, key, domain.
    pub fn validate(&self) -> Result<(), Error> {
        if self.hatena_id.is_empty() {
            return Err(Error::InvalidInput("hatena ID is required".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(Error::InvalidInput("API key is required".to_string()));
        }
        if self.blog_domain.is_empty() {
            return Err(Error::InvalidInput("blog domain is required".to_string()));
        }
        Ok(())
    }
}

/// Parse the JSON config file format (`hatena_id`, `api_key`, `blog_domain`).
pub fn parse_config(json: &str) -> Result<Config, Error> {
    serde_json::from_str(json)
        .map_err(|e| Error::InvalidInput(format!("failed to parse config file: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_validate_complete_config() {
        assert!(Config::new("alice", "key", "alice.hatenablog.com").validate().is_ok());
    }

    #[test]
    fn test_validate_missing_hatena_id() {
        let err = Config::new("", "key", "alice.hatenablog.com")
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("hatena ID is required"));
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("hatena ID"));

        let err = Config::new("alice", "", "").validate().unwrap_err();
        assert!(err.to_string().contains("API key is required"));

        let err = Config::new("alice", "key", "").validate().unwrap_err();
        assert!(err.to_string().contains("blog domain is required"));
    }

    #[test]
    fn test_or_fills_only_empty_fields() {
        let merged = Config::new("flag-id", "", "").or(Config::new(
            "file-id",
            "file-key",
            "file.example.com",
        ));
        assert_eq!(merged, Config::new("flag-id", "file-key", "file.example.com"));
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"{"hatena_id": "alice", "api_key": "k", "blog_domain": "alice.hatenablog.com"}"#,
        )
        .unwrap();
        assert_eq!(config, Config::new("alice", "k", "alice.hatenablog.com"));
    }

    #[test]
    fn test_parse_config_partial_and_invalid() {
        let config = parse_config(r#"{"hatena_id": "alice"}"#).unwrap();
        assert_eq!(config.api_key, "");

        let err = parse_config("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", Config::new("alice", "super-secret", "d"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
