//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and startup wiring.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::Projection;
    use std::io::Write;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [upstreams.secondary]
            name = "tvt"
            url = "https://feeds.example.com/tvt"
            timeout_ms = 5000
            parse = "field:jams"

            [memo]
            ttl_ms = 2500
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.upstreams.secondary.timeout_ms, 5000);
        assert_eq!(config.upstreams.secondary.parse, Projection::Field("jams".into()));
        assert_eq!(config.upstreams.primary.name, "waze_partner");
        assert_eq!(config.memo.ttl_ms, 2500);
        assert_eq!(config.edge_cache.success, "public, s-maxage=30, stale-while-revalidate=300");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bad_projection_is_parse_error() {
        let err = parse_config(
            r#"
            [upstreams.secondary]
            name = "tvt"
            url = "https://feeds.example.com/tvt"
            parse = "field:"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_are_reported() {
        let err = parse_config("[memo]\nttl_ms = 0\n").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: memo.ttl_ms: must be greater than zero");
    }
}
