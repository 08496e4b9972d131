//! Configuration management for Chatter
//!
//! This module handles loading, parsing, and managing configuration from:
//! 1. Embedded default_config.toml (compile-time defaults)
//! 2. User config at ~/.config/chatter/config.toml (or platform-specific location)
//! 3. Project-local config at ./.chatter/config.toml
//!
//! Later layers are deep-merged over earlier ones, so an override file only
//! needs to name the keys it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::routes::RouteExclusionPolicy;

/// Default configuration embedded in binary
const DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Backend base URL; the GraphQL endpoint lives under `/graphql`
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            api_url: default_api_url(),
        }
    }
}

/// Routes reachable without a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_excluded_routes")]
    pub excluded: Vec<String>,
    /// Landing path after a forced logout
    #[serde(default = "default_public_entry_point")]
    pub public_entry_point: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            excluded: default_excluded_routes(),
            public_entry_point: default_public_entry_point(),
        }
    }
}

/// Session persistence settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub credential_file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub timestamps: bool,
    #[serde(default)]
    pub file_line: bool,
    #[serde(default)]
    pub file_output: bool,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            timestamps: true,
            file_line: false,
            file_output: false,
            file_path: None,
        }
    }
}

fn default_app_name() -> String {
    "chatter".to_string()
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_excluded_routes() -> Vec<String> {
    vec!["/login".to_string(), "/signup".to_string()]
}

fn default_public_entry_point() -> String {
    "/login".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Configuration loading
// ============================================================================

impl AppConfig {
    /// Load configuration with fallback chain:
    /// 1. Embedded default_config.toml
    /// 2. User config ~/.config/chatter/config.toml
    /// 3. Project-local .chatter/config.toml
    pub fn load() -> Result<Self, ConfigError> {
        let mut merged = parse_table(DEFAULT_CONFIG, "default config")?;

        let candidates = [Self::user_config_path(), Self::project_config_path()];
        for path in candidates.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match read_table(&path) {
                Ok(overlay) => {
                    merge_tables(&mut merged, overlay);
                    tracing::info!("Loaded config from {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to load config {:?}: {}", path, e);
                }
            }
        }

        let config = Self::from_table(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, layered over the embedded defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut merged = parse_table(DEFAULT_CONFIG, "default config")?;
        merge_tables(&mut merged, read_table(path)?);
        let config = Self::from_table(merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document layered over the embedded defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut merged = parse_table(DEFAULT_CONFIG, "default config")?;
        merge_tables(&mut merged, parse_table(contents, "config")?);
        let config = Self::from_table(merged)?;
        config.validate()?;
        Ok(config)
    }

    fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))
    }

    /// Get the user config path (~/.config/chatter/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("chatter").join("config.toml"))
    }

    /// Get the project-local config path (./.chatter/config.toml)
    pub fn project_config_path() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(".chatter").join("config.toml"))
    }

    /// Get the credential file path (defaults to ~/.config/chatter/credential)
    pub fn credential_file_path(&self) -> PathBuf {
        self.session
            .credential_file
            .clone()
            .or_else(|| {
                dirs::config_dir().map(|config_dir| config_dir.join("chatter").join("credential"))
            })
            .unwrap_or_else(|| PathBuf::from("credential"))
    }

    /// GraphQL endpoint derived from the API base URL
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.general.api_url.trim_end_matches('/'))
    }

    /// Build the route exclusion policy from `[routes]`
    pub fn route_policy(&self) -> RouteExclusionPolicy {
        RouteExclusionPolicy::new(self.routes.excluded.iter().cloned())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("general.api_url must not be empty".to_string()));
        }

        if let Some(bad) = self.routes.excluded.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::Invalid(format!(
                "excluded route '{}' must start with '/'",
                bad
            )));
        }

        let entry = &self.routes.public_entry_point;
        if !entry.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "public entry point '{}' must start with '/'",
                entry
            )));
        }

        // Logout navigates here with no session; it has to render.
        if !self.routes.excluded.iter().any(|p| p == entry) {
            return Err(ConfigError::Invalid(format!(
                "public entry point '{}' is not an excluded route",
                entry
            )));
        }

        Ok(())
    }

    /// Save configuration to user config path
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::user_config_path().ok_or_else(|| {
            ConfigError::IoError("Could not determine user config directory".to_string())
        })?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml_string).map_err(|e| ConfigError::IoError(e.to_string()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        parse_table(DEFAULT_CONFIG, "default config")
            .and_then(Self::from_table)
            .unwrap_or_else(|_| Self {
                general: GeneralConfig::default(),
                routes: RoutesConfig::default(),
                session: SessionConfig::default(),
                logging: LoggingConfig::default(),
            })
    }
}

fn parse_table(contents: &str, what: &str) -> Result<toml::Table, ConfigError> {
    contents
        .parse::<toml::Table>()
        .map_err(|e| ConfigError::ParseError(format!("Failed to parse {}: {}", what, e)))
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    parse_table(&contents, &path.display().to_string())
}

/// Deep merge `overlay` into `base`; nested tables merge key by key, everything else is replaced
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let toml::Value::Table(incoming) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, incoming);
            continue;
        }
        base.insert(key, toml::Value::Table(incoming));
    }
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.general.app_name, "chatter");
        assert_eq!(config.routes.excluded, vec!["/login", "/signup"]);
        assert_eq!(config.routes.public_entry_point, "/login");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_graphql_endpoint() {
        let mut config = AppConfig::default();
        config.general.api_url = "https://chat.example.com/".to_string();
        assert_eq!(config.graphql_endpoint(), "https://chat.example.com/graphql");
    }

    #[test]
    fn test_overlay_only_replaces_named_keys() {
        let config = AppConfig::from_toml_str(
            r#"
            [general]
            api_url = "https://api.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.general.api_url, "https://api.example.com");
        assert_eq!(config.general.app_name, "chatter");
        assert_eq!(config.routes.excluded, vec!["/login", "/signup"]);
    }

    #[test]
    fn test_entry_point_must_be_excluded() {
        let err = AppConfig::from_toml_str(
            r#"
            [routes]
            public_entry_point = "/chats"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_excluded_route_must_be_absolute() {
        let err = AppConfig::from_toml_str(
            r#"
            [routes]
            excluded = ["/login", "signup"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("signup"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("[general\napi_url = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_merge_tables_is_deep() {
        let mut base: toml::Table = "[a]\nx = 1\ny = 2".parse().unwrap();
        let overlay: toml::Table = "[a]\ny = 3".parse().unwrap();
        merge_tables(&mut base, overlay);

        let a = base["a"].as_table().unwrap();
        assert_eq!(a["x"].as_integer(), Some(1));
        assert_eq!(a["y"].as_integer(), Some(3));
    }

    #[test]
    fn test_explicit_credential_file() {
        let mut config = AppConfig::default();
        config.session.credential_file = Some(PathBuf::from("/tmp/chatter-cred"));
        assert_eq!(config.credential_file_path(), PathBuf::from("/tmp/chatter-cred"));
    }
}
