//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Silverline portal base URL
    pub portal_url: String,

    /// API key sent as the X-Authorization-Token header
    #[serde(default)]
    pub api_key: String,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Validate the portal's TLS certificate
    pub verify_tls: bool,

    /// Honor system proxy settings
    pub proxy: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            portal_url: "https://portal.f5silverline.com".to_string(),
            api_key: String::new(),
            output_format: "table".to_string(),
            verbose: false,
            timeout: 30,
            verify_tls: true,
            proxy: false,
        }
    }
}

impl CliConfig {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file; the file must exist and parse.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(&config_path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config")
        } else {
            return Err(anyhow::anyhow!("Cannot determine config directory"));
        };

        Ok(config_dir.join("silverline").join("cli.toml"))
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    portal_url: Option<String>,
    api_key: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
    verify_tls: Option<bool>,
    proxy: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set portal URL (with validation)
    pub fn with_portal_url(mut self, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        Self::validate_url(&url)?;
        self.portal_url = Some(url);
        Ok(self)
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Set TLS certificate validation flag
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = Some(verify);
        self
    }

    /// Set whether system proxy settings are honored
    pub fn with_proxy(mut self, proxy: bool) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Load configuration from file
    ///
    /// With an explicit `path` the file must exist and parse; the default
    /// location is best-effort and silently skipped when unusable.
    pub fn with_config_file(self, path: Option<&Path>, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }

        let config = match path {
            Some(path) => Some(CliConfig::load_from(path)?),
            None => CliConfig::load().ok(),
        };
        let Some(config) = config else {
            return Ok(self);
        };

        let builder = self;
        // Only use file values if they weren't already set (preserving priority)
        Ok(Self {
            portal_url: builder.portal_url.or(Some(config.portal_url)),
            api_key: builder.api_key.or(Some(config.api_key)),
            output_format: builder.output_format.or(Some(config.output_format)),
            verbose: builder.verbose.or(Some(config.verbose)),
            timeout: builder.timeout.or(Some(config.timeout)),
            verify_tls: builder.verify_tls.or(Some(config.verify_tls)),
            proxy: builder.proxy.or(Some(config.proxy)),
        })
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        // Only apply env vars if values weren't already set (preserving priority)
        if self.portal_url.is_none() {
            if let Ok(url) = std::env::var("SILVERLINE_SERVER") {
                if Self::validate_url(&url).is_ok() {
                    self.portal_url = Some(url);
                }
            }
        }

        if self.api_key.is_none() {
            if let Ok(key) = std::env::var("SILVERLINE_TOKEN") {
                self.api_key = Some(key);
            }
        }

        if self.output_format.is_none() {
            if let Ok(format) = std::env::var("SILVERLINE_FORMAT") {
                if Self::validate_output_format(&format).is_ok() {
                    self.output_format = Some(format);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var("SILVERLINE_VERBOSE") {
                self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
            }
        }

        if self.timeout.is_none() {
            if let Ok(timeout) = std::env::var("SILVERLINE_TIMEOUT") {
                if let Ok(timeout) = timeout.parse() {
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout = Some(timeout);
                    }
                }
            }
        }

        if self.verify_tls.is_none() {
            if let Ok(verify) = std::env::var("SILVERLINE_VERIFY_TLS") {
                self.verify_tls = Some(verify.to_lowercase() != "false" && verify != "0");
            }
        }

        if self.proxy.is_none() {
            if let Ok(proxy) = std::env::var("SILVERLINE_PROXY") {
                self.proxy = Some(proxy.to_lowercase() == "true" || proxy == "1");
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let portal_url = self.portal_url.unwrap_or(defaults.portal_url);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        // Validate final values
        Self::validate_url(&portal_url)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            portal_url,
            api_key: self.api_key.unwrap_or(defaults.api_key),
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
            verify_tls: self.verify_tls.unwrap_or(defaults.verify_tls),
            proxy: self.proxy.unwrap_or(defaults.proxy),
        })
    }

    /// Validate URL format
    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(anyhow::anyhow!("Portal URL cannot be empty"));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Portal URL must start with http:// or https://"
            ));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "SILVERLINE_SERVER",
            "SILVERLINE_TOKEN",
            "SILVERLINE_FORMAT",
            "SILVERLINE_VERBOSE",
            "SILVERLINE_TIMEOUT",
            "SILVERLINE_VERIFY_TLS",
            "SILVERLINE_PROXY",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.portal_url, "https://portal.f5silverline.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.output_format, "table");
        assert!(!config.verbose);
        assert_eq!(config.timeout, 30);
        assert!(config.verify_tls);
        assert!(!config.proxy);
    }

    #[test]
    fn test_config_serialization() {
        let config = CliConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: CliConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_parse_without_api_key() {
        // api_key is optional in the file; it usually comes from the env
        let parsed: CliConfig = toml::from_str(
            r#"
            portal_url = "https://portal.f5silverline.com"
            output_format = "table"
            verbose = false
            timeout = 30
            verify_tls = true
            proxy = false
            "#,
        )
        .unwrap();
        assert!(parsed.api_key.is_empty());
    }

    #[test]
    #[serial]
    fn test_builder_with_defaults() {
        clear_env();
        let config = ConfigBuilder::new().build().unwrap();
        let defaults = CliConfig::default();
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_builder_with_custom_values() {
        let config = ConfigBuilder::new()
            .with_portal_url("https://silverline.example.com")
            .unwrap()
            .with_api_key("secret")
            .with_output_format("json")
            .unwrap()
            .with_verbose(true)
            .with_timeout(60)
            .unwrap()
            .with_verify_tls(false)
            .with_proxy(true)
            .build()
            .unwrap();

        assert_eq!(config.portal_url, "https://silverline.example.com");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.output_format, "json");
        assert!(config.verbose);
        assert_eq!(config.timeout, 60);
        assert!(!config.verify_tls);
        assert!(config.proxy);
    }

    #[test]
    fn test_builder_url_validation() {
        assert!(ConfigBuilder::new().with_portal_url("").is_err());
        assert!(ConfigBuilder::new()
            .with_portal_url("ftp://example.com")
            .is_err());

        assert!(ConfigBuilder::new()
            .with_portal_url("http://localhost:8080")
            .is_ok());
        assert!(ConfigBuilder::new()
            .with_portal_url("https://portal.f5silverline.com")
            .is_ok());
    }

    #[test]
    fn test_builder_format_validation() {
        assert!(ConfigBuilder::new().with_output_format("xml").is_err());
        assert!(ConfigBuilder::new().with_output_format("csv").is_err());

        assert!(ConfigBuilder::new().with_output_format("table").is_ok());
        assert!(ConfigBuilder::new().with_output_format("json").is_ok());
    }

    #[test]
    fn test_builder_timeout_validation() {
        assert!(ConfigBuilder::new().with_timeout(0).is_err());
        assert!(ConfigBuilder::new().with_timeout(301).is_err());

        assert!(ConfigBuilder::new().with_timeout(1).is_ok());
        assert!(ConfigBuilder::new().with_timeout(300).is_ok());
    }

    #[test]
    #[serial]
    fn test_config_file_round_trip() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        let config = CliConfig {
            portal_url: "https://file.example.com".to_string(),
            ..CliConfig::default()
        };
        config.save().unwrap();

        let loaded = CliConfig::load().unwrap();
        assert_eq!(loaded, config);

        std::env::remove_var("XDG_CONFIG_HOME");
    }

    #[test]
    fn test_builder_with_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        let file_config = CliConfig {
            portal_url: "https://file.example.com".to_string(),
            timeout: 45,
            ..CliConfig::default()
        };
        std::fs::write(&path, toml::to_string_pretty(&file_config).unwrap()).unwrap();

        // A value set earlier in the chain still wins over the file
        let config = ConfigBuilder::new()
            .with_portal_url("https://cli.example.com")
            .unwrap()
            .with_config_file(Some(&path), true)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.portal_url, "https://cli.example.com");
        assert_eq!(config.timeout, 45);
    }

    #[test]
    fn test_builder_missing_explicit_config_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");

        assert!(ConfigBuilder::new()
            .with_config_file(Some(&path), true)
            .is_err());

        // --no-config short-circuits even an explicit path
        assert!(ConfigBuilder::new()
            .with_config_file(Some(&path), false)
            .is_ok());
    }

    #[test]
    #[serial]
    fn test_builder_with_env_overrides() {
        clear_env();

        std::env::set_var("SILVERLINE_SERVER", "https://env.example.com");
        std::env::set_var("SILVERLINE_TOKEN", "env-token");
        std::env::set_var("SILVERLINE_FORMAT", "json");
        std::env::set_var("SILVERLINE_VERBOSE", "true");
        std::env::set_var("SILVERLINE_TIMEOUT", "25");
        std::env::set_var("SILVERLINE_VERIFY_TLS", "false");
        std::env::set_var("SILVERLINE_PROXY", "1");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        assert_eq!(config.portal_url, "https://env.example.com");
        assert_eq!(config.api_key, "env-token");
        assert_eq!(config.output_format, "json");
        assert!(config.verbose);
        assert_eq!(config.timeout, 25);
        assert!(!config.verify_tls);
        assert!(config.proxy);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_priority_chain() {
        clear_env();

        std::env::set_var("SILVERLINE_SERVER", "https://env.example.com");
        std::env::set_var("SILVERLINE_TIMEOUT", "25");

        // CLI args should override env vars
        let config = ConfigBuilder::new()
            .with_portal_url("https://cli.example.com")
            .unwrap()
            .with_env_overrides()
            .build()
            .unwrap();

        // CLI arg wins
        assert_eq!(config.portal_url, "https://cli.example.com");
        // Env var applies for timeout
        assert_eq!(config.timeout, 25);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_builder_invalid_env_values_ignored() {
        clear_env();

        std::env::set_var("SILVERLINE_TIMEOUT", "invalid");
        std::env::set_var("SILVERLINE_FORMAT", "xml");

        let config = ConfigBuilder::new().with_env_overrides().build().unwrap();

        // Should fall back to defaults
        assert_eq!(config.timeout, 30);
        assert_eq!(config.output_format, "table");

        clear_env();
    }
}
