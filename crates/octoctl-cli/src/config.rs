//! Configuration loading and types

use std::path::{Path, PathBuf};

use eyre::{WrapErr, eyre};
use octoctl_client::{ClientConfig, ResumeMode};
use serde::{Deserialize, Serialize};

/// Environment variable pointing at a configuration file
pub const CONFIG_ENV: &str = "OCTOCTL_CONFIG";

/// Top-level configuration for octoctl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level used when neither `RUST_LOG` nor `-v` is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Server connection settings
    #[serde(default)]
    pub printer: PrinterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            printer: PrinterConfig::default(),
        }
    }
}

/// Server connection settings; command-line values take precedence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
    /// Body sent by `--resume`
    #[serde(default)]
    pub resume_mode: ResumeMode,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Find the configuration file to use, if any
    ///
    /// An explicit path wins, then `$OCTOCTL_CONFIG`; both must exist. Otherwise
    /// `./octoctl.toml` and `<config dir>/octoctl/octoctl.toml` are tried.
    ///
    /// # Errors
    /// Returns error if an explicitly requested file does not exist
    pub fn locate(explicit: Option<&Path>) -> eyre::Result<Option<PathBuf>> {
        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        if let Some(path) = requested {
            if !path.exists() {
                return Err(eyre!("config file {} does not exist", path.display()));
            }
            return Ok(Some(path));
        }

        let mut paths = vec![PathBuf::from("octoctl.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("octoctl/octoctl.toml"));
        }

        Ok(paths.into_iter().find(|path| path.exists()))
    }

    /// Merge command-line overrides into the file settings
    ///
    /// # Errors
    /// Returns error if host, port or API key is given in neither place
    pub fn client_config(
        &self,
        host: Option<String>,
        port: Option<u16>,
        api_key: Option<String>,
    ) -> eyre::Result<ClientConfig> {
        let host = host
            .or_else(|| self.printer.host.clone())
            .ok_or_else(|| eyre!("no host given: pass --host or set printer.host"))?;
        let port = port
            .or(self.printer.port)
            .ok_or_else(|| eyre!("no port given: pass --port or set printer.port"))?;
        let api_key = api_key
            .or_else(|| self.printer.api_key.clone())
            .ok_or_else(|| eyre!("no API key given: pass --apikey or set printer.api_key"))?;

        Ok(ClientConfig::new(host, port, api_key))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            log_level = "debug"

            [printer]
            host = "octopi.local"
            port = 5000
            api_key = "ABC123"
            resume_mode = "explicit"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.printer.host.as_deref(), Some("octopi.local"));
        assert_eq!(config.printer.port, Some(5000));
        assert_eq!(config.printer.api_key.as_deref(), Some("ABC123"));
        assert_eq!(config.printer.resume_mode, ResumeMode::Explicit);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "warn");
        assert!(config.printer.host.is_none());
        assert_eq!(config.printer.resume_mode, ResumeMode::Toggle);
    }

    #[test]
    fn test_command_line_overrides_file() {
        let config: Config = toml::from_str(
            r#"
            [printer]
            host = "octopi.local"
            port = 80
            api_key = "FROM_FILE"
            "#,
        )
        .unwrap();

        let client = config
            .client_config(Some("10.0.0.5".into()), None, None)
            .unwrap();
        assert_eq!(client.host(), "10.0.0.5");
        assert_eq!(client.port(), 80);
        assert_eq!(client.api_key(), "FROM_FILE");
    }

    #[test]
    fn test_missing_settings() {
        let config = Config::default();
        assert!(config.client_config(None, Some(80), Some("key".into())).is_err());
        assert!(
            config
                .client_config(Some("octopi".into()), None, Some("key".into()))
                .is_err()
        );
        assert!(config.client_config(Some("octopi".into()), Some(80), None).is_err());
        assert!(
            config
                .client_config(Some("octopi".into()), Some(80), Some("key".into()))
                .is_ok()
        );
    }

    #[test]
    fn test_load_and_locate_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[printer]\nhost = \"octopi\"\nport = 8080").unwrap();

        let located = Config::locate(Some(file.path())).unwrap();
        assert_eq!(located.as_deref(), Some(file.path()));

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.printer.port, Some(8080));
    }

    #[test]
    fn test_locate_missing_explicit_file() {
        assert!(Config::locate(Some(Path::new("/nonexistent/octoctl.toml"))).is_err());
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[printer]\nport = \"not a number\"").unwrap();

        assert!(Config::load(file.path()).is_err());
    }
}
