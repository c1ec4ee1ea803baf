//! Application configuration

use crate::utils::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Interface to listen on
    pub host: String,

    /// Listening port
    pub port: u16,

    /// Root under which per-request work directories are created
    pub download_dir: PathBuf,

    /// Append-only text log
    pub log_file: PathBuf,

    /// Explicit yt-dlp binary, skips discovery when set
    pub ytdlp_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            download_dir: PathBuf::from("downloads"),
            log_file: PathBuf::from("app.log"),
            ytdlp_path: None,
        }
    }
}

impl AppSettings {
    /// Address string handed to the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.host.trim().is_empty() {
            return Err(ServiceError::InvalidConfig("host must not be empty".into()));
        }
        if self.download_dir.as_os_str().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "download directory must not be empty".into(),
            ));
        }
        if self.log_file.file_name().is_none() {
            return Err(ServiceError::InvalidConfig(format!(
                "log file {} has no file name",
                self.log_file.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppSettings::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_empty_values() {
        let mut config = AppSettings::default();
        config.download_dir = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ServiceError::InvalidConfig(_))
        ));

        let mut config = AppSettings::default();
        config.host = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppSettings::default();
        config.log_file = PathBuf::from("/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serializes() {
        let config = AppSettings::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bind_addr(), config.bind_addr());
    }
}
