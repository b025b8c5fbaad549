use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use course_engine::{
    EngineConfig, TransportSettings, DEFAULT_API_BASE, DEFAULT_PAGE_SIZE, DEFAULT_SITE_BASE,
    PROGRESS_FILENAME,
};
use engine_logging::{engine_debug, engine_info, engine_warn};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "harvester.ron";
const DEFAULT_OUTPUT_DIR: &str = "Downloads";
const DEFAULT_COOKIE_FILE: &str = "cookie.txt";

/// Optional settings file. Every field falls back to its default, and CLI
/// flags win over whatever the file says.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base: String,
    pub site_base: String,
    pub output_dir: PathBuf,
    pub progress_file: PathBuf,
    pub cookie_file: PathBuf,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub redirect_limit: usize,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let transport = TransportSettings::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            site_base: DEFAULT_SITE_BASE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            progress_file: PathBuf::from(PROGRESS_FILENAME),
            cookie_file: PathBuf::from(DEFAULT_COOKIE_FILE),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            read_timeout_secs: transport.read_timeout.as_secs(),
            redirect_limit: transport.redirect_limit,
            user_agent: None,
            referer: Some(DEFAULT_SITE_BASE.to_string()),
        }
    }
}

impl Settings {
    /// Reads `path`. A missing file means defaults; an unreadable or
    /// malformed one is reported and also falls back to defaults.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                engine_debug!("No settings file at {:?}, using defaults", path);
                return Self::default();
            }
            Err(err) => {
                engine_warn!("Failed to read settings from {:?}: {}", path, err);
                return Self::default();
            }
        };

        match ron::from_str(&content) {
            Ok(settings) => {
                engine_info!("Loaded settings from {:?}", path);
                settings
            }
            Err(err) => {
                engine_warn!("Failed to parse settings from {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn transport_settings(&self, bearer_token: String) -> TransportSettings {
        let defaults = TransportSettings::default();
        TransportSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            redirect_limit: self.redirect_limit,
            bearer_token: Some(bearer_token),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            referer: self.referer.clone(),
        }
    }

    pub fn engine_config(&self, output_dir: PathBuf, progress_file: PathBuf) -> Result<EngineConfig> {
        let api_base = Url::parse(&self.api_base)
            .with_context(|| format!("invalid api_base `{}`", self.api_base))?;
        let site_base = Url::parse(&self.site_base)
            .with_context(|| format!("invalid site_base `{}`", self.site_base))?;

        let mut config = EngineConfig::new(api_base, site_base, output_dir);
        config.progress_file = progress_file;
        config.page_size = self.page_size.max(1);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::Settings;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let settings = Settings::load(&temp.path().join("absent.ron"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.output_dir, PathBuf::from("Downloads"));
        assert_eq!(settings.cookie_file, PathBuf::from("cookie.txt"));
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("harvester.ron");
        fs::write(
            &path,
            r#"(output_dir: "library", page_size: 20, user_agent: Some("harvester/1.0"))"#,
        )
        .unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.output_dir, PathBuf::from("library"));
        assert_eq!(settings.page_size, 20);
        assert_eq!(settings.api_base, Settings::default().api_base);

        let transport = settings.transport_settings("tok".into());
        assert_eq!(transport.user_agent, "harvester/1.0");
        assert_eq!(transport.bearer_token.as_deref(), Some("tok"));
        assert_eq!(transport.read_timeout, Duration::from_secs(60));
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("harvester.ron");
        fs::write(&path, "(output_dir: ").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let settings = Settings {
            api_base: "not a url".into(),
            ..Settings::default()
        };
        let err = settings
            .engine_config(PathBuf::from("out"), PathBuf::from("progress.json"))
            .unwrap_err();
        assert!(err.to_string().contains("api_base"));
    }

    #[test]
    fn engine_config_uses_given_paths() {
        let config = Settings::default()
            .engine_config(PathBuf::from("out"), PathBuf::from("state/progress.json"))
            .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.progress_file, PathBuf::from("state/progress.json"));
        assert_eq!(config.page_size, 50);
    }
}
