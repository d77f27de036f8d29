use crate::error::{JoinError, JoinResult};
use crate::models::{NotificationPosition, User};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "join-tui";

/// Runtime settings, read from `config.toml` and overridden by `JOIN_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub api_endpoint: String,
    pub poll_interval_secs: u64,
    pub notification_ms: u64,
    pub notification_position: NotificationPosition,
    pub guest_email: Option<String>,
    pub guest_password: Option<String>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: "http://localhost:8000/".to_string(),
            api_endpoint: "api/v1/".to_string(),
            poll_interval_secs: 10,
            notification_ms: 4000,
            notification_position: NotificationPosition::TopRight,
            guest_email: None,
            guest_password: None,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Loads the user's config file (if any) and applies environment overrides.
    pub fn load() -> JoinResult<Config> {
        let mut config = match Config::default_path() {
            Some(path) => Config::load_from(&path)?,
            None => Config::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> JoinResult<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("JOIN_API_URL") {
            self.api_url = url;
        }
        if let Some(email) = lookup("JOIN_GUEST_EMAIL") {
            self.guest_email = Some(email);
        }
        if let Some(password) = lookup("JOIN_GUEST_PASSWORD") {
            self.guest_password = Some(password);
        }
        if let Some(level) = lookup("JOIN_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> JoinResult<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(JoinError::Config(format!(
                "api_url must start with http:// or https://, got `{}`",
                self.api_url
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(JoinError::Config(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `api_url` and `api_endpoint` joined with exactly one slash, ending in a slash.
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}/",
            self.api_url.trim_end_matches('/'),
            self.api_endpoint.trim_matches('/')
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn guest_credentials(&self) -> Option<(&str, &str)> {
        match (&self.guest_email, &self.guest_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| data_dir().join("logs"))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
}

/// Keeps the logged-in user between runs so the login page can be skipped.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        SessionStore { path }
    }

    pub fn default_location() -> Self {
        SessionStore::new(data_dir().join("session.toml"))
    }

    pub fn load(&self) -> JoinResult<Option<User>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(toml::from_str(&raw)?))
    }

    pub fn save(&self, user: &User) -> JoinResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string(user)?)?;
        Ok(())
    }

    pub fn clear(&self) -> JoinResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url(), "http://localhost:8000/api/v1/");
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"https://join.example.com\"\npoll_interval_secs = 30\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url(), "https://join.example.com/api/v1/");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.notification_ms, 4000);
        assert_eq!(config.notification_position, NotificationPosition::TopRight);
    }

    #[test]
    fn test_notification_position_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "notification_position = \"bottom-left\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.notification_position, NotificationPosition::BottomLeft);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(JoinError::TomlRead(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("JOIN_API_URL", "http://10.0.0.2:8000"),
            ("JOIN_GUEST_EMAIL", "guest@join.dev"),
            ("JOIN_GUEST_PASSWORD", "guestguest"),
        ]
        .into_iter()
        .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.api_url, "http://10.0.0.2:8000");
        assert_eq!(
            config.guest_credentials(),
            Some(("guest@join.dev", "guestguest"))
        );
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config {
            api_url: "localhost:8000".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.api_url = "http://localhost:8000".to_string();
        config.poll_interval_secs = 0;
        assert!(config.validate().is_err());
        config.poll_interval_secs = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_store_roundtrip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.toml"));
        assert_eq!(store.load().unwrap(), None);

        let user = User {
            id: 5,
            token: "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b".to_string(),
            username: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };
        store.save(&user).unwrap();
        assert_eq!(store.load().unwrap(), Some(user));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }
}
