use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// The persisted aggregate: connection settings plus replacement rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Which download client family the connection talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloaderType {
    #[default]
    QBittorrent,
    Transmission,
}

impl DownloaderType {
    pub const ALL: &[DownloaderType] = &[Self::QBittorrent, Self::Transmission];

    /// Default plain-HTTP port of the client's web interface.
    pub fn default_port(self) -> u16 {
        match self {
            Self::QBittorrent => 8080,
            Self::Transmission => 9091,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::QBittorrent => "qbittorrent",
            Self::Transmission => "transmission",
        }
    }
}

impl std::fmt::Display for DownloaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QBittorrent => write!(f, "qBittorrent"),
            Self::Transmission => write!(f, "Transmission"),
        }
    }
}

impl std::str::FromStr for DownloaderType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qbittorrent" | "qbit" | "qb" => Ok(Self::QBittorrent),
            "transmission" | "tr" => Ok(Self::Transmission),
            other => Err(CoreError::Config(format!("unknown downloader type: {other}"))),
        }
    }
}

/// Port a connection should use after its client or scheme changes.
pub fn default_port(downloader_type: DownloaderType, use_https: bool) -> u16 {
    if use_https {
        443
    } else {
        downloader_type.default_port()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub downloader_type: DownloaderType,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub use_https: bool,
}

impl ConnectionConfig {
    /// `scheme://host:port` without a trailing slash.
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host.trim(), self.port)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        AppConfig::default().connection
    }
}

/// A domain rename: every tracker URL containing `old_domain` gets it
/// swapped for `new_domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub old_domain: String,
    pub new_domain: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Rule {
    /// An empty, enabled placeholder row.
    pub fn blank() -> Self {
        Self {
            old_domain: String::new(),
            new_domain: String::new(),
            enabled: true,
        }
    }

    /// A new enabled rule that starts from an observed tracker domain.
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            old_domain: domain.into(),
            new_domain: String::new(),
            enabled: true,
        }
    }

    /// Both domain fields are empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.old_domain.trim().is_empty() && self.new_domain.trim().is_empty()
    }

    /// Enabled with a non-blank `old_domain`; only these take part in matching.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.old_domain.trim().is_empty()
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::blank()
    }
}

impl AppConfig {
    /// Load from the user config file, falling back to built-in defaults
    /// when the file does not exist yet.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path. A missing file yields the defaults; an
    /// unreadable or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| CoreError::Config(e.to_string()))?;
        toml::from_str(&content).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Save to the user config file.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::config_path())
    }

    /// Write to a sibling temp file, then rename it over `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "trackerrelo")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.connection.downloader_type, DownloaderType::QBittorrent);
        assert_eq!(config.connection.host, "127.0.0.1");
        assert_eq!(config.connection.port, 8080);
        assert_eq!(config.connection.username, "admin");
        assert!(config.connection.password.is_empty());
        assert!(!config.connection.use_https);
        assert_eq!(config.rules, vec![Rule::blank()]);
    }

    #[test]
    fn test_default_port() {
        assert_eq!(default_port(DownloaderType::QBittorrent, false), 8080);
        assert_eq!(default_port(DownloaderType::Transmission, false), 9091);
        assert_eq!(default_port(DownloaderType::QBittorrent, true), 443);
        assert_eq!(default_port(DownloaderType::Transmission, true), 443);
    }

    #[test]
    fn test_downloader_type_from_str() {
        assert_eq!(
            "Transmission".parse::<DownloaderType>().unwrap(),
            DownloaderType::Transmission
        );
        assert_eq!(
            "qbittorrent".parse::<DownloaderType>().unwrap(),
            DownloaderType::QBittorrent
        );
        assert!("deluge".parse::<DownloaderType>().is_err());
    }

    #[test]
    fn test_base_url() {
        let mut conn = ConnectionConfig::default();
        assert_eq!(conn.base_url(), "http://127.0.0.1:8080");
        conn.use_https = true;
        conn.port = 443;
        conn.host = " seedbox.example.org ".into();
        assert_eq!(conn.base_url(), "https://seedbox.example.org:443");
    }

    #[test]
    fn test_rule_predicates() {
        assert!(Rule::blank().is_blank());
        assert!(!Rule::blank().is_active());

        let rule = Rule {
            old_domain: "  ".into(),
            new_domain: "new.example.com".into(),
            enabled: true,
        };
        assert!(!rule.is_blank());
        assert!(!rule.is_active());

        let mut rule = Rule::for_domain("old.example.com");
        assert!(rule.is_active());
        rule.enabled = false;
        assert!(!rule.is_active());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.connection.downloader_type = DownloaderType::Transmission;
        config.connection.port = 9091;
        config.rules = vec![
            Rule {
                old_domain: "old.example.com".into(),
                new_domain: "new.example.com".into(),
                enabled: true,
            },
            Rule {
                old_domain: "tracker.dead.net".into(),
                new_domain: String::new(),
                enabled: false,
            },
        ];
        config.save_to(&path).unwrap();

        assert!(!path.with_extension("toml.tmp").exists());
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "connection = [this is not toml").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_optional_fields_default() {
        let toml = r#"
            [connection]
            downloader_type = "transmission"
            host = "nas.local"
            port = 9091
            username = ""
            password = ""

            [[rules]]
            old_domain = "a.com"
            new_domain = "b.com"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert!(!config.connection.use_https);
        assert!(config.rules[0].enabled);
    }
}
