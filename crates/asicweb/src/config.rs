//! Process configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default lifetime accepted for a session token: 30 days.
const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 86_400 * 30;

/// How startup treats unreadable templates or site configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupMode {
    /// Log the problem and continue with empty values.
    #[default]
    Degrade,
    /// Abort startup on the first problem.
    FailFast,
}

impl FromStr for StartupMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "fail-fast" | "failfast" | "strict" => Ok(Self::FailFast),
            other => anyhow::bail!("unknown startup mode '{other}' (expected degrade or fail-fast)"),
        }
    }
}

impl fmt::Display for StartupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrade => f.write_str("degrade"),
            Self::FailFast => f.write_str("fail-fast"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8000").
    pub bind_addr: String,

    /// Directory holding the page templates and `favicon.ico`.
    pub www_dir: PathBuf,

    /// Path of the site JSON file (greeting, username, device model).
    pub site_config_path: PathBuf,

    /// What to do when templates or the site JSON cannot be loaded.
    pub startup_mode: StartupMode,

    /// Oldest session token the codec still accepts.
    pub session_max_age: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            www_dir: PathBuf::from("www"),
            site_config_path: PathBuf::from("config.json"),
            startup_mode: StartupMode::Degrade,
            session_max_age: Duration::from_secs(DEFAULT_SESSION_MAX_AGE_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `ASICWEB_BIND_ADDR`: Server bind address (default: "0.0.0.0:8000")
    /// - `ASICWEB_WWW_DIR`: Template directory (default: "www")
    /// - `ASICWEB_SITE_CONFIG`: Site JSON file (default: "config.json")
    /// - `ASICWEB_STARTUP_MODE`: "degrade" or "fail-fast" (default: "degrade")
    /// - `ASICWEB_SESSION_MAX_AGE_SECS`: Max session token age (default: 30 days)
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = std::env::var("ASICWEB_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let www_dir = std::env::var("ASICWEB_WWW_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.www_dir);

        let site_config_path = std::env::var("ASICWEB_SITE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or(defaults.site_config_path);

        let startup_mode = match std::env::var("ASICWEB_STARTUP_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.startup_mode,
        };

        let session_max_age = match std::env::var("ASICWEB_SESSION_MAX_AGE_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| {
                    anyhow::anyhow!("ASICWEB_SESSION_MAX_AGE_SECS must be a number of seconds: {e}")
                })?;
                if secs == 0 {
                    anyhow::bail!("ASICWEB_SESSION_MAX_AGE_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            Err(_) => defaults.session_max_age,
        };

        tracing::info!(
            bind_addr = %bind_addr,
            www_dir = %www_dir.display(),
            site_config = %site_config_path.display(),
            startup_mode = %startup_mode,
            session_max_age_secs = session_max_age.as_secs(),
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            www_dir,
            site_config_path,
            startup_mode,
            session_max_age,
        })
    }
}
