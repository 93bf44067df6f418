use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Fetch-related constants
// =============================================================================

/// Default base URL of the ALT Linux repository database API
pub const DEFAULT_API_URL: &str = "https://rdb.altlinux.org/api";

/// Default name of the development branch
pub const DEFAULT_SISYPHUS_BRANCH: &str = "sisyphus";

/// Default name of the stable branch
pub const DEFAULT_P11_BRANCH: &str = "p11";

/// Timeout for a single branch fetch in milliseconds (60 seconds)
///
/// Full branch exports are tens of megabytes, so this is well above a
/// typical API round-trip.
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings handed to the branch fetcher
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Base URL of the repository database API
    pub api_url: String,
    pub branches: BranchNames,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            branches: BranchNames::default(),
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: format!("branch-diff/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, using defaults for missing fields
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Branch names as known to the repository database
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BranchNames {
    pub sisyphus: String,
    pub p11: String,
}

impl Default for BranchNames {
    fn default() -> Self {
        Self {
            sisyphus: DEFAULT_SISYPHUS_BRANCH.to_string(),
            p11: DEFAULT_P11_BRANCH.to_string(),
        }
    }
}

/// Returns the path to the data directory for branch-diff.
/// Uses $XDG_DATA_HOME/branch-diff if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/branch-diff,
/// or ./branch-diff if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("branch-diff.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("branch-diff")
}
