use eyre::{eyre, Result};
use std::path::{Path, PathBuf};

use super::alias::Level;
use crate::error::QaError;

/// File name of the alias list at each level
pub const ALIASES_FILE: &str = "aliases.json";
/// File name of the application config inside the user directory
pub const CONFIG_FILE: &str = "config.json";
/// Backup directory name inside the user directory
pub const BACKUP_DIR: &str = "backups";

pub const USER_CONFIG_DIR: &str = ".config/quickalias";
pub const GLOBAL_CONFIG_DIR: &str = "/etc/quickalias";

pub const USER_DIR_ENV: &str = "QUICKALIAS_USER_DIR";
pub const GLOBAL_DIR_ENV: &str = "QUICKALIAS_GLOBAL_DIR";

/// Locations of everything the tool reads and writes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    pub home_dir: PathBuf,
    pub user_dir: PathBuf,
    pub global_dir: PathBuf,
}

impl Paths {
    pub fn new<H, U, G>(home_dir: H, user_dir: U, global_dir: G) -> Self
    where
        H: Into<PathBuf>,
        U: Into<PathBuf>,
        G: Into<PathBuf>,
    {
        Self {
            home_dir: home_dir.into(),
            user_dir: user_dir.into(),
            global_dir: global_dir.into(),
        }
    }

    /// Standard locations, honoring the directory override variables
    pub fn discover() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| eyre!(QaError::HomeNotFound))?;
        Ok(Self::from_home(&home_dir))
    }

    pub fn from_home(home_dir: &Path) -> Self {
        let user_dir = std::env::var_os(USER_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir.join(USER_CONFIG_DIR));
        let global_dir = std::env::var_os(GLOBAL_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(GLOBAL_CONFIG_DIR));
        Self::new(home_dir, user_dir, global_dir)
    }

    #[must_use]
    pub fn level_dir(&self, level: Level) -> &Path {
        match level {
            Level::User => &self.user_dir,
            Level::Global => &self.global_dir,
        }
    }

    #[must_use]
    pub fn alias_file(&self, level: Level) -> PathBuf {
        self.level_dir(level).join(ALIASES_FILE)
    }

    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.user_dir.join(BACKUP_DIR)
    }

    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.user_dir.join(CONFIG_FILE)
    }

    #[must_use]
    pub fn default_export_path(&self) -> PathBuf {
        self.home_dir.join("quickalias_export.json")
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.home_dir.join(".local").join("share").join("quickalias").join("logs")
    }
}
