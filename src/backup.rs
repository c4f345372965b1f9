//! Timestamped alias snapshots with count-bounded retention.
//!
//! Backups of both levels share one directory. File names embed a fixed-width
//! minute-resolution timestamp (`backup_YYYYMMDD_HHMM.json`), so sorting the
//! names sorts them chronologically. Two backups taken within the same minute
//! overwrite each other.

use chrono::{Local, NaiveDateTime};
use eyre::{eyre, Result};
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::PathBuf;

use crate::cfg::alias::Level;
use crate::cfg::store::AliasSet;
use crate::error::ErrorContext;

/// Number of backups kept after pruning
pub const MAX_BACKUPS: usize = 5;

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

lazy_static! {
    static ref BACKUP_NAME: Regex = Regex::new(r"^backup_\d{8}_\d{4}\.json$").unwrap();
}

#[must_use]
pub fn backup_file_name(when: NaiveDateTime) -> String {
    format!("backup_{}.json", when.format(BACKUP_TIMESTAMP_FORMAT))
}

#[must_use]
pub fn is_backup_file_name(name: &str) -> bool {
    BACKUP_NAME.is_match(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupManager {
    dir: PathBuf,
    retain: usize,
}

impl BackupManager {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_retention(dir, MAX_BACKUPS)
    }

    #[must_use]
    pub fn with_retention<P: Into<PathBuf>>(dir: P, retain: usize) -> Self {
        Self { dir: dir.into(), retain }
    }

    /// Snapshot `aliases` (the current state of `level`) and prune old backups
    pub fn create_backup(&self, level: Level, aliases: &AliasSet) -> Result<PathBuf> {
        self.create_backup_at(level, aliases, Local::now().naive_local())
    }

    pub fn create_backup_at(&self, level: Level, aliases: &AliasSet, when: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            eyre!(ErrorContext::new("creating backup directory")
                .with_file(&self.dir)
                .to_directory_create_error(e))
        })?;

        let path = self.dir.join(backup_file_name(when));
        let content = serde_json::to_string_pretty(aliases).map_err(|e| {
            eyre!(ErrorContext::new("processing backup data").to_serialize_error(e))
        })?;
        fs::write(&path, content).map_err(|e| {
            eyre!(ErrorContext::new("writing backup file")
                .with_file(&path)
                .with_context(&format!("{} level", level))
                .to_file_operation_error(e))
        })?;
        info!("💾 Backed up {} {} aliases to {:?}", aliases.len(), level, path);

        match self.prune() {
            Ok(removed) if !removed.is_empty() => debug!("Pruned {} old backups", removed.len()),
            Ok(_) => {}
            Err(e) => warn!("⚠️ Could not prune old backups: {}", e),
        }

        Ok(path)
    }

    /// Delete all but the newest backups, regardless of which level wrote them.
    /// Individual deletion failures are logged and skipped.
    pub fn prune(&self) -> Result<Vec<PathBuf>> {
        let names = self.list_backups()?;
        if names.len() <= self.retain {
            return Ok(Vec::new());
        }

        let excess = names.len() - self.retain;
        let mut removed = Vec::with_capacity(excess);
        for name in &names[..excess] {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => removed.push(path),
                Err(e) => warn!("⚠️ Could not remove old backup {:?}: {}", path, e),
            }
        }
        Ok(removed)
    }

    /// Backup file names, oldest first. A missing directory means no backups.
    pub fn list_backups(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(eyre!(ErrorContext::new("listing backups")
                    .with_file(&self.dir)
                    .to_file_operation_error(e)))
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_backup_file_name(name))
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::alias::Alias;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn base_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 31)
            .unwrap()
            .and_hms_opt(23, 57, 0)
            .unwrap()
    }

    fn sample() -> AliasSet {
        vec![Alias::new("gs", "git status", Level::User)].into_iter().collect()
    }

    #[test]
    fn test_backup_file_name_format() {
        assert_eq!(backup_file_name(base_time()), "backup_20241231_2357.json");
        assert!(is_backup_file_name("backup_20241231_2357.json"));
        assert!(!is_backup_file_name("backup_latest.json"));
        assert!(!is_backup_file_name("backup_20241231_2357.json.tmp"));
    }

    #[test]
    fn test_create_backup_writes_snapshot() -> Result<()> {
        let dir = TempDir::new()?;
        let manager = BackupManager::new(dir.path().join("backups"));

        let path = manager.create_backup_at(Level::User, &sample(), base_time())?;
        let restored: AliasSet = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(restored, sample());
        Ok(())
    }

    #[test]
    fn test_same_minute_overwrites() -> Result<()> {
        let dir = TempDir::new()?;
        let manager = BackupManager::new(dir.path());

        manager.create_backup_at(Level::User, &sample(), base_time())?;
        manager.create_backup_at(Level::Global, &AliasSet::new(), base_time() + Duration::seconds(30))?;

        let names = manager.list_backups()?;
        assert_eq!(names, vec!["backup_20241231_2357.json".to_string()]);
        assert_eq!(fs::read_to_string(dir.path().join(&names[0]))?, "[]");
        Ok(())
    }

    #[test]
    fn test_retention_keeps_newest_five() -> Result<()> {
        let dir = TempDir::new()?;
        let manager = BackupManager::new(dir.path());

        let times: Vec<_> = (0..8).map(|i| base_time() + Duration::minutes(i)).collect();
        for when in &times {
            manager.create_backup_at(Level::User, &sample(), *when)?;
        }

        let expected: Vec<String> = times[3..].iter().map(|t| backup_file_name(*t)).collect();
        assert_eq!(manager.list_backups()?, expected);
        Ok(())
    }

    #[test]
    fn test_prune_ignores_unrelated_files() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("notes.txt"), "keep me")?;
        fs::write(dir.path().join("backup_manual.json"), "[]")?;
        let manager = BackupManager::with_retention(dir.path(), 1);

        manager.create_backup_at(Level::User, &sample(), base_time())?;
        manager.create_backup_at(Level::Global, &sample(), base_time() + Duration::minutes(1))?;

        assert_eq!(manager.list_backups()?.len(), 1);
        assert!(dir.path().join("notes.txt").exists());
        assert!(dir.path().join("backup_manual.json").exists());
        Ok(())
    }

    #[test]
    fn test_list_backups_missing_dir_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let manager = BackupManager::new(dir.path().join("never-created"));
        assert!(manager.list_backups()?.is_empty());
        Ok(())
    }
}
