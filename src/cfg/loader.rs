use eyre::{eyre, Result};
use log::{debug, warn};
use std::fs;
use std::path::Path;

use super::alias::Level;
use super::paths::Paths;
use super::store::AliasSet;
use crate::error::ErrorContext;

/// What is on disk for one level's alias file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileState {
    Missing,
    Valid(usize),
    Corrupt(String),
}

/// Reads and writes the per-level alias files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
    paths: Paths,
}

impl Loader {
    #[must_use]
    pub const fn new(paths: Paths) -> Self {
        Self { paths }
    }

    #[must_use]
    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Load one level's aliases.
    ///
    /// An absent, unreadable or malformed file yields an empty set. Use
    /// [`Loader::inspect`] to tell a corrupt file apart from a missing one.
    pub fn load(&self, level: Level) -> AliasSet {
        let path = self.paths.alias_file(level);
        match read_alias_file(&path) {
            Ok(Some(set)) => {
                debug!("Loaded {} {} aliases from {:?}", set.len(), level, path);
                set
            }
            Ok(None) => {
                debug!("Alias file doesn't exist: {:?}, starting empty", path);
                AliasSet::new()
            }
            Err(e) => {
                warn!("⚠️ Treating unreadable {} alias file {:?} as empty: {}", level, path, e);
                AliasSet::new()
            }
        }
    }

    pub fn inspect(&self, level: Level) -> FileState {
        match read_alias_file(&self.paths.alias_file(level)) {
            Ok(Some(set)) => FileState::Valid(set.len()),
            Ok(None) => FileState::Missing,
            Err(e) => FileState::Corrupt(e),
        }
    }

    /// Write one level's aliases as an indented JSON array.
    ///
    /// The level directory is created when missing; for the global level this
    /// usually needs elevated privileges and failure is returned to the caller.
    pub fn save(&self, level: Level, aliases: &AliasSet) -> Result<()> {
        let dir = self.paths.level_dir(level);
        fs::create_dir_all(dir).map_err(|e| {
            eyre!(ErrorContext::new(&format!("saving {} aliases", level))
                .with_file(dir)
                .to_directory_create_error(e))
        })?;

        let path = self.paths.alias_file(level);
        let content = serde_json::to_string_pretty(aliases).map_err(|e| {
            eyre!(ErrorContext::new(&format!("processing {} alias data", level)).to_serialize_error(e))
        })?;
        write_replacing(&path, &content).map_err(|e| {
            eyre!(ErrorContext::new("writing alias file")
                .with_file(&path)
                .with_context(&format!("{} level", level))
                .to_file_operation_error(e))
        })?;

        debug!("Saved {} {} aliases to: {:?}", aliases.len(), level, path);
        Ok(())
    }
}

// Ok(None) when the file does not exist; Err carries a printable reason otherwise.
fn read_alias_file(path: &Path) -> std::result::Result<Option<AliasSet>, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.to_string()),
    };
    serde_json::from_str(&content).map(Some).map_err(|e| e.to_string())
}

/// Write to a sibling temporary file first, then rename over the target
pub(crate) fn write_replacing(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::alias::Alias;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn loader_in(dir: &TempDir) -> Loader {
        Loader::new(Paths::new(
            dir.path(),
            dir.path().join("user"),
            dir.path().join("global"),
        ))
    }

    fn sample() -> AliasSet {
        vec![
            Alias::new("gs", "git status", Level::User),
            Alias::new("ll", "ls -la", Level::User),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let loader = loader_in(&dir);
        assert!(loader.load(Level::User).is_empty());
        assert_eq!(loader.inspect(Level::Global), FileState::Missing);
    }

    #[test]
    fn test_save_then_load_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let loader = loader_in(&dir);
        let aliases = sample();

        loader.save(Level::User, &aliases)?;
        assert_eq!(loader.load(Level::User), aliases);
        assert_eq!(loader.inspect(Level::User), FileState::Valid(2));
        Ok(())
    }

    #[test]
    fn test_empty_set_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let loader = loader_in(&dir);

        loader.save(Level::Global, &AliasSet::new())?;
        assert_eq!(fs::read_to_string(dir.path().join("global").join("aliases.json"))?, "[]");
        assert_eq!(loader.load(Level::Global), AliasSet::new());
        assert_eq!(loader.inspect(Level::Global), FileState::Valid(0));
        Ok(())
    }

    #[test]
    fn test_malformed_file_loads_empty_but_inspects_corrupt() -> Result<()> {
        let dir = TempDir::new()?;
        let loader = loader_in(&dir);
        fs::create_dir_all(dir.path().join("user"))?;
        fs::write(dir.path().join("user").join("aliases.json"), "[{\"name\": ")?;

        assert!(loader.load(Level::User).is_empty());
        assert!(matches!(loader.inspect(Level::User), FileState::Corrupt(_)));
        Ok(())
    }

    #[test]
    fn test_record_without_command_keeps_the_file_valid() -> Result<()> {
        let dir = TempDir::new()?;
        let loader = loader_in(&dir);
        fs::create_dir_all(dir.path().join("user"))?;
        fs::write(
            dir.path().join("user").join("aliases.json"),
            r#"[{"name":"gs","command":"git status","level":"user"},{"name":"half","level":"user"}]"#,
        )?;

        let loaded = loader.load(Level::User);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.find("gs").map(|a| a.command.as_str()), Some("git status"));
        assert_eq!(loaded.find("half").map(|a| a.command.as_str()), Some(""));
        assert_eq!(loader.inspect(Level::User), FileState::Valid(2));
        Ok(())
    }

    #[test]
    fn test_save_leaves_no_temp_file() -> Result<()> {
        let dir = TempDir::new()?;
        let loader = loader_in(&dir);
        loader.save(Level::User, &sample())?;

        let entries: Vec<_> = fs::read_dir(dir.path().join("user"))?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries, vec!["aliases.json".to_string()]);
        Ok(())
    }

    #[test]
    fn test_save_fails_when_dir_cannot_be_created() -> Result<()> {
        let dir = TempDir::new()?;
        // A regular file where the global directory should be
        let blocker = dir.path().join("global");
        fs::write(&blocker, "not a directory")?;
        let loader = loader_in(&dir);

        let err = loader.save(Level::Global, &sample()).unwrap_err();
        let qa = err.downcast_ref::<crate::error::QaError>();
        assert!(matches!(qa, Some(crate::error::QaError::DirectoryCreateError { .. })));
        Ok(())
    }
}
