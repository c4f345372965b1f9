use eyre::{eyre, Result};
use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::path::Path;

pub mod backup;
pub mod cfg;
pub mod display;
pub mod error;
pub mod prompt;
pub mod resolve;
pub mod shell;
pub mod transfer;

use backup::BackupManager;
use cfg::config::Config;
use cfg::loader::{FileState, Loader};
use resolve::{Listing, SearchReport};
use shell::{Integration, Shell};

// Re-export for the binary and integration tests
pub use cfg::alias::{Alias, Level};
pub use cfg::paths::Paths;
pub use cfg::store::AliasSet;
pub use error::{ErrorContext, QaError};
pub use prompt::{AssumeYes, Prompt};

/// Log to stderr instead of the log file when set
pub const DEBUG_ENV: &str = "QUICKALIAS_DEBUG";

pub fn setup_logging(paths: &Paths) -> Result<()> {
    if std::env::var_os(DEBUG_ENV).is_some() {
        // Never stdout: `qq init` output is evaluated by the shell
        env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "debug"))
            .target(env_logger::Target::Stderr)
            .init();
    } else {
        let log_dir = paths.log_dir();

        fs::create_dir_all(&log_dir)?;
        let log_file_path = log_dir.join("quickalias.log");

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)?;

        env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"))
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Cancelled,
    Added {
        name: String,
        level: Level,
        /// Level of the alias that was found under this name before the write
        replaced: Option<Level>,
        /// A user alias of the same name still takes precedence over this global one
        shadowed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    NotFound { name: String, level: Level },
    Removed {
        name: String,
        level: Level,
        /// Global alias that becomes active now that the user alias is gone
        now_active: Option<Alias>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Cancelled,
    Imported { total: usize, user: usize, global: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Cancelled,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub user_count: usize,
    pub global_count: usize,
    pub conflicts: Vec<String>,
    pub initialized: bool,
    pub shell_type: String,
    pub user_file: FileState,
    pub global_file: FileState,
}

/// Both alias levels plus configuration for one invocation
#[derive(Debug, Clone)]
pub struct QuickAlias {
    pub config: Config,
    pub user: AliasSet,
    pub global: AliasSet,
    loader: Loader,
    backups: BackupManager,
}

impl QuickAlias {
    /// Prepare the user directories and load both levels and the config
    pub fn new(paths: Paths) -> Result<Self> {
        for dir in [paths.user_dir.clone(), paths.backup_dir()] {
            fs::create_dir_all(&dir).map_err(|e| {
                eyre!(ErrorContext::new("preparing user configuration").with_file(&dir).to_directory_create_error(e))
            })?;
        }

        let loader = Loader::new(paths.clone());
        let user = loader.load(Level::User);
        let global = loader.load(Level::Global);
        let config = Config::load(&paths.config_file());
        debug!("📋 Loaded {} user and {} global aliases", user.len(), global.len());

        Ok(Self {
            config,
            user,
            global,
            backups: BackupManager::new(paths.backup_dir()),
            loader,
        })
    }

    #[must_use]
    pub fn paths(&self) -> &Paths {
        self.loader.paths()
    }

    #[must_use]
    pub fn aliases(&self, level: Level) -> &AliasSet {
        match level {
            Level::User => &self.user,
            Level::Global => &self.global,
        }
    }

    fn aliases_mut(&mut self, level: Level) -> &mut AliasSet {
        match level {
            Level::User => &mut self.user,
            Level::Global => &mut self.global,
        }
    }

    pub fn save(&self, level: Level) -> Result<()> {
        self.loader.save(level, self.aliases(level))
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.paths().config_file())
    }

    fn backup_best_effort(&self, level: Level) {
        if let Err(e) = self.backups.create_backup(level, self.aliases(level)) {
            warn!("⚠️ Backup of {} aliases failed, continuing: {}", level, e);
        }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(&Alias, Level)> {
        resolve::lookup(name, &self.user, &self.global)
    }

    #[must_use]
    pub fn conflicts(&self) -> Vec<String> {
        resolve::find_conflicts(&self.user, &self.global)
    }

    #[must_use]
    pub fn list(&self, keyword: &str) -> Listing<'_> {
        resolve::list(&self.user, &self.global, keyword)
    }

    #[must_use]
    pub fn search(&self, keyword: &str) -> SearchReport<'_> {
        resolve::search(&self.user, &self.global, keyword)
    }

    /// Add or overwrite an alias at `level`, asking first if the name is already in use
    pub fn add_alias(&mut self, name: &str, command: &str, level: Level, prompt: &dyn Prompt) -> Result<AddOutcome> {
        if !cfg::alias::is_valid_name(name) {
            return Err(eyre!(ErrorContext::new("adding alias").with_alias(name).to_runtime_error(
                "invalid alias name",
                vec!["use only letters, digits and _ . : -".to_string()],
            )));
        }

        let replaced = self.lookup(name).map(|(_, existing)| existing);
        if let Some(existing) = replaced {
            let message = format!("Alias '{}' already exists at {} level. Overwrite?", name, existing);
            if !prompt.confirm(&message)? {
                info!("Add of '{}' cancelled by user", name);
                return Ok(AddOutcome::Cancelled);
            }
        }

        self.backup_best_effort(level);
        self.aliases_mut(level).upsert(Alias::new(name, command, level));
        self.save(level)?;
        info!("➕ Added {} alias '{}'", level, name);

        Ok(AddOutcome::Added {
            name: name.to_string(),
            level,
            replaced,
            shadowed: level == Level::Global && self.user.contains(name),
        })
    }

    pub fn remove_alias(&mut self, name: &str, level: Level) -> Result<RemoveOutcome> {
        if !self.aliases(level).contains(name) {
            debug!("No {} alias named '{}' to remove", level, name);
            return Ok(RemoveOutcome::NotFound { name: name.to_string(), level });
        }

        self.backup_best_effort(level);
        self.aliases_mut(level).remove(name);
        self.save(level)?;
        info!("➖ Removed {} alias '{}'", level, name);

        let now_active = match level {
            Level::User => self.global.find(name).cloned(),
            Level::Global => None,
        };
        Ok(RemoveOutcome::Removed { name: name.to_string(), level, now_active })
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            user_count: self.user.len(),
            global_count: self.global.len(),
            conflicts: self.conflicts(),
            initialized: self.config.initialized,
            shell_type: self.config.shell_type.clone(),
            user_file: self.loader.inspect(Level::User),
            global_file: self.loader.inspect(Level::Global),
        }
    }

    pub fn backups(&self) -> Result<Vec<String>> {
        self.backups.list_backups()
    }

    pub fn export_all(&self, path: &Path) -> Result<usize> {
        transfer::export_all(path, &self.user, &self.global)
    }

    /// Replace both levels with the contents of an exported file.
    ///
    /// Both levels are backed up first (best effort). The in-memory sets are
    /// replaced before saving, so if a save fails the other level may already
    /// hold the imported aliases on disk.
    pub fn import_all(&mut self, path: &Path, prompt: &dyn Prompt) -> Result<ImportOutcome> {
        let records = transfer::read_import(path)?;
        let record_count = records.len();

        let message = format!(
            "{} aliases will be imported, replacing all current aliases. Continue?",
            record_count
        );
        if !prompt.confirm(&message)? {
            info!("Import from {:?} cancelled by user", path);
            return Ok(ImportOutcome::Cancelled);
        }

        self.backup_best_effort(Level::User);
        self.backup_best_effort(Level::Global);

        let (user, global) = transfer::partition(records);
        let total = user.len() + global.len();
        if total < record_count {
            warn!("⚠️ Import dropped {} records with duplicate names", record_count - total);
        }
        self.user = user;
        self.global = global;

        self.save(Level::User)?;
        self.save(Level::Global)?;
        info!("📥 Imported {} aliases from {:?}", total, path);

        Ok(ImportOutcome::Imported {
            total,
            user: self.user.len(),
            global: self.global.len(),
        })
    }

    /// Hook the shell's rc file up to `qq init` and mark the tool initialized
    pub fn setup(&mut self, shell: Shell) -> Result<Integration> {
        let integration = shell::add_integration(shell, &self.paths().home_dir)?;
        self.config.shell_type = shell.name().to_string();
        self.config.initialized = true;
        self.save_config()?;
        Ok(integration)
    }

    #[must_use]
    pub fn init_script(&self) -> String {
        shell::render_aliases(&self.global, &self.user)
    }

    /// Delete both alias files and the config file
    pub fn reset(&mut self, prompt: &dyn Prompt) -> Result<ResetOutcome> {
        if !prompt.confirm("All aliases and settings will be deleted. Continue?")? {
            return Ok(ResetOutcome::Cancelled);
        }

        let paths = self.paths().clone();
        for path in [
            paths.alias_file(Level::User),
            paths.alias_file(Level::Global),
            paths.config_file(),
        ] {
            remove_if_present(&path)?;
        }

        self.user.clear();
        self.global.clear();
        self.config = Config::default();
        info!("🧹 Reset configuration");
        Ok(ResetOutcome::Reset)
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            let suggestions = if e.kind() == std::io::ErrorKind::PermissionDenied {
                vec![format!("remove it manually with: sudo rm \"{}\"", path.display())]
            } else {
                Vec::new()
            };
            Err(eyre!(ErrorContext::new("resetting configuration")
                .with_file(path)
                .to_runtime_error(e, suggestions)))
        }
    }
}
