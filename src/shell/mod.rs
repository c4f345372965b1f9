//! Shell integration for quickalias
//!
//! Shells pick aliases up by evaluating `qq init` at startup. `setup` appends
//! the evaluation line to the detected shell's rc file:
//!
//! ```bash
//! # QuickAlias integration
//! eval "$(qq init)"
//! ```

use eyre::{eyre, Result};
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cfg::alias::is_valid_name;
use crate::cfg::store::AliasSet;
use crate::error::ErrorContext;

const INTEGRATION_COMMENT: &str = "# QuickAlias integration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Detect the shell from a `$SHELL` style value
    #[must_use]
    pub fn detect(shell_env: &str) -> Option<Self> {
        if shell_env.contains("bash") {
            Some(Shell::Bash)
        } else if shell_env.contains("zsh") {
            Some(Shell::Zsh)
        } else if shell_env.contains("fish") {
            Some(Shell::Fish)
        } else {
            None
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("SHELL").ok().and_then(|s| Self::detect(&s))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        }
    }

    #[must_use]
    pub fn rc_file(&self, home_dir: &Path) -> PathBuf {
        match self {
            Shell::Bash => home_dir.join(".bashrc"),
            Shell::Zsh => home_dir.join(".zshrc"),
            Shell::Fish => home_dir.join(".config").join("fish").join("config.fish"),
        }
    }

    #[must_use]
    pub fn integration_line(&self) -> &'static str {
        match self {
            Shell::Bash | Shell::Zsh => "eval \"$(qq init)\"",
            Shell::Fish => "qq init | source",
        }
    }
}

/// Outcome of adding the integration line to an rc file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integration {
    AlreadyPresent(PathBuf),
    Added(PathBuf),
}

/// Append the integration line to the shell's rc file unless it is already there
pub fn add_integration(shell: Shell, home_dir: &Path) -> Result<Integration> {
    let rc_file = shell.rc_file(home_dir);
    let line = shell.integration_line();

    if let Ok(content) = fs::read_to_string(&rc_file) {
        if content.contains(line) {
            debug!("Shell integration already present in {:?}", rc_file);
            return Ok(Integration::AlreadyPresent(rc_file));
        }
    }

    if let Some(parent) = rc_file.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            eyre!(ErrorContext::new("adding shell integration").with_file(parent).to_directory_create_error(e))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&rc_file)
        .map_err(|e| {
            eyre!(ErrorContext::new("opening shell config").with_file(&rc_file).to_file_operation_error(e))
        })?;
    write!(file, "\n{}\n{}\n", INTEGRATION_COMMENT, line).map_err(|e| {
        eyre!(ErrorContext::new("writing shell config").with_file(&rc_file).to_file_operation_error(e))
    })?;

    debug!("Added shell integration to {:?}", rc_file);
    Ok(Integration::Added(rc_file))
}

/// Quote `value` for a POSIX single-quoted string
fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Alias statements for shell evaluation, global first so that user
/// definitions of the same name win by being defined last.
/// Records whose name could break out of the statement are skipped.
pub fn render_aliases(global: &AliasSet, user: &AliasSet) -> String {
    global
        .iter()
        .chain(user.iter())
        .filter(|alias| {
            let valid = is_valid_name(&alias.name);
            if !valid {
                warn!("⚠️ Skipping alias with unusable name {:?}", alias.name);
            }
            valid
        })
        .map(|alias| format!("alias {}={}\n", alias.name, single_quote(&alias.command)))
        .collect()
}
