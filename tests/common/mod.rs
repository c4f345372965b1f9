#![allow(dead_code)]

use eyre::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use quickalias_lib::{Paths, Prompt, QuickAlias};

/// Isolated home, user and global directories inside one temp dir
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Result<Self> {
        Ok(Self { temp: TempDir::new()? })
    }

    pub fn home(&self) -> &Path {
        self.temp.path()
    }

    pub fn user_dir(&self) -> PathBuf {
        self.temp.path().join("user")
    }

    pub fn global_dir(&self) -> PathBuf {
        self.temp.path().join("global")
    }

    pub fn paths(&self) -> Paths {
        Paths::new(self.home(), self.user_dir(), self.global_dir())
    }

    pub fn open(&self) -> Result<QuickAlias> {
        QuickAlias::new(self.paths())
    }
}

/// Prompt that answers with a fixed value and records what it was asked
pub struct Scripted {
    pub answer: bool,
    pub asked: RefCell<Vec<String>>,
}

impl Scripted {
    pub fn yes() -> Self {
        Self { answer: true, asked: RefCell::new(Vec::new()) }
    }

    pub fn no() -> Self {
        Self { answer: false, asked: RefCell::new(Vec::new()) }
    }
}

impl Prompt for Scripted {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.asked.borrow_mut().push(message.to_string());
        Ok(self.answer)
    }
}

pub struct QqOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl QqOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run the `qq` binary against the test environment
pub fn run_qq(env: &TestEnv, args: &[&str]) -> QqOutput {
    let output = Command::new(env!("CARGO_BIN_EXE_qq"))
        .args(args)
        .current_dir(env.home())
        .env("HOME", env.home())
        .env("QUICKALIAS_USER_DIR", env.user_dir())
        .env("QUICKALIAS_GLOBAL_DIR", env.global_dir())
        .env("SHELL", "/bin/bash")
        .env("NO_COLOR", "1")
        .env_remove("QUICKALIAS_DEBUG")
        .env_remove("CLICOLOR_FORCE")
        .output()
        .expect("failed to run qq");

    QqOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code(),
    }
}
