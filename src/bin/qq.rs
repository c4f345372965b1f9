use clap::{Parser, Subcommand};
use colored::*;
use eyre::{eyre, Result};
use log::debug;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

use quickalias_lib::display;
use quickalias_lib::prompt::is_affirmative;
use quickalias_lib::shell::{Integration, Shell};
use quickalias_lib::{setup_logging, AssumeYes, ErrorContext, Level, Paths, Prompt, QuickAlias};

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/git_describe.rs"));
}

#[derive(Parser)]
#[command(name = "qq", about = "QuickAlias: user and global shell aliases")]
#[command(version = built_info::GIT_DESCRIBE)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Logs are written to: ~/.local/share/quickalias/logs/quickalias.log")]
struct QaOpts {
    #[clap(short, long, global = true, help = "answer yes to every confirmation")]
    yes: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[clap(name = "add", about = "add a user alias")]
    Add(AliasOpts),

    #[clap(name = "set", about = "add a global alias")]
    Set(AliasOpts),

    #[clap(name = "remove", about = "remove a user alias")]
    Remove(NameOpts),

    #[clap(name = "unset", about = "remove a global alias")]
    Unset(NameOpts),

    #[clap(name = "list", about = "list aliases, optionally filtered by keyword")]
    List(ListOpts),

    #[clap(name = "search", about = "search aliases by name or command")]
    Search(SearchOpts),

    #[clap(name = "status", visible_alias = "control", about = "show counts, conflicts and file health")]
    Status,

    #[clap(name = "setup", about = "add shell integration to your rc file")]
    Setup,

    #[clap(name = "init", about = "print alias statements for shell evaluation")]
    Init,

    #[clap(name = "config", about = "manage configuration")]
    Config(ConfigOpts),
}

#[derive(Parser)]
struct AliasOpts {
    name: String,

    #[clap(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[derive(Parser)]
struct NameOpts {
    name: String,
}

#[derive(Parser)]
struct ListOpts {
    keyword: Option<String>,
}

#[derive(Parser)]
struct SearchOpts {
    keyword: String,
}

#[derive(Parser)]
struct ConfigOpts {
    #[clap(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    #[clap(name = "reset", about = "delete all aliases and settings")]
    Reset,

    #[clap(name = "backup", about = "list available backups")]
    Backup,

    #[clap(name = "export", about = "export both levels to one file")]
    Export { path: Option<PathBuf> },

    #[clap(name = "import", about = "replace all aliases from an exported file")]
    Import { path: PathBuf },
}

/// Confirms through dialoguer on a terminal, or reads an answer line from piped stdin
struct DialoguerPrompt;

impl Prompt for DialoguerPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        if std::io::stdin().is_terminal() {
            let answer = dialoguer::Confirm::new()
                .with_prompt(message)
                .default(false)
                .interact()?;
            return Ok(answer);
        }

        eprint!("{} [y/N] ", message);
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(is_affirmative(&line))
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

fn require_initialized(qa: &QuickAlias) -> Result<()> {
    if qa.config.initialized {
        return Ok(());
    }
    Err(eyre!(ErrorContext::new("checking shell integration").to_runtime_error(
        "QuickAlias is not set up yet",
        vec!["run: qq setup".to_string()],
    )))
}

fn handle_command(opts: &QaOpts, paths: Paths) -> Result<i32> {
    let mut qa = QuickAlias::new(paths)?;
    let prompt: &dyn Prompt = if opts.yes { &AssumeYes } else { &DialoguerPrompt };

    if !matches!(opts.command, Command::Setup | Command::Init) {
        require_initialized(&qa)?;
    }

    match &opts.command {
        Command::Add(alias_opts) | Command::Set(alias_opts) => {
            let level = if matches!(opts.command, Command::Set(_)) { Level::Global } else { Level::User };
            let command = alias_opts.command.join(" ");
            let outcome = qa.add_alias(&alias_opts.name, &command, level, prompt)?;
            println!("{}", display::format_add(&outcome));
        }
        Command::Remove(name_opts) | Command::Unset(name_opts) => {
            let level = if matches!(opts.command, Command::Unset(_)) { Level::Global } else { Level::User };
            let outcome = qa.remove_alias(&name_opts.name, level)?;
            println!("{}", display::format_remove(&outcome));
        }
        Command::List(list_opts) => {
            let keyword = list_opts.keyword.as_deref().unwrap_or("");
            println!("{}", display::format_listing(&qa.list(keyword)));
        }
        Command::Search(search_opts) => {
            println!("{}", display::format_search(&qa.search(&search_opts.keyword)));
        }
        Command::Status => {
            println!("{}", display::format_status(&qa.status()));
        }
        Command::Setup => {
            let shell = Shell::from_env().ok_or_else(|| {
                eyre!(ErrorContext::new("detecting shell").to_runtime_error(
                    format!("unsupported shell: {:?}", std::env::var("SHELL").unwrap_or_default()),
                    vec!["QuickAlias supports bash, zsh and fish".to_string()],
                ))
            })?;
            match qa.setup(shell)? {
                Integration::Added(rc_file) => {
                    println!("{} {}", "✅ Shell integration added to".green(), rc_file.display().to_string().bold());
                    println!("{}", "💡 Open a new terminal to start using your aliases".cyan());
                }
                Integration::AlreadyPresent(rc_file) => {
                    println!("{} {}", "✅ Shell integration already present in".green(), rc_file.display().to_string().bold());
                }
            }
        }
        Command::Init => {
            print!("{}", qa.init_script());
        }
        Command::Config(config_opts) => match &config_opts.action {
            ConfigAction::Reset => {
                let outcome = qa.reset(prompt)?;
                println!("{}", display::format_reset(&outcome));
            }
            ConfigAction::Backup => {
                println!("{}", display::format_backups(&qa.backups()?));
            }
            ConfigAction::Export { path } => {
                let path = match path {
                    Some(path) => resolve_path(path)?,
                    None => qa.paths().default_export_path(),
                };
                let count = qa.export_all(&path)?;
                println!("{}", display::format_export(&path, count));
            }
            ConfigAction::Import { path } => {
                let path = resolve_path(path)?;
                let outcome = qa.import_all(&path, prompt)?;
                println!("{}", display::format_import(&outcome));
            }
        },
    }

    Ok(0)
}

fn main() {
    let opts = QaOpts::parse();

    let paths = match Paths::discover() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    if let Err(e) = setup_logging(&paths) {
        eprintln!("Warning: Failed to set up logging: {}", e);
    }
    debug!("qq {} starting", built_info::GIT_DESCRIBE);

    let result = match handle_command(&opts, paths) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    exit(result);
}
