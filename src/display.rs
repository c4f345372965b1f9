use colored::*;
use std::path::Path;

use crate::cfg::alias::{Alias, Level};
use crate::cfg::loader::FileState;
use crate::resolve::{Listing, SearchReport};
use crate::{AddOutcome, ImportOutcome, RemoveOutcome, ResetOutcome, Status};

const RESTART_HINT: &str = "Open a new terminal, or run: source ~/.bashrc (or your shell's rc file)";

fn format_alias_line(alias: &Alias, width: usize) -> String {
    format!(
        "  {}  → {}",
        format!("{:<width$}", alias.name, width = width).green().bold(),
        alias.command.cyan()
    )
}

fn format_section(aliases: &[&Alias], empty_message: &str) -> String {
    if aliases.is_empty() {
        return format!("  {}", empty_message.yellow());
    }
    let width = aliases.iter().map(|a| a.name.len()).max().unwrap_or(0);
    aliases
        .iter()
        .map(|alias| format_alias_line(alias, width))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_listing(listing: &Listing) -> String {
    let mut out = format!("{}\n", "🌍 Global aliases:".purple().bold());
    out.push_str(&format_section(&listing.global, "No global aliases"));
    out.push_str(&format!("\n\n{}\n", "👤 User aliases:".blue().bold()));
    out.push_str(&format_section(&listing.user, "No user aliases"));
    if let Some(total) = listing.total_found() {
        out.push_str(&format!("\n\n{}", format!("Total aliases found: {}", total).green()));
    }
    out
}

pub fn format_search(report: &SearchReport) -> String {
    let mut out = format!("{}\n", format!("🔍 Search results: '{}'", report.keyword).cyan().bold());
    out.push_str(&format!("{}\n", "🌍 Global aliases:".purple()));
    out.push_str(&format_section(&report.global, "No matches"));
    out.push_str(&format!("\n\n{}\n", "👤 User aliases:".blue()));
    out.push_str(&format_section(&report.user, "No matches"));
    if report.is_empty() {
        out.push_str(&format!("\n\n{}", format!("❌ No aliases found for '{}'", report.keyword).red()));
    } else {
        out.push_str(&format!("\n\n{}", format!("✅ Found {} aliases", report.total()).green()));
    }
    out
}

fn format_file_state(state: &FileState) -> String {
    match state {
        FileState::Missing => "not created yet".dimmed().to_string(),
        FileState::Valid(count) => format!("ok ({} entries)", count).green().to_string(),
        FileState::Corrupt(reason) => format!("CORRUPT, ignored: {}", reason).red().bold().to_string(),
    }
}

pub fn format_status(status: &Status) -> String {
    let mut lines = vec![format!("{}", "📊 QuickAlias status".cyan().bold())];
    lines.push(format!("  User aliases:   {}", status.user_count.to_string().blue().bold()));
    lines.push(format!("  Global aliases: {}", status.global_count.to_string().purple().bold()));

    let conflicts = if status.conflicts.is_empty() {
        "0".green().bold().to_string()
    } else {
        format!(
            "{} {}",
            status.conflicts.len().to_string().yellow().bold(),
            format!("({})", status.conflicts.join(", ")).yellow()
        )
    };
    lines.push(format!("  Conflicts:      {}", conflicts));

    let integration = if status.initialized {
        let shell = if status.shell_type.is_empty() { "unknown shell" } else { status.shell_type.as_str() };
        format!("{} ({})", "active".green(), shell)
    } else {
        "not active".red().to_string()
    };
    lines.push(format!("  Shell integration: {}", integration));
    lines.push(format!("  User alias file:   {}", format_file_state(&status.user_file)));
    lines.push(format!("  Global alias file: {}", format_file_state(&status.global_file)));

    if !status.conflicts.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", "💡 User aliases take precedence over global aliases with the same name.".cyan()));
    }
    lines.join("\n")
}

pub fn format_backups(names: &[String]) -> String {
    if names.is_empty() {
        return format!("{}", "No backups found".yellow());
    }
    let mut lines = vec![format!("{}", "💾 Available backups:".cyan().bold())];
    for (i, name) in names.iter().enumerate() {
        lines.push(format!("{} {}", format!("{}.", i + 1).green(), name.cyan().bold()));
    }
    lines.join("\n")
}

pub fn format_add(outcome: &AddOutcome) -> String {
    match outcome {
        AddOutcome::Cancelled => format!("{}", "❌ Operation cancelled".red()),
        AddOutcome::Added { name, level, shadowed, .. } => {
            let mut out = format!("{}", format!("✅ Alias '{}' added at {} level", name, level).green());
            if *shadowed {
                out.push_str(&format!(
                    "\n{}",
                    format!("⚠️  A user alias named '{}' still takes precedence", name).yellow()
                ));
            }
            out.push_str(&format!("\n\n{}", format!("💡 {}", RESTART_HINT).cyan()));
            out
        }
    }
}

pub fn format_remove(outcome: &RemoveOutcome) -> String {
    match outcome {
        RemoveOutcome::NotFound { name, level } => {
            format!("{}", format!("❌ Alias '{}' not found at {} level", name, level).red())
        }
        RemoveOutcome::Removed { name, level, now_active } => {
            let headline = match (level, now_active) {
                (Level::User, Some(global)) => format!(
                    "✅ User alias '{}' removed; global alias '{}' → {} is now active",
                    name, global.name, global.command
                ),
                _ => format!("✅ Alias '{}' removed from {} level", name, level),
            };
            format!("{}\n\n{}", headline.green(), format!("💡 {}", RESTART_HINT).cyan())
        }
    }
}

pub fn format_export(path: &Path, count: usize) -> String {
    format!(
        "{} {} ({} aliases)",
        "✅ Configuration exported:".green(),
        path.display().to_string().bold(),
        count
    )
}

pub fn format_import(outcome: &ImportOutcome) -> String {
    match outcome {
        ImportOutcome::Cancelled => format!("{}", "❌ Operation cancelled".red()),
        ImportOutcome::Imported { total, user, global } => format!(
            "{}",
            format!("✅ Imported {} aliases ({} user, {} global)", total, user, global).green()
        ),
    }
}

pub fn format_reset(outcome: &ResetOutcome) -> String {
    match outcome {
        ResetOutcome::Cancelled => format!("{}", "❌ Reset cancelled".red()),
        ResetOutcome::Reset => format!("{}", "✅ Configuration reset".green()),
    }
}
