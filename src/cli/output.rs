//! Terminal messages for the user
//!
//! Rendered JSON never goes through here, see `application::render`.
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::error::Error;

use colored::Colorize;

use crate::cli::CliError;

/// Print a fatal error to stderr, followed by any cause not already in the
/// message and a hint when one applies.
pub fn error(err: &CliError) {
    let message = err.to_string();
    eprintln!("{}: {}", "error".red().bold(), message);

    let mut cause = err.source();
    while let Some(e) = cause {
        let text = e.to_string();
        if !message.contains(&text) {
            eprintln!("  {} {}", "caused by:".red(), text);
        }
        cause = e.source();
    }

    if let Some(hint) = err.hint() {
        eprintln!("  {} {}", "hint:".cyan(), hint);
    }
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action, e.g. `Created: ./xldc.toml`
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print plain text (no color), e.g. the merged config
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
