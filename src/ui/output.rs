//! Round reporting for the CLI
//!
//! Everything on stdout is suppressed when `IMPLGEN_QUIET` is `1` or `true`;
//! failures and warnings still go to stderr.

use crate::ui::{theme, Icons};
use crate::writer::{WriteResult, WriteStatus};
use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("IMPLGEN_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

fn line(icon: &str, text: &str, style: Style) {
    if !is_quiet() {
        println!("{} {}", icon, text.style(style));
    }
}

pub fn header(text: &str) {
    line(Icons::ROCKET, text, theme().heading);
}

pub fn success(text: &str) {
    line(Icons::CHECK, text, theme().created);
}

pub fn error(text: &str) {
    eprintln!("{} {}", Icons::CROSS, text.style(theme().failure));
}

pub fn warn(text: &str) {
    eprintln!("{} {}", Icons::WARN, text.style(theme().notice));
}

pub fn info(label: &str, value: &str) {
    if !is_quiet() {
        println!("{} {}: {}", Icons::INFO, label.style(theme().label), value);
    }
}

pub fn section(title: &str) {
    if !is_quiet() {
        println!("\n━{}━", title.style(theme().heading));
    }
}

pub fn dim(text: &str) -> String {
    text.style(theme().label).to_string()
}

/// One line per written artifact, marked by whether its content changed
pub fn artifact(result: &WriteResult) {
    let (icon, style) = match result.status {
        WriteStatus::Created => (Icons::NEW, theme().created),
        WriteStatus::Updated => (Icons::MOD, theme().updated),
        WriteStatus::Unchanged => (Icons::SAME, theme().unchanged),
    };
    line(icon, &format!("{} ({} bytes)", result.path, result.bytes), style);
}

pub fn deferred(id: &str) {
    line(Icons::HOURGLASS, id, theme().label);
}

pub fn skipped(id: &str) {
    line(Icons::SKIP, id, theme().unchanged);
}

pub fn summary_row(label: &str, value: &str) {
    if !is_quiet() {
        println!("  {} {}", label.style(theme().label), value);
    }
}
