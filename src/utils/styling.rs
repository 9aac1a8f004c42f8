//! Terminal styling utilities for status lines and listings

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Print an error message in red on stderr
pub fn print_error(message: &str) {
    eprintln!("{}{}", CROSS, style(message).red().for_stderr());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{}{}", INFO, message);
}

/// Print the project banner shown before any project-bound operation
pub fn print_project_info(project_id: &str) {
    println!(
        "== You are currently working on the project: {}",
        style(project_id).red().bold()
    );
}

/// Print the final completion message
pub fn print_completion(message: &str) {
    println!();
    println!("{}{}", ROCKET, style(message).green().bold());
    println!();
}

/// Highlight a value inside a prompt or message
pub fn highlight(value: impl std::fmt::Display) -> String {
    style(value).white().bright().bold().to_string()
}

/// Render items as an indented bullet list, one per line, each preceded by a newline
pub fn list_to_bullets(items: &[String]) -> String {
    items.iter().map(|item| format!("\n  - {}", item)).collect()
}

/// Render items as `a, b and c`
pub fn list_to_text(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
