//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically;
//! `--no-color` forces plain output.

use colored::Colorize;

/// Disable colors for the rest of the process.
pub fn disable_colors() {
    colored::control::set_override(false);
}

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print remediation hint (indented, cyan arrow) to stderr
pub fn hint(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("  {} {}", "→".cyan(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print data exactly as given (no color, no added newline)
pub fn raw(data: &str) {
    print!("{}", data);
}

/// Print bytes captured from an external tool's stderr, unchanged
pub fn raw_err(data: &str) {
    eprint!("{}", data);
}
