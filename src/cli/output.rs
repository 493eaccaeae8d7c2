//! Colored terminal output for command results.
//!
//! Data (rendered trees, settings) goes to stdout uncolored so it can be
//! piped; diagnostics go to stderr. `colored` honors NO_COLOR and CLICOLOR.

use std::fmt::Display;

use colored::Colorize;

/// `error: ...` in red on stderr.
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// `Warning: ...` in yellow on stderr.
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Finished build step, prefixed by a green check mark.
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// `Label: ...` with a green label, e.g. `Exported: project -> tree.yaml`.
pub fn action(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// List entry below a [`header`].
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored data line.
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
