//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::Violation;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data such as the tree)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print a passed check (` - name: succeeded`)
pub fn check_passed(name: &str) {
    println!(" - {}: {}", name, "succeeded".green());
}

/// Print a failed check (` - name: failed`)
pub fn check_failed(name: &str) {
    println!(" - {}: {}", name, "failed".red().bold());
}

/// Print the first `max` violations followed by the total count.
pub fn violations(violations: &[Violation], max: usize) {
    for line in violation_lines(violations, max) {
        println!("{}", line);
    }
}

/// Report lines for a failing check: truncation notice, the first `max`
/// violations (indented) and `Error Count: <total>`. A `max` of 0 counts as 1.
pub fn violation_lines(violations: &[Violation], max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut lines = Vec::with_capacity(violations.len().min(max) + 2);
    if violations.len() > max {
        lines.push(format!("Showing first {max} errors only."));
    }
    lines.extend(violations.iter().take(max).map(|v| format!("  {v}")));
    lines.push(format!("Error Count: {}", violations.len()));
    lines
}
