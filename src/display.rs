//! Colored CLI display utilities.
//!
//! Rendered text and JSON lines go to stdout uncolored so they can be piped;
//! these helpers cover the human-facing views.

use std::io::{self, Write};

use chrono::Utc;
use owo_colors::OwoColorize;

use crate::engine::{HandlerRegistry, Outcome, Resolution};
use crate::record::LogRecord;

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Truncate a string to a maximum number of characters, adding ellipsis if
/// truncated.
#[must_use]
pub fn truncate(s: &str, max_len: usize, raw_mode: bool) -> String {
    if raw_mode || s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return "...".to_string();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{kept}...")
}

/// Print the handler chain in resolution order.
pub fn print_handler_chain(registry: &HandlerRegistry) {
    for (position, handler) in registry.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{:>2}.", position + 1).dimmed(),
            handler.name().cyan().bold(),
            handler.description().dimmed()
        );
    }
    let _ = io::stdout().flush();
}

/// Print the template being explained.
pub fn print_template(template: &str) {
    println!("{} {}", "[TEMPLATE]".blue().bold(), template);
    let _ = io::stdout().flush();
}

/// Print how one placeholder resolved.
pub fn print_resolution(resolution: &Resolution<'_>, raw_mode: bool) {
    let expression = format!("{{{}}}", resolution.expression);
    match &resolution.outcome {
        Outcome::Resolved { handler, value } => println!(
            "  {} {} -> {} {}",
            "[RESOLVED]".green().bold(),
            expression,
            truncate(value, 80, raw_mode),
            format!("({handler})").dimmed()
        ),
        Outcome::Unresolved => println!(
            "  {} {} {}",
            "[LITERAL]".yellow().bold(),
            expression,
            "(no handler)".dimmed()
        ),
        Outcome::Failed(e) => println!(
            "  {} {} - {}",
            "[FAILED]".red().bold(),
            expression,
            e.to_string().dimmed()
        ),
    }
    let _ = io::stdout().flush();
}

/// Print a one-line record summary to stderr.
pub fn print_record_summary(record: &LogRecord, raw_mode: bool) {
    eprintln!(
        "{} {} {} biz_no={} user={}",
        timestamp().dimmed(),
        "[RECORD]".magenta().bold(),
        truncate(&record.content, 60, raw_mode),
        record.biz_no.cyan(),
        record.user_name
    );
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}
