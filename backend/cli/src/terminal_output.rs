//! Terminal output utilities: ANSI styling and progress sections.

use std::io::{self, Write};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Print a formatted ERROR note to stderr.
pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}{msg}{RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Print a formatted WARNING note to stderr.
pub fn note_warn(msg: &str) {
    if supports_color() {
        eprintln!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        eprintln!("WARN: {msg}");
    }
}

/// A one-line progress message.
pub fn progress(out: &mut impl Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{msg}")
}

/// A titled block: blank line, title, blank line, body.
pub fn section(out: &mut impl Write, title: &str, body: &str) -> io::Result<()> {
    writeln!(out, "\n{title}\n")?;
    writeln!(out, "{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_layout() {
        let mut buf = Vec::new();
        section(&mut buf, "📄 LaTeX Output:", "x^2").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\n📄 LaTeX Output:\n\nx^2\n");
    }
}
