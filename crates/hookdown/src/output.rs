//! Terminal output utilities.

use console::{Style, Term};

/// Terminal output formatter.
///
/// Messages go to stderr; rendered documents go to stdout.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message (dimmed).
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(&self.dim.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Write a document to stdout, newline-terminated.
    pub(crate) fn document(&self, content: &str) -> std::io::Result<()> {
        self.stdout.write_line(content.strip_suffix('\n').unwrap_or(content))?;
        self.stdout.flush()
    }
}
