//! Output formatting for CLI commands
//!
//! Commands build one JSON value for their result and a closure that prints
//! the text form; [`Output::render`] picks one. Verbose diagnostics always go
//! to stderr so they never mix with JSON on stdout.

use serde::Serialize;

pub use crate::storage::OutputFormat;

/// Output helper shared by all commands
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints `data` as JSON, or calls `text` to print the human-readable form
    pub fn render<T: Serialize>(&self, data: &T, text: impl FnOnce()) -> serde_json::Result<()> {
        match self.format {
            OutputFormat::Text => text(),
            OutputFormat::Json => println!("{}", serde_json::to_string(data)?),
        }
        Ok(())
    }

    /// One-line confirmation, `{"success": true, "message": ...}` in JSON
    pub fn success(&self, message: &str) -> serde_json::Result<()> {
        let data = serde_json::json!({ "success": true, "message": message });
        self.render(&data, || println!("{}", message))
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Prints `[verbose] message` on stderr when --verbose is set
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints `[verbose:context] message` on stderr when --verbose is set
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
