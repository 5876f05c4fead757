//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Write a default `tickets.toml` |
//! | `generate` | Run the search and write the ticket file |
//! | `show` | Print the generated tickets |
//! | `catalog` | Summarize the task catalog |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! tickets --verbose generate --target 25 --tolerance 20
//! ```

mod app;
mod output;
mod generate;
mod show;
mod catalog_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
