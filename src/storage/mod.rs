//! # Storage Layer
//!
//! File formats and configuration around the generation engine.
//!
//! ## Files
//!
//! | Data | Format | Default location |
//! |------|--------|------------------|
//! | Task catalog | `Theme;Type;Complexity;Text` per line | `tasks.txt` |
//! | Tickets | One `Билет N; ...` line per ticket | `tickets.txt` |
//! | Config | TOML | `tickets.toml` |
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point: locates the config and the files it names
//! - [`TaskCatalog`] - Parses the catalog into tasks keyed by line number
//! - [`TicketWriter`] - Emits accepted tickets to the output file
//! - [`Config`] - Project and global configuration

mod catalog;
mod writer;
mod config;
mod project;

pub use catalog::{split_record, GroupStats, TaskCatalog, FIELD_COUNT};
pub use writer::{read_tickets, render_ticket, TicketWriter, TICKET_LABEL};
pub use config::{
    Config, ConfigError, FilesConfig, GenerationConfig, GlobalConfig, OutputFormat, ProjectConfig,
    CONFIG_FILE,
};
pub use project::{Project, ProjectError};
