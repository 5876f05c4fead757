//! Ticket output artifact
//!
//! Tickets are written one per line in acceptance order:
//!
//! ```text
//! Билет 1; (3) Algebra; Theory; 3; Define a group; (7) Geometry; Practice; 4; Find the area
//! ```
//!
//! The artifact is truncated when a run starts. Task text is looked up in the
//! catalog file by line number, since the engine only keeps metadata.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::catalog::{lossy_lines, split_record};
use crate::domain::{EmitError, Ticket, TicketEmitter};

/// Label that starts every ticket line
pub const TICKET_LABEL: &str = "Билет";

/// Writes accepted tickets to the output file
pub struct TicketWriter {
    output: PathBuf,
    tasks: PathBuf,
    source_lines: Vec<String>,
}

impl TicketWriter {
    /// Creates a writer for `output`, rendering task text from the `tasks` catalog
    pub fn new(output: impl Into<PathBuf>, tasks: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            tasks: tasks.into(),
            source_lines: Vec::new(),
        }
    }

    /// Returns the path to the output file
    pub fn path(&self) -> &Path {
        &self.output
    }

    /// Truncates the output file and loads the catalog lines used for rendering
    pub fn initialize(&mut self) -> Result<()> {
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        File::create(&self.output)
            .with_context(|| format!("Failed to truncate ticket file: {}", self.output.display()))?;

        let file = File::open(&self.tasks)
            .with_context(|| format!("Failed to open task catalog: {}", self.tasks.display()))?;
        self.source_lines = lossy_lines(BufReader::new(file))
            .collect::<std::io::Result<_>>()
            .with_context(|| format!("Failed to read task catalog: {}", self.tasks.display()))?;

        Ok(())
    }

    /// Appends one rendered ticket line
    pub fn append(&self, ticket: &Ticket) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output)
            .with_context(|| format!("Failed to open ticket file: {}", self.output.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on ticket file")?;

        let mut writer = BufWriter::new(&file);
        writeln!(writer, "{}", render_ticket(ticket, &self.source_lines))
            .context("Failed to write ticket")?;

        writer.flush().context("Failed to flush ticket file")?;

        Ok(())
    }
}

impl TicketEmitter for TicketWriter {
    fn emit(&mut self, ticket: &Ticket) -> Result<(), EmitError> {
        self.append(ticket).map_err(Into::into)
    }
}

/// Renders a ticket from the raw catalog lines (index 0 is line 1)
///
/// Tasks whose line is missing or no longer a valid record are left out.
pub fn render_ticket(ticket: &Ticket, source_lines: &[String]) -> String {
    let mut line = format!("{} {}; ", TICKET_LABEL, ticket.number);

    for id in &ticket.task_ids {
        let record = source_lines
            .get(id.line() as usize - 1)
            .and_then(|l| split_record(l));

        if let Some([theme, task_type, complexity, text]) = record {
            line.push_str(&format!(
                "({}) {}; {}; {}; {}; ",
                id, theme, task_type, complexity, text
            ));
        }
    }

    line.trim_end_matches([' ', ';']).to_string()
}

/// Reads the output file back, `None` if no run has produced it yet
pub fn read_tickets(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read ticket file: {}", path.display()))
}
