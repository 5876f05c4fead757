//! `tickets show` command

use std::path::PathBuf;

use anyhow::Result;

use super::output::Output;
use crate::storage::{read_tickets, Project};

/// Prints the generated ticket file
pub fn run(output: &Output, project: &Project, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| project.config().tickets_path());
    output.verbose_ctx("show", &format!("Reading tickets from: {}", path.display()));

    let content = read_tickets(&path)?;

    let lines: Vec<&str> = content
        .as_deref()
        .map(|c| c.lines().filter(|l| !l.trim().is_empty()).collect())
        .unwrap_or_default();
    let data = serde_json::json!({
        "path": path.display().to_string(),
        "exists": content.is_some(),
        "tickets": lines,
    });

    output.render(&data, || match content.as_deref() {
        None => println!("No tickets have been generated yet. Run 'tickets generate' first."),
        Some(content) if content.trim().is_empty() => println!("The ticket file is empty."),
        Some(content) => print!("{}", content),
    })?;

    Ok(())
}
