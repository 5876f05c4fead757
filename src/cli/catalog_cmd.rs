//! `tickets catalog` command

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use super::output::Output;
use crate::storage::{GroupStats, Project, TaskCatalog};

/// Summarize the task catalog by theme and type
pub fn run(output: &Output, project: &Project, tasks: Option<PathBuf>) -> Result<()> {
    let path = tasks.unwrap_or_else(|| project.config().tasks_path());
    let catalog = TaskCatalog::read(&path)?;
    output.verbose_ctx(
        "catalog",
        &format!("Loaded {} tasks from {}", catalog.len(), path.display()),
    );

    let themes = catalog.theme_stats();
    let types = catalog.type_stats();

    let data = serde_json::json!({
        "path": path.display().to_string(),
        "tasks": catalog.len(),
        "average_complexity": catalog.average_complexity(),
        "themes": themes,
        "types": types,
        "skipped_lines": catalog.skipped(),
    });

    output.render(&data, || {
        println!("Catalog: {}", path.display());
        match catalog.average_complexity() {
            Some(avg) => println!("{} tasks, average complexity {:.2}", catalog.len(), avg),
            None => println!("No tasks found."),
        }

        print_groups("THEME", &themes);
        print_groups("TYPE", &types);

        if !catalog.skipped().is_empty() {
            println!();
            let lines: Vec<String> = catalog.skipped().iter().map(u32::to_string).collect();
            println!("Skipped lines: {}", lines.join(", "));
        }
    })?;

    Ok(())
}

fn print_groups(label: &str, groups: &BTreeMap<String, GroupStats>) {
    if groups.is_empty() {
        return;
    }

    println!();
    println!("{:<30} {:>6} {:>10}", label, "COUNT", "AVG");
    println!("{}", "-".repeat(48));
    for (name, stats) in groups {
        println!(
            "{:<30} {:>6} {:>10.2}",
            name, stats.count, stats.average_complexity
        );
    }
}
