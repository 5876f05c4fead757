//! Task catalog reader
//!
//! Each physical line of the catalog is `Theme;Type;Complexity;Text`. The task
//! ID is the 1-based line number, so blank and malformed lines still consume a
//! number. Lines with the wrong field count or a complexity that is not a
//! positive integer are skipped. Bytes that are not valid UTF-8 are replaced
//! with U+FFFD rather than failing the read.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{Task, TaskId};

/// Number of `;`-separated fields in a catalog record
pub const FIELD_COUNT: usize = 4;

/// Tasks loaded from a catalog file
#[derive(Debug, Clone, Default)]
pub struct TaskCatalog {
    path: Option<PathBuf>,
    tasks: Vec<Task>,
    skipped: Vec<u32>,
}

/// Count and average complexity of a group of tasks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub average_complexity: f64,
}

impl TaskCatalog {
    /// Reads and parses a catalog file
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open task catalog: {}", path.display()))?;

        let mut catalog = Self::parse(BufReader::new(file))
            .with_context(|| format!("Failed to read task catalog: {}", path.display()))?;
        catalog.path = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Parses catalog lines from any reader
    pub fn parse(reader: impl BufRead) -> Result<Self> {
        let mut catalog = Self::default();

        for (index, line) in lossy_lines(reader).enumerate() {
            let line_num = index as u32 + 1;
            let line = line.with_context(|| format!("Failed to read line {}", line_num))?;

            if line.trim().is_empty() {
                continue;
            }

            match parse_record(line_num, &line) {
                Some(task) => catalog.tasks.push(task),
                None => catalog.skipped.push(line_num),
            }
        }

        Ok(catalog)
    }

    /// Source file, if the catalog was read from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Line numbers of non-blank lines that were not valid records
    pub fn skipped(&self) -> &[u32] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Statistics grouped by theme
    pub fn theme_stats(&self) -> BTreeMap<String, GroupStats> {
        group_stats(self.tasks.iter().map(|t| (t.theme.as_str(), t.complexity)))
    }

    /// Statistics grouped by task type
    pub fn type_stats(&self) -> BTreeMap<String, GroupStats> {
        group_stats(self.tasks.iter().map(|t| (t.task_type.as_str(), t.complexity)))
    }

    /// Average complexity over the whole catalog
    pub fn average_complexity(&self) -> Option<f64> {
        if self.tasks.is_empty() {
            return None;
        }
        let total: u64 = self.tasks.iter().map(|t| u64::from(t.complexity)).sum();
        Some(total as f64 / self.tasks.len() as f64)
    }
}

/// Lines of a reader without their `\n` or `\r\n` ending, decoded lossily
pub fn lossy_lines(reader: impl BufRead) -> impl Iterator<Item = io::Result<String>> {
    reader.split(b'\n').map(|line| {
        line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            String::from_utf8_lossy(&bytes).into_owned()
        })
    })
}

/// Splits a line into its trimmed fields if it has the record shape
pub fn split_record(line: &str) -> Option<[&str; FIELD_COUNT]> {
    let parts: Vec<&str> = line.split(';').map(str::trim).collect();
    parts.try_into().ok()
}

fn parse_record(line_num: u32, line: &str) -> Option<Task> {
    let [theme, task_type, complexity, _text] = split_record(line)?;
    let complexity = complexity.parse::<u32>().ok().filter(|c| *c > 0)?;
    let id = TaskId::new(line_num)?;

    Some(Task::new(id, theme, task_type, complexity))
}

fn group_stats<'a>(items: impl Iterator<Item = (&'a str, u32)>) -> BTreeMap<String, GroupStats> {
    let mut totals: BTreeMap<String, (usize, u64)> = BTreeMap::new();
    for (key, complexity) in items {
        let entry = totals.entry(key.to_string()).or_default();
        entry.0 += 1;
        entry.1 += u64::from(complexity);
    }

    totals
        .into_iter()
        .map(|(key, (count, total))| {
            let stats = GroupStats {
                count,
                average_complexity: total as f64 / count as f64,
            };
            (key, stats)
        })
        .collect()
}
