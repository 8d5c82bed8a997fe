use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::UsemEntry;
use crate::util::{ensure_parent_directory, now_utc_string};

fn open_append(path: &Path) -> Result<File> {
    ensure_parent_directory(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {} for appending", path.display()))
}

pub struct Transcript {
    path: PathBuf,
    file: File,
}

impl Transcript {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            file: open_append(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_section(&mut self, text: &str) -> Result<()> {
        self.file
            .write_all(text.as_bytes())
            .and_then(|()| self.file.write_all(b"\n"))
            .and_then(|()| self.file.flush())
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    pub fn record_exchange(
        &mut self,
        heading: &str,
        system: &str,
        prompt: &str,
        reply: Option<&str>,
    ) -> Result<()> {
        let reply = reply.unwrap_or("<no reply>");
        self.write_section(&format!(
            "*** {heading} ***\n[{}]\nSYSTEM: {system}\nPROMPT:\n{prompt}\n*** RESPONSE ***\n{reply}",
            now_utc_string()
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord<'a> {
    pub recorded_at: String,
    pub model: &'a str,
    pub lemma: &'a str,
    pub usem: &'a str,
    pub kind: &'a str,
    pub message: String,
    pub prompt: &'a str,
    pub raw_output: Option<&'a str>,
    pub sense: &'a UsemEntry,
}

pub struct ErrorJournal {
    path: PathBuf,
    file: File,
    recorded: usize,
}

impl ErrorJournal {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            file: open_append(path)?,
            recorded: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn record(&mut self, record: &ErrorRecord<'_>) -> Result<()> {
        let mut line = serde_json::to_vec(record).context("failed to serialize error record")?;
        line.push(b'\n');
        self.file
            .write_all(&line)
            .and_then(|()| self.file.flush())
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        self.recorded += 1;
        Ok(())
    }
}
