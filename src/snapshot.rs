use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{LexicalEntry, count_senses};
use crate::util::{now_utc_string, write_atomic};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_version: u32,
    pub saved_at: String,
    pub entries: Vec<LexicalEntry>,
}

pub fn save(path: &Path, entries: &[LexicalEntry]) -> Result<()> {
    let snapshot = Snapshot {
        snapshot_version: SNAPSHOT_VERSION,
        saved_at: now_utc_string(),
        entries: entries.to_vec(),
    };
    let data = serde_json::to_vec(&snapshot)
        .with_context(|| format!("failed to serialize snapshot: {}", path.display()))?;
    write_atomic(path, &data)?;

    info!(
        path = %path.display(),
        entries = entries.len(),
        senses = count_senses(entries),
        "snapshot saved"
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<Vec<LexicalEntry>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    if snapshot.snapshot_version != SNAPSHOT_VERSION {
        bail!(
            "snapshot {} has version {}, expected {}",
            path.display(),
            snapshot.snapshot_version,
            SNAPSHOT_VERSION
        );
    }

    info!(
        path = %path.display(),
        saved_at = %snapshot.saved_at,
        entries = snapshot.entries.len(),
        senses = count_senses(&snapshot.entries),
        "snapshot loaded"
    );
    Ok(snapshot.entries)
}
