//! Passage corpus loading.
//!
//! A corpus source is either a single JSON file holding an array of passage
//! records, or a directory scanned for `*.json` files whose arrays are merged
//! in path order. A missing source degrades to an empty corpus with a warning;
//! downstream components treat an empty corpus as "no results", never as an
//! error.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::types::Passage;

/// Load passages from a file or directory. Missing paths yield an empty list.
pub fn load_passages(source: &Path) -> Result<Vec<Passage>> {
    if !source.exists() {
        warn!(path = %source.display(), "corpus source not found, starting with an empty corpus");
        return Ok(vec![]);
    }
    if source.is_dir() {
        load_passages_dir(source)
    } else {
        load_passages_file(source)
    }
}

fn load_passages_file(path: &Path) -> Result<Vec<Passage>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading corpus file {}", path.display()))?;
    let passages: Vec<Passage> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing corpus file {}", path.display()))?;
    Ok(passages)
}

fn load_passages_dir(dir: &Path) -> Result<Vec<Passage>> {
    let mut files = list_json_files(dir);
    files.sort();
    let mut all = Vec::new();
    for file in &files {
        match load_passages_file(file) {
            Ok(mut passages) => all.append(&mut passages),
            // One corrupt file should not sink the whole corpus.
            Err(e) => warn!(path = %file.display(), error = %e, "skipping unreadable corpus file"),
        }
    }
    Ok(all)
}

fn list_json_files(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .map(|e| e.path().to_path_buf())
        .collect()
}
