// src/source.rs
//
// Reads already-joined build request rows, one JSON object per line.

use crate::error::{Error, Result};
use crate::model::BuildRequestRow;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn read_rows(path: &Path) -> Result<Vec<BuildRequestRow>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_rows(&text)?;
    info!(path = %path.display(), rows = rows.len(), "loaded build request rows");
    Ok(rows)
}

/// Blank lines are skipped; line numbers in errors are 1-based.
pub fn parse_rows(text: &str) -> Result<Vec<BuildRequestRow>> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    let bar = ProgressBar::new(lines.len() as u64);
    bar.set_message("Decoding rows");

    let rows = lines
        .par_iter()
        .progress_with(bar.clone())
        .map(|&(i, line)| {
            serde_json::from_str(line).map_err(|source| Error::Row { line: i + 1, source })
        })
        .collect::<Result<Vec<_>>>()?;

    bar.finish_and_clear();
    Ok(rows)
}
