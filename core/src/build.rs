//! Directory traversal and index construction, sequential or on a worker pool.

use crate::index::InvertedIndex;
use crate::tokenizer::tokenize;
use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Thread count used when a worker pool is requested without a size.
pub const DEFAULT_THREADS: usize = 5;

pub fn thread_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("search-worker-{i}"))
        .build()
        .context("building worker pool")
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("text"))
        .unwrap_or(false)
}

/// Files to index under `root`. A file root is returned as is; a directory is
/// walked recursively for `.txt`/`.text` files.
pub fn text_files(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        bail!("input path {} does not exist", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_text_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Tokenize the file at `path` and add every word to `index`. Returns the
/// number of words added.
pub fn add_file(path: &Path, index: &mut InvertedIndex) -> Result<usize> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let location = path.display().to_string();
    let tokens = tokenize(&text);
    for (word, position) in &tokens {
        index.add(word, &location, *position);
    }
    Ok(tokens.len())
}

/// Build an index from every text file under `root`.
///
/// With `threads`, each file is indexed on its own by a pool worker and merged
/// into the shared index under a single write lock. Files that cannot be read
/// are logged and skipped.
pub fn build_index(root: &Path, threads: Option<usize>) -> Result<InvertedIndex> {
    let files = text_files(root)?;

    let index = match threads {
        None => {
            let mut index = InvertedIndex::new();
            for file in &files {
                if let Err(e) = add_file(file, &mut index) {
                    tracing::warn!(error = %format!("{e:#}"), "skipping file");
                }
            }
            index
        }
        Some(threads) => {
            let shared = RwLock::new(InvertedIndex::new());
            let pool = thread_pool(threads)?;
            pool.install(|| {
                files.par_iter().for_each(|file| {
                    let mut local = InvertedIndex::new();
                    match add_file(file, &mut local) {
                        Ok(_) => shared.write().add_all(local),
                        Err(e) => tracing::warn!(error = %format!("{e:#}"), "skipping file"),
                    }
                });
            });
            shared.into_inner()
        }
    };

    tracing::info!(
        files = files.len(),
        num_words = index.num_words(),
        num_documents = index.num_documents(),
        "built index"
    );
    Ok(index)
}
