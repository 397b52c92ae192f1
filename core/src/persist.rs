use crate::index::InvertedIndex;
use crate::query::QueryResults;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// On-disk shape of the index: word -> path -> positions, every level sorted.
type IndexFile = BTreeMap<String, BTreeMap<String, Vec<usize>>>;

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut out, value).with_context(|| format!("writing {}", path.display()))?;
    out.write_all(b"\n")?;
    out.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write the whole index as pretty JSON. Words, paths and positions are all
/// emitted in ascending order.
pub fn save_index(path: &Path, index: &InvertedIndex) -> Result<()> {
    let view: BTreeMap<&str, BTreeMap<&str, Vec<usize>>> = index
        .words
        .iter()
        .map(|(word, postings)| {
            let docs: BTreeMap<&str, Vec<usize>> = postings
                .iter()
                .map(|(&id, positions)| (index.path(id), positions.iter().copied().collect()))
                .collect();
            (word.as_str(), docs)
        })
        .collect();
    write_json(path, &view)
}

/// Read an index written by [`save_index`].
pub fn load_index(path: &Path) -> Result<InvertedIndex> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let file: IndexFile =
        serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing {}", path.display()))?;

    let mut index = InvertedIndex::new();
    for (word, docs) in file {
        if word.is_empty() {
            bail!("{}: empty word", path.display());
        }
        for (doc, positions) in docs {
            if let Some(&bad) = positions.iter().find(|&&p| p < 1) {
                bail!("{}: position {bad} of {word:?} in {doc} is below 1", path.display());
            }
            for position in positions {
                index.add(&word, &doc, position);
            }
        }
    }
    tracing::debug!(num_words = index.num_words(), path = %path.display(), "loaded index");
    Ok(index)
}

/// Write query results as pretty JSON, query lines in first-seen order.
pub fn save_results(path: &Path, results: &QueryResults) -> Result<()> {
    write_json(path, results)
}
