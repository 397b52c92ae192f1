use crate::build::thread_pool;
use crate::index::InvertedIndex;
use crate::search::{SearchMode, SearchResult};
use crate::tokenizer::query_words;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Ranked results keyed by the raw query line, in first-seen order.
///
/// Submitting a line that is already present replaces its results without
/// moving it.
#[derive(Debug, Default)]
pub struct QueryResults {
    mode: SearchMode,
    entries: Vec<(String, Vec<SearchResult>)>,
    slots: HashMap<String, usize>,
}

impl QueryResults {
    pub fn new(mode: SearchMode) -> Self {
        Self { mode, ..Self::default() }
    }

    pub fn mode(&self) -> SearchMode { self.mode }

    /// Normalize `line`, search `index` and store the ranked results under the raw line.
    pub fn parse_line(&mut self, line: &str, index: &InvertedIndex) {
        let results = search_line(line, index, self.mode);
        self.insert(line.to_string(), results);
    }

    /// Run every line of the file at `path` as a query.
    ///
    /// With `threads` the lines are searched on a worker pool; results are
    /// still stored in input order. If reading fails part way, the lines read
    /// before the failure are kept and the error is returned.
    pub fn parse_file(&mut self, path: &Path, index: &InvertedIndex, threads: Option<usize>) -> Result<()> {
        let file = File::open(path).with_context(|| format!("opening query file {}", path.display()))?;
        let reader = BufReader::new(file);

        let Some(threads) = threads else {
            for line in reader.lines() {
                let line = line.with_context(|| format!("reading query file {}", path.display()))?;
                self.parse_line(&line, index);
            }
            return Ok(());
        };

        let mut lines = Vec::new();
        let mut failure = None;
        for line in reader.lines() {
            match line {
                Ok(line) => lines.push(line),
                Err(e) => {
                    failure = Some(anyhow::Error::new(e).context(format!("reading query file {}", path.display())));
                    break;
                }
            }
        }

        let mode = self.mode;
        let pool = thread_pool(threads)?;
        let searched: Vec<Vec<SearchResult>> =
            pool.install(|| lines.par_iter().map(|line| search_line(line, index, mode)).collect());
        for (line, results) in lines.into_iter().zip(searched) {
            self.insert(line, results);
        }
        tracing::debug!(queries = self.len(), threads, "processed query file");

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn insert(&mut self, line: String, results: Vec<SearchResult>) {
        match self.slots.get(&line) {
            Some(&slot) => self.entries[slot].1 = results,
            None => {
                self.slots.insert(line.clone(), self.entries.len());
                self.entries.push((line, results));
            }
        }
    }

    pub fn get(&self, line: &str) -> Option<&[SearchResult]> {
        self.slots.get(line).map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Query lines and their results in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SearchResult])> + '_ {
        self.entries.iter().map(|(line, results)| (line.as_str(), results.as_slice()))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn search_line(line: &str, index: &InvertedIndex, mode: SearchMode) -> Vec<SearchResult> {
    let words = query_words(line);
    if words.is_empty() {
        return Vec::new();
    }
    index.search(&words, mode)
}

impl Serialize for QueryResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (line, results) in &self.entries {
            map.serialize_entry(line, results)?;
        }
        map.end()
    }
}
