//! Exact and prefix search over an [`InvertedIndex`], and the ranking of
//! the per-document hits they produce.

use crate::index::{DocId, InvertedIndex, Postings};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

/// One document's aggregated hits for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(rename = "where")]
    path: String,
    /// Total occurrences of every matched word in the document.
    #[serde(rename = "count")]
    frequency: usize,
    /// Earliest position of any matched word.
    #[serde(rename = "index")]
    position: usize,
}

impl SearchResult {
    pub fn new(path: impl Into<String>, frequency: usize, position: usize) -> Self {
        Self { path: path.into(), frequency, position }
    }

    /// Fold another match into this result. The position only ever moves down.
    pub fn update(&mut self, frequency: usize, position: usize) {
        self.frequency += frequency;
        self.position = self.position.min(position);
    }

    pub fn path(&self) -> &str { &self.path }

    pub fn frequency(&self) -> usize { self.frequency }

    pub fn position(&self) -> usize { self.position }
}

/// Ranking order: higher frequency, then earlier position, then path
/// ascending ignoring case.
pub fn compare(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.frequency
        .cmp(&a.frequency)
        .then(a.position.cmp(&b.position))
        .then_with(|| cmp_ignore_case(&a.path, &b.path))
        // paths differing only in case still need a fixed order
        .then_with(|| a.path.cmp(&b.path))
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Sort results in place by [`compare`].
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(compare);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Exact,
    #[default]
    Partial,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(SearchMode::Exact),
            "partial" => Ok(SearchMode::Partial),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Exact => f.write_str("exact"),
            SearchMode::Partial => f.write_str("partial"),
        }
    }
}

impl InvertedIndex {
    /// Rank documents containing any of `queries` verbatim.
    pub fn exact_search<I, S>(&self, queries: I) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let queries = distinct(queries);
        let matches = queries.iter().filter_map(|q| self.words.get(q.as_str()));
        self.collect_results(matches)
    }

    /// Rank documents containing any indexed word that starts with one of `queries`.
    pub fn partial_search<I, S>(&self, queries: I) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let queries = distinct(queries);
        let matches = queries.iter().flat_map(|q| {
            self.words
                .range::<str, _>((Bound::Included(q.as_str()), Bound::Unbounded))
                .take_while(move |(word, _)| word.starts_with(q.as_str()))
                .map(|(_, postings)| postings)
        });
        self.collect_results(matches)
    }

    pub fn search<I, S>(&self, queries: I, mode: SearchMode) -> Vec<SearchResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match mode {
            SearchMode::Exact => self.exact_search(queries),
            SearchMode::Partial => self.partial_search(queries),
        }
    }

    fn collect_results<'a>(&'a self, matches: impl Iterator<Item = &'a Postings>) -> Vec<SearchResult> {
        let mut hits: HashMap<DocId, SearchResult> = HashMap::new();
        for postings in matches {
            for (&doc_id, positions) in postings {
                let Some(&first) = positions.first() else { continue };
                hits.entry(doc_id)
                    .and_modify(|hit| hit.update(positions.len(), first))
                    .or_insert_with(|| SearchResult::new(self.path(doc_id), positions.len(), first));
            }
        }
        let mut results: Vec<SearchResult> = hits.into_values().collect();
        rank(&mut results);
        results
    }
}

fn distinct<I, S>(queries: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    queries
        .into_iter()
        .map(|q| q.as_ref().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.add("cat", "A", 3);
        index.add("cat", "B", 1);
        index.add("cat", "B", 5);
        index.add("car", "B", 2);
        index
    }

    #[test]
    fn exact_search_ranks_by_frequency() {
        let results = sample().exact_search(["cat"]);
        assert_eq!(results, vec![SearchResult::new("B", 2, 1), SearchResult::new("A", 1, 3)]);
    }

    #[test]
    fn partial_search_sums_every_matching_word() {
        let results = sample().partial_search(["ca"]);
        assert_eq!(results, vec![SearchResult::new("B", 3, 1), SearchResult::new("A", 1, 3)]);
    }

    #[test]
    fn prefix_does_not_match_inside_words() {
        let mut index = sample();
        index.add("scat", "C", 1);
        let results = index.partial_search(["ca"]);
        assert!(results.iter().all(|r| r.path() != "C"));
    }

    #[test]
    fn unknown_words_contribute_nothing() {
        let index = sample();
        assert_eq!(index.exact_search(["cat", "dog"]), index.exact_search(["cat"]));
        assert!(index.partial_search(["zebra"]).is_empty());
        assert!(index.exact_search(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn repeated_query_words_count_once() {
        let index = sample();
        assert_eq!(index.exact_search(["cat", "cat"]), index.exact_search(["cat"]));
    }

    #[test]
    fn update_accumulates_and_lowers_position() {
        let mut result = SearchResult::new("doc", 1, 7);
        result.update(2, 9);
        assert_eq!((result.frequency(), result.position()), (3, 7));
        result.update(1, 2);
        assert_eq!((result.frequency(), result.position()), (4, 2));
    }

    #[test]
    fn ties_break_on_position_then_path_ignoring_case() {
        let mut results = vec![
            SearchResult::new("b.txt", 2, 4),
            SearchResult::new("C.txt", 2, 1),
            SearchResult::new("a.txt", 2, 1),
            SearchResult::new("z.txt", 5, 9),
        ];
        rank(&mut results);
        let order: Vec<&str> = results.iter().map(SearchResult::path).collect();
        assert_eq!(order, vec!["z.txt", "a.txt", "C.txt", "b.txt"]);
    }

    #[test]
    fn case_only_path_differences_still_order() {
        let a = SearchResult::new("Doc", 1, 1);
        let b = SearchResult::new("doc", 1, 1);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Exact".parse::<SearchMode>(), Ok(SearchMode::Exact));
        assert_eq!("partial".parse::<SearchMode>(), Ok(SearchMode::Partial));
        assert!("fuzzy".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::default(), SearchMode::Partial);
    }
}
