use std::collections::{BTreeMap, BTreeSet, HashMap};

pub type DocId = u32;

/// Positions of one word, grouped by the document they occur in.
pub(crate) type Postings = BTreeMap<DocId, BTreeSet<usize>>;

/// Word -> document -> positions.
///
/// Document paths live once in an arena (`paths`) and words refer to them by
/// [`DocId`]. Words are kept in a `BTreeMap` so iteration is lexicographic,
/// which the prefix search and the JSON writer both rely on.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    pub(crate) words: BTreeMap<String, Postings>,
    paths: Vec<String>,
    doc_ids: HashMap<String, DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record that `word` occurs in `path` at the 1-based `position`.
    /// Adding the same triple twice has no effect.
    pub fn add(&mut self, word: &str, path: &str, position: usize) {
        debug_assert!(!word.is_empty(), "words are non-empty");
        debug_assert!(position >= 1, "positions are 1-based");
        let doc_id = self.doc_id(path);
        match self.words.get_mut(word) {
            Some(postings) => {
                postings.entry(doc_id).or_default().insert(position);
            }
            None => {
                let mut postings = Postings::new();
                postings.entry(doc_id).or_default().insert(position);
                self.words.insert(word.to_string(), postings);
            }
        }
    }

    /// Merge every occurrence from `other` into this index.
    pub fn add_all(&mut self, other: InvertedIndex) {
        let InvertedIndex { words, paths, .. } = other;
        let remap: Vec<DocId> = paths.iter().map(|p| self.doc_id(p)).collect();
        for (word, postings) in words {
            let target = self.words.entry(word).or_default();
            for (doc_id, positions) in postings {
                target.entry(remap[doc_id as usize]).or_default().extend(positions);
            }
        }
    }

    fn doc_id(&mut self, path: &str) -> DocId {
        if let Some(&id) = self.doc_ids.get(path) {
            return id;
        }
        let id = self.paths.len() as DocId;
        self.paths.push(path.to_string());
        self.doc_ids.insert(path.to_string(), id);
        id
    }

    /// Total number of positions stored for `word` across all documents.
    pub fn word_count(&self, word: &str) -> usize {
        self.words
            .get(word)
            .map(|postings| postings.values().map(BTreeSet::len).sum())
            .unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool { self.words.contains_key(word) }

    pub fn contains_in(&self, word: &str, path: &str) -> bool {
        match (self.words.get(word), self.doc_ids.get(path)) {
            (Some(postings), Some(id)) => postings.contains_key(id),
            _ => false,
        }
    }

    /// Documents containing `word`, in ascending path order.
    pub fn get(&self, word: &str) -> Vec<&str> {
        let mut docs: Vec<&str> = match self.words.get(word) {
            Some(postings) => postings.keys().map(|&id| self.path(id)).collect(),
            None => Vec::new(),
        };
        docs.sort_unstable();
        docs
    }

    /// Positions of `word` in `path`, ascending. Empty when either is unknown.
    pub fn positions(&self, word: &str, path: &str) -> Vec<usize> {
        self.doc_ids
            .get(path)
            .and_then(|id| self.words.get(word)?.get(id))
            .map(|positions| positions.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Indexed words in lexicographic order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.keys().map(String::as_str)
    }

    pub fn num_words(&self) -> usize { self.words.len() }

    pub fn num_documents(&self) -> usize { self.paths.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub(crate) fn path(&self, id: DocId) -> &str { &self.paths[id as usize] }
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
    fn counts_positions_across_documents() {
        let index = sample();
        assert_eq!(index.word_count("cat"), 3);
        assert_eq!(index.word_count("car"), 1);
        assert_eq!(index.word_count("dog"), 0);
        assert_eq!(index.num_words(), 2);
        assert_eq!(index.num_documents(), 2);
    }

    #[test]
    fn duplicate_triple_is_ignored() {
        let mut index = sample();
        index.add("cat", "B", 5);
        assert_eq!(index.word_count("cat"), 3);
        assert_eq!(index.positions("cat", "B"), vec![1, 5]);
    }

    #[test]
    fn positions_are_sorted_regardless_of_insert_order() {
        let mut index = InvertedIndex::new();
        index.add("x", "doc", 9);
        index.add("x", "doc", 2);
        index.add("x", "doc", 4);
        assert_eq!(index.positions("x", "doc"), vec![2, 4, 9]);
    }

    #[test]
    fn get_returns_paths_alphabetically() {
        let mut index = InvertedIndex::new();
        index.add("w", "zeta.txt", 1);
        index.add("w", "alpha.txt", 1);
        index.add("w", "mid.txt", 1);
        assert_eq!(index.get("w"), vec!["alpha.txt", "mid.txt", "zeta.txt"]);
        assert!(index.get("missing").is_empty());
    }

    #[test]
    fn contains_checks_word_and_document() {
        let index = sample();
        assert!(index.contains("cat"));
        assert!(!index.contains("ca"));
        assert!(index.contains_in("car", "B"));
        assert!(!index.contains_in("car", "A"));
        assert!(!index.contains_in("car", "C"));
    }

    #[test]
    fn add_all_merges_and_deduplicates() {
        let mut left = sample();
        let mut right = InvertedIndex::new();
        right.add("cat", "B", 5);
        right.add("cat", "C", 7);
        right.add("dog", "A", 1);
        left.add_all(right);

        assert_eq!(left.word_count("cat"), 4);
        assert_eq!(left.get("cat"), vec!["A", "B", "C"]);
        assert_eq!(left.positions("dog", "A"), vec![1]);
        assert_eq!(left.num_documents(), 3);
    }

    #[test]
    fn words_iterate_lexicographically() {
        let index = sample();
        assert_eq!(index.words().collect::<Vec<_>>(), vec!["car", "cat"]);
    }
}
