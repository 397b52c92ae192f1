use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    RE.find_iter(text).map(|mat| STEMMER.stem(mat.as_str()).into_owned())
}

/// Tokenize text into (stem, position) using NFKC normalization, lowercase and stemming.
/// Positions are 1-based and count every extracted word.
pub fn tokenize(text: &str) -> Vec<(String, usize)> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    normalized_words(&normalized)
        .enumerate()
        .map(|(i, stem)| (stem, i + 1))
        .collect()
}

/// Normalize a query line into its distinct stems, in lexicographic order.
pub fn query_words(line: &str) -> BTreeSet<String> {
    let normalized = line.nfkc().collect::<String>().to_lowercase();
    normalized_words(&normalized).collect()
}
