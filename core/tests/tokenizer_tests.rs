use search_core::tokenizer::{query_words, tokenize};

#[test]
fn it_normalizes_and_stems() {
    // "cafe\u{301}" is the decomposed spelling of café
    let toks = tokenize("Running Runners RUN! The cafe\u{301}'s menu.");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    // Stemming to "run" should appear
    assert!(words.contains(&"run".to_string()));
    // NFKC keeps the accent: the composed form survives
    assert!(words.contains(&"café".to_string()));
}

#[test]
fn it_keeps_every_word() {
    let toks = tokenize("The quick brown fox and the lazy dog");
    let words: Vec<String> = toks.into_iter().map(|(w, _)| w).collect();
    assert_eq!(words.len(), 8);
    assert_eq!(words.iter().filter(|w| *w == "the").count(), 2);
}

#[test]
fn query_and_document_normalize_alike() {
    let doc: Vec<String> = tokenize("Searching SEARCHED searches").into_iter().map(|(w, _)| w).collect();
    let query = query_words("searching");
    assert_eq!(query.len(), 1);
    assert!(doc.iter().all(|w| query.contains(w)));
}
