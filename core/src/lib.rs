pub mod build;
pub mod index;
pub mod persist;
pub mod query;
pub mod search;
pub mod tokenizer;

pub use index::{DocId, InvertedIndex};
pub use query::QueryResults;
pub use search::{compare, rank, SearchMode, SearchResult};
