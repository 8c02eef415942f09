//! docqa-text
//!
//! Lexical relevance ranking over chunk corpora. Query terms are expanded with
//! a table of legal-term transliterations (see `synonyms`) and chunks are scored
//! by phrase and term overlap (see `ranker`).

pub mod ranker;
pub mod synonyms;

pub use ranker::{expand_query, find_relevant, find_relevant_with, rank_with, score_text, ExpandedQuery, LexicalSearchEngine};
pub use synonyms::{SynonymTable, LEGAL_SYNONYMS};
