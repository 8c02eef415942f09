//! Lexical scoring and top-k selection.
//!
//! Scores are computed against the lower-cased chunk text:
//! - +10 for every adjacent pair of expanded terms found as a phrase, and for
//!   every adjacent pair of the original query that expansion pulled apart
//! - +1 for every distinct expanded term found
//! - +2 if the text mentions a "section" or "chapter"
//!
//! Chunks scoring above zero are returned best first; ties keep input order.
//! When nothing scores, the first few chunks of the input are returned instead
//! so the answer generator always has some context. Neither path returns more
//! than `top_k` chunks.

use std::collections::HashSet;

use tracing::debug;

use docqa_core::config::RankingConfig;
use docqa_core::traits::Ranker;
use docqa_core::types::{Chunk, EnrichedChunk, SearchHit};

use crate::synonyms::{SynonymTable, LEGAL_SYNONYMS};

const PHRASE_SCORE: u32 = 10;
const TERM_SCORE: u32 = 1;
const HEADING_SCORE: u32 = 2;
const HEADING_MARKERS: [&str; 2] = ["section", "chapter"];

/// Lower-case and whitespace-split `query`, following each term with the
/// variants of every table entry that lists it. Duplicates are kept.
pub fn expand_query(query: &str, table: &SynonymTable) -> Vec<String> {
    expand_terms(&query_terms(query), table)
}

fn query_terms(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn expand_terms(terms: &[String], table: &SynonymTable) -> Vec<String> {
    let mut expanded = Vec::new();
    for term in terms {
        expanded.push(term.clone());
        for variants in table.expansions(term) {
            expanded.extend(variants.iter().cloned());
        }
    }
    expanded
}

/// A query prepared for scoring: expanded terms and the two-word phrases to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedQuery {
    /// Expanded terms in order, duplicates included.
    pub terms: Vec<String>,
    /// Every adjacent pair of `terms` (duplicates included), followed by
    /// adjacent pairs of the original query that expansion pulled apart.
    pub phrases: Vec<String>,
}

impl ExpandedQuery {
    pub fn new(query: &str, table: &SynonymTable) -> Self {
        let original = query_terms(query);
        let terms = expand_terms(&original, table);
        let mut phrases: Vec<String> = terms.windows(2).map(|p| format!("{} {}", p[0], p[1])).collect();

        let separated: Vec<String> = original
            .windows(2)
            .map(|p| format!("{} {}", p[0], p[1]))
            .filter(|phrase| !phrases.contains(phrase))
            .collect();
        phrases.extend(separated);

        Self { terms, phrases }
    }

    /// Score already lower-cased text.
    pub fn score(&self, text_lower: &str) -> u32 {
        let mut score = 0;

        for phrase in &self.phrases {
            if text_lower.contains(phrase.as_str()) {
                score += PHRASE_SCORE;
            }
        }

        let mut seen = HashSet::new();
        for term in &self.terms {
            if seen.insert(term.as_str()) && text_lower.contains(term.as_str()) {
                score += TERM_SCORE;
            }
        }

        if HEADING_MARKERS.iter().any(|m| text_lower.contains(m)) {
            score += HEADING_SCORE;
        }
        score
    }
}

/// Score `text` against `query` using `table` for expansion.
pub fn score_text(table: &SynonymTable, query: &str, text: &str) -> u32 {
    ExpandedQuery::new(query, table).score(&text.to_lowercase())
}

/// Rank `chunks` for `query`, returning positions into `chunks`.
pub fn rank_with<C: AsRef<Chunk>>(
    table: &SynonymTable,
    query: &str,
    chunks: &[C],
    config: RankingConfig,
) -> Vec<SearchHit> {
    let expanded = ExpandedQuery::new(query, table);

    let mut scored: Vec<SearchHit> = chunks
        .iter()
        .enumerate()
        .filter_map(|(position, c)| {
            let chunk = c.as_ref();
            let score = expanded.score(&chunk.text.to_lowercase());
            (score > 0).then(|| SearchHit { chunk_id: chunk.chunk_id.clone(), position, score })
        })
        .collect();

    if scored.is_empty() {
        debug!(query, candidates = chunks.len(), "no lexical match, falling back to leading chunks");
        return chunks
            .iter()
            .take(config.fallback_count.min(config.top_k))
            .enumerate()
            .map(|(position, c)| SearchHit { chunk_id: c.as_ref().chunk_id.clone(), position, score: 0 })
            .collect();
    }

    // stable: equal scores keep input order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(config.top_k);
    debug!(query, terms = expanded.terms.len(), candidates = chunks.len(), returned = scored.len(), "ranked chunks");
    scored
}

/// [`find_relevant`] with a caller-supplied synonym table.
pub fn find_relevant_with<C: AsRef<Chunk> + Clone>(table: &SynonymTable, query: &str, chunks: &[C], top_k: usize) -> Vec<C> {
    let config = RankingConfig { top_k, ..RankingConfig::default() };
    rank_with(table, query, chunks, config)
        .into_iter()
        .map(|hit| chunks[hit.position].clone())
        .collect()
}

/// Return the `top_k` chunks most relevant to `query`, or the first three
/// chunks of the input if none match.
pub fn find_relevant<C: AsRef<Chunk> + Clone>(query: &str, chunks: &[C], top_k: usize) -> Vec<C> {
    find_relevant_with(&LEGAL_SYNONYMS, query, chunks, top_k)
}

/// [`Ranker`] over in-memory chunks with a fixed synonym table and selection config.
#[derive(Debug, Clone)]
pub struct LexicalSearchEngine {
    synonyms: SynonymTable,
    config: RankingConfig,
}

impl Default for LexicalSearchEngine {
    fn default() -> Self {
        Self::new(SynonymTable::clone(&LEGAL_SYNONYMS), RankingConfig::default())
    }
}

impl LexicalSearchEngine {
    pub fn new(synonyms: SynonymTable, config: RankingConfig) -> Self { Self { synonyms, config } }

    pub fn with_config(config: RankingConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> RankingConfig { self.config }

    pub fn synonyms(&self) -> &SynonymTable { &self.synonyms }
}

impl Ranker for LexicalSearchEngine {
    fn rank(&self, query: &str, chunks: &[EnrichedChunk]) -> Vec<SearchHit> {
        rank_with(&self.synonyms, query, chunks, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(i: usize, text: &str) -> Chunk {
        Chunk::new("doc", i, text)
    }

    #[test]
    fn expansion_keeps_original_then_variants() {
        let expanded = expand_query("Qatal e AMAD", &LEGAL_SYNONYMS);
        assert_eq!(
            expanded,
            ["qatal", "qatal", "قتل", "killing", "murder", "e", "amad", "amad", "amd", "عمد", "intentional"]
        );
    }

    #[test]
    fn expansion_of_unknown_terms_is_identity() {
        assert_eq!(expand_query("bail  hearing", &LEGAL_SYNONYMS), ["bail", "hearing"]);
        assert!(expand_query("   ", &LEGAL_SYNONYMS).is_empty());
    }

    #[test]
    fn score_components() {
        let table = SynonymTable::default();
        assert_eq!(score_text(&table, "bail hearing", "The BAIL hearing"), 10 + 1 + 1);
        assert_eq!(score_text(&table, "bail hearing", "hearing on bail"), 2);
        assert_eq!(score_text(&table, "bail hearing", "chapter on bail"), 1 + 2);
        assert_eq!(score_text(&table, "bail hearing", "nothing here"), 0);
    }

    #[test]
    fn duplicate_terms_count_once_for_term_score() {
        let table = SynonymTable::default();
        // phrase "bail bail" absent, single distinct term present
        assert_eq!(score_text(&table, "bail bail", "bail granted"), 1);
        assert_eq!(score_text(&table, "bail bail", "bail bail"), 10 + 1);
    }

    #[test]
    fn phrases_follow_expanded_order() {
        let q = ExpandedQuery::new("diat money", &LEGAL_SYNONYMS);
        assert!(q.phrases.contains(&"blood money".to_string()));
        assert!(q.phrases.contains(&"diat diyat".to_string()));
        // "diat money" was split by expansion, so the original pair is added back once
        assert_eq!(q.phrases.iter().filter(|p| *p == "diat money").count(), 1);
    }

    #[test]
    fn unexpanded_queries_add_no_extra_phrases() {
        let q = ExpandedQuery::new("bail hearing today", &LEGAL_SYNONYMS);
        assert_eq!(q.phrases, ["bail hearing", "hearing today"]);
    }

    #[test]
    fn adjacent_original_terms_score_phrase_bonus() {
        assert_eq!(score_text(&LEGAL_SYNONYMS, "qatal amad", "qatal amad"), 10 + 1 + 1);
        assert_eq!(score_text(&LEGAL_SYNONYMS, "qatal amad", "qatal then amad"), 1 + 1);
    }

    #[test]
    fn heading_bonus_applies_without_query_match() {
        let chunks = vec![chunk(0, "alpha"), chunk(1, "See Chapter 4"), chunk(2, "beta")];
        let hits = rank_with(&LEGAL_SYNONYMS, "zzz", &chunks, RankingConfig::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, 1);
        assert_eq!(hits[0].score, 2);
    }

    #[test]
    fn ties_keep_input_order() {
        let chunks: Vec<Chunk> = (0..6).map(|i| chunk(i, &format!("murder case {i}"))).collect();
        let hits = rank_with(&LEGAL_SYNONYMS, "murder", &chunks, RankingConfig { top_k: 4, fallback_count: 3 });
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, [0, 1, 2, 3]);
    }

    #[test]
    fn fallback_count_is_configurable() {
        let chunks: Vec<Chunk> = (0..5).map(|i| chunk(i, "plain text")).collect();
        let hits = rank_with(&LEGAL_SYNONYMS, "zzz", &chunks, RankingConfig { top_k: 5, fallback_count: 2 });
        assert_eq!(hits.iter().map(|h| h.score).collect::<Vec<_>>(), [0, 0]);
    }

    #[test]
    fn fallback_never_exceeds_top_k() {
        let chunks: Vec<Chunk> = (0..5).map(|i| chunk(i, "plain text")).collect();
        for top_k in 0..=2 {
            let hits = rank_with(&LEGAL_SYNONYMS, "zzz", &chunks, RankingConfig { top_k, fallback_count: 3 });
            assert_eq!(hits.len(), top_k);
        }
    }

    #[test]
    fn engine_uses_custom_synonyms() {
        let table = SynonymTable::default().with_entry("qisas", ["qisas", "retribution"]);
        let engine = LexicalSearchEngine::new(table, RankingConfig::default());
        let meta = docqa_core::types::DocumentMeta::default();
        let chunks = vec![
            EnrichedChunk::new(chunk(0, "unrelated"), &meta),
            EnrichedChunk::new(chunk(1, "law of retribution"), &meta),
        ];
        let found = engine.find_relevant("qisas", &chunks);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].chunk.chunk_index, 1);
    }
}
