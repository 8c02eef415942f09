//! Domain types shared by the chunker and the ranker.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Number of characters kept in [`Chunk::preview`].
pub const PREVIEW_CHARS: usize = 100;

/// A retrievable slice of a single document's text.
///
/// - `chunk_id`: `"{doc_id}_chunk_{chunk_index}"`, unique within the document
/// - `doc_id`: identity of the owning document
/// - `text`: the full trimmed chunk content
/// - `chunk_index`: zero-based emission position within the document
/// - `preview`: leading characters of `text`, for display only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    pub doc_id: String,
    pub text: String,
    pub chunk_index: usize,
    pub preview: String,
}

impl Chunk {
    pub fn new(doc_id: &str, chunk_index: usize, text: &str) -> Self {
        let text = text.trim();
        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        Self {
            chunk_id: format!("{doc_id}_chunk_{chunk_index}"),
            doc_id: doc_id.to_string(),
            text: text.to_string(),
            chunk_index,
            preview: preview.trim().to_string(),
        }
    }
}

impl AsRef<Chunk> for Chunk {
    fn as_ref(&self) -> &Chunk { self }
}

/// Descriptive metadata of a source document, attached to its chunks at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub filename: String,
    pub country: String,
    pub doc_type: String,
}

/// A chunk plus the metadata of the document it came from.
///
/// The metadata is opaque to ranking and is carried through for citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedChunk {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub filename: String,
    pub country: String,
    pub doc_type: String,
}

impl EnrichedChunk {
    pub fn new(chunk: Chunk, meta: &DocumentMeta) -> Self {
        Self {
            chunk,
            filename: meta.filename.clone(),
            country: meta.country.clone(),
            doc_type: meta.doc_type.clone(),
        }
    }

    pub fn text(&self) -> &str {
        &self.chunk.text
    }

    /// Citation label in the form `"{country} - {filename}"`.
    pub fn source_label(&self) -> String {
        format!("{} - {}", self.country, self.filename)
    }
}

impl AsRef<Chunk> for EnrichedChunk {
    fn as_ref(&self) -> &Chunk { &self.chunk }
}

/// Attach one document's metadata to each of its chunks.
pub fn enrich(chunks: Vec<Chunk>, meta: &DocumentMeta) -> Vec<EnrichedChunk> {
    chunks.into_iter().map(|c| EnrichedChunk::new(c, meta)).collect()
}

/// One ranked result.
///
/// `position` indexes into the chunk slice that was ranked. `score` is the
/// lexical score; fallback results carry a score of 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk_id: ChunkId,
    pub position: usize,
    pub score: u32,
}

/// Wildcard value accepted by [`ChunkFilter`] fields.
pub const FILTER_ALL: &str = "All";

/// Restricts a chunk corpus by document metadata before ranking.
///
/// `None` or `"All"` matches every value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkFilter {
    pub country: Option<String>,
    pub doc_type: Option<String>,
}

impl ChunkFilter {
    pub fn matches(&self, chunk: &EnrichedChunk) -> bool {
        field_matches(self.country.as_deref(), &chunk.country)
            && field_matches(self.doc_type.as_deref(), &chunk.doc_type)
    }

    pub fn apply(&self, chunks: Vec<EnrichedChunk>) -> Vec<EnrichedChunk> {
        chunks.into_iter().filter(|c| self.matches(c)).collect()
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        None | Some(FILTER_ALL) => true,
        Some(w) => w == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(country: &str, doc_type: &str) -> DocumentMeta {
        DocumentMeta { filename: "ppc.pdf".into(), country: country.into(), doc_type: doc_type.into() }
    }

    #[test]
    fn chunk_id_and_preview() {
        let long = "x".repeat(150);
        let c = Chunk::new("doc7", 3, &format!("  {long}  "));
        assert_eq!(c.chunk_id, "doc7_chunk_3");
        assert_eq!(c.text, long);
        assert_eq!(c.preview.chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let urdu = "قتل ".repeat(40);
        let c = Chunk::new("d", 0, &urdu);
        assert_eq!(c.preview.chars().count(), PREVIEW_CHARS - 1, "trailing space trimmed");
    }

    #[test]
    fn source_label_uses_country_and_filename() {
        let c = EnrichedChunk::new(Chunk::new("d", 0, "text"), &meta("Pakistan", "Act"));
        assert_eq!(c.source_label(), "Pakistan - ppc.pdf");
    }

    #[test]
    fn filter_all_and_none_match_everything() {
        let c = EnrichedChunk::new(Chunk::new("d", 0, "text"), &meta("Pakistan", "Act"));
        assert!(ChunkFilter::default().matches(&c));
        let all = ChunkFilter { country: Some("All".into()), doc_type: Some("All".into()) };
        assert!(all.matches(&c));
        let other = ChunkFilter { country: Some("India".into()), doc_type: None };
        assert!(!other.matches(&c));
        let typed = ChunkFilter { country: None, doc_type: Some("Act".into()) };
        assert!(typed.matches(&c));
    }

    #[test]
    fn enriched_chunk_serializes_flat() {
        let c = EnrichedChunk::new(Chunk::new("d", 0, "text"), &meta("Pakistan", "Act"));
        let v = serde_json::to_value(&c).expect("json");
        assert_eq!(v["chunk_id"], "d_chunk_0");
        assert_eq!(v["country"], "Pakistan");
    }
}
