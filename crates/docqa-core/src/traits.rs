use crate::types::{Chunk, EnrichedChunk, SearchHit};

/// Splits one document's extracted text into ordered chunks.
pub trait Chunker: Send + Sync {
    fn chunk(&self, text: &str, doc_id: &str) -> Vec<Chunk>;
}

/// Selects the chunks most relevant to a query.
pub trait Ranker: Send + Sync {
    fn rank(&self, query: &str, chunks: &[EnrichedChunk]) -> Vec<SearchHit>;

    fn find_relevant(&self, query: &str, chunks: &[EnrichedChunk]) -> Vec<EnrichedChunk> {
        self.rank(query, chunks)
            .into_iter()
            .map(|hit| chunks[hit.position].clone())
            .collect()
    }
}
