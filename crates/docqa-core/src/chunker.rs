//! Paragraph-preserving chunking with character overlap.
//!
//! Text is split on blank lines and paragraphs are packed into a buffer until
//! the next one would push it past `chunk_size` characters. When a chunk is
//! closed, its last `overlap` characters seed the next one. A paragraph is
//! never split, so a single oversized paragraph becomes its own chunk.
//!
//! The overlap cut counts characters and may land mid-word.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::Chunker;
use crate::types::Chunk;

const PARAGRAPH_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, overlap: 200 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphChunker {
    config: ChunkingConfig,
}

impl ParagraphChunker {
    pub fn new(config: ChunkingConfig) -> Self { Self { config } }

    pub fn config(&self) -> ChunkingConfig { self.config }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str, doc_id: &str) -> Vec<Chunk> {
        chunk_text(text, doc_id, self.config.chunk_size, self.config.overlap)
    }
}

/// Split `text` into overlapping chunks owned by `doc_id`.
///
/// Returns an empty vec for empty or whitespace-only input.
pub fn chunk_text(text: &str, doc_id: &str, chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    // Length of `buffer` in characters.
    let mut buffer_len = 0usize;

    for paragraph in text.split(PARAGRAPH_SEPARATOR) {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }
        let paragraph_len = paragraph.chars().count();

        if !buffer.is_empty() && buffer_len + paragraph_len > chunk_size {
            emit(&mut chunks, doc_id, &buffer);
            let carried = tail_chars(&buffer, overlap).to_string();
            buffer.clear();
            buffer_len = 0;
            if !carried.is_empty() {
                buffer_len = carried.chars().count() + PARAGRAPH_SEPARATOR.len();
                buffer.push_str(&carried);
                buffer.push_str(PARAGRAPH_SEPARATOR);
            }
        } else if !buffer.is_empty() {
            buffer.push_str(PARAGRAPH_SEPARATOR);
            buffer_len += PARAGRAPH_SEPARATOR.len();
        }
        buffer.push_str(paragraph);
        buffer_len += paragraph_len;
    }

    if !buffer.trim().is_empty() {
        emit(&mut chunks, doc_id, &buffer);
    }
    debug!(doc_id, chunks = chunks.len(), "chunked document");
    chunks
}

fn emit(chunks: &mut Vec<Chunk>, doc_id: &str, buffer: &str) {
    let chunk = Chunk::new(doc_id, chunks.len(), buffer);
    debug!(chunk_id = %chunk.chunk_id, len = chunk.text.len(), "emitted chunk");
    chunks.push(chunk);
}

/// The last `n` characters of `s` (all of `s` if it is shorter).
fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((start, _)) => &s[start..],
        None => s,
    }
}
