use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::chunker::{ChunkingConfig, ParagraphChunker};
use crate::error;
use crate::traits::Chunker;
use crate::types::{enrich, DocumentMeta, EnrichedChunk};

const UNKNOWN_COUNTRY: &str = "Unknown";
const UNKNOWN_DOC_TYPE: &str = "Other";

/// Turns a directory of extracted `.txt` documents into an enriched chunk corpus.
///
/// Files are expected under `<root>/<country>/<doc_type>/<name>.txt`; missing
/// levels fall back to `"Unknown"` and `"Other"`.
#[derive(Default)]
pub struct DataProcessor {
    chunker: ParagraphChunker,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: ChunkingConfig) -> Self {
        Self { chunker: ParagraphChunker::new(config) }
    }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<EnrichedChunk>> {
        let files = self.list_txt_files(data_dir);
        self.process_files(data_dir, &files)
    }

    pub fn process_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<Vec<EnrichedChunk>> {
        let mut files = self.list_txt_files(data_dir);
        if files.len() > limit {
            files.truncate(limit);
            info!(limit, "limited to first files");
        }
        self.process_files(data_dir, &files)
    }

    /// Chunk one file, deriving its metadata from its location under `data_dir`.
    pub fn process_file(&self, file_path: &Path, data_dir: &Path) -> Result<Vec<EnrichedChunk>> {
        let content = self.read_file_content(file_path).with_context(|| format!("reading {}", file_path.display()))?;
        let doc_id = self.extract_doc_id(file_path)?;
        let meta = self.extract_meta(file_path, data_dir);
        let chunks = self.chunker.chunk(&content, &doc_id);
        if chunks.is_empty() {
            warn!(path = %file_path.display(), "no text extracted, skipping");
        }
        Ok(enrich(chunks, &meta))
    }

    fn process_files(&self, data_dir: &Path, files: &[PathBuf]) -> Result<Vec<EnrichedChunk>> {
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            info!(file = file_index + 1, total = files.len(), path = %file_path.display(), "processing file");
            all_chunks.extend(self.process_file(file_path, data_dir)?);
        }
        info!(files = files.len(), chunks = all_chunks.len(), "processed directory");
        Ok(all_chunks)
    }

    fn read_file_content(&self, file_path: &Path) -> error::Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn extract_doc_id(&self, file_path: &Path) -> Result<String> {
        file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .with_context(|| format!("no file name in {}", file_path.display()))
    }

    fn extract_meta(&self, file_path: &Path, data_dir: &Path) -> DocumentMeta {
        let relative_path = file_path.strip_prefix(data_dir).unwrap_or(file_path);
        let dirs: Vec<String> = relative_path
            .parent()
            .map(|p| p.components().map(|c| c.as_os_str().to_string_lossy().to_string()).collect())
            .unwrap_or_default();
        DocumentMeta {
            filename: file_path.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default(),
            country: dirs.first().cloned().unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            doc_type: dirs.get(1).cloned().unwrap_or_else(|| UNKNOWN_DOC_TYPE.to_string()),
        }
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("txt") { txt_files.push(path.to_path_buf()); }
        }
        txt_files.sort();
        txt_files
    }
}
