use crate::error::Result;
use async_trait::async_trait;
use codesearch_protocol::EmbeddingOptions;
use codesearch_protocol::JobStatus;
use codesearch_protocol::MatchResult;
use codesearch_protocol::ModelOption;
use codesearch_protocol::StartAck;
use codesearch_protocol::StructureOptions;

/// Full contents of one file, addressable by 1-based line number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub lines: Vec<String>,
}

impl FileContent {
    pub fn new(path: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    pub fn total_lines(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }

    /// Lines `from..=to`, clamped to the file. Empty when the range is
    /// inverted or starts past the end.
    pub fn slice(&self, from: u32, to: u32) -> &[String] {
        let start = from.max(1) as usize - 1;
        let end = (to as usize).min(self.lines.len());
        if start >= end {
            return &[];
        }
        &self.lines[start..end]
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, model: Option<&str>) -> Result<Vec<MatchResult>>;

    /// Concatenated contents of `file_paths`, for clipboard export.
    async fn merge_files(&self, file_paths: &[String]) -> Result<String>;

    async fn list_models(&self) -> Result<Vec<ModelOption>>;
}

#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch_file(&self, path: &str, codebase_path: Option<&str>) -> Result<FileContent>;
}

#[async_trait]
pub trait JobBackend: Send + Sync {
    async fn start_embedding(&self, options: &EmbeddingOptions) -> Result<StartAck>;

    async fn embedding_status(&self) -> Result<JobStatus>;

    async fn start_structure(&self, options: &StructureOptions) -> Result<StartAck>;

    async fn structure_status(&self) -> Result<JobStatus>;
}

/// Answers whether a prerequisite artifact is present.
#[async_trait]
pub trait ArtifactCheck: Send + Sync {
    async fn exists(&self) -> Result<bool>;
}
