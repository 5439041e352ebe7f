//! Wire types exchanged with the code search backend.

mod file;
mod job;
mod matches;

pub use file::FileEntry;
pub use file::FileRequest;
pub use file::FileResponse;
pub use file::MergeRequest;
pub use file::MergeResponse;
pub use file::NumberedLine;
pub use job::EmbeddingOptions;
pub use job::JobState;
pub use job::JobStatus;
pub use job::ModelOption;
pub use job::ModelsResponse;
pub use job::StartAck;
pub use job::StartStatus;
pub use job::StructureOptions;
pub use matches::MatchContext;
pub use matches::MatchResult;
pub use matches::MatchType;
pub use matches::SearchRequest;
pub use matches::SearchResponse;
pub use matches::SubMatch;
pub use matches::matched_field_label;

/// Matched field recorded when the backend omits one.
pub const DEFAULT_MATCHED_FIELD: &str = "content";
