//! Client-side state for a semantic code search backend.
//!
//! The backend does the indexing and ranking. This crate turns its answers
//! into something navigable: a compressed folder tree of hits
//! ([`tree`]), an expandable view of each hit's file ([`window`]), and
//! start-and-poll controllers for the backend's long-running generation
//! jobs ([`job`]).

pub mod backend;
pub mod config;
mod error;
pub mod http;
pub mod job;
pub mod local;
pub mod metrics;
pub mod session;
pub mod settings;
pub mod tree;
pub mod window;

pub use backend::ArtifactCheck;
pub use backend::FileContent;
pub use backend::FileFetcher;
pub use backend::JobBackend;
pub use backend::SearchBackend;
pub use config::ClientConfig;
pub use error::ClientError;
pub use error::Result;
pub use http::HttpBackend;
pub use job::EmbeddingJob;
pub use job::EmbeddingPoller;
pub use job::JobApi;
pub use job::JobPoller;
pub use job::JobSnapshot;
pub use job::StructureJob;
pub use job::StructurePoller;
pub use local::FsArtifactCheck;
pub use local::LocalFileFetcher;
pub use local::merge_local;
pub use metrics::JobMetrics;
pub use session::SearchSession;
pub use settings::CodebaseSettings;
pub use tree::TreeNode;
pub use tree::build_tree;
pub use window::CodeWindowLoader;
pub use window::Direction;
pub use window::ExpandOutcome;
