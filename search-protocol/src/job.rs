use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Status of a long-running backend job. Timestamps are unix seconds.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JobStatus {
    #[serde(rename = "status", alias = "state")]
    pub state: JobState,
    pub progress: f64,
    pub message: String,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub total: Option<u64>,
    pub processed: Option<u64>,
}

impl JobStatus {
    pub fn idle() -> Self {
        Self::default()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartStatus {
    Started,
    Error,
    #[serde(other)]
    Unknown,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StartAck {
    pub status: StartStatus,
    #[serde(default)]
    pub message: Option<String>,
}

impl StartAck {
    pub fn started() -> Self {
        Self {
            status: StartStatus::Started,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: StartStatus::Error,
            message: Some(message.into()),
        }
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbeddingOptions {
    pub model: String,
    pub force: bool,
    pub use_gpu: bool,
    pub batch_size: Option<u32>,
}

impl Default for EmbeddingOptions {
    fn default() -> Self {
        Self {
            model: "qodo".to_string(),
            force: false,
            use_gpu: false,
            batch_size: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructureOptions {
    pub target_dir: String,
    pub pattern: String,
    pub max_lines: u32,
    pub force: bool,
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            target_dir: String::new(),
            pattern: "**/*.py".to_string(),
            max_lines: 500,
            force: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ModelsResponse {
    pub models: Vec<ModelOption>,
}

impl ModelsResponse {
    /// Models every backend ships with.
    pub fn builtin() -> Self {
        Self {
            models: vec![
                ModelOption {
                    value: "qodo".to_string(),
                    label: "Qodo Embed".to_string(),
                },
                ModelOption {
                    value: "nomic".to_string(),
                    label: "Nomic Embed".to_string(),
                },
            ],
        }
    }
}
