use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::fmt;

use crate::DEFAULT_MATCHED_FIELD;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Text,
    #[default]
    Semantic,
    Hybrid,
    #[serde(other)]
    Other,
}

impl MatchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Semantic => "semantic",
            Self::Hybrid => "hybrid",
            Self::Other => "other",
        }
    }

    /// Badge caption shown next to a hit.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text Match",
            Self::Hybrid => "Hybrid Match",
            Self::Semantic | Self::Other => "Semantic Match",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display name for the field a hit matched on.
pub fn matched_field_label(field: &str) -> &str {
    match field {
        "file_name" => "Filename",
        "function_name" => "Function",
        "file_path" => "Path",
        "content" => "Content",
        "code" => "Code",
        "docstring" => "Docstring",
        "snippet" => "Snippet",
        other => other,
    }
}

/// Absolute line range inside a loaded window that should be emphasised.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubMatch {
    pub overlap_from: u32,
    pub overlap_to: u32,
}

impl SubMatch {
    pub fn contains(&self, line: u32) -> bool {
        self.overlap_from <= line && line <= self.overlap_to
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchContext {
    pub file_name: String,
    pub file_path: String,
    pub module: String,
    pub snippet: String,
    pub struct_name: Option<String>,
}

/// One search hit. Line numbers are 1-based and inclusive.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchResult {
    pub code_type: String,
    pub context: MatchContext,
    pub docstring: Option<String>,
    pub line: u32,
    pub line_from: u32,
    pub line_to: u32,
    pub name: String,
    pub signature: String,
    pub similarity: Option<f32>,
    pub match_type: Option<MatchType>,
    pub matched_field: Option<String>,
    pub sub_matches: Vec<SubMatch>,
}

impl MatchResult {
    pub fn new(file_path: impl Into<String>, line_from: u32, line_to: u32) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .rsplit('/')
            .next()
            .unwrap_or(file_path.as_str())
            .to_string();
        Self {
            context: MatchContext {
                file_name,
                file_path,
                ..MatchContext::default()
            },
            line: line_from,
            line_from,
            line_to,
            ..Self::default()
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.context.snippet = snippet.into();
        self
    }

    pub fn with_match(mut self, match_type: MatchType, matched_field: impl Into<String>) -> Self {
        self.match_type = Some(match_type);
        self.matched_field = Some(matched_field.into());
        self
    }

    pub fn with_sub_matches(mut self, sub_matches: Vec<SubMatch>) -> Self {
        self.sub_matches = sub_matches;
        self
    }

    pub fn file_path(&self) -> &str {
        &self.context.file_path
    }

    pub fn file_name(&self) -> &str {
        &self.context.file_name
    }

    pub fn snippet(&self) -> &str {
        &self.context.snippet
    }

    pub fn match_type_or_default(&self) -> MatchType {
        self.match_type.unwrap_or_default()
    }

    pub fn matched_field_or_default(&self) -> &str {
        self.matched_field.as_deref().unwrap_or(DEFAULT_MATCHED_FIELD)
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub model: Option<String>,
}

/// The backend answers either with hits or with an error string.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchResponse {
    pub result: Vec<MatchResult>,
    pub error: Option<String>,
}
