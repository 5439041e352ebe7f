use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FileRequest {
    pub path: String,
    pub codebase_path: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumberedLine {
    pub content: String,
    pub line_number: u32,
}

/// A fetched file. Remote backends send `code`; the local service sends
/// `content`/`lines` instead, and either may report `error`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileEntry {
    pub path: String,
    pub code: Option<Vec<String>>,
    pub startline: Option<u32>,
    pub endline: Option<u32>,
    pub content: Option<String>,
    pub file_name: Option<String>,
    pub line_count: Option<u32>,
    pub lines: Option<Vec<NumberedLine>>,
    pub error: Option<String>,
}

impl FileEntry {
    /// Every line of the file from line 1, without line terminators.
    pub fn materialize_lines(&self) -> Vec<String> {
        if let Some(code) = &self.code {
            return code.iter().map(|line| strip_terminator(line)).collect();
        }
        if let Some(lines) = &self.lines {
            let mut ordered: Vec<&NumberedLine> = lines.iter().collect();
            ordered.sort_by_key(|line| line.line_number);
            return ordered
                .into_iter()
                .map(|line| strip_terminator(&line.content))
                .collect();
        }
        match &self.content {
            Some(content) => content.split('\n').map(strip_terminator).collect(),
            None => Vec::new(),
        }
    }
}

fn strip_terminator(line: &str) -> String {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line).to_string()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileResponse {
    pub result: Vec<FileEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeRequest {
    pub file_paths: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MergeResponse {
    pub result: String,
}
