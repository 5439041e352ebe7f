//! Backend pieces that work straight off the local filesystem.

use crate::backend::ArtifactCheck;
use crate::backend::FileContent;
use crate::backend::FileFetcher;
use crate::error::ClientError;
use crate::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

const MERGE_SEPARATOR: &str = "\n\n=====================\n\n";

/// Reads files beneath a codebase root on disk.
#[derive(Clone, Debug)]
pub struct LocalFileFetcher {
    default_root: PathBuf,
}

impl LocalFileFetcher {
    pub fn new(default_root: impl Into<PathBuf>) -> Self {
        Self {
            default_root: default_root.into(),
        }
    }

    fn resolve(&self, path: &str, codebase_path: Option<&str>) -> PathBuf {
        let root = codebase_path
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_root.clone());
        root.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl FileFetcher for LocalFileFetcher {
    async fn fetch_file(&self, path: &str, codebase_path: Option<&str>) -> Result<FileContent> {
        let full_path = self.resolve(path, codebase_path);
        debug!("reading {}", full_path.display());
        let content = match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ClientError::Backend(format!("File not found: {path}")));
            }
            Err(err) => {
                return Err(ClientError::Backend(format!(
                    "Error reading file {path}: {err}"
                )));
            }
        };
        let lines = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Ok(FileContent::new(path, lines))
    }
}

/// Concatenate the files in `file_paths` the same way the merge endpoint
/// does. Paths are resolved against `root`; missing files are skipped.
pub async fn merge_local(root: &Path, file_paths: &[String]) -> Result<String> {
    let mut merged = String::new();
    for path in file_paths {
        let full_path = root.join(path.trim_start_matches('/'));
        if !tokio::fs::metadata(&full_path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
        {
            debug!("merge skipped missing file {}", full_path.display());
            continue;
        }
        let content = tokio::fs::read_to_string(&full_path).await?;
        let display_name = full_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        merged.push_str(&format!("File Name : {display_name}\n\n"));
        merged.push_str(&content);
        merged.push_str(MERGE_SEPARATOR);
    }
    Ok(merged)
}

/// Reports whether a generated artifact file exists and is non-empty.
#[derive(Clone, Debug)]
pub struct FsArtifactCheck {
    path: PathBuf,
}

impl FsArtifactCheck {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ArtifactCheck for FsArtifactCheck {
    async fn exists(&self) -> Result<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta.is_file() && meta.len() > 0),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
