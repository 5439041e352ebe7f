use crate::backend::FileFetcher;
use crate::backend::SearchBackend;
use crate::error::ClientError;
use crate::error::Result;
use crate::settings::CodebaseSettings;
use crate::tree::TreeNode;
use crate::tree::build_tree;
use crate::window::CodeWindowLoader;
use codesearch_protocol::MatchResult;
use codesearch_protocol::ModelOption;
use codesearch_protocol::ModelsResponse;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// One query's worth of results: the hits, their navigation tree, and a
/// window loader per hit.
pub struct SearchSession {
    backend: Arc<dyn SearchBackend>,
    fetcher: Arc<dyn FileFetcher>,
    settings: CodebaseSettings,
    matches: Vec<MatchResult>,
    tree: Vec<TreeNode>,
    windows: Vec<CodeWindowLoader>,
    error: Option<String>,
    loading: bool,
}

impl SearchSession {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        fetcher: Arc<dyn FileFetcher>,
        settings: CodebaseSettings,
    ) -> Self {
        Self {
            backend,
            fetcher,
            settings,
            matches: Vec::new(),
            tree: Vec::new(),
            windows: Vec::new(),
            error: None,
            loading: false,
        }
    }

    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    pub fn tree(&self) -> &[TreeNode] {
        &self.tree
    }

    pub fn windows(&self) -> &[CodeWindowLoader] {
        &self.windows
    }

    /// Loader for the first hit in `file_path`.
    pub fn window_for(&self, file_path: &str) -> Option<&CodeWindowLoader> {
        self.windows
            .iter()
            .find(|loader| loader.file_path() == file_path)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn settings(&self) -> &CodebaseSettings {
        &self.settings
    }

    /// Run `query`, replacing whatever the session showed before.
    pub async fn search(&mut self, query: &str, model: Option<&str>) -> Result<&[MatchResult]> {
        let query = query.trim();
        if query.is_empty() {
            let err = ClientError::Precondition("Please enter a query".to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.reset();
        self.loading = true;
        debug!("searching for {query:?} with model {model:?}");
        let result = self.backend.search(query, model).await;
        self.loading = false;
        match result {
            Ok(matches) => {
                info!("search returned {} results", matches.len());
                self.tree = build_tree(&matches);
                self.windows = matches
                    .iter()
                    .map(|hit| {
                        CodeWindowLoader::new(hit, self.fetcher.clone(), self.settings.clone())
                    })
                    .collect();
                self.matches = matches;
                Ok(&self.matches)
            }
            Err(ClientError::Backend(message)) => {
                warn!("search rejected by backend: {message}");
                self.error = Some(message.clone());
                Err(ClientError::Backend(message))
            }
            Err(err) => {
                warn!("search failed: {err}");
                let message = format!("Failed to get Search Result: {err}");
                self.error = Some(message.clone());
                Err(ClientError::Transport(message))
            }
        }
    }

    /// Drop all results and close their loaders.
    pub fn reset(&mut self) {
        for loader in self.windows.drain(..) {
            loader.close();
        }
        self.matches.clear();
        self.tree.clear();
        self.error = None;
        self.loading = false;
    }

    /// Unique result paths in first-appearance order.
    pub fn file_paths(&self) -> Vec<String> {
        unique_paths(&self.matches)
    }

    /// Newline-joined [`Self::file_paths`], ready for the clipboard.
    pub fn file_paths_text(&self) -> String {
        self.file_paths().join("\n")
    }

    /// Ask the backend to concatenate every result file.
    pub async fn merge_code(&self) -> Result<String> {
        let paths = self.file_paths();
        if paths.is_empty() {
            return Err(ClientError::Precondition("No results to merge".to_string()));
        }
        let merged = self.backend.merge_files(&paths).await?;
        if merged.is_empty() {
            return Err(ClientError::Backend(
                "Failed to merge code: Empty response".to_string(),
            ));
        }
        Ok(merged)
    }

    /// Models offered for search and embedding. Falls back to the built-in
    /// list when the backend cannot be reached.
    pub async fn list_models(&self) -> Vec<ModelOption> {
        match self.backend.list_models().await {
            Ok(models) if !models.is_empty() => models,
            Ok(_) => ModelsResponse::builtin().models,
            Err(err) => {
                warn!("failed to list embedding models: {err}");
                ModelsResponse::builtin().models
            }
        }
    }
}

pub fn unique_paths(matches: &[MatchResult]) -> Vec<String> {
    let mut seen = HashSet::new();
    matches
        .iter()
        .map(MatchResult::file_path)
        .filter(|path| seen.insert(*path))
        .map(str::to_string)
        .collect()
}
