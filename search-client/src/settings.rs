use crate::error::ClientError;
use crate::error::Result;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

static GLOBAL: OnceCell<CodebaseSettings> = OnceCell::new();

/// Holder for the codebase root path used by file fetches.
///
/// Clones share one value. Readers take a snapshot when a fetch starts, so
/// a change never reaches a request that is already in flight; loaders that
/// hold a [`watch::Receiver`] notice the change on their next operation.
#[derive(Clone, Debug)]
pub struct CodebaseSettings {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl Default for CodebaseSettings {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CodebaseSettings {
    pub fn new(initial: Option<String>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Process-wide instance. The first call fixes the initial value.
    pub fn global(initial: Option<String>) -> &'static CodebaseSettings {
        GLOBAL.get_or_init(|| Self::new(initial))
    }

    pub fn get(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn set(&self, path: impl Into<String>) -> Result<()> {
        let path = path.into();
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(ClientError::Precondition(
                "Please provide a valid path".to_string(),
            ));
        }
        info!("codebase path set to {trimmed}");
        self.tx.send_replace(Some(trimmed.to_string()));
        Ok(())
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}
