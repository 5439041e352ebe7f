mod job_cmd;
mod render;
mod search_cmd;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use codesearch_client::ClientConfig;
use codesearch_client::CodebaseSettings;
use codesearch_client::FileFetcher;
use codesearch_client::HttpBackend;
use codesearch_client::LocalFileFetcher;
use std::path::PathBuf;
use std::sync::Arc;

pub use job_cmd::EmbedArgs;
pub use job_cmd::StructureArgs;
pub use search_cmd::FileArgs;
pub use search_cmd::MergeArgs;
pub use search_cmd::ModelsArgs;
pub use search_cmd::QueryArgs;
pub use search_cmd::SearchArgs;

/// Query a code search backend and drive its indexing jobs.
#[derive(Debug, Parser)]
#[command(name = "codesearch", version)]
pub struct Cli {
    /// Config file (defaults to $CODESEARCH_HOME/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend root URL, e.g. http://127.0.0.1:8000/
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Codebase root sent with file requests and used for local reads
    #[arg(long, global = true, value_name = "PATH")]
    pub codebase: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the indexed codebase and show results as a tree
    Search(SearchArgs),

    /// Show a window of one file, optionally grown up or down
    File(FileArgs),

    /// Print the unique file paths matched by a query
    Paths(QueryArgs),

    /// Concatenate every file matched by a query
    Merge(MergeArgs),

    /// List the embedding models the backend offers
    Models(ModelsArgs),

    /// Generate embeddings for the extracted code structures
    Embed(EmbedArgs),

    /// Extract code structures from a directory
    Structure(StructureArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let ctx = ClientContext::load(
            self.config.as_deref(),
            self.base_url.as_deref(),
            self.codebase.as_deref(),
        )?;
        match self.command {
            Command::Search(args) => search_cmd::run_search(&ctx, args).await,
            Command::File(args) => search_cmd::run_file(&ctx, args).await,
            Command::Paths(args) => search_cmd::run_paths(&ctx, args).await,
            Command::Merge(args) => search_cmd::run_merge(&ctx, args).await,
            Command::Models(args) => search_cmd::run_models(&ctx, args).await,
            Command::Embed(args) => job_cmd::run_embed(&ctx, args).await,
            Command::Structure(args) => job_cmd::run_structure(&ctx, args).await,
        }
    }
}

/// Resolved configuration plus the shared pieces every command needs.
pub struct ClientContext {
    pub config: ClientConfig,
    pub settings: CodebaseSettings,
    pub http: Arc<HttpBackend>,
}

impl ClientContext {
    pub fn load(
        config_path: Option<&std::path::Path>,
        base_url: Option<&str>,
        codebase: Option<&str>,
    ) -> Result<Self> {
        let mut config = ClientConfig::load(config_path).context("Failed to load config")?;
        if let Some(url) = base_url {
            config.base_url = url.to_string();
        }
        if let Some(path) = codebase {
            config.codebase_path = Some(path.to_string());
        }
        config.validate().context("Invalid configuration")?;

        let settings = CodebaseSettings::global(config.codebase_path.clone()).clone();
        if let Some(path) = &config.codebase_path {
            settings.set(path.as_str())?;
        }
        let http = Arc::new(HttpBackend::new(&config).context("Failed to build HTTP client")?);
        Ok(Self {
            config,
            settings,
            http,
        })
    }

    /// Fetcher for window loads: the backend, or the disk when `local`.
    pub fn fetcher(&self, local: bool) -> Result<Arc<dyn FileFetcher>> {
        if local {
            Ok(Arc::new(LocalFileFetcher::new(self.local_root()?)))
        } else {
            Ok(self.http.clone())
        }
    }

    pub fn local_root(&self) -> Result<PathBuf> {
        match &self.config.codebase_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => std::env::current_dir().context("Failed to get current directory"),
        }
    }
}
