use crate::ClientContext;
use crate::render::print_tree;
use crate::render::print_window;
use anyhow::Result;
use clap::Args;
use codesearch_client::CodeWindowLoader;
use codesearch_client::ExpandOutcome;
use codesearch_client::SearchSession;
use codesearch_client::merge_local;
use codesearch_client::window::DEFAULT_STEP;
use codesearch_protocol::MatchResult;
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::warn;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Search query
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Embedding model used to rank results
    #[arg(short, long)]
    pub model: Option<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Times to grow every result window up and down before printing
    #[arg(short = 'C', long, default_value_t = 0)]
    pub context: u32,

    /// Lines added per growth step
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: u32,

    /// Print only the result tree
    #[arg(long)]
    pub no_code: bool,

    /// Read result files from the local codebase instead of the backend
    #[arg(long)]
    pub local: bool,

    /// Emit results and tree as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FileArgs {
    /// Path relative to the codebase root
    #[arg(value_name = "PATH")]
    pub path: String,

    /// First line of the initial window (1-based)
    #[arg(long, default_value_t = 1)]
    pub from: u32,

    /// Last line of the initial window (inclusive)
    #[arg(long)]
    pub to: Option<u32>,

    /// Times to grow the window upwards
    #[arg(long, default_value_t = 0)]
    pub up: u32,

    /// Times to grow the window downwards
    #[arg(long, default_value_t = 0)]
    pub down: u32,

    /// Lines added per growth step
    #[arg(long, default_value_t = DEFAULT_STEP)]
    pub step: u32,

    /// Read the file from the local codebase instead of the backend
    #[arg(long)]
    pub local: bool,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Concatenate from the local codebase instead of asking the backend
    #[arg(long)]
    pub local: bool,
}

#[derive(Debug, Args)]
pub struct ModelsArgs {
    /// Emit the model list as JSON
    #[arg(long)]
    pub json: bool,
}

fn session(ctx: &ClientContext, local: bool) -> Result<SearchSession> {
    Ok(SearchSession::new(
        ctx.http.clone(),
        ctx.fetcher(local)?,
        ctx.settings.clone(),
    ))
}

pub async fn run_search(ctx: &ClientContext, args: SearchArgs) -> Result<()> {
    let mut session = session(ctx, args.local)?;
    session
        .search(&args.query.query, args.query.model.as_deref())
        .await?;

    if args.json {
        let out = json!({
            "results": session.matches(),
            "tree": session.tree(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if session.matches().is_empty() {
        println!("{} No results found", "✗".bright_red());
        return Ok(());
    }

    println!(
        "{} Found {} results in {} files\n",
        "✓".bright_green(),
        session.matches().len().to_string().bright_cyan(),
        session.file_paths().len().to_string().bright_cyan()
    );
    print_tree(session.tree());
    if args.no_code {
        return Ok(());
    }

    println!();
    for loader in session.windows() {
        grow(loader, args.context, args.context, args.step).await;
        print_window(loader, args.step);
    }
    Ok(())
}

pub async fn run_file(ctx: &ClientContext, args: FileArgs) -> Result<()> {
    let fetcher = ctx.fetcher(args.local)?;
    let codebase = ctx.settings.get();
    let content = fetcher.fetch_file(&args.path, codebase.as_deref()).await?;
    let total = content.total_lines();
    let from = args.from.max(1);
    if from > total {
        anyhow::bail!("{} has {total} lines; cannot start at line {from}", args.path);
    }
    let to = args.to.unwrap_or(from).clamp(from, total);

    let hit = MatchResult::new(args.path.as_str(), from, to)
        .with_snippet(content.slice(from, to).join("\n"));
    let loader = CodeWindowLoader::new(&hit, fetcher, ctx.settings.clone());
    grow(&loader, args.up, args.down, args.step).await;
    print_window(&loader, args.step);
    if let Some(error) = loader.error() {
        anyhow::bail!(error);
    }
    Ok(())
}

async fn grow(loader: &CodeWindowLoader, up: u32, down: u32, step: u32) {
    for _ in 0..up {
        if !applied(loader.expand_up(step).await) {
            break;
        }
    }
    for _ in 0..down {
        if !applied(loader.expand_down(step).await) {
            break;
        }
    }
}

fn applied(outcome: ExpandOutcome) -> bool {
    match outcome {
        ExpandOutcome::Applied { .. } => true,
        ExpandOutcome::Failed { message } => {
            warn!("window expansion failed: {message}");
            false
        }
        ExpandOutcome::Queued | ExpandOutcome::AtBoundary | ExpandOutcome::Closed => false,
    }
}

pub async fn run_paths(ctx: &ClientContext, args: QueryArgs) -> Result<()> {
    let mut session = session(ctx, false)?;
    session.search(&args.query, args.model.as_deref()).await?;
    let text = session.file_paths_text();
    if !text.is_empty() {
        println!("{text}");
    }
    Ok(())
}

pub async fn run_merge(ctx: &ClientContext, args: MergeArgs) -> Result<()> {
    let mut session = session(ctx, args.local)?;
    session
        .search(&args.query.query, args.query.model.as_deref())
        .await?;
    let merged = if args.local {
        merge_local(&ctx.local_root()?, &session.file_paths()).await?
    } else {
        session.merge_code().await?
    };
    print!("{merged}");
    Ok(())
}

pub async fn run_models(ctx: &ClientContext, args: ModelsArgs) -> Result<()> {
    let session = session(ctx, false)?;
    let models = session.list_models().await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }
    for model in models {
        println!("{:<12} {}", model.value.bright_cyan(), model.label);
    }
    Ok(())
}
