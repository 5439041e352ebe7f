use crate::ClientContext;
use crate::render::print_job_progress;
use anyhow::Result;
use clap::Args;
use codesearch_client::EmbeddingJob;
use codesearch_client::FsArtifactCheck;
use codesearch_client::JobApi;
use codesearch_client::JobPoller;
use codesearch_client::JobSnapshot;
use codesearch_client::StructureJob;
use codesearch_protocol::EmbeddingOptions;
use codesearch_protocol::JobState;
use codesearch_protocol::StructureOptions;
use owo_colors::OwoColorize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct WaitArgs {
    /// Return once the job is accepted instead of following it
    #[arg(long)]
    pub no_wait: bool,

    /// Print only the final status
    #[arg(short, long)]
    pub quiet: bool,

    /// Show the current status without starting a new job
    #[arg(long)]
    pub status: bool,
}

#[derive(Debug, Args)]
pub struct EmbedArgs {
    /// Embedding model
    #[arg(short, long, default_value = "qodo")]
    pub model: String,

    /// Regenerate even when embeddings already exist
    #[arg(short, long)]
    pub force: bool,

    /// Run the model on the GPU
    #[arg(long)]
    pub gpu: bool,

    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Skip the check for generated structures
    #[arg(long)]
    pub skip_structure_check: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Debug, Args)]
pub struct StructureArgs {
    /// Directory to extract structures from
    #[arg(short, long, value_name = "DIR", default_value = "")]
    pub target_dir: String,

    /// Glob selecting the files to process
    #[arg(short, long, default_value = "**/*.py")]
    pub pattern: String,

    /// Skip files longer than this
    #[arg(long, default_value_t = 500)]
    pub max_lines: u32,

    /// Regenerate even when structures already exist
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}

pub async fn run_embed(ctx: &ClientContext, args: EmbedArgs) -> Result<()> {
    let mut job = EmbeddingJob::new(ctx.http.clone());
    if !args.skip_structure_check {
        let structures = FsArtifactCheck::new(ctx.config.structures_path());
        job = job.with_artifact_check(Arc::new(structures));
    }
    let poller = JobPoller::new(job, ctx.config.embedding_poll_interval());
    let options = EmbeddingOptions {
        model: args.model,
        force: args.force,
        use_gpu: args.gpu,
        batch_size: args.batch_size,
    };
    drive(&poller, options, &args.wait).await
}

pub async fn run_structure(ctx: &ClientContext, args: StructureArgs) -> Result<()> {
    let poller = JobPoller::new(
        StructureJob::new(ctx.http.clone()),
        ctx.config.structure_poll_interval(),
    );
    let options = StructureOptions {
        target_dir: args.target_dir,
        pattern: args.pattern,
        max_lines: args.max_lines,
        force: args.force,
    };
    drive(&poller, options, &args.wait).await
}

async fn drive<A: JobApi>(
    poller: &JobPoller<A>,
    options: A::Options,
    wait: &WaitArgs,
) -> Result<()> {
    let kind = poller.api().kind();
    if wait.status {
        poller.refresh().await;
        print_job_progress(kind, &poller.snapshot());
        poller.reset();
        return Ok(());
    }

    poller.start(options).await?;
    if wait.no_wait {
        println!("{} {kind} generation started", "✓".bright_green());
        return Ok(());
    }

    let finished = if wait.quiet {
        tokio::select! {
            _ = poller.wait_until_finished() => Some(poller.snapshot()),
            _ = tokio::signal::ctrl_c() => None,
        }
    } else {
        follow(poller, kind).await
    };

    let Some(snap) = finished else {
        poller.reset();
        println!("{kind} generation: stopped following (the job keeps running on the backend)");
        return Ok(());
    };
    print_job_progress(kind, &snap);
    if snap.status.state == JobState::Failed {
        anyhow::bail!("{kind} generation failed: {}", snap.status.message);
    }
    Ok(())
}

// Prints every status change. `None` when interrupted.
async fn follow<A: JobApi>(poller: &JobPoller<A>, kind: &str) -> Option<JobSnapshot> {
    let mut rx = poller.subscribe();
    let mut last_printed = None;
    loop {
        let snap = rx.borrow_and_update().clone();
        if !snap.loading && !snap.is_running() {
            return Some(snap);
        }
        if last_printed.as_ref() != Some(&snap.status) {
            print_job_progress(kind, &snap);
            last_printed = Some(snap.status);
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("{kind} status channel closed");
                    return Some(poller.snapshot());
                }
            }
            _ = tokio::signal::ctrl_c() => return None,
        }
    }
}
