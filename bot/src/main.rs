use std::sync::Arc;

use stale_reaper_bot::{
    api::GithubClient,
    config::{ActionMode, Config},
    events::{ActivityReactor, BatchProcessor, CommentEvent, Context, SweepSettings},
    logging,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init()?;

    if let Err(e) = run().await {
        error!("Run error: {e:#}");
        return Err(e);
    }

    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Resolve the triggering item before touching the API
    let event = match &config.mode {
        ActionMode::ActivityReaction { event_path } => Some(CommentEvent::from_file(event_path)?),
        ActionMode::CloseSweep => None,
    };

    let github = GithubClient::new(config.repo_token.clone())?;
    let context = Context::new(
        Arc::new(github),
        config.repository.clone(),
        config.issue_label.clone(),
        config.dry_run,
    );

    match event {
        None => {
            let report = BatchProcessor::new(context, SweepSettings::from(&config))
                .run()
                .await?;
            info!(
                "Sweep finished: {} pages, {} items seen, {} closed, {} skipped, {} operations",
                report.pages, report.items_seen, report.closed, report.skipped, report.operations
            );
        }
        Some(event) => {
            ActivityReactor::new(context).react(&event).await?;
        }
    }

    Ok(())
}
