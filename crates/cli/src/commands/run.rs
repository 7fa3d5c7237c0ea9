//! Run command - poll, filter and deliver loop

use anyhow::{Context, Result, bail};
use rfeed_adapters::{
    feeds::HttpFeedSource,
    outbox::{OutboxPublisher, OutboxWriter},
    state::SqliteSeenStore,
    webhook::WebhookPublisher,
};
use rfeed_domain::{
    ProcessResult, Publisher, SystemClock,
    usecases::{PollLoop, PollLoopConfig},
};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::args::RunArgs;
use crate::config::AppConfig;

type FeedPoller = PollLoop<HttpFeedSource, dyn Publisher, SqliteSeenStore, SystemClock>;

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let require_approval = args.require_approval;
    let outbox_path = if require_approval {
        Some(args.outbox.clone().unwrap_or_else(default_outbox_path))
    } else {
        None
    };

    if args.outbox.is_some() && !require_approval {
        tracing::warn!("--outbox is ignored without --require-approval");
    }

    let mut dry_run = args.dry_run || config.general.dry_run;
    if require_approval && dry_run {
        tracing::info!("--require-approval overrides dry-run");
        dry_run = false;
    }

    if config.watch.feeds.is_empty() {
        bail!("No feeds configured; add URLs to [watch].feeds");
    }

    tracing::info!(
        dry_run = dry_run,
        once = args.once,
        require_approval = require_approval,
        outbox = ?outbox_path,
        feeds = ?config.watch.feeds,
        tags = ?config.watch.tags,
        "Starting rfeed run"
    );

    // Build dependencies
    let feed_source = Arc::new(
        HttpFeedSource::new(
            Duration::from_secs(config.watch.fetch_timeout_secs),
            &config.watch.user_agent,
        )
        .context("Failed to initialize HTTP feed source")?,
    );

    let seen_store = Arc::new(
        SqliteSeenStore::new(&config.general.state_db_path)
            .await
            .context("Failed to initialize SQLite seen store")?,
    );

    let publisher: Arc<dyn Publisher> = match outbox_path {
        Some(outbox_path) => {
            let writer = OutboxWriter::new(outbox_path.clone())
                .await
                .context("Failed to initialize outbox writer")?;

            tracing::info!(
                outbox = %outbox_path.display(),
                "Writing items to outbox for approval"
            );

            Arc::new(OutboxPublisher::new(writer))
        }
        None => Arc::new(build_webhook_publisher(&config, dry_run)?),
    };

    if !dry_run && !publisher.is_enabled() {
        tracing::warn!("No publisher enabled; new items will only be recorded as seen");
    }

    let poll_config = PollLoopConfig {
        feeds: config.watch.feeds.clone(),
        tags: config.watch.tag_set(),
        dry_run,
        max_concurrent: config.general.max_concurrent,
    };

    let poller: FeedPoller = PollLoop::new(
        feed_source,
        publisher,
        seen_store,
        Arc::new(SystemClock),
        poll_config,
    );

    // Execute
    if args.once {
        tracing::info!("Running single poll cycle");
        let results = poller.poll_once().await;
        tracing::info!(processed = results.len(), "Poll cycle complete");
        log_results(results);
    } else {
        // Continuous polling loop
        let poll_interval = Duration::from_secs(config.watch.poll_interval_secs);
        let mut ticker = interval(poll_interval);

        // Set up graceful shutdown
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        };

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    refresh_tags(&poller, config_path.as_deref());
                    let results = poller.poll_once().await;
                    if !results.is_empty() {
                        tracing::info!(processed = results.len(), "Poll cycle complete");
                    }
                    log_results(results);
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutting down gracefully");
                    break;
                }
            }
        }
    }

    tracing::info!("rfeed run completed");
    Ok(())
}

/// Re-read the wanted tags so edits to the config apply to the next poll
fn refresh_tags(poller: &FeedPoller, config_path: Option<&Path>) {
    match AppConfig::load(config_path) {
        Ok(config) => {
            let tags = config.watch.tag_set();
            if *poller.tags() != tags {
                tracing::info!(tags = ?config.watch.tags, "Wanted tags changed");
                poller.replace_tags(tags);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to reload configuration, keeping current tags");
        }
    }
}

fn log_results(results: Vec<(String, ProcessResult)>) {
    for (link, result) in results {
        match result {
            ProcessResult::Published { item, delivery_id } => {
                tracing::info!(
                    link = %link,
                    title = %item.title,
                    author = %item.author.title,
                    delivery_id = ?delivery_id,
                    "Published"
                );
            }
            ProcessResult::Skipped { reason } => {
                tracing::debug!(link = %link, reason = %reason, "Skipped");
            }
            ProcessResult::Failed { error } => {
                tracing::error!(link = %link, error = %error, "Failed");
            }
        }
    }
}

fn build_webhook_publisher(config: &AppConfig, dry_run: bool) -> Result<WebhookPublisher> {
    if dry_run || !config.webhook.enabled {
        return Ok(WebhookPublisher::disabled());
    }

    let token = load_optional_secret(&config.webhook.token_env);
    if token.is_none() {
        tracing::debug!(env = %config.webhook.token_env, "No webhook token set, sending unauthenticated");
    }

    WebhookPublisher::new(
        config.webhook.url.clone(),
        token,
        Duration::from_secs(config.webhook.timeout_secs),
    )
    .context("Failed to initialize webhook publisher")
}

fn load_optional_secret(env_var: &str) -> Option<SecretString> {
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

fn default_outbox_path() -> PathBuf {
    PathBuf::from("./outbox.jsonl")
}
