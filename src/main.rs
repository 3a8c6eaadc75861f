use clap::Parser;
use dealer_watch::crawlers::HttpFetcher;
use dealer_watch::notify::{LogNotifier, Notifier, SendGridNotifier};
use dealer_watch::snapshot::SnapshotStore;
use dealer_watch::{EmailSettings, Pipeline, WatchConfig, scheduler};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine; settings may come from the real environment
    let _ = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            ::log::info!("Loading configuration from {}", path.display());
            WatchConfig::from_file(path)?
        }
        None => WatchConfig::default(),
    };
    if let Some(interval) = args.interval {
        config.interval_secs = interval;
    }
    if let Some(snapshot) = args.snapshot {
        config.snapshot_path = snapshot;
    }
    config.validate()?;

    ::log::info!(
        "Watching {} sites, snapshot at {}",
        config.sites.len(),
        config.snapshot_path.display()
    );

    let notifier: Box<dyn Notifier> = if args.dry_run {
        Box::new(LogNotifier)
    } else {
        let settings = EmailSettings::from_env()?;
        Box::new(SendGridNotifier::new(
            settings,
            &config.subject,
            config.delivery,
            config.format,
            config.request_timeout(),
        )?)
    };

    let fetcher = HttpFetcher::new(config.request_timeout())?;
    let pipeline = Pipeline::new(
        config.sites.clone(),
        Box::new(fetcher),
        notifier,
        SnapshotStore::new(&config.snapshot_path),
    )
    .with_format(config.format)
    .with_persist_policy(config.persist);

    if args.once {
        pipeline.run().await;
    } else {
        scheduler::run_every(&pipeline, config.interval()).await;
    }

    Ok(())
}
