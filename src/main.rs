use clap::Parser;
use news_harvest::Harvest;
use news_harvest::publish::{self, PublishConfig};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match args.harvest_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Starting harvest of {} pages from {}",
        config.total_pages,
        config.listing_url
    );
    ::log::info!("Using WebDriver at {}", config.webdriver_url);

    let start_time = std::time::Instant::now();
    let harvest = Harvest::new(config);

    let run = match harvest.run().await {
        Ok(run) => run,
        Err(e) => {
            ::log::error!("Harvest failed, nothing was exported: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Harvest complete - {} records ({} containers skipped) in {:.2} seconds, report at {}",
        run.report.dataset.len(),
        run.report.skipped(),
        start_time.elapsed().as_secs_f64(),
        run.csv_path.display()
    );

    if args.no_publish {
        ::log::info!("Publishing disabled, done");
        return ExitCode::SUCCESS;
    }

    let mut publish_config = PublishConfig::from_env();
    publish_config.attach_csv = args.attach_csv;

    match publish::publish(&run, harvest.config(), &publish_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("Publishing failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
