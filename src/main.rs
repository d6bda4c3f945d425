use anyhow::Context;
use clap::Parser;
use etrs_csv_converter::cli::Args;
use etrs_csv_converter::{BatchProcessor, ConverterConfig};
use std::process;

fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!("Failed to set up logging: {:#}", e);
        process::exit(1);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create async runtime: {}", e);
            process::exit(1);
        }
    };

    match runtime.block_on(run(&args)) {
        Ok(()) => process::exit(0),
        Err(error) => {
            tracing::error!("{:#}", error);
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = ConverterConfig::from_args(args);
    let processor = BatchProcessor::new(config).context("Invalid configuration")?;

    let stats = processor
        .process()
        .await
        .context("Coordinate conversion aborted")?;
    stats.ensure_no_failures()?;

    Ok(())
}

fn setup_logging(args: &Args) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("etrs_csv_converter={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
