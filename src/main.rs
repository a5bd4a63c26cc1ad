//! agrimarket CLI binary

use agrimarket::cli::{AgriMarketApp, Cli, Commands};
use agrimarket::AdvisorConfig;
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.command.validate().context("invalid arguments")?;

    let mut config = AdvisorConfig::default().with_timeout(Duration::from_secs(cli.timeout_secs));
    if let Commands::Suggest { bounds, .. } = &cli.command {
        config = config.with_bounds_policy((*bounds).into());
    }

    let app = AgriMarketApp::from_env(config).context("failed to configure model client")?;

    match cli.command {
        Commands::Suggest {
            offer,
            listing_price,
            history,
            history_file,
            ..
        } => {
            tracing::info!("Requesting counter-offer for offer {} against listing {}", offer, listing_price);
            let output = app
                .suggest_counter_offer(offer, listing_price, history, history_file.as_deref())
                .await
                .context("counter-offer suggestion failed")?;
            print_json(&output)?;
        }

        Commands::QualityNotes { crop_type, photo } => {
            tracing::info!("Generating quality notes for {} from {}", crop_type, photo.display());
            let output = app
                .quality_notes(&crop_type, &photo)
                .await
                .context("quality note generation failed")?;
            print_json(&output)?;
        }

        Commands::Summarize { agreement_file } => {
            tracing::info!("Summarizing {}", agreement_file.display());
            let output = app
                .summarize(&agreement_file)
                .await
                .context("agreement summary failed")?;
            print_json(&output)?;
        }

        Commands::CropImage { crop_type, out } => {
            tracing::info!("Generating image for {}", crop_type);
            let image = app
                .crop_image(&crop_type, out.as_deref())
                .await
                .context("crop image generation failed")?;
            println!("{}", image);
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
