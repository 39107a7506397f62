use anyhow::Result;
use clap::Parser;
use moodline_classifiers::ClassifierConfig;
use moodline_cli::cli::{Cli, Commands};
use moodline_cli::{commands, telemetry};
use std::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    let metrics = match &cli.metrics {
        Some(_) => Some(telemetry::init_metrics()?),
        None => None,
    };

    let config = ClassifierConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Train {
            model_name,
            model_path,
            corpus,
        } => {
            commands::train(&config, &model_name, &model_path, &corpus)?;
            info!("Model written to {}", model_path.display());
        }

        Commands::Test { model_path, corpus } => {
            commands::test(&config, &model_path, &corpus, &mut io::stdout().lock())?;
        }

        Commands::PlotCsv {
            model_path,
            text,
            output,
        } => {
            let points = commands::plot_csv(&config, &model_path, &text, &output)?;
            println!("Wrote {} points to {}", points, output.display());
        }

        Commands::Models => {
            println!("Available models:");
            commands::models(&mut io::stdout().lock())?;
        }
    }

    if let (Some(handle), Some(path)) = (&metrics, &cli.metrics) {
        telemetry::write_metrics(handle, path)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "moodline=debug,moodline_core=debug,moodline_classifiers=debug,moodline_cli=debug"
    } else {
        "moodline=info,moodline_core=info,moodline_classifiers=info,moodline_cli=info"
    };

    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new(filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into())
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
