use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use aurion::actions::DryRun;
use aurion::config::ConfiguredClock;
use aurion::render;
use aurion::Advisor;
use aurion::Config;
use aurion::Hour;
use aurion::Snapshot;
use aurion::Summary;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "aurion", version, about = "Recommendations for a connected home")]
struct Cli {
    /// Config file(s), merged in order
    #[arg(short, long = "config", global = true)]
    config: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a snapshot and print the recommendations
    Recommend {
        /// Snapshot JSON file, or `-` for stdin
        #[arg(long)]
        snapshot: PathBuf,

        /// Evaluate at this hour instead of the configured clock
        #[arg(long)]
        hour: Option<u8>,

        #[arg(long, value_enum, default_value_t)]
        format: Format,

        /// Walk every suggested action through a dry-run handler
        #[arg(long)]
        apply: bool,
    },

    /// Print headline figures for a snapshot
    Summary {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },

    /// Serve the HTTP API until Ctrl+C
    Serve {
        #[arg(long)]
        listen: Option<std::net::IpAddr>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.is_empty() {
        Config::default()
    } else {
        let (config, diagnostics) = Config::from_files(&cli.config)?;
        if !diagnostics.is_empty() {
            eprint!("{}", aurion::format_diagnostics(&diagnostics));
        }
        config
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(config.logging.targets())
        .init();

    tracing::debug!("Loaded config from {} file(s)", cli.config.len());

    let advisor = config.advisor.build();

    match cli.command {
        Command::Recommend {
            snapshot,
            hour,
            format,
            apply,
        } => recommend(&advisor, &snapshot, hour, format, apply),
        Command::Summary { snapshot, format } => {
            let snapshot = load_snapshot(&snapshot)?;
            let summary = Summary::from_snapshot(&snapshot);
            match format {
                Format::Text => print!("{}", render::summary(&summary)),
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
            Ok(())
        }
        Command::Serve { listen, port } => {
            serve(
                advisor,
                listen.unwrap_or(config.api.listen),
                port.unwrap_or(config.api.port),
            )
            .await
        }
    }
}

fn recommend(
    advisor: &Advisor<ConfiguredClock>,
    path: &Path,
    hour: Option<u8>,
    format: Format,
    apply: bool,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(path)?;
    let hour = match hour {
        Some(h) => Hour::new(h)?,
        None => advisor.hour(),
    };

    let recommendations = advisor.recommend_at(&snapshot, hour);
    tracing::info!(
        "{} recommendation(s) at {} for {} device(s)",
        recommendations.len(),
        hour,
        snapshot.devices.len()
    );

    match format {
        Format::Text => print!(
            "{}",
            render::recommendations(&recommendations, advisor.locale())
        ),
        Format::Json => println!("{}", serde_json::to_string_pretty(&recommendations)?),
    }

    if apply {
        let mut dry_run = DryRun::default();
        for rec in &recommendations {
            for action in &rec.actions {
                if let Err(never) = action.dispatch(&mut dry_run) {
                    match never {}
                }
            }
        }
        tracing::info!("Dry run: {} action(s) would be applied", dry_run.applied);
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read snapshot from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?
    };

    Ok(Snapshot::from_json(&json)?)
}

async fn serve(
    advisor: Advisor<ConfiguredClock>,
    listen: std::net::IpAddr,
    port: u16,
) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let mut server = tokio::spawn(aurion::api::serve(advisor, listen, port, shutdown_rx));

    tracing::info!("Press Ctrl+C to exit");

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Received shutdown signal"),
                Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
            }
            shutdown_tx.send(()).ok();
            server.await??;
        }
        result = &mut server => {
            // Server stopped on its own, e.g. the port was taken
            result??;
        }
    }

    tracing::info!("aurion shutdown complete");
    Ok(())
}
