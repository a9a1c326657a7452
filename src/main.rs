//! Media Rescan
//!
//! Receives webhook events and forwards folder rescans to media servers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use media_rescan::{
    logging, server, ATrainTrigger, AppConfig, EmbyTarget, HttpTrigger, Processor, Target,
};

const ABOUT: &str = r#"
Media Rescan - forward webhook events to media server library scans

Examples:
  media_rescan                              use ./config.yml
  media_rescan -c /etc/media_rescan.yml     use another config file
  media_rescan --port 8080 -v debug         override port and log level
"#;

/// Webhook-driven media library rescans
#[derive(Parser)]
#[command(name = "media_rescan")]
#[command(author, version, about = ABOUT, long_about = None)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short = 'c', long, default_value = "config.yml")]
    config: PathBuf,

    /// Address to bind (overrides the config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides the config)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Global log level (overrides the config)
    #[arg(short = 'v', long)]
    verbosity: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("failed loading config {}", cli.config.display()))?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(verbosity) = cli.verbosity {
        config.verbosity = verbosity;
    }

    logging::init(&config)?;
    info!("Loaded config from {}", cli.config.display());

    // Targets use a blocking HTTP client, so build them before the runtime starts.
    let mut targets: Vec<Arc<dyn Target>> = Vec::new();
    for emby in &config.targets.emby {
        let target = EmbyTarget::new(emby)
            .with_context(|| format!("failed initialising Emby target {}", emby.url))?;
        info!(
            "Initialised Emby target {} with {} libraries",
            target.url(),
            target.libraries().len()
        );
        targets.push(Arc::new(target));
    }
    if targets.is_empty() {
        warn!("No targets configured, scans will be accepted and dropped");
    }

    let mut triggers: Vec<Box<dyn HttpTrigger>> = Vec::new();
    if let Some(a_train) = &config.triggers.a_train {
        triggers.push(Box::new(
            ATrainTrigger::new(a_train).context("failed initialising A-Train trigger")?,
        ));
    }
    if triggers.is_empty() {
        warn!("No triggers configured");
    }

    let processor = Processor::new(targets);
    // Keep a handle so targets are dropped after the runtime shuts down.
    let _targets = processor.clone();
    let router = server::router(&triggers, processor.into_func());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed building runtime")?;
    runtime.block_on(server::serve(&config.bind_address(), router))?;

    Ok(())
}
