use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use podprep_core::{
    load_config, select_fingerprinter, validate_config, Config, Driver, FfmpegTool, FfprobeTool,
    RunReport, ToolCapabilities,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normalize an audio library for portable players.
#[derive(Debug, Parser)]
#[command(name = "podprep", version, about)]
struct Cli {
    /// Configuration file
    #[arg(long, env = "PODPREP_CONFIG", default_value = "podprep.toml")]
    config: PathBuf,

    /// Library root, overriding the configuration file
    #[arg(long)]
    root: Option<PathBuf>,

    /// Print the commands that would run without changing anything
    #[arg(long)]
    dry_run: bool,

    /// Keep lossless sources after conversion
    #[arg(long)]
    keep_source: bool,

    /// Tag outputs with an acoustic fingerprint when fpcalc is available
    #[arg(long)]
    fingerprint: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    quiet: u8,
}

impl Cli {
    fn default_directive(&self) -> &'static str {
        match i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=-2 => "error",
            -1 => "warn",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Applies command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.library.root = root.clone();
        }
        if self.dry_run {
            config.run.dry_run = true;
        }
        if self.keep_source {
            config.run.delete_source_on_success = false;
        }
        if self.fingerprint {
            config.run.enable_fingerprinting = true;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_directive())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        "podprep {} (config {}), library {:?}",
        VERSION,
        &config_hash[..16],
        config.library.root
    );

    let capabilities = ToolCapabilities::detect(&config.tools).await;
    if !capabilities.can_transcode() {
        let missing = capabilities.missing().join(", ");
        if config.run.dry_run {
            warn!("Missing {}, probes will report nothing", missing);
        } else {
            bail!("Required tools not found: {}", missing);
        }
    }

    let fingerprinter = select_fingerprinter(&config, &capabilities);
    let prober = Arc::new(FfprobeTool::new(config.tools.ffprobe_path.clone()));
    let transcoder = Arc::new(FfmpegTool::new(config.tools.ffmpeg_path.clone()));

    let json = cli.json;
    let driver = Driver::new(config, prober, transcoder, fingerprinter);
    let report = driver.run().await.context("Library run failed")?;

    print_report(&report, json)
}

/// Loads the configuration file, falling back to defaults when only a root
/// was given on the command line.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        info!("Loading configuration from {:?}", cli.config);
        load_config(&cli.config)
            .with_context(|| format!("Failed to load config from {:?}", cli.config))?
    } else if let Some(root) = &cli.root {
        info!("No configuration at {:?}, using defaults", cli.config);
        Config::for_root(root.clone())
    } else {
        bail!(
            "Configuration file {:?} not found and no --root given",
            cli.config
        );
    };

    cli.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", out);
    } else {
        println!("{}", report);
    }
    Ok(())
}
