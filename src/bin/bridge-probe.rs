//! bridge-probe: smoke harness for the inference bridge.
//!
//! Loads a model under a preset, runs one inference over a synthetic frame,
//! and prints the recognition payload. Useful for checking a model bundle and
//! preset before wiring the library into a host app.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use vision_bridge::ModelSession;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "bridge-probe", about = "Smoke-test the vision inference bridge")]
struct Cli {
    /// Path to the model file.
    #[arg(long)]
    model: PathBuf,

    /// Path to the tokenizer file.
    #[arg(long)]
    tokenizer: PathBuf,

    /// Preset name.
    #[arg(long, default_value = "fast")]
    preset: String,

    /// Synthetic frame width in pixels.
    #[arg(long, default_value_t = 224)]
    width: i32,

    /// Synthetic frame height in pixels.
    #[arg(long, default_value_t = 224)]
    height: i32,

    /// Optional label hint.
    #[arg(long)]
    hint: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "vision_bridge=debug"
    } else {
        "vision_bridge=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("bridge-probe v{}", env!("CARGO_PKG_VERSION"));

    let session = ModelSession::create(&cli.model, &cli.tokenizer, &cli.preset)?;
    let preset = session.preset().clone();
    info!(
        preset = preset.name,
        precision = %preset.precision,
        backend = %preset.backend,
        "Session ready"
    );

    // Synthetic mid-gray frame; the probe checks plumbing, not accuracy.
    let elements = preset
        .expected_elements(cli.width as i64, cli.height as i64)
        .ok_or_else(|| anyhow::anyhow!("frame geometry overflows"))?;
    let frame = vec![0.5f32; elements as usize];

    let recognition = session.infer(&frame, cli.width, cli.height, cli.hint.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&recognition)?);

    Ok(())
}
