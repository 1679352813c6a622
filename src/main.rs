use clap::Parser;
use glimpse::core::config::{self, CliOverrides, GlimpseConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "glimpse", about = "Terminal chat client for multimodal image analysis")]
struct Args {
    /// Backend origin serving POST /analyze (e.g. http://localhost:8000)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Model name forwarded to the backend
    #[arg(short, long)]
    model: Option<String>,

    /// Send text-only prompts instead of asking for an image
    #[arg(long)]
    allow_text_only: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to glimpse.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("glimpse.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using defaults");
        log::warn!("Falling back to default config: {}", e);
        GlimpseConfig::default()
    });

    let cli = CliOverrides {
        endpoint: args.endpoint,
        model: args.model,
        allow_text_only: args.allow_text_only,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Glimpse starting up: endpoint={}, model={:?}, require_image={}",
        resolved.endpoint,
        resolved.model,
        resolved.require_image
    );

    glimpse::tui::run(resolved)
}
