use anyhow::Result;
use dotenvy::dotenv;

use tocadora::cli::{Cli, Commands};
use tocadora::core::logging::log_provider_configuration;
use tocadora::core::{config, init_logger};
use tocadora::download::engine::DownloadEngine;
use tocadora::download::resolver::{MediaResolver, SkyResolver};
use tocadora::download::{transcode, MediaFormat};

/// Diagnostic entry point: exercises resolution and download without a
/// chat transport attached.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // .env first so the lazily-read config statics see it
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Commands::Fetch { url, format, output } => run_fetch(url, format, output).await,
        Commands::Resolve { url, format } => run_resolve(url, format).await,
    }
}

fn parse_format(format: &str) -> Result<MediaFormat> {
    match format {
        "audio" | "mp3" => Ok(MediaFormat::Audio),
        "video" | "mp4" => Ok(MediaFormat::Video),
        other => Err(anyhow::anyhow!("Unsupported format: {}. Use audio or video.", other)),
    }
}

async fn run_fetch(url: String, format: String, output: Option<String>) -> Result<()> {
    let format = parse_format(&format)?;
    log_provider_configuration();

    if format == MediaFormat::Audio && !transcode::ffmpeg_available().await {
        log::warn!("🎛️ ffmpeg not found; audio that is not already MP3 will fail");
    }

    println!("🎧 tocadora fetch");
    println!("=================");
    println!("URL: {}", url);
    println!("Format: {}", format);

    let resolver = SkyResolver::new()?;
    let direct = resolver
        .resolve(&url, format)
        .await
        .ok_or_else(|| anyhow::anyhow!("Provider returned no downloadable URL for {}", url))?;
    println!("🔗 Resolved: {}", direct);

    let download_dir = output.unwrap_or_else(|| config::DOWNLOAD_DIR.clone());
    let engine = DownloadEngine::new(&download_dir)?;
    let artifact = engine.fetch(&direct, format).await?;

    println!("✅ Artifact ready: {}", artifact.display());
    Ok(())
}

async fn run_resolve(url: String, format: String) -> Result<()> {
    let format = parse_format(&format)?;
    log_provider_configuration();

    let resolver = SkyResolver::new()?;
    let direct = resolver
        .resolve(&url, format)
        .await
        .ok_or_else(|| anyhow::anyhow!("Provider returned no downloadable URL for {}", url))?;

    println!("{}", direct);
    Ok(())
}
