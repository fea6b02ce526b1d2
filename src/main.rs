// podpipe - terminal podcast player
// Loads the episode catalog, then hands everything to the TUI loop

use anyhow::{Context, Result};
use clap::Parser;
use podpipe::{
    audio::{self, AudioConfig},
    config::Config,
    episode::load_catalog,
    ui::App,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "podpipe")]
#[command(about = "A terminal podcast player")]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Episode catalog (JSON) overriding the configured one
    #[arg(long)]
    episodes: Option<PathBuf>,

    /// Enable developer logging (debug level for everything)
    #[arg(long)]
    dev: bool,

    /// Play without an audio output device
    #[arg(long)]
    silent: bool,

    /// Start with the dark theme
    #[arg(long)]
    dark: bool,
}

fn init_logging(config: &Config, dev: bool) -> Result<WorkerGuard> {
    let log_dir = &config.logging.directory;
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    // Daily rotating file appender, the terminal belongs to the UI
    let file_appender = tracing_appender::rolling::daily(log_dir, "podpipe.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = if dev { "debug" } else { config.logging.filter.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(episodes) = args.episodes {
        config.episodes_file = episodes;
    }
    config.audio.silent |= args.silent;
    config.ui.dark_theme |= args.dark;

    let _log_guard = init_logging(&config, args.dev)?;
    info!("podpipe starting up");

    let episodes = load_catalog(&config.episodes_file)?;

    let audio_config = AudioConfig::from(config.audio.clone());
    let factory: Box<dyn audio::DeviceFactory> = match audio::default_factory(&audio_config) {
        Ok(factory) => factory,
        Err(e) => {
            warn!("No audio output ({}), falling back to silent playback", e);
            Box::new(audio::SilentDeviceFactory)
        }
    };

    let mut app = App::new(&config, episodes, factory)?;
    app.run().await?;

    info!("podpipe shutting down");
    Ok(())
}
