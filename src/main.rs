// exl-player - minimal terminal music player
// A table of songs, play/pause/prev/next, a seek bar and a volume that sticks

use anyhow::Result;
use clap::{Parser, Subcommand};
use exl_player::audio::{PlaybackBackend, RodioBackend, SilentBackend};
use exl_player::ui::App;
use exl_player::{Config, Controller, TrackStore, VolumeFile};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "exl-player")]
#[command(about = "A minimal terminal music player backed by a local song table")]
struct Args {
    /// Enable developer logging (debug level everywhere)
    #[arg(long)]
    dev: bool,

    /// Use this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Register a song without opening the player
    Add { path: PathBuf },
    /// Print the song table
    List,
}

fn init_logging(dev: bool, log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(log_dir, "exl-player.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let base_filter = if dev {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,exl_player=debug"))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if dev {
        eprintln!("Dev mode: debug logging to {}", log_dir.display());
    }

    Ok(guard)
}

fn open_backend() -> Box<dyn PlaybackBackend> {
    match RodioBackend::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            warn!("No audio output ({}), continuing silently", e);
            Box::new(SilentBackend::new())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config - falls back to defaults if missing
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let _guard = init_logging(args.dev, &config.log_directory)?;
    info!("exl-player starting up");

    let store = TrackStore::open(&config.database_path)?;

    match args.command {
        Some(Cmd::Add { path }) => {
            let track = store.add(&path)?;
            println!("Added {}", track.display_name());
            Ok(())
        }
        Some(Cmd::List) => {
            for track in store.list()? {
                let info = track.info();
                println!("{}\t{}\t{}", info.name, info.length_label(), info.size_label());
            }
            Ok(())
        }
        None => {
            let volume_file = VolumeFile::new(&config.volume_path);
            let controller = Controller::new(store, open_backend(), volume_file)?;

            let mut app = App::new(config, controller)?;
            app.run().await
        }
    }
}
