use std::path::PathBuf;
use std::sync::mpsc;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::playback::PlaybackController;

mod event_loop;
mod logging;
mod settings;
mod startup;

/// Terminal music player for local folders.
#[derive(Parser, Debug)]
#[command(name = "musicblue", version, about)]
struct Args {
    /// Extra folders to scan at startup.
    dirs: Vec<PathBuf>,

    /// Do not scan the OS music directory.
    #[arg(long)]
    no_music_dir: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = settings::load_settings();

    if args.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    // Keep the guard alive until shutdown so buffered log lines are flushed.
    let _log_guard = match logging::init_logging(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("musicblue: logging disabled: {e}");
            None
        }
    };
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let gain = f32::from(settings.audio.initial_volume.min(100)) / 100.0;
    let (audio_player, engine_rx) = AudioPlayer::new(gain);
    let player = PlaybackController::new(audio_player, settings.playback.history_limit);
    let mut app = App::new(player);
    startup::apply_playback_defaults(&mut app, &settings);
    let player_rx = app.player.subscribe();

    let (scan_tx, scan_rx) = mpsc::channel();
    for root in startup::startup_roots(&settings.library, args.no_music_dir, &args.dirs) {
        startup::start_scan(&mut app, root, &settings.library, &scan_tx);
    }
    let channels = event_loop::Channels {
        engine_rx,
        player_rx,
        scan_tx,
        scan_rx,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut app, &channels, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("shutting down");
    run_result
}
