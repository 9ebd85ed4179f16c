use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, terminal,
};
use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::io::{self, Stdout, stdout};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use flappy_face::appearance::{BirdAppearance, DefaultBird, FaceFile, FaceSnapshots};
use flappy_face::input::{self, Command};
use flappy_face::render::{self, PixelBuf};
use flappy_face::sound::Sfx;
use flappy_face::store::{BEST_SCORE_KEY, BestScoreStore, JsonFileStore, MemoryStore};
use flappy_face::ticker::Ticker;
use flappy_face::{GameConfig, GameEvent, GameLoop, Result, Variant};

/// How long a collaborator notice stays on screen.
const NOTICE_FRAMES: u32 = 120;

#[derive(Parser)]
#[command(name = "flappy-face", version)]
#[command(about = "Flappy Bird in your terminal, optionally wearing your face")]
struct Args {
    /// Rule set: classic returns to the title after a crash, arcade restarts at once
    #[arg(long, value_enum, default_value_t = Variant::Classic)]
    variant: Variant,

    /// JSON file overriding individual game constants
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Fix the pipe layout
    #[arg(long)]
    seed: Option<u64>,

    /// Face sprite (JSON palette + rows) drawn instead of the bird
    #[arg(long)]
    face: Option<PathBuf>,

    /// Re-read the face file every N frames, for faces that keep changing
    #[arg(long, value_name = "FRAMES", requires = "face")]
    face_refresh: Option<u64>,

    /// Where the best score lives (default: the platform data directory)
    #[arg(long)]
    score_file: Option<PathBuf>,

    /// Keep the best score in memory only
    #[arg(long, conflicts_with = "score_file")]
    no_save: bool,

    #[arg(long)]
    mute: bool,

    /// Log destination (default: flappy-face.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn project_dirs() -> io::Result<ProjectDirs> {
    ProjectDirs::from("", "", "flappy-face").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Could not determine data directory")
    })
}

/// The terminal belongs to the game, so logs go to a file.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => project_dirs()?.data_dir().join("flappy-face.log"),
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_store(args: &Args) -> Box<dyn BestScoreStore> {
    if args.no_save {
        return Box::new(MemoryStore::default());
    }
    match &args.score_file {
        Some(path) => Box::new(JsonFileStore::open(path)),
        None => match JsonFileStore::open_default() {
            Ok(store) => {
                tracing::debug!(path = %store.path().display(), "best score store");
                Box::new(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "no data directory, best score will not be saved");
                Box::new(MemoryStore::default())
            }
        },
    }
}

fn open_appearance(args: &Args) -> Result<Box<dyn BirdAppearance>> {
    Ok(match (&args.face, args.face_refresh) {
        (Some(path), Some(every)) => Box::new(FaceSnapshots::new(path, every)),
        (Some(path), None) => Box::new(FaceFile::load(path)?),
        (None, _) => Box::new(DefaultBird),
    })
}

fn open_sfx(mute: bool) -> Sfx {
    if mute {
        return Sfx::silent();
    }
    Sfx::open().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "playing without sound");
        Sfx::silent()
    })
}

/// Raw mode and the alternate screen for as long as this lives.
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("flappy-face: logging disabled: {e}");
    }

    let config = match &args.config {
        Some(path) => GameConfig::load(path, args.variant)?,
        None => GameConfig::preset(args.variant),
    };
    let mut store = open_store(&args);
    let mut appearance = open_appearance(&args)?;
    let sfx = open_sfx(args.mute);

    let best = store.get_or_default(BEST_SCORE_KEY);
    let mut game = GameLoop::new(config, args.seed).with_best_score(best);
    tracing::info!(variant = ?args.variant, best, fps = args.fps, "starting");

    let mut term = TerminalGuard::enter()?;
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut notice: Option<(String, u32)> = None;

    let mut ticker = Ticker::new(args.fps);
    tracing::debug!(frame = ?ticker.frame_duration(), "frame pacing");
    let stop = ticker.stop_handle();
    let frames = ticker.run(|_| -> Result<ControlFlow<()>> {
        // Input
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Resize(c, r) = ev {
                buf.resize(c as usize, r as usize * 2);
                continue;
            }
            match input::map_event(&ev) {
                Some(Command::Quit) => stop.stop(),
                Some(Command::Play(signal)) => game.handle_input(signal),
                None => {}
            }
        }
        if stop.is_stopped() {
            return Ok(ControlFlow::Break(()));
        }

        // Update
        game.update();
        for event in game.drain_events() {
            sfx.on_event(&event);
            if let GameEvent::RoundOver { best, .. } = event {
                if let Err(e) = store.set(BEST_SCORE_KEY, best) {
                    tracing::warn!(error = %e, "could not save best score");
                }
            }
        }
        appearance.refresh(game.frame());
        if let Some(msg) = appearance.take_notice() {
            notice = Some((msg, NOTICE_FRAMES));
        }

        // Render
        let shown = notice.as_ref().map(|(msg, _)| msg.as_str());
        render::draw_scene(&game, &mut buf, &*appearance, shown);
        buf.render(&mut term.out)?;

        notice = notice.take().and_then(|(msg, left)| (left > 1).then_some((msg, left - 1)));
        Ok(ControlFlow::Continue(()))
    })?;

    tracing::info!(frames, best = game.best_score(), "bye");
    Ok(())
}
