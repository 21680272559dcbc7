mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Print,
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{info, warn};

use robo_mission::config::{GameConfig, HighScore};
use robo_mission::entities::{FrameInput, WorldState};
use robo_mission::input::{KeyTracker, TapGate, RESTART_LOCKOUT};
use robo_mission::world::World;

use display::{Hud, HudEffects};

/// Longest step handed to the simulation; a stalled terminal must not
/// teleport Robo through a rock.
const MAX_FRAME_DELTA: f32 = 0.1;

// ── Input constants ───────────────────────────────────────────────────────────

/// Keys that fire the thruster.
const THRUST_KEYS: [KeyCode; 4] = [
    KeyCode::Char(' '),
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
];

// ── Command line ──────────────────────────────────────────────────────────────

/// Robo Mission: hold to thrust, dodge the rocks, grab the fuel cells.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Seed for the obstacle layout (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Target frames per second (overrides the config file).
    #[arg(long)]
    fps: Option<u32>,

    /// INI configuration file (default: ./robo_mission.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Draw collision boxes.
    #[arg(long)]
    show_bounds: bool,

    /// Write log output to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        // stderr shares the terminal with the game; keep it quiet.
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .init();
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> GameConfig {
    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        if cli.config.is_some() {
            warn!("{e}; using defaults");
        } else {
            info!("{e}; using defaults");
        }
    }
    if let Some(fps) = cli.fps {
        config.set_target_fps(fps);
    }
    if cli.show_bounds {
        config.show_bounds = true;
    }
    config
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: a [`KeyTracker`] timestamps every press/repeat event, so a
/// held key keeps thrusting on terminals with and without key-release
/// reporting.  A press of a thrust key that was not already held is the
/// frame's tap.  The left mouse button works the same way as a touch
/// screen would.
///
/// The best score is recorded every frame: an empty tank ends the run
/// without stopping Robo, so the score can still rise after game over.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    high_score: &mut HighScore,
) -> std::io::Result<()> {
    let frame_time = config.frame_duration();

    let mut keys: KeyTracker<KeyCode> = KeyTracker::new();
    let mut mouse_down = false;
    let mut effects = HudEffects::default();
    let mut restart_gate = TapGate::default();
    let mut last_update = Instant::now();

    loop {
        let frame_start = Instant::now();
        let mut tapped = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            _ => {}
                        }
                        if keys.press(code, frame_start) && THRUST_KEYS.contains(&code) {
                            tapped = true;
                        }
                    }
                    KeyEventKind::Repeat => keys.repeat(code, frame_start),
                    // Keyboard-enhancement terminals only.
                    KeyEventKind::Release => keys.release(&code),
                },
                Event::Mouse(MouseEvent { kind, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        tapped = true;
                        mouse_down = true;
                    }
                    MouseEventKind::Up(MouseButton::Left) => mouse_down = false,
                    _ => {}
                },
                _ => {}
            }
        }

        let held = mouse_down || keys.any_held(&THRUST_KEYS, frame_start);
        let input = FrameInput {
            just_tapped: tapped && restart_gate.allows(frame_start),
            is_held: held,
        };

        // ── Step the world ────────────────────────────────────────────────────
        let delta = last_update.elapsed().as_secs_f32().min(MAX_FRAME_DELTA);
        last_update = Instant::now();

        let before = world.state();
        world.update(input, delta, &mut effects);

        if before != WorldState::GameOver && world.state() == WorldState::GameOver {
            restart_gate.close_for(Instant::now(), RESTART_LOCKOUT);
            info!("run over with score {}", world.score());
        }
        if before == WorldState::GameOver && world.state() != WorldState::GameOver {
            high_score.start_run();
        }
        match high_score.record(world.score()) {
            Ok(true) => info!("new best score {}", high_score.best()),
            Ok(false) => {}
            Err(e) => warn!("Could not save high score to {:?}: {}", config.high_score_path, e),
        }

        // ── Present ───────────────────────────────────────────────────────────
        if effects.take_bell() {
            out.queue(Print("\x07"))?;
        }
        let (width, height) = terminal::size()?;
        let hud = Hud {
            high_score: high_score.best(),
            new_best: high_score.is_new_best(world.score()),
            show_bounds: config.show_bounds,
        };
        display::render(out, world, &effects, &hud, width, height)?;
        effects.tick(delta);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = load_config(&cli);
    let mut world = match cli.seed {
        Some(seed) => World::with_seed(seed),
        None => World::new(),
    };
    let mut high_score = HighScore::load(&config.high_score_path);
    info!("starting, best score so far {}", high_score.best());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut world, &rx, &config, &mut high_score);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("bye, best score {}", high_score.best());
    result
}
