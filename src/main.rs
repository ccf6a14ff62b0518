//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from the term crate.
//!
//! ```text
//! tui-spinfield [-c|--config <file.json>] [-s|--seed <u64>]
//! ```
//!
//! Set `RUST_LOG=debug` to see spawn, rotation and sound diagnostics on stderr.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};

use tui_spinfield::core::{GameConfig, GameSnapshot, GameState};
use tui_spinfield::input::{handle_key_event, should_quit, Direction, InputHandler};
use tui_spinfield::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_spinfield::types::GameEvent;

/// Upper bound on one input poll so held keys repeat on time.
const FRAME_MS: u64 = 16;

/// Terminal falling-block puzzle with a rotating well.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tuning file (JSON, camelCase keys); built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the piece sequence and bomb placement; overrides the config.
    /// Example: `tui-spinfield --seed=42` or `tui-spinfield -s 42`.
    #[arg(short, long)]
    seed: Option<u64>,
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            GameConfig::from_json_str(&text)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("invalid config")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!("starting with seed {}", config.seed);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: GameConfig) -> Result<()> {
    let mut game = GameState::new(config);
    game.start();

    let view = GameView::default();
    let mut input_handler = InputHandler::new();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let mut last_input_update = Instant::now();

    loop {
        // Render.
        game.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((100, 34));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw(&fb)?;

        // Input with timeout until next tick.
        let tick_duration = Duration::from_millis(game.gravity_interval_ms() as u64);
        let timeout = tick_duration
            .saturating_sub(last_tick.elapsed())
            .min(Duration::from_millis(FRAME_MS));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if Direction::from_key(key.code).is_some() {
                            if let Some(action) = input_handler.handle_key_press(key.code) {
                                game.apply_action(action);
                            }
                        } else if let Some(action) = handle_key_event(key) {
                            game.apply_action(action);
                        }
                    }
                    KeyEventKind::Repeat => {
                        // The handler times repeats itself.
                    }
                    KeyEventKind::Release => {
                        input_handler.handle_key_release(key.code);
                    }
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_input_update.elapsed().as_millis() as u32;
        last_input_update = Instant::now();
        for action in input_handler.update(elapsed) {
            game.apply_action(action);
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            game.tick();
        }

        for event in game.drain_events() {
            if let GameEvent::BlockDestroyed { .. } = event {
                continue;
            }
            debug!("event {event:?}");
        }
        for sound in game.drain_sounds() {
            debug!("sound {}", sound.as_str());
        }
    }
}
