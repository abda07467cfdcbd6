//! Terminal light puzzle runner (default binary).
//!
//! Plays the built-in levels with crossterm input (keyboard cursor or mouse)
//! and the framebuffer renderer. A solved level advances after a short pause.
//!
//! Environment:
//! - `LIT_LEVEL`: start level, 1-based index or name (`"onion"`, `"08_onion"`)
//! - `LIT_CONFIG`: path to a JSON geometry config
//! - `RUST_LOG`: log filter; logs go to stderr, so redirect it

use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use lit::core::{GeometryConfig, World};
use lit::input::{should_quit, InputHandler};
use lit::levels;
use lit::term::{FrameBuffer, HudView, SceneView, TerminalRenderer, Viewport};
use lit::types::{PlayerAction, FRAME_MS};

/// How long "SOLVED" stays up before the next level loads.
const SOLVED_PAUSE_MS: u32 = 1500;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let config = load_config()?;
    let start = start_level()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, start);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn load_config() -> Result<GeometryConfig> {
    match std::env::var("LIT_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading LIT_CONFIG {path}"))?;
            GeometryConfig::from_json(&json).with_context(|| format!("parsing LIT_CONFIG {path}"))
        }
        Err(_) => Ok(GeometryConfig::default()),
    }
}

fn start_level() -> Result<usize> {
    let Ok(value) = std::env::var("LIT_LEVEL") else {
        return Ok(0);
    };
    if let Ok(n) = value.parse::<usize>() {
        return Ok(n.saturating_sub(1) % levels::count());
    }
    levels::find(&value).ok_or_else(|| anyhow!("LIT_LEVEL: unknown level {value:?}"))
}

struct Game {
    world: World,
    level: usize,
    title: String,
    /// Counts down once the level is solved
    solved_timer_ms: Option<u32>,
}

impl Game {
    fn new(config: GeometryConfig, level: usize) -> Result<Self> {
        let mut game = Self {
            world: World::with_config(config),
            level: 0,
            title: String::new(),
            solved_timer_ms: None,
        };
        game.load(level)?;
        Ok(game)
    }

    fn load(&mut self, level: usize) -> Result<()> {
        self.level = level % levels::count();
        let scene = levels::builtin(self.level)
            .with_context(|| format!("built-in level {}", self.level + 1))?;
        let frozen = self.world.is_frozen();
        scene.load(&mut self.world)?;
        self.world.set_frozen(frozen);
        self.title = scene.title;
        self.solved_timer_ms = None;
        log::info!("level {} {:?}", self.level + 1, self.title);
        Ok(())
    }

    fn apply(&mut self, action: PlayerAction) -> Result<()> {
        match action {
            PlayerAction::NextLevel => self.load(self.level + 1),
            PlayerAction::PrevLevel => self.load(self.level + levels::count() - 1),
            PlayerAction::Restart => self.load(self.level),
            PlayerAction::Freeze => {
                self.world.set_frozen(!self.world.is_frozen());
                Ok(())
            }
            // Pointer actions are folded into the frame input.
            _ => Ok(()),
        }
    }
}

fn run(term: &mut TerminalRenderer, config: GeometryConfig, start: usize) -> Result<()> {
    let mut game = Game::new(config, start)?;

    let view = SceneView::default();
    let mut input_handler = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut viewport = term.viewport().unwrap_or(Viewport::new(80, 24));

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(FRAME_MS as u64);
    let dt = FRAME_MS as f32 / 1000.0;

    loop {
        // Render.
        let hud = HudView {
            title: &game.title,
            level: game.level,
            level_count: levels::count(),
            frozen: game.world.is_frozen(),
        };
        view.render_into(&game.world, &hud, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(action) = input_handler.handle_key_press(key) {
                            game.apply(action)?;
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Ignore terminal auto-repeat; DAS/ARR handles repeats internally.
                    }
                    KeyEventKind::Release => input_handler.handle_key_release(key),
                },
                Event::Mouse(mouse) => {
                    if let Some(pos) = view.layout(viewport).screen_to_world(mouse.column, mouse.row) {
                        input_handler.handle_mouse(mouse.kind, pos);
                    }
                }
                Event::Resize(w, h) => {
                    viewport = Viewport::new(w, h);
                    term.invalidate();
                }
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            let input = input_handler.update(FRAME_MS);
            let report = game.world.step(dt, &input)?;
            input_handler.sync_hold(game.world.player().hold_mode());

            match game.solved_timer_ms {
                None if report.level_complete => {
                    log::info!("level {} solved on frame {}", game.level + 1, report.frame);
                    game.solved_timer_ms = Some(SOLVED_PAUSE_MS);
                }
                Some(left) if left <= FRAME_MS => {
                    game.load(game.level + 1)?;
                    input_handler.reset();
                }
                Some(left) => game.solved_timer_ms = Some(left - FRAME_MS),
                None => {}
            }
        }
    }
}
