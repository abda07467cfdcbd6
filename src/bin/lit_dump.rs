//! Headless runner: load a level, run frames, print the last frame as JSON.
//!
//! ```text
//! lit-dump <LEVEL> [--frames N] [--dt SECONDS] [--pointer F:X,Y]... [--action F:NAME]...
//! ```
//!
//! `LEVEL` is a JSON file path or a built-in level (1-based index or name).
//! `--pointer` moves the pointer and `--action` applies a player action
//! (`grabMove`, `cursorLeft`, `freeze`, ...) right before frame `F`.

use anyhow::{anyhow, Context, Result};
use glam::Vec2;

use lit::core::{GeometryConfig, SceneDesc, World};
use lit::input::InputHandler;
use lit::levels;
use lit::types::{PlayerAction, FRAME_MS};

#[derive(Debug, Clone, PartialEq)]
struct DumpArgs {
    level: String,
    frames: u64,
    dt: f32,
    pointers: Vec<(u64, Vec2)>,
    actions: Vec<(u64, PlayerAction)>,
}

fn parse_args(args: &[String]) -> Result<DumpArgs> {
    let mut level = None;
    let mut frames: u64 = 1;
    let mut dt = FRAME_MS as f32 / 1000.0;
    let mut pointers = Vec::new();
    let mut actions = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--frames" | "--dt" | "--pointer" | "--action" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for {flag}"))?;
                match flag {
                    "--frames" => {
                        frames = v
                            .parse()
                            .map_err(|_| anyhow!("invalid --frames value: {v}"))?;
                    }
                    "--dt" => {
                        dt = v.parse().map_err(|_| anyhow!("invalid --dt value: {v}"))?;
                    }
                    "--pointer" => {
                        let (frame, rest) = split_frame(v)?;
                        let (x, y) = rest
                            .split_once(',')
                            .ok_or_else(|| anyhow!("invalid --pointer value: {v}"))?;
                        let pos = Vec2::new(
                            x.trim().parse().map_err(|_| anyhow!("invalid --pointer x: {v}"))?,
                            y.trim().parse().map_err(|_| anyhow!("invalid --pointer y: {v}"))?,
                        );
                        pointers.push((frame, pos));
                    }
                    _ => {
                        let (frame, name) = split_frame(v)?;
                        let action = PlayerAction::from_str(name)
                            .ok_or_else(|| anyhow!("unknown action: {name}"))?;
                        actions.push((frame, action));
                    }
                }
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown argument: {other}"));
            }
            other => {
                if level.replace(other.to_string()).is_some() {
                    return Err(anyhow!("more than one level given"));
                }
            }
        }
        i += 1;
    }

    Ok(DumpArgs {
        level: level.ok_or_else(|| anyhow!("usage: lit-dump <LEVEL> [--frames N] ..."))?,
        frames,
        dt,
        pointers,
        actions,
    })
}

/// Split `"F:rest"` into the frame number and the rest.
fn split_frame(v: &str) -> Result<(u64, &str)> {
    let (frame, rest) = v
        .split_once(':')
        .ok_or_else(|| anyhow!("expected FRAME:VALUE, got {v}"))?;
    let frame = frame
        .parse()
        .map_err(|_| anyhow!("invalid frame number in {v}"))?;
    Ok((frame, rest))
}

fn load_scene(level: &str) -> Result<SceneDesc> {
    if level.ends_with(".json") {
        let json =
            std::fs::read_to_string(level).with_context(|| format!("reading level {level}"))?;
        return SceneDesc::from_json(&json).with_context(|| format!("parsing level {level}"));
    }
    let index = match level.parse::<usize>() {
        Ok(n) => n.saturating_sub(1),
        Err(_) => levels::find(level).ok_or_else(|| anyhow!("unknown level {level:?}"))?,
    };
    Ok(levels::builtin(index)?)
}

fn run(args: &DumpArgs) -> Result<World> {
    let config = match std::env::var("LIT_CONFIG") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading LIT_CONFIG {path}"))?;
            GeometryConfig::from_json(&json)?
        }
        Err(_) => GeometryConfig::default(),
    };

    let mut world = World::with_config(config);
    load_scene(&args.level)?.load(&mut world)?;

    let mut input = InputHandler::new();
    for frame in 0..args.frames {
        for &(_, pos) in args.pointers.iter().filter(|(f, _)| *f == frame) {
            input.set_pointer(pos);
        }
        for &(_, action) in args.actions.iter().filter(|(f, _)| *f == frame) {
            match action {
                PlayerAction::Freeze => world.set_frozen(!world.is_frozen()),
                _ => input.apply_action(action),
            }
        }

        let report = world.step(args.dt, &input.update(0))?;
        input.sync_hold(world.player().hold_mode());
        if report.newly_solved > 0 {
            log::info!("frame {}: {} group(s) solved", report.frame, report.newly_solved);
        }
    }
    Ok(world)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;
    let world = run(&args)?;

    let json = serde_json::to_string_pretty(&world.snapshot())?;
    println!("{json}");
    Ok(())
}
