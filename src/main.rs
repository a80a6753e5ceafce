//! MAZECAST - a first-person raycasting renderer for 2D tile mazes.
//! Main starting point.

use anyhow::{anyhow, Result};
use mazecast::*;
use std::str::FromStr;

const WIN_WIDTH: i32 = 640;
const WIN_HEIGHT: i32 = 480;
const DEFAULT_MAP: &str = "maps/demo.txt";
const TEXTURE_DIR: &str = "textures";

fn main() {
    let result = parse_args().and_then(run);
    match result {
        Ok(_) => println!("MAZECAST finished OK"),
        Err(err) => println!("ERROR in MAZECAST: {err:#}"),
    }
}

/// `mazecast [map.txt] [ascii|color256|truecolor|window]`
fn parse_args() -> Result<Options> {
    let mut args = std::env::args().skip(1);
    let map_path = args.next().unwrap_or_else(|| DEFAULT_MAP.to_string());
    let mode = match args.next() {
        Some(name) => RenderMode::from_str(&name)
            .map_err(|_| anyhow!("unknown mode '{name}' (ascii, color256, truecolor, window)"))?,
        None => RenderMode::Truecolor,
    };
    Ok(Options {
        mode,
        map_path,
        texture_dir: TEXTURE_DIR.to_string(),
    })
}

fn run(opts: Options) -> Result<()> {
    // load and validate everything while stdout is still a plain stream
    let grid = GridMap::load(&opts.map_path)?;
    let textures = TextureSet::load(&opts.texture_dir)?;
    textures.validate(&grid)?;
    println!(
        "[MAZECAST] map {}: {}x{} cells, spawn at {}",
        opts.map_path,
        grid.width(),
        grid.height(),
        grid.spawn()
    );
    println!("[MAZECAST] output mode: {}", opts.mode);

    let mode = opts.mode;
    let (w, h) = if mode.is_cell_output() {
        (80, 24)
    } else {
        (WIN_WIDTH, WIN_HEIGHT)
    };
    let mut game = GameLoop::new(grid, textures, mode, w, h);

    if mode.is_cell_output() {
        run_terminal(&mut game)
    } else {
        run_window(&mut game)
    }
}

fn run_terminal(game: &mut GameLoop) -> Result<()> {
    let mut backend = TerminalBackend::new();
    backend.enter()?;
    let result = run_loop(&mut backend, game);
    let restore = backend.exit();
    result.and(restore)
}

#[cfg(feature = "sdl")]
fn run_window(game: &mut GameLoop) -> Result<()> {
    let mut backend = SdlBackend::new("MAZECAST", WIN_WIDTH as u32, WIN_HEIGHT as u32)?;
    run_loop(&mut backend, game)
}

#[cfg(not(feature = "sdl"))]
fn run_window(_game: &mut GameLoop) -> Result<()> {
    anyhow::bail!("window mode needs a build with the `sdl` feature (cargo run --features sdl)")
}
