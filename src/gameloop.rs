//! Main game loop.
//! Also acts as a facade, to hold and manage all game objects
//! (map, textures, engine, compositor, overlays, input state).

use crate::*;
use anyhow::Result;
use std::time::{Duration, Instant};

// movement tuning, per second
const MOVE_SPEED: f64 = 3.0;
const ROT_SPEED: f64 = 2.2;

// a stalled frame (window drag, suspend) becomes one clamped step
const MAX_FRAME_TIME: f64 = 0.25;

const EVENT_BUDGET_MS: u64 = 15;

/// A display sink: owns the real I/O, feeds events into the loop and
/// presents finished frames.
pub trait Backend {
    /// Current drawable size, in the sink's own units (cells or pixels).
    fn dimensions(&self) -> Result<(i32, i32)>;

    /// Translate and deliver pending events, spending at most `budget`
    /// waiting. Returns false when the loop should quit.
    fn pump(&mut self, budget: Duration, game: &mut GameLoop) -> Result<bool>;

    fn present(&mut self, frame: &Frame) -> Result<()>;
}

pub struct GameLoop {
    grid: GridMap,
    textures: TextureSet,
    engine: RaycastEngine,
    compositor: PixelCompositor,
    minimap: MinimapRenderer,
    hud: HudRenderer,
    inputs: InputManager,
    rays: Vec<FovRay>,
    frame: Frame,
    stats: FrameStats,
    minimap_on: bool,
    hud_on: bool,
}

impl GameLoop {
    pub fn new(grid: GridMap, textures: TextureSet, mode: RenderMode, width: i32, height: i32) -> Self {
        let mut engine = RaycastEngine::new(&grid);
        engine.fit_to_viewport((width as f64) / (height as f64), mode.is_cell_output());

        // the window sink reports real key releases; the terminal sinks
        // only repeat, so their holds need the lapse timeout
        let inputs = if mode == RenderMode::Window {
            InputManager::with_hold_timeout(None)
        } else {
            InputManager::new()
        };

        Self {
            grid,
            textures,
            engine,
            compositor: PixelCompositor::new(mode),
            minimap: MinimapRenderer::new(),
            hud: HudRenderer::new(),
            inputs,
            rays: Vec::new(),
            frame: make_frame(mode, width, height),
            stats: FrameStats::default(),
            minimap_on: true,
            hud_on: true,
        }
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[inline]
    pub fn engine(&self) -> &RaycastEngine {
        &self.engine
    }

    /// Returns false when the event asks to quit.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Key { key, pressed } => {
                if key == Key::Escape && pressed {
                    return false;
                }
                self.inputs.handle_key(key, pressed);
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
        }
        true
    }

    /// Rebuild the frame and refit the FOV for a new viewport.
    pub fn resize(&mut self, width: i32, height: i32) {
        if width < 1 || height < 1 {
            return;
        }
        if width == self.frame.width() && height == self.frame.height() {
            return;
        }
        let mode = self.compositor.mode();
        self.frame = make_frame(mode, width, height);
        self.engine
            .fit_to_viewport((width as f64) / (height as f64), mode.is_cell_output());
    }

    /// Apply `elapsed` seconds of held inputs to the world.
    pub fn update_state(&mut self, elapsed: f64) {
        let elapsed = elapsed.min(MAX_FRAME_TIME);
        let dist = MOVE_SPEED * elapsed;
        let angle = ROT_SPEED * elapsed;

        if self.key_down(Key::Char('w')) || self.key_down(Key::Up) {
            self.engine.move_forward(&self.grid, dist);
        }
        if self.key_down(Key::Char('s')) || self.key_down(Key::Down) {
            self.engine.move_backward(&self.grid, dist);
        }
        if self.key_down(Key::Char('a')) || self.key_down(Key::Left) {
            self.engine.turn_left(angle);
        }
        if self.key_down(Key::Char('d')) || self.key_down(Key::Right) {
            self.engine.turn_right(angle);
        }
        if self.key_down(Key::Char('q')) {
            self.engine.strafe_left(&self.grid, dist);
        }
        if self.key_down(Key::Char('e')) {
            self.engine.strafe_right(&self.grid, dist);
        }

        if self.inputs.pressed_this_frame(Key::Tab) {
            self.minimap_on = !self.minimap_on;
        }
        if self.inputs.pressed_this_frame(Key::Char('h')) {
            self.hud_on = !self.hud_on;
        }
        if self.inputs.pressed_this_frame(Key::Char('p')) {
            self.engine.set_projection(self.engine.projection().toggled());
        }

        self.inputs.end_frame();
        self.track_stats(elapsed);
    }

    /// Cast the frame's rays and composite everything into the frame.
    pub fn paint(&mut self) {
        self.engine
            .cast_all(&self.grid, self.frame.width(), &mut self.rays);
        self.stats.max_steps = self.rays.iter().map(|r| r.steps).max().unwrap_or(0);
        self.compositor
            .render(&self.rays, &self.textures, &mut self.frame);

        if self.minimap_on {
            self.minimap.paint(
                &self.grid,
                &self.textures,
                &self.compositor,
                &self.engine,
                &mut self.frame,
            );
        }
        if self.hud_on {
            self.hud
                .paint(&self.engine, &self.compositor, &self.stats, &mut self.frame);
        }
    }

    //--------------------------
    // Internal stuff

    #[inline]
    fn key_down(&self, key: Key) -> bool {
        self.inputs.is_pressed(key)
    }

    fn track_stats(&mut self, elapsed: f64) {
        if elapsed <= 0.0 {
            return;
        }
        // exponentially smoothed, so the HUD is readable
        let fps = 1.0 / elapsed;
        let ms = elapsed * 1000.0;
        if self.stats.fps == 0.0 {
            self.stats.fps = fps;
            self.stats.frame_ms = ms;
        } else {
            self.stats.fps = 0.9 * self.stats.fps + 0.1 * fps;
            self.stats.frame_ms = 0.9 * self.stats.frame_ms + 0.1 * ms;
        }
    }
}

/// Drive the loop until quit: pump events, step the world, paint, present.
pub fn run_loop<B: Backend>(backend: &mut B, game: &mut GameLoop) -> Result<()> {
    let (w, h) = backend.dimensions()?;
    game.resize(w, h);

    let budget = Duration::from_millis(EVENT_BUDGET_MS);
    let mut last = Instant::now();
    loop {
        if !backend.pump(budget, game)? {
            return Ok(());
        }
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f64();
        last = now;

        game.update_state(elapsed);
        game.paint();
        backend.present(game.frame())?;
    }
}

fn make_frame(mode: RenderMode, width: i32, height: i32) -> Frame {
    if mode.is_cell_output() {
        Frame::Text(TextFrame::new(width, height))
    } else {
        Frame::Pixels(PixelFrame::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_game(mode: RenderMode) -> GameLoop {
        let grid = GridMap::parse("11111\n1x001\n11111\n").unwrap();
        GameLoop::new(grid, TextureSet::builtin(), mode, 40, 20)
    }

    fn press(game: &mut GameLoop, key: Key) {
        assert!(game.handle_event(&InputEvent::Key { key, pressed: true }));
    }

    #[test]
    fn test_forward_key_moves_the_camera() {
        let mut game = test_game(RenderMode::Ascii);
        let before = game.engine().pos();
        // facing north into the wall: w is blocked, e strafes east
        press(&mut game, Key::Char('e'));
        game.update_state(0.1);
        let after = game.engine().pos();
        assert!(after.x > before.x);
        assert_eq!(after.y, before.y);
    }

    #[test]
    fn test_escape_requests_quit() {
        let mut game = test_game(RenderMode::Ascii);
        let quit = game.handle_event(&InputEvent::Key {
            key: Key::Escape,
            pressed: true,
        });
        assert!(!quit);
    }

    #[test]
    fn test_tab_toggles_minimap_once_per_press() {
        let mut game = test_game(RenderMode::Truecolor);
        assert!(game.minimap_on);
        press(&mut game, Key::Tab);
        game.update_state(0.016);
        assert!(!game.minimap_on);
        // still held next frame, must not toggle again
        game.update_state(0.016);
        assert!(!game.minimap_on);
    }

    #[test]
    fn test_window_hold_survives_the_repeat_gap() {
        let mut game = test_game(RenderMode::Window);
        press(&mut game, Key::Char('e'));
        game.update_state(0.016);

        // key repeats pause during the OS repeat delay and no release
        // arrives; the hold must carry the camera through regardless
        std::thread::sleep(Duration::from_millis(200));
        game.update_state(0.016);
        let mid = game.engine().pos().x;
        game.update_state(0.016);
        assert!(game.engine().pos().x > mid);
    }

    #[test]
    fn test_window_toggle_fires_once_across_the_repeat_gap() {
        let mut game = test_game(RenderMode::Window);
        press(&mut game, Key::Tab);
        game.update_state(0.016);
        assert!(!game.minimap_on);

        std::thread::sleep(Duration::from_millis(200));
        game.update_state(0.016);
        // the first key repeat after the pause lands on a live hold
        press(&mut game, Key::Tab);
        game.update_state(0.016);
        assert!(!game.minimap_on);
    }

    #[test]
    fn test_projection_toggle_key() {
        let mut game = test_game(RenderMode::Ascii);
        assert_eq!(game.engine().projection(), Projection::Perpendicular);
        press(&mut game, Key::Char('p'));
        game.update_state(0.016);
        assert_eq!(game.engine().projection(), Projection::Euclidean);
    }

    #[test]
    fn test_paint_fills_the_whole_ascii_frame() {
        let mut game = test_game(RenderMode::Ascii);
        game.update_state(0.016);
        game.paint();
        let f = match game.frame() {
            Frame::Text(f) => f,
            Frame::Pixels(_) => panic!("ascii mode must render text"),
        };
        // the facing camera sees a wall, so some column has a wall glyph
        assert!(f.cells().iter().any(|c| c.glyph == '#' || c.glyph == '%'));
    }

    #[test]
    fn test_resize_rebuilds_frame_and_fov() {
        let mut game = test_game(RenderMode::Truecolor);
        let fov_before = game.engine().fov_deg();
        game.resize(80, 20);
        assert_eq!(game.frame().width(), 80);
        assert_eq!(game.frame().height(), 20);
        assert!(game.engine().fov_deg() > fov_before);
    }
}
