//! HudRenderer - frame timing and camera state as text lines.

use crate::{Frame, PixelCompositor, RaycastEngine, Rgb};

const HUD_FG: Rgb = Rgb::new(255, 240, 120);
const HUD_BG: Rgb = Rgb::new(16, 16, 16);

/// Per-frame numbers the loop collects for display.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    pub fps: f64,
    pub frame_ms: f64,
    /// Largest DDA cell count over the frame's columns.
    pub max_steps: u32,
}

pub struct HudRenderer;

impl HudRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Paint the overlay into the top-left corner. Text frames only -
    /// the windowed sink has no font, so pixel frames are left alone.
    pub fn paint(
        &self,
        engine: &RaycastEngine,
        compositor: &PixelCompositor,
        stats: &FrameStats,
        frame: &mut Frame,
    ) {
        let f = match frame {
            Frame::Text(f) => f,
            Frame::Pixels(_) => return,
        };
        let fg = compositor.resolve_color(HUD_FG);
        let bg = compositor.resolve_color(HUD_BG);

        let line0 = format!("fps {:5.1} | {:5.2} ms", stats.fps, stats.frame_ms);
        let line1 = format!(
            "pos {} | dir {:5.1} | fov {:4.1}",
            engine.pos(),
            engine.dir().angle_deg(),
            engine.fov_deg()
        );
        let line2 = format!(
            "{} | {} | steps {}",
            compositor.mode(),
            engine.projection(),
            stats.max_steps
        );
        f.put_str(1, 0, &line0, fg, bg);
        f.put_str(1, 1, &line1, fg, bg);
        f.put_str(1, 2, &line2, fg, bg);
    }
}

impl Default for HudRenderer {
    fn default() -> Self {
        Self::new()
    }
}
