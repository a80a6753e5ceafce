//! MinimapRenderer - paints a small centered window of the grid into a
//! corner of the frame, with a compass arrow for the player.

use crate::{CellColor, Frame, GridMap, PixelCompositor, RaycastEngine, Rgb, TextureSet, Vec2};

const VIEW_RADIUS: i32 = 5;
const MARGIN: i32 = 1;
/// Cell size when painting onto a pixel frame.
const CELL_PX: i32 = 6;

const FLOOR_BG: Rgb = Rgb::new(24, 24, 24);
const VOID_BG: Rgb = Rgb::new(8, 8, 8);
const PLAYER_COLOR: Rgb = Rgb::new(255, 240, 120);

/// 45-degree compass buckets, counter-clockwise from east.
const COMPASS: [char; 8] = ['→', '↗', '↑', '↖', '←', '↙', '↓', '↘'];

pub struct MinimapRenderer {
    radius: i32,
}

impl MinimapRenderer {
    pub fn new() -> Self {
        Self {
            radius: VIEW_RADIUS,
        }
    }

    /// Window side length in cells - odd, so the player sits dead center.
    #[inline]
    pub fn side(&self) -> i32 {
        2 * self.radius + 1
    }

    /// Paint the map window into the frame's top-right corner.
    /// North is up: the loader's row flip never shows here.
    pub fn paint(
        &self,
        grid: &GridMap,
        textures: &TextureSet,
        compositor: &PixelCompositor,
        engine: &RaycastEngine,
        frame: &mut Frame,
    ) {
        let r = self.radius;
        let side = self.side();
        let px = engine.pos().x.floor() as i32;
        let py = engine.pos().y.floor() as i32;

        match frame {
            Frame::Text(f) => {
                let left = f.width() - side - MARGIN;
                let top = MARGIN;
                for dy in -r..=r {
                    for dx in -r..=r {
                        let sx = left + dx + r;
                        let sy = top + r - dy;
                        let (glyph, bg) = match grid.cell(px + dx, py + dy) {
                            Some(code) if code != 0 => ('#', wall_color(textures, code)),
                            Some(_) => (' ', FLOOR_BG),
                            None => (' ', VOID_BG),
                        };
                        f.put_glyph(sx, sy, glyph, CellColor::None, compositor.resolve_color(bg));
                    }
                }
                f.put_glyph(
                    left + r,
                    top + r,
                    compass_glyph(engine.dir()),
                    compositor.resolve_color(PLAYER_COLOR),
                    compositor.resolve_color(FLOOR_BG),
                );
            }
            Frame::Pixels(f) => {
                let left = f.width() - side * CELL_PX - MARGIN * CELL_PX;
                let top = MARGIN * CELL_PX;
                for dy in -r..=r {
                    for dx in -r..=r {
                        let sx = left + (dx + r) * CELL_PX;
                        let sy = top + (r - dy) * CELL_PX;
                        let color = match grid.cell(px + dx, py + dy) {
                            Some(code) if code != 0 => wall_color(textures, code),
                            Some(_) => FLOOR_BG,
                            None => VOID_BG,
                        };
                        f.fill_rect(sx, sy, CELL_PX, CELL_PX, color);
                    }
                }
                // player square with a heading tick
                let cx = left + r * CELL_PX;
                let cy = top + r * CELL_PX;
                f.fill_rect(cx + 1, cy + 1, CELL_PX - 2, CELL_PX - 2, PLAYER_COLOR);
                let tip = heading_tick(engine.dir());
                f.put_pixel(cx + CELL_PX / 2 + tip.0, cy + CELL_PX / 2 + tip.1, Rgb::new(255, 64, 64));
            }
        }
    }
}

impl Default for MinimapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------
// Internal stuff

fn wall_color(textures: &TextureSet, code: u8) -> Rgb {
    match textures.get(code) {
        Some(tex) => tex.average(),
        // unvalidated sets may miss a code; show something loud
        None => Rgb::new(255, 0, 255),
    }
}

fn compass_glyph(dir: Vec2) -> char {
    let bucket = (((dir.angle_deg() + 22.5) / 45.0) as usize) % 8;
    COMPASS[bucket]
}

/// Pixel offset of the heading tick inside the player square.
/// Screen y grows downward, grid y grows northward.
fn heading_tick(dir: Vec2) -> (i32, i32) {
    let scale = (CELL_PX / 2) as f64;
    (
        (dir.x * scale).round() as i32,
        (-dir.y * scale).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_buckets() {
        assert_eq!(compass_glyph(Vec2::new(1.0, 0.0)), '→');
        assert_eq!(compass_glyph(Vec2::new(1.0, 1.0)), '↗');
        assert_eq!(compass_glyph(Vec2::new(0.0, 1.0)), '↑');
        assert_eq!(compass_glyph(Vec2::new(-1.0, 1.0)), '↖');
        assert_eq!(compass_glyph(Vec2::new(-1.0, 0.0)), '←');
        assert_eq!(compass_glyph(Vec2::new(-1.0, -1.0)), '↙');
        assert_eq!(compass_glyph(Vec2::new(0.0, -1.0)), '↓');
        assert_eq!(compass_glyph(Vec2::new(1.0, -1.0)), '↘');
        // just shy of a bucket boundary stays east
        assert_eq!(compass_glyph(Vec2::new(1.0, 0.3)), '→');
    }

    #[test]
    fn test_heading_tick_flips_y() {
        // facing north, the tick points up the screen
        assert_eq!(heading_tick(Vec2::new(0.0, 1.0)), (0, -3));
        assert_eq!(heading_tick(Vec2::new(1.0, 0.0)), (3, 0));
    }
}
