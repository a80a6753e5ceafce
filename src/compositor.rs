//! Composites cast rays into the target surface - glyph strips for the
//! terminal modes, RGBA columns for the windowed mode.

use crate::{CellColor, Facing, FovRay, Frame, RenderMode, Rgb, TextCell, TextureSet};

const CEILING_COLOR: Rgb = Rgb::new(40, 44, 52);
const FLOOR_COLOR: Rgb = Rgb::new(84, 72, 56);

// fixed glyphs for the monochrome mode
const CEILING_GLYPH: char = ' ';
const FLOOR_GLYPH: char = '.';
const WALL_EW_GLYPH: char = '#';
const WALL_NS_GLYPH: char = '%';

/// Caps the wall strip height at point-blank range, keeping the centered
/// strip arithmetic inside i32.
const MAX_STRIP_FACTOR: i32 = 64;

pub struct PixelCompositor {
    mode: RenderMode,
}

impl PixelCompositor {
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    #[inline]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Paint a full frame: flat ceiling and floor first, then one wall
    /// strip per column on top.
    pub fn render(&self, rays: &[FovRay], textures: &TextureSet, frame: &mut Frame) {
        self.fill_background(frame);
        for (x, ray) in rays.iter().enumerate() {
            self.render_column(x as i32, ray, textures, frame);
        }
    }

    /// Paint the wall strip for one column. The strip spans
    /// `height / distance` rows, centered on mid-screen and clipped; the
    /// texture is sampled against the unclipped extent, so near walls
    /// show their middle.
    pub fn render_column(&self, x: i32, ray: &FovRay, textures: &TextureSet, frame: &mut Frame) {
        let h = frame.height();
        let line_h = ((h as f64) / ray.distance).min((h * MAX_STRIP_FACTOR) as f64) as i32;
        if line_h < 1 {
            // a sub-row strip disappears into the prefilled background
            return;
        }
        let draw_start = (h - line_h) / 2;
        let y0 = draw_start.max(0);
        let y1 = (draw_start + line_h).min(h);

        match frame {
            Frame::Text(f) => {
                if self.mode == RenderMode::Ascii {
                    // the facing picks the glyph; textures are ignored here
                    let glyph = match ray.facing {
                        Facing::EastWest => WALL_EW_GLYPH,
                        Facing::NorthSouth => WALL_NS_GLYPH,
                    };
                    for y in y0..y1 {
                        f.put_glyph(x, y, glyph, CellColor::None, CellColor::None);
                    }
                    return;
                }

                let tex = textures.texture(ray.texture);
                let tex_x = tex_column(ray.wall_x, tex.width());
                let shade = ray.facing == Facing::NorthSouth;
                let fstep = (tex.height() as f64) / (line_h as f64);
                let mut fidx = ((y0 - draw_start) as f64) * fstep;
                for y in y0..y1 {
                    let tex_y = (fidx as i32).min(tex.height() - 1);
                    let mut texel = tex.texel(tex_x, tex_y);
                    if shade {
                        texel = texel.half();
                    }
                    // colored cells are background-painted spaces
                    f.put_cell(
                        x,
                        y,
                        TextCell {
                            glyph: ' ',
                            fg: CellColor::None,
                            bg: self.resolve_color(texel),
                        },
                    );
                    fidx += fstep;
                }
            }
            Frame::Pixels(f) => {
                let tex = textures.texture(ray.texture);
                let tex_x = tex_column(ray.wall_x, tex.width());
                let shade = ray.facing == Facing::NorthSouth;
                let fstep = (tex.height() as f64) / (line_h as f64);
                let mut fidx = ((y0 - draw_start) as f64) * fstep;
                for y in y0..y1 {
                    let tex_y = (fidx as i32).min(tex.height() - 1);
                    let mut texel = tex.texel(tex_x, tex_y);
                    if shade {
                        texel = texel.half();
                    }
                    f.put_pixel(x, y, texel);
                    fidx += fstep;
                }
            }
        }
    }

    /// How a color survives into the current mode. The overlays resolve
    /// through here too, so every painter quantizes the same way.
    pub fn resolve_color(&self, color: Rgb) -> CellColor {
        match self.mode {
            RenderMode::Ascii => CellColor::None,
            RenderMode::Color256 => CellColor::Indexed(xterm256_index(color)),
            RenderMode::Truecolor | RenderMode::Window => CellColor::Rgb(color),
        }
    }

    //--------------------------
    // Internal stuff

    fn fill_background(&self, frame: &mut Frame) {
        let w = frame.width();
        let h = frame.height();
        let mid = h / 2;
        match frame {
            Frame::Text(f) => {
                let (ceiling, floor) = if self.mode == RenderMode::Ascii {
                    (
                        TextCell {
                            glyph: CEILING_GLYPH,
                            fg: CellColor::None,
                            bg: CellColor::None,
                        },
                        TextCell {
                            glyph: FLOOR_GLYPH,
                            fg: CellColor::None,
                            bg: CellColor::None,
                        },
                    )
                } else {
                    (
                        TextCell {
                            glyph: ' ',
                            fg: CellColor::None,
                            bg: self.resolve_color(CEILING_COLOR),
                        },
                        TextCell {
                            glyph: ' ',
                            fg: CellColor::None,
                            bg: self.resolve_color(FLOOR_COLOR),
                        },
                    )
                };
                f.fill_rect(0, 0, w, mid, ceiling);
                f.fill_rect(0, mid, w, h - mid, floor);
            }
            Frame::Pixels(f) => {
                f.fill_rect(0, 0, w, mid, CEILING_COLOR);
                f.fill_rect(0, mid, w, h - mid, FLOOR_COLOR);
            }
        }
    }
}

/// Texture column for a face offset, clamped to the texture width.
#[inline]
fn tex_column(wall_x: f64, tex_w: i32) -> i32 {
    ((wall_x * (tex_w as f64)) as i32).min(tex_w - 1)
}

/// Nearest xterm-256 palette entry: the 6x6x6 color cube (16..=231)
/// against the 24-step gray ramp (232..=255), by squared RGB distance.
pub fn xterm256_index(color: Rgb) -> u8 {
    const CUBE: [i32; 6] = [0, 95, 135, 175, 215, 255];

    let nearest_cube = |c: u8| -> (i32, i32) {
        let mut best = (0, CUBE[0]);
        let mut best_d = i32::MAX;
        for (i, &level) in CUBE.iter().enumerate() {
            let d = ((c as i32) - level).pow(2);
            if d < best_d {
                best_d = d;
                best = (i as i32, level);
            }
        }
        best
    };
    let sq = |c: u8, level: i32| ((c as i32) - level).pow(2);

    let (ri, rl) = nearest_cube(color.r);
    let (gi, gl) = nearest_cube(color.g);
    let (bi, bl) = nearest_cube(color.b);
    let cube_idx = 16 + 36 * ri + 6 * gi + bi;
    let cube_dist = sq(color.r, rl) + sq(color.g, gl) + sq(color.b, bl);

    // gray ramp entries are 8 + 10k; the best k tracks the channel mean
    let mean = ((color.r as i32) + (color.g as i32) + (color.b as i32)) / 3;
    let k = ((mean - 8 + 5) / 10).clamp(0, 23);
    let gray_level = 8 + 10 * k;
    let gray_dist = sq(color.r, gray_level) + sq(color.g, gray_level) + sq(color.b, gray_level);

    if gray_dist < cube_dist {
        (232 + k) as u8
    } else {
        cube_idx as u8
    }
}
