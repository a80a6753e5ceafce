//! Wall texture store - procedural built-ins keyed by tile code,
//! with optional binary PPM overrides from a textures/ directory.

use crate::{GridMap, Rgb};
use bytes::Buf;
use thiserror::Error;

/// All built-in textures are square, Wolf-sized.
const TEX_SIZE: i32 = 64;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Cannot read texture file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("Bad PPM texture {path}: {reason}")]
    BadPpm { path: String, reason: String },
    #[error("Map uses wall code {code} but no texture is loaded for it")]
    MissingTexture { code: u8 },
}

/// Decoded RGB texture, row-major, top row first.
pub struct Texture {
    width: i32,
    height: i32,
    texels: Vec<Rgb>,
    average: Rgb,
}

impl Texture {
    pub fn new(width: i32, height: i32, texels: Vec<Rgb>) -> Self {
        assert_eq!((width * height) as usize, texels.len());
        let average = average_color(&texels);
        Self {
            width,
            height,
            texels,
            average,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> Rgb {
        debug_assert!(
            x >= 0 && y >= 0 && x < self.width && y < self.height,
            "Texel lookup out of bounds: ({x},{y})"
        );
        self.texels[(y * self.width + x) as usize]
    }

    /// Mean color over all texels - the minimap paints walls with this.
    #[inline]
    pub fn average(&self) -> Rgb {
        self.average
    }
}

/// Textures for the wall codes 1..=9. Code 0 (floor) has no slot.
pub struct TextureSet {
    slots: [Option<Texture>; 10],
}

impl TextureSet {
    pub fn empty() -> Self {
        Self {
            slots: [None, None, None, None, None, None, None, None, None, None],
        }
    }

    /// The nine procedural built-ins, deterministic per code.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.insert(1, bricks(0xB121, Rgb::new(156, 66, 56), Rgb::new(96, 88, 84), 8, 16));
        set.insert(2, bricks(0xB222, Rgb::new(128, 130, 124), Rgb::new(80, 80, 78), 16, 32));
        set.insert(3, planks(0xB323, Rgb::new(66, 92, 148), Rgb::new(40, 56, 92), 16));
        set.insert(4, speckled(0xB424, Rgb::new(52, 110, 48), 26));
        set.insert(5, bricks(0xB525, Rgb::new(188, 160, 110), Rgb::new(140, 118, 82), 16, 32));
        set.insert(6, planks(0xB626, Rgb::new(134, 94, 56), Rgb::new(74, 52, 30), 8));
        set.insert(7, planks(0xB727, Rgb::new(88, 90, 96), Rgb::new(52, 54, 58), 32));
        set.insert(8, bricks(0xB828, Rgb::new(110, 118, 74), Rgb::new(70, 76, 58), 8, 16));
        set.insert(9, speckled(0xB929, Rgb::new(168, 150, 178), 18));
        set
    }

    /// Built-ins plus any `wall<N>.ppm` overrides found in `dir`.
    /// Missing override files are fine; unreadable or malformed ones are not.
    pub fn load(dir: &str) -> Result<Self, AssetError> {
        let mut set = Self::builtin();
        for code in 1..=9_u8 {
            let path = format!("{dir}/wall{code}.ppm");
            if !std::path::Path::new(&path).is_file() {
                continue;
            }
            let data = std::fs::read(&path).map_err(|source| AssetError::Unreadable {
                path: path.clone(),
                source,
            })?;
            let tex = parse_ppm(&path, &data)?;
            println!("[MAZECAST] texture override: {path}");
            set.insert(code, tex);
        }
        Ok(set)
    }

    pub fn insert(&mut self, code: u8, texture: Texture) {
        assert!((1..=9).contains(&code), "Invalid wall code: {code}");
        self.slots[code as usize] = Some(texture);
    }

    pub fn get(&self, code: u8) -> Option<&Texture> {
        self.slots.get(code as usize).and_then(|s| s.as_ref())
    }

    /// Render-path lookup. Codes come from a validated map, so a missing
    /// slot here is a programmer error.
    #[inline]
    pub fn texture(&self, code: u8) -> &Texture {
        match self.slots[code as usize].as_ref() {
            Some(tex) => tex,
            None => panic!("Rendering missing texture for wall code {code}"),
        }
    }

    /// Check at load time that every wall code on the map has a texture,
    /// so the render path never has to.
    pub fn validate(&self, map: &GridMap) -> Result<(), AssetError> {
        for y in 0..map.height() {
            for x in 0..map.width() {
                let code = map.tile(x, y);
                if code != 0 && self.get(code).is_none() {
                    return Err(AssetError::MissingTexture { code });
                }
            }
        }
        Ok(())
    }
}

//--------------------------
// Internal stuff

fn average_color(texels: &[Rgb]) -> Rgb {
    if texels.is_empty() {
        return Rgb::default();
    }
    let (mut r, mut g, mut b) = (0_u32, 0_u32, 0_u32);
    for t in texels {
        r += t.r as u32;
        g += t.g as u32;
        b += t.b as u32;
    }
    let n = texels.len() as u32;
    Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Brick courses with mortar lines, alternate courses offset by half a brick.
fn bricks(seed: u64, base: Rgb, mortar: Rgb, course_h: i32, brick_w: i32) -> Texture {
    let rng = fastrand::Rng::with_seed(seed);
    let mut texels = Vec::with_capacity((TEX_SIZE * TEX_SIZE) as usize);
    for y in 0..TEX_SIZE {
        let offset = if (y / course_h) % 2 == 0 { 0 } else { brick_w / 2 };
        for x in 0..TEX_SIZE {
            let on_bed = y % course_h == 0;
            let on_head = (x + offset) % brick_w == 0;
            let color = if on_bed || on_head {
                mortar
            } else {
                jitter(base, &rng, 14)
            };
            texels.push(color);
        }
    }
    Texture::new(TEX_SIZE, TEX_SIZE, texels)
}

/// Vertical planks/panels with darker seams and a per-plank tone.
fn planks(seed: u64, base: Rgb, seam: Rgb, plank_w: i32) -> Texture {
    let rng = fastrand::Rng::with_seed(seed);
    let tones: Vec<i32> = (0..TEX_SIZE / plank_w).map(|_| rng.i32(-16..=16)).collect();
    let mut texels = Vec::with_capacity((TEX_SIZE * TEX_SIZE) as usize);
    for _y in 0..TEX_SIZE {
        for x in 0..TEX_SIZE {
            let color = if x % plank_w == 0 {
                seam
            } else {
                let tone = tones[(x / plank_w) as usize];
                jitter(shifted(base, tone), &rng, 6)
            };
            texels.push(color);
        }
    }
    Texture::new(TEX_SIZE, TEX_SIZE, texels)
}

/// Plain tone noise, for organic surfaces.
fn speckled(seed: u64, base: Rgb, amount: i32) -> Texture {
    let rng = fastrand::Rng::with_seed(seed);
    let texels = (0..TEX_SIZE * TEX_SIZE).map(|_| jitter(base, &rng, amount)).collect();
    Texture::new(TEX_SIZE, TEX_SIZE, texels)
}

/// Shift all channels by the same delta, keeping the hue.
#[inline]
fn jitter(base: Rgb, rng: &fastrand::Rng, amount: i32) -> Rgb {
    shifted(base, rng.i32(-amount..=amount))
}

#[inline]
fn shifted(base: Rgb, delta: i32) -> Rgb {
    Rgb::new(
        channel(base.r, delta),
        channel(base.g, delta),
        channel(base.b, delta),
    )
}

#[inline]
fn channel(c: u8, delta: i32) -> u8 {
    ((c as i32) + delta).clamp(0, 255) as u8
}

fn parse_ppm(path: &str, data: &[u8]) -> Result<Texture, AssetError> {
    let mut pos = 0;
    let magic = header_token(data, &mut pos);
    if magic.as_deref() != Some("P6") {
        return Err(bad_ppm(path, "not a binary PPM (P6)"));
    }
    let width = header_number(data, &mut pos).ok_or_else(|| bad_ppm(path, "missing width"))?;
    let height = header_number(data, &mut pos).ok_or_else(|| bad_ppm(path, "missing height"))?;
    let maxval = header_number(data, &mut pos).ok_or_else(|| bad_ppm(path, "missing maxval"))?;
    if maxval != 255 {
        return Err(bad_ppm(path, "unsupported maxval (expected 255)"));
    }
    if width < 1 || height < 1 || width > 1024 || height > 1024 {
        return Err(bad_ppm(path, "unreasonable dimensions"));
    }
    // a single whitespace byte separates the header from the pixel data
    pos += 1;

    let mut payload = &data[pos.min(data.len())..];
    if payload.remaining() < (width * height * 3) as usize {
        return Err(bad_ppm(path, "truncated pixel data"));
    }
    let mut texels = Vec::with_capacity((width * height) as usize);
    for _ in 0..width * height {
        let r = payload.get_u8();
        let g = payload.get_u8();
        let b = payload.get_u8();
        texels.push(Rgb::new(r, g, b));
    }
    Ok(Texture::new(width, height, texels))
}

fn bad_ppm(path: &str, reason: &str) -> AssetError {
    AssetError::BadPpm {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Next whitespace-delimited header token, skipping `#` comment lines.
fn header_token(data: &[u8], pos: &mut usize) -> Option<String> {
    loop {
        match data.get(*pos) {
            Some(b'#') => {
                while *pos < data.len() && data[*pos] != b'\n' {
                    *pos += 1;
                }
            }
            Some(b) if b.is_ascii_whitespace() => *pos += 1,
            _ => break,
        }
    }
    let from = *pos;
    while *pos < data.len() && !data[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    if *pos > from {
        std::str::from_utf8(&data[from..*pos]).ok().map(String::from)
    } else {
        None
    }
}

fn header_number(data: &[u8], pos: &mut usize) -> Option<i32> {
    header_token(data, pos).and_then(|t| t.parse().ok())
}
