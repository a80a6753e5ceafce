//! Render target surfaces - character-cell frames for the terminal modes
//! and an RGBA framebuffer for the windowed mode.

/// 24-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel halved - the shade used for north/south wall faces.
    #[inline]
    pub const fn half(self) -> Self {
        Self::new(self.r >> 1, self.g >> 1, self.b >> 1)
    }
}

/// Per-cell color, tagged by output mode capability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellColor {
    /// Monochrome ASCII mode - the glyph carries all the information.
    #[default]
    None,
    /// xterm-256 palette index.
    Indexed(u8),
    /// Full 24-bit color.
    Rgb(Rgb),
}

/// A single character cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextCell {
    pub glyph: char,
    pub fg: CellColor,
    pub bg: CellColor,
}

impl Default for TextCell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: CellColor::None,
            bg: CellColor::None,
        }
    }
}

/// Grid of character cells, row-major, top row first.
/// All accessors take i32 coords and silently clip - overlays may paint
/// partially outside the surface.
#[derive(Clone, PartialEq, Eq)]
pub struct TextFrame {
    width: i32,
    height: i32,
    cells: Vec<TextCell>,
}

impl TextFrame {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Invalid text frame size: {width}x{height}");
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![TextCell::default(); len],
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

    pub fn cells(&self) -> &[TextCell] {
        &self.cells
    }

    #[inline]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<TextCell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn put_cell(&mut self, x: i32, y: i32, cell: TextCell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    #[inline]
    pub fn put_glyph(&mut self, x: i32, y: i32, glyph: char, fg: CellColor, bg: CellColor) {
        self.put_cell(x, y, TextCell { glyph, fg, bg });
    }

    pub fn put_str(&mut self, x: i32, y: i32, text: &str, fg: CellColor, bg: CellColor) {
        let mut cx = x;
        for glyph in text.chars() {
            self.put_cell(cx, y, TextCell { glyph, fg, bg });
            cx += 1;
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, cell: TextCell) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_cell(x + dx, y + dy, cell);
            }
        }
    }
}

/// RGBA8 framebuffer, row-major, top row first, 4 bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelFrame {
    width: i32,
    height: i32,
    rgba: Vec<u8>,
}

impl PixelFrame {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Invalid pixel frame size: {width}x{height}");
        let len = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            rgba: vec![0; len],
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

    pub fn data(&self) -> &[u8] {
        &self.rgba
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        self.rgba[idx] = color.r;
        self.rgba[idx + 1] = color.g;
        self.rgba[idx + 2] = color.b;
        self.rgba[idx + 3] = 0xFF;
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        Some(Rgb::new(self.rgba[idx], self.rgba[idx + 1], self.rgba[idx + 2]))
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_pixel(x + dx, y + dy, color);
            }
        }
    }
}

/// The surface a frame gets composited into - one variant per sink family.
pub enum Frame {
    Text(TextFrame),
    Pixels(PixelFrame),
}

impl Frame {
    #[inline]
    pub fn width(&self) -> i32 {
        match self {
            Frame::Text(f) => f.width(),
            Frame::Pixels(f) => f.width(),
        }
    }

    #[inline]
    pub fn height(&self) -> i32 {
        match self {
            Frame::Text(f) => f.height(),
            Frame::Pixels(f) => f.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_frame_clips_silently() {
        let mut frame = TextFrame::new(4, 3);
        frame.put_glyph(-1, 0, '#', CellColor::None, CellColor::None);
        frame.put_glyph(4, 2, '#', CellColor::None, CellColor::None);
        frame.put_glyph(0, 3, '#', CellColor::None, CellColor::None);
        assert!(frame.cells().iter().all(|c| c.glyph == ' '));

        frame.put_glyph(3, 2, '#', CellColor::None, CellColor::None);
        assert_eq!(frame.cell(3, 2).map(|c| c.glyph), Some('#'));
    }

    #[test]
    fn test_fill_rect_paints_and_clips() {
        let mut frame = TextFrame::new(4, 3);
        let cell = TextCell {
            glyph: '#',
            fg: CellColor::None,
            bg: CellColor::None,
        };
        // the rect hangs off the south-east corner
        frame.fill_rect(2, 1, 5, 5, cell);
        assert_eq!(frame.cell(2, 1).map(|c| c.glyph), Some('#'));
        assert_eq!(frame.cell(3, 2).map(|c| c.glyph), Some('#'));
        assert_eq!(frame.cell(1, 1).map(|c| c.glyph), Some(' '));
        assert_eq!(frame.cell(2, 0).map(|c| c.glyph), Some(' '));
    }

    #[test]
    fn test_put_str_clips_at_right_edge() {
        let mut frame = TextFrame::new(4, 1);
        frame.put_str(2, 0, "abcd", CellColor::None, CellColor::None);
        assert_eq!(frame.cell(2, 0).map(|c| c.glyph), Some('a'));
        assert_eq!(frame.cell(3, 0).map(|c| c.glyph), Some('b'));
    }

    #[test]
    fn test_pixel_frame_rgba_layout() {
        let mut frame = PixelFrame::new(2, 2);
        frame.put_pixel(1, 0, Rgb::new(10, 20, 30));
        assert_eq!(&frame.data()[4..8], &[10, 20, 30, 0xFF]);
        assert_eq!(frame.pixel(1, 0), Some(Rgb::new(10, 20, 30)));
        // out of range is a no-op
        frame.put_pixel(2, 0, Rgb::new(1, 1, 1));
        frame.put_pixel(0, -1, Rgb::new(1, 1, 1));
    }

    #[test]
    fn test_half_shade() {
        assert_eq!(Rgb::new(200, 100, 50).half(), Rgb::new(100, 50, 25));
        assert_eq!(Rgb::new(255, 1, 0).half(), Rgb::new(127, 0, 0));
    }
}
