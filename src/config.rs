//! Runtime options - output mode and projection selection.

use strum_macros::{Display, EnumString};

/// The four output modes. Picked once at startup; each maps to a sink
/// (terminal for the cell modes, a window for `Window`) and to how the
/// compositor colors its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    /// Monochrome glyphs only.
    Ascii,
    /// Glyphs on xterm-256 palette colors.
    Color256,
    /// Glyphs on 24-bit colors.
    Truecolor,
    /// RGBA framebuffer in a window.
    Window,
}

impl RenderMode {
    /// Character-cell modes render through the terminal sink.
    #[inline]
    pub fn is_cell_output(self) -> bool {
        !matches!(self, RenderMode::Window)
    }
}

/// How a ray's distance is measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Projection {
    /// Distance to the camera plane - straight walls render straight.
    Perpendicular,
    /// True ray length - the classic fisheye bow, kept selectable.
    Euclidean,
}

impl Projection {
    pub fn toggled(self) -> Self {
        match self {
            Projection::Perpendicular => Projection::Euclidean,
            Projection::Euclidean => Projection::Perpendicular,
        }
    }
}

/// Everything pickable from the command line, bundled for startup.
pub struct Options {
    pub mode: RenderMode,
    pub map_path: String,
    pub texture_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in [
            RenderMode::Ascii,
            RenderMode::Color256,
            RenderMode::Truecolor,
            RenderMode::Window,
        ] {
            assert_eq!(RenderMode::from_str(&mode.to_string()).unwrap(), mode);
        }
        assert_eq!(RenderMode::from_str("truecolor").unwrap(), RenderMode::Truecolor);
        assert!(RenderMode::from_str("vulkan").is_err());
    }

    #[test]
    fn test_cell_output_split() {
        assert!(RenderMode::Ascii.is_cell_output());
        assert!(RenderMode::Color256.is_cell_output());
        assert!(RenderMode::Truecolor.is_cell_output());
        assert!(!RenderMode::Window.is_cell_output());
    }

    #[test]
    fn test_projection_toggle() {
        assert_eq!(Projection::Perpendicular.toggled(), Projection::Euclidean);
        assert_eq!(Projection::Euclidean.toggled(), Projection::Perpendicular);
    }
}
