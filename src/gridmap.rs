//! Loads a maze from its text format into a padded grid of tile codes.

use crate::Vec2;
use thiserror::Error;

/// Tile code used for the added perimeter and for padding short rows.
const PAD_WALL: u8 = 1;

#[derive(Debug, Error)]
pub enum MapFormatError {
    #[error("Cannot read map file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid character {ch:?} on map line {line}")]
    BadCharacter { line: usize, ch: char },
    #[error("Duplicate start marker on map line {second} (first on line {first})")]
    DuplicateStart { first: usize, second: usize },
    #[error("Map has no start marker and no floor tile")]
    NoStart,
}

/// The maze grid: row-major tile codes, 0 = floor, 1..=9 = wall kinds.
/// Grid y grows NORTHWARD - text rows are flipped once, here, at load
/// time, so everything downstream works in east/north coordinates.
/// The outermost ring is always wall, so traversals need no bounds checks.
pub struct GridMap {
    width: i32,
    height: i32,
    tiles: Vec<u8>,
    spawn: Vec2,
}

impl GridMap {
    pub fn load(path: &str) -> Result<Self, MapFormatError> {
        let text = std::fs::read_to_string(path).map_err(|source| MapFormatError::Unreadable {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse the text format: one line per row, northernmost row first,
    /// `'0'..='9'` = tile codes, `' '` = floor, `'x'` = start (at most one).
    /// Parsing stops at the first empty line. Short rows are padded east
    /// with wall, then the whole grid is wrapped in a one-cell wall ring.
    pub fn parse(text: &str) -> Result<Self, MapFormatError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        let mut start: Option<(usize, usize)> = None; // (row idx, col idx)
        let mut start_line = 0;

        for (lineno, line) in text.lines().enumerate() {
            if line.is_empty() {
                break;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                let code = match ch {
                    '0'..='9' => (ch as u8) - b'0',
                    // authors use spaces to pad the west edge of short rows
                    ' ' => 0,
                    'x' => {
                        if start.is_some() {
                            return Err(MapFormatError::DuplicateStart {
                                first: start_line,
                                second: lineno + 1,
                            });
                        }
                        start = Some((rows.len(), row.len()));
                        start_line = lineno + 1;
                        0
                    }
                    _ => {
                        return Err(MapFormatError::BadCharacter {
                            line: lineno + 1,
                            ch,
                        })
                    }
                };
                row.push(code);
            }
            rows.push(row);
        }

        // without an explicit marker, spawn on the first floor tile in file order
        if start.is_none() {
            'scan: for (r, row) in rows.iter().enumerate() {
                for (c, code) in row.iter().enumerate() {
                    if *code == 0 {
                        start = Some((r, c));
                        break 'scan;
                    }
                }
            }
        }
        let (start_r, start_c) = start.ok_or(MapFormatError::NoStart)?;

        let n_rows = rows.len() as i32;
        let content_w = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
        let width = content_w + 2;
        let height = n_rows + 2;

        // the solid prefill gives the wall ring and the east padding in one go
        let mut tiles = vec![PAD_WALL; (width * height) as usize];
        for (r, row) in rows.iter().enumerate() {
            // first line of the file is the northernmost row
            let y = n_rows - (r as i32);
            for (c, code) in row.iter().enumerate() {
                let x = (c as i32) + 1;
                tiles[(y * width + x) as usize] = *code;
            }
        }

        let spawn = Vec2::new(
            (start_c as f64) + 1.5,
            ((n_rows - (start_r as i32)) as f64) + 0.5,
        );

        Ok(Self {
            width,
            height,
            tiles,
            spawn,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Spawn point, centered inside its cell.
    #[inline]
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Unchecked tile lookup for the cast/movement hot path.
    /// Out of bounds is a programmer error (the wall ring makes it
    /// unreachable from any interior position) and panics.
    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> u8 {
        debug_assert!(
            x >= 0 && y >= 0 && x < self.width && y < self.height,
            "Tile lookup out of bounds: ({x},{y})"
        );
        self.tiles[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) != 0
    }

    /// Checked lookup for overlays, which may scan windows past the edge.
    pub fn cell(&self, x: i32, y: i32) -> Option<u8> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some(self.tiles[(y * self.width + x) as usize])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_flipped_to_north_up() {
        // northernmost row holds the wall code 2
        let map = GridMap::parse("22\nx0\n").unwrap();
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 4);
        assert_eq!(map.tile(1, 2), 2);
        assert_eq!(map.tile(2, 2), 2);
        assert_eq!(map.tile(1, 1), 0);
        assert_eq!(map.tile(2, 1), 0);
    }

    #[test]
    fn test_spawn_is_cell_centered() {
        let map = GridMap::parse("000\n0x0\n000\n").unwrap();
        assert_eq!(map.spawn(), Vec2::new(2.5, 2.5));
    }

    #[test]
    fn test_space_is_floor_and_short_rows_pad_east_with_wall() {
        let map = GridMap::parse("  x\n0\n").unwrap();
        // spaces on the first line are floor
        assert_eq!(map.tile(1, 2), 0);
        assert_eq!(map.tile(2, 2), 0);
        // second line is short, so its tail is wall-padded
        assert_eq!(map.tile(1, 1), 0);
        assert_eq_wall(&map, 2, 1);
        assert_eq_wall(&map, 3, 1);
    }

    #[test]
    fn test_parsing_stops_at_blank_line() {
        let map = GridMap::parse("x0\n00\n\n99\n").unwrap();
        assert_eq!(map.height(), 4);
    }

    #[test]
    fn test_fallback_start_is_first_floor_in_file_order() {
        let map = GridMap::parse("10\n00\n").unwrap();
        // first floor tile is on the first (northern) line, second column
        assert_eq!(map.spawn(), Vec2::new(2.5, 2.5));
    }

    #[test]
    fn test_duplicate_start_rejected() {
        let err = GridMap::parse("x0\n0x\n").err().unwrap();
        match err {
            MapFormatError::DuplicateStart { first, second } => {
                assert_eq!(first, 1);
                assert_eq!(second, 2);
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn test_bad_character_rejected() {
        let err = GridMap::parse("0@\n").err().unwrap();
        match err {
            MapFormatError::BadCharacter { line, ch } => {
                assert_eq!(line, 1);
                assert_eq!(ch, '@');
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn test_all_wall_map_has_no_start() {
        assert!(matches!(
            GridMap::parse("11\n11\n"),
            Err(MapFormatError::NoStart)
        ));
        assert!(matches!(GridMap::parse(""), Err(MapFormatError::NoStart)));
    }

    fn assert_eq_wall(map: &GridMap, x: i32, y: i32) {
        assert!(map.is_wall(x, y), "expected wall at ({x},{y})");
    }
}
