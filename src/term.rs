//! TerminalBackend - crossterm sink for the three character-cell modes.
//! Full-frame redraws, with color codes emitted only when the style run
//! changes.

use crate::{Backend, CellColor, Frame, GameLoop, InputEvent, Key, TextFrame};
use anyhow::{bail, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

pub struct TerminalBackend {
    stdout: io::Stdout,
    buf: Vec<u8>,
    entered: bool,
}

impl TerminalBackend {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(256 * 1024),
            entered: false,
        }
    }

    /// Switch to raw mode on the alternate screen, cursor hidden.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.entered = true;
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for TerminalBackend {
    fn dimensions(&self) -> Result<(i32, i32)> {
        let (w, h) = terminal::size()?;
        Ok((w as i32, h as i32))
    }

    fn pump(&mut self, budget: Duration, game: &mut GameLoop) -> Result<bool> {
        let deadline = Instant::now() + budget;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if !event::poll(left)? {
                // budget spent and the queue is drained
                return Ok(true);
            }
            match event::read()? {
                Event::Key(key) => {
                    // raw mode swallows the usual interrupt
                    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c');
                    let translated = if ctrl_c {
                        Some(Key::Escape)
                    } else {
                        translate_key(key.code)
                    };
                    let pressed = !matches!(key.kind, KeyEventKind::Release);
                    if let Some(k) = translated {
                        if !game.handle_event(&InputEvent::Key { key: k, pressed }) {
                            return Ok(false);
                        }
                    }
                }
                Event::Resize(w, h) => {
                    game.handle_event(&InputEvent::Resize {
                        width: w as i32,
                        height: h as i32,
                    });
                }
                _ => {}
            }
        }
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let f = match frame {
            Frame::Text(f) => f,
            Frame::Pixels(_) => bail!("terminal sink cannot present a pixel frame"),
        };
        self.buf.clear();
        encode_frame(f, &mut self.buf)?;
        self.flush_buf()
    }
}

//--------------------------
// Internal stuff

fn translate_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(ch) => Some(Key::Char(ch)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

fn encode_frame(f: &TextFrame, out: &mut Vec<u8>) -> Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    let mut current: Option<(CellColor, CellColor)> = None;
    for y in 0..f.height() {
        if y > 0 {
            out.queue(Print("\r\n"))?;
        }
        for x in 0..f.width() {
            let cell = f.cell(x, y).unwrap_or_default();
            if current != Some((cell.fg, cell.bg)) {
                out.queue(SetForegroundColor(cell_color(cell.fg)))?;
                out.queue(SetBackgroundColor(cell_color(cell.bg)))?;
                current = Some((cell.fg, cell.bg));
            }
            out.queue(Print(cell.glyph))?;
        }
    }
    out.queue(ResetColor)?;
    Ok(())
}

fn cell_color(color: CellColor) -> Color {
    match color {
        CellColor::None => Color::Reset,
        CellColor::Indexed(i) => Color::AnsiValue(i),
        CellColor::Rgb(c) => Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgb;

    #[test]
    fn test_translate_key_mapping() {
        assert_eq!(translate_key(KeyCode::Char('w')), Some(Key::Char('w')));
        assert_eq!(translate_key(KeyCode::Esc), Some(Key::Escape));
        assert_eq!(translate_key(KeyCode::Tab), Some(Key::Tab));
        assert_eq!(translate_key(KeyCode::F(5)), None);
    }

    #[test]
    fn test_encode_prints_all_glyphs() {
        let mut f = TextFrame::new(2, 2);
        f.put_str(0, 0, "AB", CellColor::None, CellColor::None);
        f.put_str(0, 1, "CD", CellColor::None, CellColor::None);
        let mut out = Vec::new();
        encode_frame(&f, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("AB"));
        assert!(text.contains("CD"));
    }

    #[test]
    fn test_encode_coalesces_equal_style_runs() {
        let mut f = TextFrame::new(4, 1);
        let bg = CellColor::Indexed(196);
        for x in 0..4 {
            f.put_glyph(x, 0, ' ', CellColor::None, bg);
        }
        let mut out = Vec::new();
        encode_frame(&f, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // one background set for the whole run
        assert_eq!(text.matches("48;5;196").count(), 1);
    }

    #[test]
    fn test_cell_color_mapping() {
        assert_eq!(cell_color(CellColor::None), Color::Reset);
        assert_eq!(cell_color(CellColor::Indexed(42)), Color::AnsiValue(42));
        assert_eq!(
            cell_color(CellColor::Rgb(Rgb::new(1, 2, 3))),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
