//! SdlBackend - windowed sink for the RGBA framebuffer mode.

use crate::{Backend, Frame, GameLoop, InputEvent, Key};
use anyhow::{bail, Error, Result};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use sdl2::EventPump;
use std::time::{Duration, Instant};

pub struct SdlBackend {
    canvas: WindowCanvas,
    creator: TextureCreator<WindowContext>,
    event_pump: EventPump,
}

impl SdlBackend {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(Error::msg)?;
        let video = sdl.video().map_err(Error::msg)?;
        let window = video
            .window(title, width, height)
            .position_centered()
            .build()?;
        let canvas = window.into_canvas().accelerated().present_vsync().build()?;
        let event_pump = sdl.event_pump().map_err(Error::msg)?;
        let creator = canvas.texture_creator();
        Ok(Self {
            canvas,
            creator,
            event_pump,
        })
    }
}

impl Backend for SdlBackend {
    fn dimensions(&self) -> Result<(i32, i32)> {
        let (w, h) = self.canvas.output_size().map_err(Error::msg)?;
        Ok((w as i32, h as i32))
    }

    fn pump(&mut self, budget: Duration, game: &mut GameLoop) -> Result<bool> {
        let deadline = Instant::now() + budget;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            // acts as a plain poll once the budget runs out
            let event = match self.event_pump.wait_event_timeout(left.as_millis() as u32) {
                Some(event) => event,
                None => return Ok(true),
            };
            match event {
                Event::Quit { .. } => return Ok(false),
                Event::KeyDown {
                    keycode: Some(code),
                    ..
                } => {
                    if let Some(key) = translate_key(code) {
                        if !game.handle_event(&InputEvent::Key { key, pressed: true }) {
                            return Ok(false);
                        }
                    }
                }
                Event::KeyUp {
                    keycode: Some(code),
                    ..
                } => {
                    if let Some(key) = translate_key(code) {
                        game.handle_event(&InputEvent::Key {
                            key,
                            pressed: false,
                        });
                    }
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => {
                    game.handle_event(&InputEvent::Resize {
                        width: w,
                        height: h,
                    });
                }
                _ => {}
            }
        }
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let f = match frame {
            Frame::Pixels(f) => f,
            Frame::Text(_) => bail!("window sink cannot present a text frame"),
        };
        let (w, h) = (f.width() as u32, f.height() as u32);
        let mut texture = self
            .creator
            .create_texture_streaming(PixelFormatEnum::RGBA32, w, h)?;
        texture.update(None, f.data(), (w * 4) as usize)?;
        self.canvas.clear();
        self.canvas.copy(&texture, None, None).map_err(Error::msg)?;
        self.canvas.present();
        Ok(())
    }
}

//--------------------------
// Internal stuff

fn translate_key(code: Keycode) -> Option<Key> {
    match code {
        Keycode::W => Some(Key::Char('w')),
        Keycode::A => Some(Key::Char('a')),
        Keycode::S => Some(Key::Char('s')),
        Keycode::D => Some(Key::Char('d')),
        Keycode::Q => Some(Key::Char('q')),
        Keycode::E => Some(Key::Char('e')),
        Keycode::H => Some(Key::Char('h')),
        Keycode::P => Some(Key::Char('p')),
        Keycode::Up => Some(Key::Up),
        Keycode::Down => Some(Key::Down),
        Keycode::Left => Some(Key::Left),
        Keycode::Right => Some(Key::Right),
        Keycode::Tab => Some(Key::Tab),
        Keycode::Return => Some(Key::Enter),
        Keycode::Escape => Some(Key::Escape),
        _ => None,
    }
}
