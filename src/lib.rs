//! MAZECAST - a first-person raycasting renderer for 2D tile mazes.
//! Main library.

mod compositor;
mod config;
mod gameloop;
mod gridmap;
mod hud;
mod input;
mod minimap;
mod raycaster;
#[cfg(feature = "sdl")]
mod sdl_backend;
mod surface;
mod term;
mod textures;
mod vec2;

pub use compositor::*;
pub use config::*;
pub use gameloop::*;
pub use gridmap::*;
pub use hud::*;
pub use input::*;
pub use minimap::*;
pub use raycaster::*;
#[cfg(feature = "sdl")]
pub use sdl_backend::*;
pub use surface::*;
pub use term::*;
pub use textures::*;
pub use vec2::*;
