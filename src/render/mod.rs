//! Terminal rendering for remote players
//!
//! [`Renderer`] lays out a game snapshot with ratatui; [`RemoteScreen`] turns
//! those frames into bytes for a connection.

mod screen;
mod theme;
mod view;

pub use screen::{DEFAULT_HEIGHT, DEFAULT_WIDTH, RemoteScreen, clamp_geometry};
pub use theme::Theme;
pub use view::Renderer;
