//! Per-connection sessions
//!
//! A transport hands each accepted client to the [`SessionDirectory`] as a
//! [`Connection`]. The directory derives the player's [`Identifier`], draws a
//! secret word and drives one [`GameEngine`](crate::game::GameEngine) until
//! the client goes away.

mod directory;
mod identity;

pub use directory::SessionDirectory;
pub use identity::{Identifier, IdentitySeed};

use tokio::io::AsyncWrite;
use tokio::sync::mpsc;

use crate::game::InputEvent;

/// One accepted client, as delivered by a transport
pub struct Connection {
    pub identity: IdentitySeed,
    /// Initial terminal geometry; later changes arrive as `Resize` events
    pub width: u16,
    pub height: u16,
    pub events: mpsc::Receiver<InputEvent>,
    pub output: Box<dyn AsyncWrite + Send + Unpin>,
}
