//! Off-screen terminal for a remote session
//!
//! Frames are rendered into an in-memory byte buffer instead of stdout; the
//! session copies the bytes onto its connection after every draw.

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use parking_lot::Mutex;
use ratatui::{Terminal, TerminalOptions, Viewport, backend::CrosstermBackend, layout::Rect};

use super::Renderer;
use crate::game::Snapshot;

pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

const MIN_WIDTH: u16 = 20;
const MAX_WIDTH: u16 = 400;
const MIN_HEIGHT: u16 = 10;
const MAX_HEIGHT: u16 = 200;

/// Byte sink shared between the ratatui backend and the screen
#[derive(Debug, Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.lock())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Clamp a reported window size to something the layout can handle
#[must_use]
pub fn clamp_geometry(width: u16, height: u16) -> (u16, u16) {
    (
        width.clamp(MIN_WIDTH, MAX_WIDTH),
        height.clamp(MIN_HEIGHT, MAX_HEIGHT),
    )
}

/// A terminal whose output is collected rather than printed
pub struct RemoteScreen {
    terminal: Terminal<CrosstermBackend<SharedBuffer>>,
    buffer: SharedBuffer,
    renderer: Renderer,
    area: Rect,
}

impl RemoteScreen {
    /// Create a screen of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialised.
    pub fn new(renderer: Renderer, width: u16, height: u16) -> io::Result<Self> {
        let buffer = SharedBuffer::default();
        let (width, height) = clamp_geometry(width, height);
        let area = Rect::new(0, 0, width, height);
        let terminal = Terminal::with_options(
            CrosstermBackend::new(buffer.clone()),
            TerminalOptions {
                viewport: Viewport::Fixed(area),
            },
        )?;
        Ok(Self {
            terminal,
            buffer,
            renderer,
            area,
        })
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.area.width, self.area.height)
    }

    /// Switch the client to the alternate screen and hide its cursor
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences cannot be encoded.
    pub fn enter(&mut self) -> io::Result<Vec<u8>> {
        queue!(self.buffer, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(self.buffer.take())
    }

    /// Render one snapshot and return the bytes to send
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn draw(&mut self, snapshot: &Snapshot) -> io::Result<Vec<u8>> {
        let renderer = &self.renderer;
        self.terminal.draw(|f| renderer.draw(f, snapshot))?;
        Ok(self.buffer.take())
    }

    /// Adopt a new client window size; the next draw repaints everything
    ///
    /// # Errors
    ///
    /// Returns an error if the screen cannot be cleared.
    pub fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        let (width, height) = clamp_geometry(width, height);
        self.area = Rect::new(0, 0, width, height);
        self.terminal.resize(self.area)
    }

    /// Plain text screen, used before a game exists
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences cannot be encoded.
    pub fn message(&mut self, text: &str) -> io::Result<Vec<u8>> {
        queue!(self.buffer, Clear(ClearType::All))?;
        for (row, line) in text.lines().enumerate() {
            let row = u16::try_from(row).unwrap_or(u16::MAX);
            queue!(self.buffer, MoveTo(1, row.saturating_add(1)), Print(line))?;
        }
        Ok(self.buffer.take())
    }

    /// Restore the client's normal screen
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequences cannot be encoded.
    pub fn leave(&mut self) -> io::Result<Vec<u8>> {
        queue!(self.buffer, Show, LeaveAlternateScreen)?;
        Ok(self.buffer.take())
    }
}
