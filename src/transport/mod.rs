//! Network front end
//!
//! Clients connect with any telnet program. The transport negotiates
//! character mode, decodes keystrokes into [`InputEvent`](crate::game::InputEvent)s
//! and hands each connection to the session directory.

mod tcp;
pub mod telnet;

pub use tcp::TelnetServer;
pub use telnet::TelnetDecoder;
