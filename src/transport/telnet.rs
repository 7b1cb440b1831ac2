//! Telnet byte stream to input events
//!
//! Only the handful of options needed for a character-mode game are
//! negotiated. Everything else the client sends is decoded and dropped.

use crate::game::InputEvent;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const IP: u8 = 244;
pub const SE: u8 = 240;

pub const ECHO: u8 = 1;
pub const SGA: u8 = 3;
pub const NAWS: u8 = 31;

const ESC: u8 = 0x1b;
const MAX_SUBNEGOTIATION: usize = 64;

/// Server echoes, no go-ahead, and please report the window size
pub const NEGOTIATION: [u8; 9] = [IAC, WILL, ECHO, IAC, WILL, SGA, IAC, DO, NAWS];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum State {
    #[default]
    Data,
    /// Just saw CR; a following LF or NUL belongs to it
    Cr,
    Iac,
    /// WILL/WONT/DO/DONT awaiting its option byte
    Option,
    Sub,
    SubIac,
    Esc,
    /// Inside `ESC [`, until a final byte
    Csi,
    /// After `ESC O`, one more byte
    Ss3,
}

/// Incremental decoder for one connection's input
#[derive(Debug, Default)]
pub struct TelnetDecoder {
    state: State,
    sub: Vec<u8>,
}

impl TelnetDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push bytes, returning any completed events
    pub fn feed(&mut self, data: &[u8]) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for &b in data {
            self.state = match self.state {
                State::Data => Self::data(b, &mut events),
                State::Cr => {
                    if b == b'\n' || b == 0 {
                        State::Data
                    } else {
                        Self::data(b, &mut events)
                    }
                }
                State::Iac => match b {
                    WILL | WONT | DO | DONT => State::Option,
                    SB => {
                        self.sub.clear();
                        State::Sub
                    }
                    IP => {
                        events.push(InputEvent::Disconnect);
                        State::Data
                    }
                    _ => State::Data,
                },
                State::Option => State::Data,
                State::Sub => {
                    if b == IAC {
                        State::SubIac
                    } else {
                        self.push_sub(b);
                        State::Sub
                    }
                }
                State::SubIac => match b {
                    SE => {
                        if let Some(event) = self.finish_sub() {
                            events.push(event);
                        }
                        State::Data
                    }
                    IAC => {
                        self.push_sub(IAC);
                        State::Sub
                    }
                    _ => State::Data,
                },
                State::Esc => match b {
                    b'[' => State::Csi,
                    b'O' => State::Ss3,
                    _ => State::Data,
                },
                State::Csi => {
                    if (0x40..=0x7e).contains(&b) {
                        State::Data
                    } else {
                        State::Csi
                    }
                }
                State::Ss3 => State::Data,
            };
        }
        events
    }

    fn data(b: u8, events: &mut Vec<InputEvent>) -> State {
        let event = match b {
            b'a'..=b'z' | b'A'..=b'Z' => InputEvent::Letter(char::from(b.to_ascii_lowercase())),
            0x7f | 0x08 => InputEvent::Backspace,
            b'\r' => {
                events.push(InputEvent::Enter);
                return State::Cr;
            }
            b'\n' => InputEvent::Enter,
            b'*' => InputEvent::ToggleReveal,
            b' ' => InputEvent::Restart,
            0x03 | 0x04 => InputEvent::Disconnect,
            ESC => return State::Esc,
            IAC => return State::Iac,
            _ => return State::Data,
        };
        events.push(event);
        State::Data
    }

    fn push_sub(&mut self, b: u8) {
        if self.sub.len() < MAX_SUBNEGOTIATION {
            self.sub.push(b);
        }
    }

    /// NAWS: option, width (2 bytes), height (2 bytes)
    fn finish_sub(&mut self) -> Option<InputEvent> {
        let sub = std::mem::take(&mut self.sub);
        match sub.as_slice() {
            [NAWS, w0, w1, h0, h1, ..] => {
                let width = u16::from_be_bytes([*w0, *w1]);
                let height = u16::from_be_bytes([*h0, *h1]);
                // Zero means "unknown" to most clients
                (width > 0 && height > 0).then_some(InputEvent::Resize { width, height })
            }
            _ => None,
        }
    }
}
