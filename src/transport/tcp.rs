//! TCP listener and per-connection plumbing
//!
//! A client signs in with a player name before its first game. The name is
//! the identity seed, so the same name reaches the same history from any
//! address.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::telnet::{NEGOTIATION, TelnetDecoder};
use crate::game::InputEvent;
use crate::render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::results::StorageError;
use crate::session::{Connection, IdentitySeed, SessionDirectory};

const EVENT_CAPACITY: usize = 64;
const READ_BUFFER: usize = 512;
const MAX_NAME_LEN: usize = 24;
const NAME_PROMPT: &[u8] = b"\r\nPlayer name: ";

/// Accepts telnet clients and runs a session for each
pub struct TelnetServer {
    listener: TcpListener,
    directory: SessionDirectory,
}

impl TelnetServer {
    /// Bind the listening socket
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn bind<A: ToSocketAddrs>(addr: A, directory: SessionDirectory) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            directory,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `signal` resolves, then drain sessions and flush the store
    ///
    /// # Errors
    ///
    /// Returns an error if the final store flush fails.
    pub async fn run<F>(self, signal: F) -> Result<(), StorageError>
    where
        F: Future<Output = ()>,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut sessions: Vec<JoinHandle<()>> = Vec::new();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        sessions.retain(|handle| !handle.is_finished());
                        match self.connect(stream, peer, shutdown_rx.clone()) {
                            Ok(handle) => sessions.push(handle),
                            Err(e) => warn!(%peer, error = %e, "could not start session"),
                        }
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                },
                () = &mut signal => {
                    info!("received shutdown signal");
                    break;
                }
            }
        }

        drop(self.listener);
        let _ = shutdown_tx.send(true);
        sessions.retain(|handle| !handle.is_finished());
        info!(sessions = sessions.len(), "waiting for sessions to finish");
        for handle in sessions {
            if let Err(e) = handle.await {
                warn!(error = %e, "session task failed");
            }
        }

        self.directory.store().flush().await?;
        info!("results store flushed");
        Ok(())
    }

    fn connect(
        &self,
        stream: TcpStream,
        peer: SocketAddr,
        shutdown: watch::Receiver<bool>,
    ) -> io::Result<JoinHandle<()>> {
        stream.set_nodelay(true)?;
        info!(%peer, "client connected");
        let (reader, writer) = stream.into_split();
        let directory = self.directory.clone();
        Ok(tokio::spawn(async move {
            if let Err(e) = serve_client(&directory, reader, writer, peer, shutdown).await {
                warn!(%peer, error = %e, "session ended with error");
            }
        }))
    }
}

/// Negotiate, sign the player in and run their session
///
/// The reader task is stopped when the session ends, so a peer that never
/// closes its side does not keep the connection alive.
async fn serve_client<R, W>(
    directory: &SessionDirectory,
    reader: R,
    mut writer: W,
    peer: SocketAddr,
    mut shutdown: watch::Receiver<bool>,
) -> io::Result<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    writer.write_all(&NEGOTIATION).await?;
    let (tx, mut events) = mpsc::channel(EVENT_CAPACITY);
    let reader = tokio::spawn(read_events(reader, tx, peer));

    let result = match sign_in(&mut events, &mut writer, &mut shutdown).await {
        Ok(Some(player)) => {
            info!(%peer, player = %player.name, "player signed in");
            let connection = Connection {
                identity: IdentitySeed::fallback(player.name),
                width: player.width,
                height: player.height,
                events,
                output: Box::new(writer),
            };
            directory.run(connection, shutdown).await
        }
        Ok(None) => {
            debug!(%peer, "client left before signing in");
            Ok(())
        }
        Err(e) => Err(e),
    };
    reader.abort();
    result
}

/// A named player and the geometry their client reported while signing in
#[derive(Debug, PartialEq, Eq)]
struct SignIn {
    name: String,
    width: u16,
    height: u16,
}

/// Prompt for a player name, echoing keystrokes back
///
/// Returns `None` if the client leaves or the server shuts down first.
async fn sign_in<W>(
    events: &mut mpsc::Receiver<InputEvent>,
    writer: &mut W,
    shutdown: &mut watch::Receiver<bool>,
) -> io::Result<Option<SignIn>>
where
    W: AsyncWrite + Unpin,
{
    let mut name = String::new();
    let (mut width, mut height) = (DEFAULT_WIDTH, DEFAULT_HEIGHT);
    prompt(writer, NAME_PROMPT).await?;

    loop {
        let event = tokio::select! {
            event = events.recv() => event,
            _ = shutdown.changed() => return Ok(None),
        };
        match event {
            None | Some(InputEvent::Disconnect) => return Ok(None),
            Some(InputEvent::Letter(c)) if name.len() < MAX_NAME_LEN => {
                name.push(c);
                prompt(writer, c.to_string().as_bytes()).await?;
            }
            Some(InputEvent::Backspace) => {
                if name.pop().is_some() {
                    prompt(writer, b"\x08 \x08").await?;
                }
            }
            Some(InputEvent::Enter) if name.is_empty() => prompt(writer, NAME_PROMPT).await?,
            Some(InputEvent::Enter) => {
                return Ok(Some(SignIn {
                    name,
                    width,
                    height,
                }));
            }
            Some(InputEvent::Resize {
                width: w,
                height: h,
            }) => (width, height) = (w, h),
            Some(_) => {}
        }
    }
}

async fn prompt<W: AsyncWrite + Unpin>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes).await?;
    writer.flush().await
}

/// Decode the client's bytes until EOF or until the session stops listening
async fn read_events<R>(mut reader: R, events: mpsc::Sender<InputEvent>, peer: SocketAddr)
where
    R: AsyncRead + Unpin,
{
    let mut decoder = TelnetDecoder::new();
    let mut buf = [0u8; READ_BUFFER];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(%peer, error = %e, "read failed");
                break;
            }
        };
        for event in decoder.feed(&buf[..n]) {
            if events.send(event).await.is_err() {
                return;
            }
        }
    }
    debug!(%peer, "client closed connection");
    let _ = events.send(InputEvent::Disconnect).await;
}
