//! Drives one game engine per live connection
//!
//! Each session runs in its own task and owns its engine outright. The only
//! state shared between sessions is the word source and the results store,
//! both behind `Arc<dyn ...>`.
//!
//! Engine commands run as spawned tasks that post a [`Completion`] back onto
//! the session's own channel. Input that arrives while a command is
//! outstanding waits in a bounded backlog until the engine is idle again;
//! once the backlog is full further input is dropped.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::Connection;
use crate::core::Word;
use crate::game::{Command, Completion, GameEngine, InputEvent};
use crate::render::{RemoteScreen, Renderer, Theme};
use crate::results::ResultStore;
use crate::words::WordSource;

const TICK: Duration = Duration::from_secs(1);
const COMPLETION_CAPACITY: usize = 4;
const BACKLOG_CAPACITY: usize = 64;

type Output = Box<dyn AsyncWrite + Send + Unpin>;

/// Spawns and runs sessions against shared collaborators
#[derive(Clone)]
pub struct SessionDirectory {
    words: Arc<dyn WordSource>,
    store: Arc<dyn ResultStore>,
    difficulty: usize,
    theme: Theme,
}

impl SessionDirectory {
    #[must_use]
    pub fn new(
        words: Arc<dyn WordSource>,
        store: Arc<dyn ResultStore>,
        difficulty: usize,
        theme: Theme,
    ) -> Self {
        Self {
            words,
            store,
            difficulty,
            theme,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    /// Drive one connection until it disconnects or the server shuts down
    ///
    /// Returns once the session has ended and every store write it started
    /// has finished. Outstanding word lookups are abandoned.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the client fails.
    pub async fn run(
        &self,
        connection: Connection,
        mut shutdown: watch::Receiver<bool>,
    ) -> io::Result<()> {
        let Connection {
            identity,
            width,
            height,
            mut events,
            mut output,
        } = connection;
        let identifier = identity.identifier();
        info!(identifier = %identifier.short(), "session started");

        let mut screen = RemoteScreen::new(Renderer::new(self.theme.clone()), width, height)?;
        send(&mut output, &screen.enter()?).await?;

        let Some(secret) = self
            .initial_word(&mut screen, &mut events, &mut output, &mut shutdown)
            .await?
        else {
            info!(identifier = %identifier.short(), "session ended before a game started");
            return finish(&mut screen, &mut output).await;
        };

        let mut engine = GameEngine::new(identifier, secret);
        let (done_tx, mut done_rx) = mpsc::channel::<Completion>(COMPLETION_CAPACITY);
        let mut tasks = InFlight::default();
        let mut backlog = VecDeque::with_capacity(BACKLOG_CAPACITY);
        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.execute(engine.start(), &done_tx, &mut tasks);
        send(&mut output, &screen.draw(&engine.snapshot())?).await?;

        loop {
            tokio::select! {
                biased;
                Some(completion) = done_rx.recv() => {
                    tasks.reap();
                    if let Some(command) = engine.complete(completion) {
                        self.execute(command, &done_tx, &mut tasks);
                    }
                    self.drain_backlog(&mut engine, &mut backlog, &done_tx, &mut tasks);
                }
                event = events.recv() => match event {
                    None | Some(InputEvent::Disconnect) => break,
                    Some(InputEvent::Resize { width, height }) => screen.resize(width, height)?,
                    Some(event) if engine.is_busy() => {
                        if !hold(&mut backlog, event) {
                            debug!(identifier = %engine.identifier().short(), "input backlog full, dropping event");
                        }
                    }
                    Some(event) => {
                        if let Some(command) = engine.handle(event) {
                            self.execute(command, &done_tx, &mut tasks);
                        }
                    }
                },
                _ = shutdown.changed() => {
                    debug!(identifier = %engine.identifier().short(), "shutdown requested");
                    break;
                }
                _ = ticker.tick(), if engine.clock_running() => {}
            }
            send(&mut output, &screen.draw(&engine.snapshot())?).await?;
        }

        engine.handle(InputEvent::Disconnect);
        tasks.lookups.abort_all();
        if !tasks.writes.is_empty() {
            debug!(
                identifier = %engine.identifier().short(),
                in_flight = tasks.writes.len(),
                "waiting for result writes"
            );
        }
        while tasks.lookups.join_next().await.is_some() {}
        while tasks.writes.join_next().await.is_some() {}
        info!(identifier = %engine.identifier().short(), "session ended");
        finish(&mut screen, &mut output).await
    }

    /// Obtain the first secret word, prompting the player to retry on failure
    async fn initial_word(
        &self,
        screen: &mut RemoteScreen,
        events: &mut mpsc::Receiver<InputEvent>,
        output: &mut Output,
        shutdown: &mut watch::Receiver<bool>,
    ) -> io::Result<Option<Word>> {
        loop {
            if *shutdown.borrow() {
                return Ok(None);
            }
            let error = match self.words.random_word(self.difficulty).await {
                Ok(word) => return Ok(Some(word)),
                Err(e) => e,
            };
            warn!(error = %error, difficulty = self.difficulty, "could not fetch a secret word");
            let prompt = format!(
                "Could not start a game: {error}\n\nPress Enter to try again, ctrl+c to quit."
            );
            send(output, &screen.message(&prompt)?).await?;

            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        None | Some(InputEvent::Disconnect) => return Ok(None),
                        Some(InputEvent::Enter) => break,
                        Some(InputEvent::Resize { width, height }) => {
                            screen.resize(width, height)?;
                            send(output, &screen.message(&prompt)?).await?;
                        }
                        Some(_) => {}
                    },
                    _ = shutdown.changed() => return Ok(None),
                }
            }
        }
    }

    fn drain_backlog(
        &self,
        engine: &mut GameEngine,
        backlog: &mut VecDeque<InputEvent>,
        done: &mpsc::Sender<Completion>,
        tasks: &mut InFlight,
    ) {
        while !engine.is_busy()
            && let Some(event) = backlog.pop_front()
        {
            if let Some(command) = engine.handle(event) {
                self.execute(command, done, tasks);
            }
        }
    }

    /// Run `command` off the session task and post its completion back
    fn execute(&self, command: Command, done: &mpsc::Sender<Completion>, tasks: &mut InFlight) {
        let words = Arc::clone(&self.words);
        let store = Arc::clone(&self.store);
        let done = done.clone();
        let set = match command {
            Command::Append(..) => &mut tasks.writes,
            _ => &mut tasks.lookups,
        };
        set.spawn(async move {
            let completion = match command {
                Command::LoadHistory(identifier) => {
                    Completion::HistoryLoaded(store.read_all(&identifier).await)
                }
                Command::Validate(guess) => {
                    let result = words.validate(&guess).await;
                    Completion::Validated { guess, result }
                }
                Command::Append(identifier, result) => {
                    Completion::Appended(store.append(&identifier, &result).await)
                }
                Command::FetchWord(length) => {
                    Completion::WordFetched(words.random_word(length).await)
                }
            };
            // The session may already be gone; its engine ignores late results anyway
            let _ = done.send(completion).await;
        });
    }
}

/// Tasks running engine commands for one session
#[derive(Default)]
struct InFlight {
    /// Word source and history reads, abandoned when the session ends
    lookups: JoinSet<()>,
    /// Result appends, always run to completion
    writes: JoinSet<()>,
}

impl InFlight {
    fn reap(&mut self) {
        while self.lookups.try_join_next().is_some() {}
        while self.writes.try_join_next().is_some() {}
    }
}

/// Queue `event` for a busy engine; returns `false` if the backlog is full
fn hold(backlog: &mut VecDeque<InputEvent>, event: InputEvent) -> bool {
    if backlog.len() >= BACKLOG_CAPACITY {
        return false;
    }
    backlog.push_back(event);
    true
}

async fn send(output: &mut Output, bytes: &[u8]) -> io::Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }
    output.write_all(bytes).await?;
    output.flush().await
}

/// Restore the client's screen; the peer may already be gone
async fn finish(screen: &mut RemoteScreen, output: &mut Output) -> io::Result<()> {
    if let Err(e) = send(output, &screen.leave()?).await {
        debug!(error = %e, "could not restore client screen");
    }
    Ok(())
}
