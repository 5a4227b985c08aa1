//! Read-eval-print loop.

use std::future::Future;
use std::io;
use std::sync::Arc;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::config::ConsoleConfig;
use crate::console::command::{Command, USAGE_HINT};
use crate::console::render;
use crate::snapshot::{SnapshotStore, TransitionEvent};
use crate::upstream::{StateSource, VirtualServer};

pub const BANNER: &str = "Type 'help' for commands or 'quit' to exit";

/// Why the console loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    EndOfInput,
    Interrupted,
}

/// Interactive console. Reads the store, never writes it.
pub struct Console<S: StateSource> {
    host: String,
    source: Arc<S>,
    store: Arc<SnapshotStore>,
    events: mpsc::UnboundedReceiver<TransitionEvent>,
    prompt: String,
}

impl<S: StateSource> Console<S> {
    pub fn new(
        host: impl Into<String>,
        source: Arc<S>,
        store: Arc<SnapshotStore>,
        events: mpsc::UnboundedReceiver<TransitionEvent>,
        config: &ConsoleConfig,
    ) -> Self {
        Self {
            host: host.into(),
            source,
            store,
            events,
            prompt: config.prompt.clone(),
        }
    }

    /// Run until `quit`/`exit`, end of input, or `interrupt` resolves.
    ///
    /// Transition events arriving while waiting for input are printed
    /// between prompts.
    pub async fn run<R, W, I>(&mut self, input: R, output: &mut W, interrupt: I) -> io::Result<ExitReason>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        I: Future<Output = ()>,
    {
        let mut lines = input.lines();
        tokio::pin!(interrupt);

        output
            .write_all(format!("Monitoring {}\n{}\n{}\n", self.host, BANNER, "-".repeat(60)).as_bytes())
            .await?;

        loop {
            output.write_all(self.prompt.as_bytes()).await?;
            output.flush().await?;

            let line = loop {
                tokio::select! {
                    biased;
                    _ = &mut interrupt => {
                        output.write_all(b"\nGoodbye!\n").await?;
                        output.flush().await?;
                        return Ok(ExitReason::Interrupted);
                    }
                    Some(event) = self.events.recv() => {
                        output
                            .write_all(format!("\n{}\n{}", event, self.prompt).as_bytes())
                            .await?;
                        output.flush().await?;
                    }
                    line = lines.next_line() => break line?,
                }
            };

            let Some(line) = line else {
                output.write_all(b"\nGoodbye!\n").await?;
                output.flush().await?;
                return Ok(ExitReason::EndOfInput);
            };

            match Command::parse(&line) {
                Command::Quit => {
                    output.write_all(b"Goodbye!\n").await?;
                    output.flush().await?;
                    return Ok(ExitReason::Quit);
                }
                Command::Empty => {}
                command => {
                    // On-demand fetches can take up to the client timeout.
                    let text = tokio::select! {
                        biased;
                        _ = &mut interrupt => {
                            output.write_all(b"\nGoodbye!\n").await?;
                            output.flush().await?;
                            return Ok(ExitReason::Interrupted);
                        }
                        text = self.execute(command) => text,
                    };
                    output.write_all(text.as_bytes()).await?;
                }
            }
        }
    }

    /// Render the response to one non-terminal command.
    pub async fn execute(&self, command: Command) -> String {
        match command {
            Command::Help => render::help(),
            Command::Status => render::status(&self.host, &self.store.current()),
            Command::Pools => render::pools(&self.store.current()),
            Command::Pool(name) => render::pool_details(&self.store.current(), &name),
            Command::Logs => render::logs(&self.store.current()),
            Command::Virtual => {
                let servers = self.virtual_servers().await.unwrap_or_default();
                render::virtual_servers(&servers)
            }
            Command::Summary => {
                let snapshot = self.store.current();
                let servers = self.virtual_servers().await;
                render::summary(&self.host, &snapshot, servers.as_deref(), Local::now())
            }
            Command::Quit | Command::Empty => String::new(),
            Command::Unknown(_) => format!("{}\n", USAGE_HINT),
        }
    }

    /// On-demand fetch; failures are logged and rendered as "nothing found".
    async fn virtual_servers(&self) -> Option<Vec<VirtualServer>> {
        match self.source.fetch_virtual_servers().await {
            Ok(servers) => Some(servers),
            Err(e) => {
                tracing::warn!(resource = %e.resource(), error = %e, "On-demand fetch failed");
                None
            }
        }
    }
}
