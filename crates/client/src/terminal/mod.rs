//! Line-oriented terminal frontend.
//!
//! Reads one command per line from stdin, forwards it to the runtime as a
//! player intent and prints the resulting frame, sized to the terminal. Runtime events feed the
//! message log between commands; only events that change the screen
//! trigger a full redraw, so clock ticks stay silent.
mod command;
mod messages;
mod render;

pub use command::{Command, HELP, ParseError};
pub use messages::{EventConsumer, EventImpact, MessageEntry, MessageLevel, MessageLog};
pub use render::{MIN_WIDTH, message_line, render, to_ansi, to_plain};

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::broadcast::error::RecvError;

use annex_core::ActionExtra;
use runtime::{Event, OracleBundle, RuntimeError, RuntimeHandle, Topic};

use crate::Frontend;

/// Frame width when stdout is not a terminal.
const FALLBACK_WIDTH: u16 = 100;

/// Whether the loop keeps reading input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct TerminalFrontend {
    oracles: OracleBundle,
    consumer: EventConsumer,
    out: Stdout,
}

impl TerminalFrontend {
    pub fn new(oracles: OracleBundle, message_capacity: usize) -> Self {
        let consumer = EventConsumer::new(MessageLog::new(message_capacity), oracles.clone());
        Self {
            oracles,
            consumer,
            out: tokio::io::stdout(),
        }
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn redraw(&mut self, handle: &RuntimeHandle) -> Result<()> {
        let snapshot = handle.snapshot().await?;
        let width = crossterm::terminal::size().map_or(FALLBACK_WIDTH, |(columns, _)| columns);
        let frame = to_ansi(&render(&snapshot, &self.oracles, width));
        self.write(&frame).await?;
        self.write("> ").await
    }

    /// Prints messages that arrived since the last flush.
    async fn flush_messages(&mut self) -> Result<()> {
        let unread = self.consumer.message_log_mut().take_unread();
        if unread.is_empty() {
            return Ok(());
        }
        let mut text = String::new();
        for entry in unread {
            text.push_str(&message_line(&entry));
            text.push('\n');
        }
        self.write(&text).await
    }

    async fn on_event(
        &mut self,
        result: Result<Event, RecvError>,
        handle: &RuntimeHandle,
    ) -> Result<Flow> {
        match result {
            Ok(event) => {
                let impact = self.consumer.on_event(&event);
                self.flush_messages().await?;
                if impact.requires_redraw {
                    self.redraw(handle).await?;
                }
                Ok(Flow::Continue)
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("Terminal lagged behind {} events", skipped);
                self.redraw(handle).await?;
                Ok(Flow::Continue)
            }
            Err(RecvError::Closed) => {
                tracing::info!("Runtime event stream closed");
                Ok(Flow::Quit)
            }
        }
    }

    async fn on_line(&mut self, line: &str, handle: &RuntimeHandle) -> Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => {
                self.redraw(handle).await?;
                return Ok(Flow::Continue);
            }
            Err(err) => {
                self.consumer
                    .message_log_mut()
                    .push(MessageEntry::new(err.to_string(), None, MessageLevel::Warning));
                self.flush_messages().await?;
                self.write("> ").await?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => {
                self.write(HELP).await?;
                self.write("\n> ").await?;
                return Ok(Flow::Continue);
            }
            Command::Status => {
                self.redraw(handle).await?;
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        match dispatch(command, handle).await {
            Ok(()) => Ok(Flow::Continue),
            // The rejection reaches the message log through the event bus
            Err(err) if err.is_rejection() => {
                tracing::debug!("Intent rejected: {}", err);
                Ok(Flow::Continue)
            }
            Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_)) => {
                tracing::warn!("Runtime stopped while a command was in flight");
                Ok(Flow::Quit)
            }
            Err(err) => {
                self.consumer.message_log_mut().push(MessageEntry::new(
                    err.to_string(),
                    None,
                    MessageLevel::Error,
                ));
                self.flush_messages().await?;
                Ok(Flow::Continue)
            }
        }
    }
}

/// Maps a command onto the runtime handle. Screen-only commands are
/// answered by the frontend and never reach here.
async fn dispatch(command: Command, handle: &RuntimeHandle) -> runtime::Result<()> {
    let outcome = match command {
        Command::Act { action, redactions } => {
            let extra = redactions.map(|redaction_count| ActionExtra { redaction_count });
            handle.perform_action(action, extra).await?
        }
        Command::Intro => handle.complete_intro().await?,
        Command::Start => handle.start_shift().await?,
        Command::Email(option) => handle.close_email(option).await?,
        Command::Lunch(choice) => handle.complete_lunch(choice).await?,
        Command::Review(option) => handle.make_review_decision(option).await?,
        Command::Accept => handle.accept_trap().await?,
        Command::Reject => handle.reject_trap().await?,
        Command::Sign => handle.sign_amendment().await?,
        Command::Veto => handle.veto_amendment().await?,
        Command::Pause => handle.toggle_pause().await?,
        Command::Reset => handle.reset_game().await?,
        Command::Note => match handle.snapshot().await?.sticky_note {
            Some(note) => handle.dismiss_sticky_note(note.id).await?,
            None => return Ok(()),
        },
        Command::Status | Command::Help | Command::Quit => return Ok(()),
    };
    tracing::debug!(nonce = outcome.nonce, "Command applied");
    Ok(())
}

#[async_trait]
impl Frontend for TerminalFrontend {
    async fn run(&mut self, handle: RuntimeHandle) -> Result<()> {
        tracing::info!("Terminal frontend starting");

        let mut game_rx = handle.subscribe(Topic::GameState);
        let mut content_rx = handle.subscribe(Topic::Content);
        let mut persistence_rx = handle.subscribe(Topic::Persistence);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.write("Type `help` for commands.\n").await?;
        self.redraw(&handle).await?;

        loop {
            let flow = tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => self.on_line(&line, &handle).await?,
                    None => Flow::Quit,
                },
                event = game_rx.recv() => self.on_event(event, &handle).await?,
                event = content_rx.recv() => self.on_event(event, &handle).await?,
                event = persistence_rx.recv() => self.on_event(event, &handle).await?,
            };
            if flow == Flow::Quit {
                break;
            }
        }

        self.write("\nClocking out.\n").await?;
        tracing::info!("Terminal frontend exiting");
        Ok(())
    }
}
