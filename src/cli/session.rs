//! The interactive session: the host event loop.
//!
//! Ticks, input lines and the shutdown signal are multiplexed onto one task
//! with `tokio::select!`, so the timer state only ever sees one input at a
//! time.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, trace};

use super::display::TerminalDisplay;
use super::input::{parse_line, SessionAction, KEY_HELP};
use super::lines::LineSource;
use crate::engine::{Clock, Controller, IntervalScheduler};
use crate::types::Input;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed `q`
    Quit,
    /// Input was closed
    EndOfInput,
    /// The shutdown signal fired
    Interrupted,
}

enum Flow {
    Continue,
    Quit,
}

/// A terminal-hosted timer session.
pub struct Session<C: Clock, W: Write> {
    controller: Controller<C, IntervalScheduler>,
    display: Arc<TerminalDisplay<W>>,
}

impl<C: Clock, W: Write> Session<C, W> {
    /// Creates a session; `display` must be the surface `controller` renders to.
    pub fn new(controller: Controller<C, IntervalScheduler>, display: Arc<TerminalDisplay<W>>) -> Self {
        Self {
            controller,
            display,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &Controller<C, IntervalScheduler> {
        &self.controller
    }

    /// Runs until `q`, end of input or Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub async fn run<L>(&mut self, input: L) -> Result<SessionEnd>
    where
        L: LineSource,
    {
        self.run_until(input, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                debug!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs until `q`, end of input or `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub async fn run_until<L, F>(&mut self, mut input: L, shutdown: F) -> Result<SessionEnd>
    where
        L: LineSource,
        F: Future<Output = ()>,
    {
        self.display.print_block(KEY_HELP);
        self.controller.initialize();

        tokio::pin!(shutdown);

        let end = loop {
            tokio::select! {
                cycle = self.controller.scheduler_mut().tick() => {
                    trace!("Tick (cycle {})", cycle);
                    self.controller.handle(Input::Tick);
                }
                line = input.next_line() => {
                    match line.context("Failed to read input")? {
                        Some(line) => {
                            if let Flow::Quit = self.dispatch(&line) {
                                break SessionEnd::Quit;
                            }
                        }
                        None => break SessionEnd::EndOfInput,
                    }
                }
                () = &mut shutdown => break SessionEnd::Interrupted,
            }
        };

        info!("Session ended: {:?}", end);
        self.controller.shutdown();
        self.display.finish();
        Ok(end)
    }

    fn dispatch(&mut self, line: &str) -> Flow {
        match parse_line(line) {
            Some(SessionAction::Command(command)) => self.controller.handle(command.into()),
            Some(SessionAction::SetWork(raw)) => self.controller.update_work(raw),
            Some(SessionAction::SetBreak(raw)) => self.controller.update_break(raw),
            Some(SessionAction::Help) => self.display.print_block(KEY_HELP),
            Some(SessionAction::Quit) => return Flow::Quit,
            None => self
                .display
                .print_block(&format!("Unknown input {:?}; press h for help", line.trim())),
        }
        Flow::Continue
    }
}
