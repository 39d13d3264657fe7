//! Input line sources for the interactive session.
//!
//! A blocking read on the process's stdin cannot be cancelled, and a tokio
//! runtime waits for its blocking-pool threads on shutdown. `StdinLines`
//! therefore reads on a dedicated OS thread and hands lines over a channel,
//! so the session can stop at any time and the process exits with it.

use std::future::Future;
use std::io::{self, BufRead};

use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;
use tracing::debug;

/// Lines kept in flight between the reader thread and the session.
const LINE_BUFFER: usize = 16;

/// Something the session can read input lines from.
pub trait LineSource {
    /// Returns the next line, or `None` once input is closed.
    ///
    /// The returned future must be cancel-safe: the session drops it
    /// whenever a tick or the shutdown signal wins the race.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>>;
}

impl<R: AsyncBufRead + Unpin> LineSource for Lines<R> {
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> {
        Lines::next_line(self)
    }
}

// ============================================================================
// StdinLines
// ============================================================================

/// Lines read from a blocking reader on a background thread.
#[derive(Debug)]
pub struct StdinLines {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl StdinLines {
    /// Starts reading the process's stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn spawn() -> io::Result<Self> {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }

    /// Starts reading `reader` line by line on a background thread.
    ///
    /// The thread stops after end of input, a read error, or once the
    /// receiving side is dropped and the next line arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn from_reader<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
                debug!("Input reader finished");
            })?;
        Ok(Self { rx })
    }
}

impl LineSource for StdinLines {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.rx.recv().await.transpose()
    }
}
