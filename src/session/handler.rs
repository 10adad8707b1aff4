//! Session Handler Module
//!
//! This module drives one interactive or scripted session: it reads command
//! lines from an async byte stream, executes them, and writes the rendered
//! replies to an async byte sink.
//!
//! ## Session Lifecycle
//!
//! ```text
//! 1. Session created over (reader, writer)
//!        │
//!        ▼
//! 2. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Read bytes from input   │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Split off complete line │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Tokenize + execute      │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Write reply / error     │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 3. END command or end of input
//! ```
//!
//! ## Buffer Management
//!
//! Input is accumulated in a `BytesMut` buffer because a single read may
//! carry half a line or several lines at once. A final line without a
//! trailing newline is still executed when the input ends.

use crate::commands::CommandHandler;
use crate::protocol::tokenize;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, trace, warn};

/// Maximum length of a single command line (64 KB)
pub const MAX_LINE_SIZE: usize = 64 * 1024;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Statistics for a session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Lines taken from the input
    pub lines_read: u64,
    /// Commands that executed successfully
    pub commands_processed: u64,
    /// Commands that reported an error
    pub errors_reported: u64,
    /// Total bytes read
    pub bytes_read: u64,
    /// Total bytes written
    pub bytes_written: u64,
}

/// How a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// An END command was executed
    Ended,
    /// The input was exhausted
    Eof,
}

/// Errors that stop a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// I/O error on the input or output stream
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A line grew past the size limit without a newline
    #[error("line too long: {size} bytes (max: {max})")]
    LineTooLong { size: usize, max: usize },
}

/// Runs command lines from a reader against a command handler.
pub struct Session<R, W> {
    /// Input stream
    reader: R,

    /// Output stream
    writer: BufWriter<W>,

    /// Buffer for incoming data
    buffer: BytesMut,

    /// Rendered output for the current line
    out: Vec<u8>,

    /// The command handler that owns the store
    command_handler: CommandHandler,

    /// Session statistics
    stats: SessionStats,
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new session.
    ///
    /// # Arguments
    ///
    /// * `reader` - Where command lines come from
    /// * `writer` - Where replies and diagnostics go
    /// * `command_handler` - The handler executing the commands
    pub fn new(reader: R, writer: W, command_handler: CommandHandler) -> Self {
        Self {
            reader,
            writer: BufWriter::new(writer),
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            out: Vec::new(),
            command_handler,
            stats: SessionStats::default(),
        }
    }

    /// Returns the session statistics so far.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns the command handler.
    pub fn command_handler(&self) -> &CommandHandler {
        &self.command_handler
    }

    /// Runs the session until END, end of input, or a fatal error.
    pub async fn run(&mut self) -> Result<SessionEnd, SessionError> {
        debug!("Session started");

        let result = self.main_loop().await;
        let store = self.command_handler.store().stats();

        match &result {
            Ok(end) => info!(
                end = ?end,
                lines = self.stats.lines_read,
                commands = self.stats.commands_processed,
                errors = self.stats.errors_reported,
                depth = store.depth,
                keys = store.visible_keys,
                "Session finished"
            ),
            Err(e) => warn!(error = %e, lines = self.stats.lines_read, "Session aborted"),
        }

        result
    }

    /// The main read-execute-respond loop.
    async fn main_loop(&mut self) -> Result<SessionEnd, SessionError> {
        loop {
            // Execute every complete line already buffered
            while let Some(line) = self.next_line()? {
                if self.process_line(&line).await? {
                    return Ok(SessionEnd::Ended);
                }
            }

            // Need more data - read from the input
            if !self.read_more_data().await? {
                // Input ended: whatever remains is the final line
                if !self.buffer.is_empty() {
                    let rest = self.buffer.split();
                    let line = String::from_utf8_lossy(&rest).into_owned();
                    if self.process_line(&line).await? {
                        return Ok(SessionEnd::Ended);
                    }
                }
                self.writer.flush().await?;
                return Ok(SessionEnd::Eof);
            }
        }
    }

    /// Splits the next complete line off the buffer.
    fn next_line(&mut self) -> Result<Option<String>, SessionError> {
        match self.buffer.iter().position(|b| *b == b'\n') {
            Some(pos) => {
                let raw = self.buffer.split_to(pos + 1);
                trace!(consumed = raw.len(), remaining = self.buffer.len(), "Framed line");
                Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
            }
            None if self.buffer.len() > MAX_LINE_SIZE => {
                error!(size = self.buffer.len(), "Line size limit exceeded");
                Err(SessionError::LineTooLong {
                    size: self.buffer.len(),
                    max: MAX_LINE_SIZE,
                })
            }
            None => Ok(None),
        }
    }

    /// Executes one line and writes its output.
    ///
    /// Returns true if the line was an END command.
    async fn process_line(&mut self, line: &str) -> Result<bool, SessionError> {
        self.stats.lines_read += 1;
        let tokens = tokenize(line);

        self.out.clear();
        let ended = match self.command_handler.execute(&tokens) {
            Ok(reply) => {
                self.stats.commands_processed += 1;
                reply.render_into(&mut self.out);
                reply.is_end()
            }
            Err(e) => {
                self.stats.errors_reported += 1;
                e.render_into(&mut self.out);
                false
            }
        };

        if !self.out.is_empty() {
            self.writer.write_all(&self.out).await?;
            self.stats.bytes_written += self.out.len() as u64;
        }
        self.writer.flush().await?;

        Ok(ended)
    }

    /// Reads more data from the input into the buffer.
    ///
    /// Returns false once the input is exhausted.
    async fn read_more_data(&mut self) -> Result<bool, SessionError> {
        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(INITIAL_BUFFER_SIZE);
        }

        let n = self.reader.read_buf(&mut self.buffer).await?;
        if n == 0 {
            return Ok(false);
        }

        self.stats.bytes_read += n as u64;
        trace!(bytes = n, "Read data");
        Ok(true)
    }
}

/// Runs a complete session and returns how it ended with its statistics.
///
/// This is a convenience function that creates a `Session` and runs it to
/// completion.
pub async fn run_session<R, W>(
    reader: R,
    writer: W,
    command_handler: CommandHandler,
) -> Result<(SessionEnd, SessionStats), SessionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new(reader, writer, command_handler);
    let end = session.run().await?;
    Ok((end, session.stats().clone()))
}
