//! Session Module
//!
//! This module runs the nestkv line protocol over a pair of async byte
//! streams. The binary wires it to stdin/stdout or to a script file; tests
//! wire it to in-memory buffers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Session                              │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ Read lines  │───>│  Tokenize   │───>│ Execute cmd │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      ┌─────────────┐        │
//! │                                      │ Write reply │        │
//! │                                      └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Async I/O**: Any `AsyncRead`/`AsyncWrite` pair can host a session
//! - **Line Framing**: A `BytesMut` buffer handles partial and batched reads
//! - **Statistics**: Tracks lines, commands, errors and bytes
//!
//! ## Example
//!
//! ```
//! use nestkv::commands::CommandHandler;
//! use nestkv::session::{run_session, SessionEnd};
//!
//! # tokio_test::block_on(async {
//! let mut output = Vec::new();
//! let (end, _stats) = run_session(&b"SET a 1\nGET a\nEND\n"[..], &mut output, CommandHandler::new())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(end, SessionEnd::Ended);
//! assert_eq!(output, b"1\n");
//! # });
//! ```

pub mod handler;

// Re-export commonly used types
pub use handler::{run_session, Session, SessionEnd, SessionError, SessionStats, MAX_LINE_SIZE};
