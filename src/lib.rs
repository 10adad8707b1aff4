//! # nestkv - An In-Memory Key-Integer Database with Nested Transactions
//!
//! nestkv is a line-oriented interpreter over an in-memory key→integer store.
//! Each input line is a command; transactions nest with `BEGIN`, and are
//! closed with `ROLLBACK` (one level) or `COMMIT` (all levels).
//!
//! ## Features
//!
//! - **Nested Transactions**: Every `BEGIN` opens a new shadow layer
//! - **Layered Lookups**: Reads see the innermost value for each key
//! - **Safe Failures**: Every command validates before it mutates
//! - **Async I/O**: Sessions run over any Tokio byte streams
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               nestkv                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │   stdin /   │───>│   Session   │───>│  Command    │                  │
//! │  │ script file │    │  (framing)  │    │  Handler    │                  │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────────────────┐ │
//! │  │   stdout    │<───│   Reply /   │    │      TransactionStore        │ │
//! │  │             │    │   Errors    │    │  ┌──────┐ ┌──────┐ ┌──────┐  │ │
//! │  └─────────────┘    └─────────────┘    │  │ Base │ │ Txn1 │ │ TxnN │  │ │
//! │                                        │  └──────┘ └──────┘ └──────┘  │ │
//! │                                        └──────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use nestkv::commands::CommandHandler;
//! use nestkv::protocol::Reply;
//!
//! let mut handler = CommandHandler::new();
//! handler.execute_line("SET a 10").unwrap();
//! handler.execute_line("BEGIN").unwrap();
//! handler.execute_line("SET a 20").unwrap();
//! assert_eq!(handler.execute_line("GET a"), Ok(Reply::Integer(20)));
//!
//! handler.execute_line("ROLLBACK").unwrap();
//! assert_eq!(handler.execute_line("GET a"), Ok(Reply::Integer(10)));
//! ```
//!
//! ## Supported Commands
//!
//! - `SET key value` / `GET key` / `UNSET key`
//! - `NUMEQUALTO value`
//! - `BEGIN` / `ROLLBACK` / `COMMIT`
//! - `END`
//!
//! ## Module Overview
//!
//! - [`protocol`]: Line tokenizer and reply types
//! - [`storage`]: The layered transaction store
//! - [`commands`]: Validation and dispatch for every command
//! - [`session`]: Async line-oriented session loop

pub mod commands;
pub mod protocol;
pub mod session;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{CommandError, CommandHandler, CommandKind};
pub use protocol::{tokenize, Reply, Tokens};
pub use session::{run_session, Session, SessionEnd, SessionError, SessionStats};
pub use storage::{CountScope, StoreConfig, TransactionStore};

/// Version of nestkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
