//! Command Handler Module
//!
//! This module implements the command processing layer for nestkv.
//! It receives tokenized command lines, validates them, executes them against
//! the transaction store, and returns a reply or an error.
//!
//! ## Architecture
//!
//! ```text
//! Input Line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │   Tokenizer     │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │
//! │  - Validate     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │TransactionStore │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `SET`, `GET`, `UNSET`, `NUMEQUALTO`
//! - `BEGIN`, `ROLLBACK`, `COMMIT`
//! - `END`

pub mod handler;

// Re-export the main command handler
pub use handler::{CommandError, CommandHandler, CommandKind, CommandResult};
