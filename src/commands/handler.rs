//! Command Handler Module
//!
//! This module implements the nestkv command set on top of the transaction
//! store. It validates tokenized commands and dispatches them to the
//! appropriate handlers.
//!
//! ## Supported Commands
//!
//! ### Data Commands
//! - `SET key value` - Write a value into the innermost layer
//! - `GET key` - Read the effective value, or `NULL`
//! - `UNSET key` - Remove a key from the innermost layer
//! - `NUMEQUALTO value` - Count entries holding a value
//!
//! ### Transaction Commands
//! - `BEGIN` - Open a nested transaction
//! - `ROLLBACK` - Discard the innermost transaction
//! - `COMMIT` - Fold every open transaction into the base
//!
//! ### Session Commands
//! - `END` - Stop processing input
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ CommandKind │───>│  validate   │───>│  execute    │     │
//! │  │  ::parse()  │    │ arity/key/  │    │             │     │
//! │  └─────────────┘    │   value     │    └──────┬──────┘     │
//! │                     └─────────────┘           │             │
//! │                                               ▼             │
//! │                                      TransactionStore       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check runs before the store is touched, so a failed command never
//! leaves a partial mutation behind.

use crate::protocol::{Reply, Tokens};
use crate::storage::{NoTransaction, StoreConfig, TransactionStore};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// The closed set of commands understood by the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Set,
    Get,
    Unset,
    NumEqualTo,
    Begin,
    Rollback,
    Commit,
    End,
}

impl CommandKind {
    /// Every command kind, in documentation order.
    pub const ALL: [CommandKind; 8] = [
        CommandKind::Set,
        CommandKind::Get,
        CommandKind::Unset,
        CommandKind::NumEqualTo,
        CommandKind::Begin,
        CommandKind::Rollback,
        CommandKind::Commit,
        CommandKind::End,
    ];

    /// Canonical (upper-case) command name.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Set => "SET",
            CommandKind::Get => "GET",
            CommandKind::Unset => "UNSET",
            CommandKind::NumEqualTo => "NUMEQUALTO",
            CommandKind::Begin => "BEGIN",
            CommandKind::Rollback => "ROLLBACK",
            CommandKind::Commit => "COMMIT",
            CommandKind::End => "END",
        }
    }

    /// Exact number of arguments the command takes.
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::Set => 2,
            CommandKind::Get | CommandKind::Unset | CommandKind::NumEqualTo => 1,
            CommandKind::Begin | CommandKind::Rollback | CommandKind::Commit | CommandKind::End => 0,
        }
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    /// Parses a command name case-insensitively.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let upper = name.to_uppercase();
        CommandKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == upper)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors reported while executing a single command.
///
/// None of these are fatal: the store is left exactly as it was before the
/// failed command and the session keeps going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command name is not one of the recognized commands
    #[error("Error: unrecognized command '{0}'")]
    UnknownCommand(String),

    /// Wrong number of arguments
    #[error("Error: {command} expected argument count is {expected}. {actual} provided.")]
    ArityError {
        command: CommandKind,
        expected: usize,
        actual: usize,
    },

    /// Key holds no alphabetic or colon character
    #[error("Error: invalid key. Non-alphabetic characters detected in key '{0}'")]
    InvalidKey(String),

    /// Value is not a 64-bit signed integer
    #[error("Error: invalid value '{0}'. Expected an integer.")]
    InvalidValue(String),

    /// ROLLBACK or COMMIT with only the base layer open
    #[error("NO TRANSACTION")]
    NoTransaction,
}

impl From<NoTransaction> for CommandError {
    fn from(_: NoTransaction) -> Self {
        CommandError::NoTransaction
    }
}

impl CommandError {
    /// Renders the diagnostic line into `buf`, newline included.
    pub fn render_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.to_string().as_bytes());
        buf.extend_from_slice(crate::protocol::types::NEWLINE);
    }
}

/// Result type for command execution.
pub type CommandResult = Result<Reply, CommandError>;

/// Checks that a key holds at least one alphabetic or colon character.
pub fn validate_key(key: &str) -> Result<&str, CommandError> {
    if key.chars().any(|c| c.is_ascii_alphabetic() || c == ':') {
        Ok(key)
    } else {
        Err(CommandError::InvalidKey(key.to_string()))
    }
}

/// Parses a value argument as a 64-bit signed integer.
pub fn parse_value(value: &str) -> Result<i64, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidValue(value.to_string()))
}

/// Executes commands against an exclusively owned transaction store.
#[derive(Debug, Default)]
pub struct CommandHandler {
    /// The storage engine
    store: TransactionStore,
}

impl CommandHandler {
    /// Creates a handler over a fresh store.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a handler over a fresh store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            store: TransactionStore::with_config(config),
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    /// Executes a tokenized command and returns the reply.
    ///
    /// An empty line is reported as an unknown command with an empty name.
    pub fn execute(&mut self, tokens: &Tokens) -> CommandResult {
        let result = self.validate_and_dispatch(tokens);
        match &result {
            Ok(reply) => trace!(?reply, depth = self.store.depth(), "executed"),
            Err(e) => debug!(line = ?tokens.as_slice(), error = %e, "command failed"),
        }
        result
    }

    fn validate_and_dispatch(&mut self, tokens: &Tokens) -> CommandResult {
        let kind: CommandKind = tokens.command().unwrap_or("").parse()?;
        let args = tokens.args();

        check_arity(kind, args)?;
        self.dispatch(kind, args)
    }

    /// Convenience wrapper that tokenizes a raw line first.
    pub fn execute_line(&mut self, line: &str) -> CommandResult {
        self.execute(&crate::protocol::tokenize(line))
    }

    /// Dispatches a command to its handler.
    fn dispatch(&mut self, kind: CommandKind, args: &[String]) -> CommandResult {
        match kind {
            // Data commands
            CommandKind::Set => self.cmd_set(args),
            CommandKind::Get => self.cmd_get(args),
            CommandKind::Unset => self.cmd_unset(args),
            CommandKind::NumEqualTo => self.cmd_numequalto(args),

            // Transaction commands
            CommandKind::Begin => self.cmd_begin(),
            CommandKind::Rollback => self.cmd_rollback(),
            CommandKind::Commit => self.cmd_commit(),

            // Session commands
            CommandKind::End => Ok(Reply::End),
        }
    }

    // ========================================================================
    // Data Commands
    // ========================================================================

    /// SET key value
    fn cmd_set(&mut self, args: &[String]) -> CommandResult {
        let key = validate_key(&args[0])?;
        let value = parse_value(&args[1])?;

        self.store.set(key, value);
        Ok(Reply::Nothing)
    }

    /// GET key
    fn cmd_get(&mut self, args: &[String]) -> CommandResult {
        let key = validate_key(&args[0])?;
        Ok(Reply::from_lookup(self.store.get(key)))
    }

    /// UNSET key
    fn cmd_unset(&mut self, args: &[String]) -> CommandResult {
        let key = validate_key(&args[0])?;
        self.store.unset(key);
        Ok(Reply::Nothing)
    }

    /// NUMEQUALTO value
    fn cmd_numequalto(&mut self, args: &[String]) -> CommandResult {
        let value = parse_value(&args[0])?;
        Ok(Reply::count(self.store.count_equal(value)))
    }

    // ========================================================================
    // Transaction Commands
    // ========================================================================

    /// BEGIN
    fn cmd_begin(&mut self) -> CommandResult {
        self.store.begin();
        Ok(Reply::Nothing)
    }

    /// ROLLBACK
    fn cmd_rollback(&mut self) -> CommandResult {
        self.store.rollback()?;
        Ok(Reply::Nothing)
    }

    /// COMMIT
    fn cmd_commit(&mut self) -> CommandResult {
        self.store.commit()?;
        Ok(Reply::Nothing)
    }
}

/// Verifies the exact argument count for `kind`.
fn check_arity(kind: CommandKind, args: &[String]) -> Result<(), CommandError> {
    if args.len() != kind.arity() {
        return Err(CommandError::ArityError {
            command: kind,
            expected: kind.arity(),
            actual: args.len(),
        });
    }
    Ok(())
}
