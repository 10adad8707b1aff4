//! Reply Types
//!
//! This module defines what a successfully executed command hands back to the
//! session, and how it is rendered as an output line.
//!
//! ## Output Format
//!
//! Every reply renders to at most one line:
//! - `Integer`: the decimal value, e.g. `10`
//! - `Null`: the literal `NULL`
//! - `Nothing` and `End`: no output at all

use std::fmt;

/// The literal printed for a key that is unset in every layer.
pub const NULL_REPLY: &str = "NULL";

/// Line terminator for rendered output.
pub const NEWLINE: &[u8] = b"\n";

/// The result of a successfully executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The command succeeded silently (SET, UNSET, BEGIN, ...).
    Nothing,

    /// An integer result: a GET hit or a NUMEQUALTO count.
    Integer(i64),

    /// A GET miss.
    Null,

    /// END: the caller should stop processing input.
    End,
}

impl Reply {
    /// Creates an integer reply.
    pub fn integer(n: i64) -> Self {
        Reply::Integer(n)
    }

    /// Creates a count reply.
    pub fn count(n: usize) -> Self {
        Reply::Integer(i64::try_from(n).unwrap_or(i64::MAX))
    }

    /// Maps a lookup result to `Integer` or `Null`.
    pub fn from_lookup(value: Option<i64>) -> Self {
        match value {
            Some(n) => Reply::Integer(n),
            None => Reply::Null,
        }
    }

    /// Returns true if this reply asks the session to stop.
    pub fn is_end(&self) -> bool {
        matches!(self, Reply::End)
    }

    /// Returns true if this reply produces an output line.
    pub fn has_output(&self) -> bool {
        matches!(self, Reply::Integer(_) | Reply::Null)
    }

    /// Attempts to extract the inner integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the reply into `buf`, newline included.
    ///
    /// Replies without output leave the buffer untouched.
    pub fn render_into(&self, buf: &mut Vec<u8>) {
        if self.has_output() {
            buf.extend_from_slice(self.to_string().as_bytes());
            buf.extend_from_slice(NEWLINE);
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Null => write!(f, "{}", NULL_REPLY),
            Reply::Nothing | Reply::End => Ok(()),
        }
    }
}
