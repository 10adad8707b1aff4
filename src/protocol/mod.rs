//! Line Protocol Implementation
//!
//! This module provides the two ends of the nestkv line protocol: the
//! tokenizer for incoming command lines and the reply type for outgoing
//! results.
//!
//! ## Overview
//!
//! The protocol is one command per line. Runs of non-alphanumeric characters
//! separate tokens, and the first token names the command (case-insensitive).
//! Each result renders to at most one output line.
//!
//! ## Modules
//!
//! - `parser`: Splits raw lines into `Tokens`
//! - `types`: Defines the `Reply` enum and its rendering
//!
//! ## Example
//!
//! ```
//! use nestkv::protocol::{tokenize, Reply};
//!
//! let tokens = tokenize("GET a\n");
//! assert_eq!(tokens.command(), Some("GET"));
//!
//! assert_eq!(Reply::Null.to_string(), "NULL");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{tokenize, Tokens};
pub use types::{Reply, NULL_REPLY};
