//! Storage Engine Module
//!
//! This module provides the core storage functionality for nestkv:
//! a stack of key→integer layers with nested transactions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   TransactionStore                          │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │  Base   │ │ Txn 1   │ │ Txn 2   │ │...N     │           │
//! │  │ HashMap │ │ HashMap │ │ HashMap │ │ layers  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//!        ▲                                     │
//!        └──────── COMMIT folds inwards ───────┘
//! ```
//!
//! ## Features
//!
//! - **Shadowing**: Inner layers hide outer values for the same key
//! - **Layered Lookup**: Reads search innermost to base
//! - **Rollback**: Discards exactly the innermost layer
//! - **Commit**: Folds every open layer into the base, innermost winning
//!
//! ## Example
//!
//! ```
//! use nestkv::storage::TransactionStore;
//!
//! let mut store = TransactionStore::new();
//! store.set("a", 10);
//!
//! store.begin();
//! store.set("a", 20);
//! assert_eq!(store.get("a"), Some(20));
//!
//! store.rollback().unwrap();
//! assert_eq!(store.get("a"), Some(10));
//! ```

pub mod engine;

// Re-export commonly used types
pub use engine::{CountScope, Layer, NoTransaction, StorageStats, StoreConfig, TransactionStore};
