//! Layered Transaction Storage Engine
//!
//! This module implements the core storage engine for nestkv.
//! It keeps a stack of key→integer layers: the base layer holds committed
//! data, and every open transaction owns one layer stacked on top of it.
//!
//! ## Design Decisions
//!
//! 1. **Shadow Maps**: Each layer is a plain `HashMap`. A write always lands in
//!    the innermost layer and shadows any outer value for the same key.
//! 2. **Layered Lookup**: Reads search from the innermost layer outwards and
//!    stop at the first layer that holds the key.
//! 3. **Single Owner**: The stack is owned by exactly one handler, so no locks
//!    are taken anywhere in this module.
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TransactionStore                         │
//! │                                                             │
//! │   layers[N]   ┌─────────┐   innermost (BEGIN pushes here)   │
//! │               │ HashMap │                                   │
//! │               └─────────┘                                   │
//! │      ...           ▲  lookups walk downwards                │
//! │   layers[1]   ┌─────────┐                                   │
//! │               │ HashMap │                                   │
//! │               └─────────┘                                   │
//! │   layers[0]   ┌─────────┐   base layer, never removed       │
//! │               │ HashMap │                                   │
//! │               └─────────┘                                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// A single scope's private key→value mapping.
pub type Layer = HashMap<String, i64>;

/// How `count_equal` treats keys that are shadowed by an inner layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountScope {
    /// Count every raw entry in every layer, shadowed ones included.
    #[default]
    Raw,
    /// Count only the values currently visible through the layered lookup.
    Effective,
}

impl FromStr for CountScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(CountScope::Raw),
            "effective" => Ok(CountScope::Effective),
            other => Err(format!(
                "invalid count scope '{}' (expected 'raw' or 'effective')",
                other
            )),
        }
    }
}

impl fmt::Display for CountScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountScope::Raw => write!(f, "raw"),
            CountScope::Effective => write!(f, "effective"),
        }
    }
}

/// Configuration for the transaction store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreConfig {
    /// Counting scope used by `count_equal`
    pub count_scope: CountScope,
}

/// Returned by `rollback` and `commit` when only the base layer is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoTransaction;

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of layers, base included
    pub depth: usize,
    /// Number of keys visible through the layered lookup
    pub visible_keys: usize,
    /// Number of raw entries across all layers
    pub total_entries: usize,
}

/// The layered key→integer store with nested transactions.
#[derive(Debug)]
pub struct TransactionStore {
    /// Transaction stack; index 0 is the base layer
    layers: Vec<Layer>,
    config: StoreConfig,
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore {
    /// Creates a store holding only an empty base layer.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            layers: vec![Layer::new()],
            config,
        }
    }

    /// Number of layers on the stack. Always at least 1.
    #[inline]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if at least one transaction is open.
    #[inline]
    pub fn in_transaction(&self) -> bool {
        self.layers.len() > 1
    }

    fn current_mut(&mut self) -> &mut Layer {
        let top = self.layers.len() - 1;
        &mut self.layers[top]
    }

    /// Writes `key → value` into the innermost layer.
    pub fn set(&mut self, key: impl Into<String>, value: i64) {
        let key = key.into();
        trace!(key = %key, value, depth = self.depth(), "set");
        self.current_mut().insert(key, value);
    }

    /// Returns the effective value of `key`, searching innermost to base.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.get(key).copied())
    }

    /// Removes `key` from the innermost layer only.
    ///
    /// Outer layers are untouched, so an outer value for the same key becomes
    /// visible again. Returns true if the innermost layer held the key.
    pub fn unset(&mut self, key: &str) -> bool {
        let removed = self.current_mut().remove(key).is_some();
        trace!(key = %key, removed, depth = self.depth(), "unset");
        removed
    }

    /// Counts entries equal to `value` using the configured scope.
    pub fn count_equal(&self, value: i64) -> usize {
        match self.config.count_scope {
            CountScope::Raw => self.count_raw(value),
            CountScope::Effective => self.count_effective(value),
        }
    }

    /// Counts raw entries equal to `value` in every layer.
    ///
    /// A key written at several depths is counted once per layer.
    pub fn count_raw(&self, value: i64) -> usize {
        self.layers
            .iter()
            .flat_map(|layer| layer.values())
            .filter(|v| **v == value)
            .count()
    }

    /// Counts visible keys whose effective value equals `value`.
    pub fn count_effective(&self, value: i64) -> usize {
        self.visible()
            .into_iter()
            .filter(|(_, v)| *v == value)
            .count()
    }

    /// Resolves every key to its effective value.
    fn visible(&self) -> HashMap<&str, i64> {
        let mut resolved = HashMap::new();
        for layer in &self.layers {
            for (k, v) in layer {
                resolved.insert(k.as_str(), *v);
            }
        }
        resolved
    }

    /// Opens a new transaction by pushing an empty layer.
    pub fn begin(&mut self) {
        self.layers.push(Layer::new());
        debug!(depth = self.depth(), "transaction opened");
    }

    /// Discards the innermost transaction layer.
    pub fn rollback(&mut self) -> Result<(), NoTransaction> {
        if !self.in_transaction() {
            return Err(NoTransaction);
        }

        if let Some(discarded) = self.layers.pop() {
            debug!(
                depth = self.depth(),
                discarded = discarded.len(),
                "transaction rolled back"
            );
        }
        Ok(())
    }

    /// Folds every open layer into its parent and collapses to the base.
    ///
    /// Layers are merged innermost first, so on a key collision the most
    /// recent write survives in the base layer.
    pub fn commit(&mut self) -> Result<(), NoTransaction> {
        if !self.in_transaction() {
            return Err(NoTransaction);
        }

        let folded = self.layers.len() - 1;
        while self.layers.len() > 1 {
            if let Some(inner) = self.layers.pop() {
                self.current_mut().extend(inner);
            }
        }

        debug!(folded, base_keys = self.layers[0].len(), "transactions committed");
        Ok(())
    }

    /// Returns statistics about the store.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            depth: self.depth(),
            visible_keys: self.visible().len(),
            total_entries: self.layers.iter().map(|l| l.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut store = TransactionStore::new();
        store.set("a", 10);
        assert_eq!(store.get("a"), Some(10));
    }

    #[test]
    fn test_get_nonexistent() {
        let store = TransactionStore::new();
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.set("a", 2);
        assert_eq!(store.get("a"), Some(2));
        assert_eq!(store.stats().total_entries, 1);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.set("A", 2);
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.get("A"), Some(2));
    }

    #[test]
    fn test_outer_value_visible_through_inner_layer() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.begin();
        store.begin();
        assert_eq!(store.get("a"), Some(1));
    }

    #[test]
    fn test_shadowing() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.begin();
        store.set("a", 2);
        assert_eq!(store.get("a"), Some(2));
    }

    #[test]
    fn test_rollback_discards_one_level() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.begin();
        store.set("a", 2);
        store.begin();
        store.set("a", 3);

        assert_eq!(store.rollback(), Ok(()));
        assert_eq!(store.depth(), 2);
        assert_eq!(store.get("a"), Some(2));

        assert_eq!(store.rollback(), Ok(()));
        assert_eq!(store.depth(), 1);
        assert_eq!(store.get("a"), Some(1));
    }

    #[test]
    fn test_rollback_restores_unset_key() {
        let mut store = TransactionStore::new();
        store.begin();
        store.set("a", 5);
        store.rollback().unwrap();
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_rollback_without_transaction() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        assert_eq!(store.rollback(), Err(NoTransaction));
        assert_eq!(store.depth(), 1);
        assert_eq!(store.get("a"), Some(1));
    }

    #[test]
    fn test_commit_without_transaction() {
        let mut store = TransactionStore::new();
        assert_eq!(store.commit(), Err(NoTransaction));
        assert_eq!(store.depth(), 1);
    }

    #[test]
    fn test_commit_collapses_to_base() {
        let mut store = TransactionStore::new();
        store.begin();
        store.set("a", 1);
        store.begin();
        store.set("b", 2);
        store.begin();

        assert_eq!(store.commit(), Ok(()));
        assert_eq!(store.depth(), 1);
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.get("b"), Some(2));

        // Committed data survives: there is nothing left to roll back
        assert_eq!(store.rollback(), Err(NoTransaction));
        assert_eq!(store.get("a"), Some(1));
    }

    #[test]
    fn test_commit_innermost_value_wins() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.begin();
        store.set("a", 2);
        store.begin();
        store.set("a", 3);
        store.begin();
        store.set("b", 4);

        store.commit().unwrap();
        assert_eq!(store.get("a"), Some(3));
        assert_eq!(store.get("b"), Some(4));
        assert_eq!(store.stats().total_entries, 2);
    }

    #[test]
    fn test_deeply_nested_commit() {
        let mut store = TransactionStore::new();
        for i in 0..10_000 {
            store.begin();
            store.set("depth", i);
        }
        assert_eq!(store.depth(), 10_001);

        store.commit().unwrap();
        assert_eq!(store.depth(), 1);
        assert_eq!(store.get("depth"), Some(9_999));
    }

    #[test]
    fn test_unset_current_layer_only() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.begin();
        store.set("a", 2);

        assert!(store.unset("a"));
        // The outer value is visible again
        assert_eq!(store.get("a"), Some(1));

        // Nothing left to remove in this layer; the base is untouched
        assert!(!store.unset("a"));
        assert_eq!(store.get("a"), Some(1));
    }

    #[test]
    fn test_unset_in_base() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        assert!(store.unset("a"));
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn test_count_raw_includes_shadowed_entries() {
        let mut store = TransactionStore::new();
        store.set("a", 10);
        store.set("b", 10);
        assert_eq!(store.count_equal(10), 2);

        store.begin();
        store.set("a", 10);
        // "a" is counted once per layer that holds it
        assert_eq!(store.count_equal(10), 3);
        assert_eq!(store.count_effective(10), 2);
    }

    #[test]
    fn test_count_effective_scope() {
        let config = StoreConfig {
            count_scope: CountScope::Effective,
        };
        let mut store = TransactionStore::with_config(config);
        store.set("a", 10);
        store.begin();
        store.set("a", 20);

        assert_eq!(store.count_equal(10), 0);
        assert_eq!(store.count_equal(20), 1);
        assert_eq!(store.count_raw(10), 1);
    }

    #[test]
    fn test_count_missing_value() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        assert_eq!(store.count_equal(2), 0);
    }

    #[test]
    fn test_count_scope_from_str() {
        assert_eq!("raw".parse::<CountScope>(), Ok(CountScope::Raw));
        assert_eq!("EFFECTIVE".parse::<CountScope>(), Ok(CountScope::Effective));
        assert!("visible".parse::<CountScope>().is_err());
        assert_eq!(CountScope::default().to_string(), "raw");
    }

    #[test]
    fn test_stats() {
        let mut store = TransactionStore::new();
        store.set("a", 1);
        store.set("b", 2);
        store.begin();
        store.set("a", 3);

        let stats = store.stats();
        assert_eq!(
            stats,
            StorageStats {
                depth: 2,
                visible_keys: 2,
                total_entries: 3,
            }
        );
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut store = TransactionStore::new();
        store.set("a", 7);
        store.begin();
        let first = store.get("a");
        for _ in 0..5 {
            assert_eq!(store.get("a"), first);
        }
        assert_eq!(store.get("nope"), store.get("nope"));
    }
}
