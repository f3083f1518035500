//! The shared symbol-table core.
//!
//! Every handle flavor owns one [`SymbolTable`]: a forward map from
//! canonical strings to symbols, a reverse map from symbols back to a stored
//! representative, an order tree (used only by the order-preserving
//! flavors), and a pending list of strings awaiting batch assignment. All of
//! it sits behind a single reader-writer lock: mutating operations take the
//! writer lock, string lookups take the reader lock, and no operation ever
//! touches a second table, so tables cannot deadlock against each other.
//!
//! Symbol `0` is reserved and never assigned. Equality flavors count up from
//! `1`; order flavors receive whatever value the tree's position encoding
//! dictates.

mod tree;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{InternError, InternResult};

use tree::OrderTree;

/// A point-in-time snapshot of a table's size and intern traffic.
///
/// Hit and miss counters cover intern operations only (a hit is an intern of
/// a string the table already knew); string resolution is not counted. The
/// counters reset together with the table on a forget-all.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableStats {
    /// Number of symbols currently assigned.
    pub symbols: usize,
    /// Number of pre-announced strings not yet assigned a symbol.
    pub pending: usize,
    /// Interns that found an existing symbol.
    pub hits: u64,
    /// Interns that assigned a fresh symbol.
    pub misses: u64,
}

impl TableStats {
    /// Total intern operations observed.
    pub fn total_interns(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of interns that found an existing symbol, `0.0` when no
    /// interns have happened yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_interns();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Mutable contents of a symbol table, guarded by the owning table's lock.
struct TableState {
    /// Canonical string to symbol.
    forward: FxHashMap<String, u64>,
    /// Symbol to stored representative.
    reverse: FxHashMap<u64, String>,
    /// Order-preserving allocator; stays empty for equality flavors.
    tree: OrderTree,
    /// Canonical strings awaiting batch assignment.
    pending: Vec<String>,
    hits: u64,
    misses: u64,
}

impl TableState {
    fn new() -> Self {
        TableState {
            forward: FxHashMap::default(),
            reverse: FxHashMap::default(),
            tree: OrderTree::new(),
            pending: Vec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Assign the next counter symbol to `canonical`, storing `original` as
    /// the representative. Idempotent on a known canonical form.
    fn intern_counter(&mut self, canonical: &str, original: &str) -> u64 {
        if let Some(&sym) = self.forward.get(canonical) {
            self.hits += 1;
            return sym;
        }
        self.misses += 1;
        let sym = self.reverse.len() as u64 + 1;
        self.reverse.insert(sym, original.to_owned());
        self.forward.insert(canonical.to_owned(), sym);
        sym
    }

    /// Drain the pending list into the order tree as one balanced batch and
    /// refresh both maps from the tree.
    ///
    /// On `TableFull` the pending list is kept as-is so a later forget or
    /// remap can retry it; whatever the failed batch already committed stays
    /// in the tree and reaches the maps on the next successful flush.
    fn flush(&mut self) -> InternResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut batch = self.pending.clone();
        batch.sort_unstable();
        self.tree.insert_balanced(&batch)?;
        self.pending.clear();
        let TableState { tree, forward, reverse, .. } = self;
        tree.walk(&mut |key, sym| {
            forward.insert(key.to_owned(), sym);
            // Keep an existing representative: for canonicalizing flavors it
            // may be an original string rather than the canonical key.
            reverse.entry(sym).or_insert_with(|| key.to_owned());
        });
        log::debug!(
            "flushed {} pending strings; order table now holds {} symbols",
            batch.len(),
            tree.len()
        );
        Ok(())
    }

    /// Intern `canonical` through the order tree, batching it with any
    /// pending strings. `original` is recorded as the representative when
    /// this call is the one that created the symbol.
    fn intern_ordered(&mut self, canonical: &str, original: Option<&str>) -> InternResult<u64> {
        let existed = self.forward.contains_key(canonical);
        self.pending.push(canonical.to_owned());
        self.flush()?;
        let sym = self
            .forward
            .get(canonical)
            .copied()
            .expect("string just flushed is missing from the forward map");
        if existed {
            self.hits += 1;
        } else {
            self.misses += 1;
            if let Some(original) = original {
                self.reverse.insert(sym, original.to_owned());
            }
        }
        Ok(sym)
    }
}

/// Shared state behind every handle flavor.
///
/// The table is flavor-agnostic: equality flavors use the counter allocator,
/// order flavors the tree allocator. The typed wrappers in [`crate::eq`] and
/// [`crate::ord`] keep the two disciplines from mixing on one instance.
pub(crate) struct SymbolTable {
    state: RwLock<TableState>,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        SymbolTable {
            state: RwLock::new(TableState::new()),
        }
    }

    /// Intern with the counter allocator.
    pub(crate) fn intern_eq(&self, s: &str) -> u64 {
        self.state.write().intern_counter(s, s)
    }

    /// Intern a slice with the counter allocator under one lock acquisition.
    pub(crate) fn intern_eq_many<S: AsRef<str>>(&self, ss: &[S]) -> Vec<u64> {
        let mut state = self.state.write();
        ss.iter()
            .map(|s| state.intern_counter(s.as_ref(), s.as_ref()))
            .collect()
    }

    /// Intern the canonical form of `s` with the counter allocator, keeping
    /// `s` itself as the representative for a fresh symbol.
    pub(crate) fn intern_eq_canon<F>(&self, s: &str, canon: F) -> u64
    where
        F: Fn(&str) -> String,
    {
        let mut state = self.state.write();
        let canonical = canon(s);
        state.intern_counter(&canonical, s)
    }

    /// Register `s` for deferred order assignment. No symbol is allocated.
    pub(crate) fn announce(&self, s: &str) {
        self.state.write().pending.push(s.to_owned());
    }

    /// Register a slice for deferred order assignment under one lock
    /// acquisition.
    pub(crate) fn announce_many<S: AsRef<str>>(&self, ss: &[S]) {
        let mut state = self.state.write();
        state
            .pending
            .extend(ss.iter().map(|s| s.as_ref().to_owned()));
    }

    /// Register the canonical form of `s` for deferred order assignment.
    pub(crate) fn announce_canon<F>(&self, s: &str, canon: F)
    where
        F: Fn(&str) -> String,
    {
        let mut state = self.state.write();
        let canonical = canon(s);
        state.pending.push(canonical);
    }

    /// Intern with the order allocator.
    pub(crate) fn intern_ord(&self, s: &str) -> InternResult<u64> {
        self.state.write().intern_ordered(s, None)
    }

    /// Intern the canonical form of `s` with the order allocator, keeping
    /// `s` itself as the representative for a fresh symbol.
    pub(crate) fn intern_ord_canon<F>(&self, s: &str, canon: F) -> InternResult<u64>
    where
        F: Fn(&str) -> String,
    {
        let mut state = self.state.write();
        let canonical = canon(s);
        state.intern_ordered(&canonical, Some(s))
    }

    /// Return the representative stored for `sym`.
    ///
    /// Panics when `sym` was never assigned by this table, including the
    /// reserved value `0` and symbols stale after a forget-all. `flavor`
    /// names the handle type in the panic message.
    pub(crate) fn resolve(&self, sym: u64, flavor: &str) -> String {
        let state = self.state.read();
        match state.reverse.get(&sym) {
            Some(s) => s.clone(),
            None => panic!("{sym} is not a valid {flavor} symbol"),
        }
    }

    /// Discard every mapping and reset the table to its initial state.
    pub(crate) fn forget_all(&self) {
        *self.state.write() = TableState::new();
    }

    /// Re-issue a fresh symbol to every known string and return the old to
    /// new translation map.
    ///
    /// The current pending list rides along: its strings take part in the
    /// rebuilt batch but, never having had a symbol, do not appear in the
    /// translation map.
    pub(crate) fn remap(&self) -> InternResult<FxHashMap<u64, u64>> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let old: Vec<(String, u64)> = state
            .forward
            .iter()
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        let mut pending: Vec<String> = old.iter().map(|(k, _)| k.clone()).collect();
        pending.append(&mut state.pending);
        *state = TableState::new();
        state.pending = pending;
        state.flush()?;
        let mut translation = FxHashMap::default();
        translation.reserve(old.len());
        for (key, old_sym) in old {
            match state.forward.get(&key) {
                Some(&new_sym) => {
                    translation.insert(old_sym, new_sym);
                }
                None => return Err(InternError::RemapFailed { string: key }),
            }
        }
        log::debug!("remapped {} ordered symbols", translation.len());
        Ok(translation)
    }

    /// Number of symbols currently assigned.
    pub(crate) fn len(&self) -> usize {
        self.state.read().reverse.len()
    }

    pub(crate) fn stats(&self) -> TableStats {
        let state = self.state.read();
        TableStats {
            symbols: state.reverse.len(),
            pending: state.pending.len(),
            hits: state.hits,
            misses: state.misses,
        }
    }
}
