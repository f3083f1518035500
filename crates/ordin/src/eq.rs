//! Equality-only handle flavors.
//!
//! [`EqSymbol`] maps a string to a compact integer handle that supports
//! equality comparison only: two handles are equal exactly when the strings
//! they were interned from are equal. The numeric values carry no other
//! meaning, so the type deliberately does not implement `Ord`; use
//! [`OrdSymbol`] when ordering matters.
//!
//! [`EqCanonSymbol`] additionally passes every input through a caller
//! supplied canonicalization function before interning, so e.g. a
//! case-folding canonicalizer makes `"Roadrunner"` and `"ROADRUNNER"`
//! resolve to one handle while the first interned spelling is retained as
//! the representative.
//!
//! Both flavors come in two tiers: associated functions on the handle type
//! use a process-wide table, and [`EqTable`] / [`EqCanonTable`] are
//! caller-owned instances for code that wants isolated lifetimes (tests,
//! subsystems with bounded string populations).
//!
//! [`OrdSymbol`]: crate::OrdSymbol

use std::fmt;
use std::sync::LazyLock;

use crate::table::{SymbolTable, TableStats};

/// Process-wide table backing [`EqSymbol`]'s associated functions.
static EQ_TABLE: LazyLock<EqTable> = LazyLock::new(EqTable::new);

/// Process-wide table backing [`EqCanonSymbol`]'s associated functions.
static EQ_CANON_TABLE: LazyLock<EqCanonTable> = LazyLock::new(EqCanonTable::new);

/// An interned string supporting equality comparison only.
///
/// Handles are 8 bytes, `Copy`, and hashable, so they work well as map and
/// set keys. The default value is the reserved sentinel `0`, which resolves
/// to a panic; treat a default-constructed handle as uninitialized.
///
/// # Examples
///
/// ```
/// use ordin::EqSymbol;
///
/// let one = EqSymbol::intern("This is string one");
/// let two = EqSymbol::intern("This is string two");
/// assert_ne!(one, two);
/// assert_eq!(one, EqSymbol::intern("This is string one"));
/// assert_eq!(one.resolve(), "This is string one");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EqSymbol(u64);

impl EqSymbol {
    /// Intern `s` in the process-wide equality table.
    ///
    /// Equal strings always map to the same handle. Never fails short of
    /// memory exhaustion.
    #[inline]
    pub fn intern(s: &str) -> Self {
        EQ_TABLE.intern(s)
    }

    /// Intern a batch under a single lock acquisition.
    ///
    /// Element-wise identical to calling [`EqSymbol::intern`] in a loop,
    /// just cheaper for large batches.
    pub fn intern_many<S: AsRef<str>>(ss: &[S]) -> Vec<Self> {
        EQ_TABLE.intern_many(ss)
    }

    /// Return the string this handle was interned from.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from the process-wide table: the
    /// default-constructed sentinel, a handle from an explicit [`EqTable`],
    /// or a handle issued before a [`EqSymbol::forget_all`].
    pub fn resolve(self) -> String {
        EQ_TABLE.resolve(self)
    }

    /// Discard all mappings of the process-wide equality table.
    ///
    /// Existing handles become invalid; resolving one afterwards panics.
    pub fn forget_all() {
        EQ_TABLE.forget_all()
    }

    /// The raw symbol value.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EqSymbol {
    /// Formats as the interned string. Panics on an invalid handle, like
    /// [`EqSymbol::resolve`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

/// An interned string compared for equality after canonicalization.
///
/// Every operation takes the canonicalization function as an argument; the
/// caller must pass the same pure function on every call against one table.
/// The library cannot check this, and mixing functions yields unspecified
/// (but memory-safe) handle identities.
///
/// # Examples
///
/// ```
/// use ordin::EqCanonSymbol;
///
/// let fold = |s: &str| s.to_uppercase();
/// let a = EqCanonSymbol::intern("Roadrunner", fold);
/// let b = EqCanonSymbol::intern("ROADRUNNER", fold);
/// assert_eq!(a, b);
/// // The first interned spelling is the stored representative.
/// assert_eq!(b.resolve(), "Roadrunner");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EqCanonSymbol(u64);

impl EqCanonSymbol {
    /// Intern the canonical form of `s` in the process-wide table.
    ///
    /// Guarantees `intern(s1, f) == intern(s2, f)` exactly when
    /// `f(s1) == f(s2)`.
    #[inline]
    pub fn intern<F>(s: &str, canon: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        EQ_CANON_TABLE.intern(s, canon)
    }

    /// Return the representative stored for this handle: the original
    /// string from the intern call that created it.
    ///
    /// # Panics
    ///
    /// Panics on a handle the process-wide table does not know.
    pub fn resolve(self) -> String {
        EQ_CANON_TABLE.resolve(self)
    }

    /// Discard all mappings of the process-wide table.
    pub fn forget_all() {
        EQ_CANON_TABLE.forget_all()
    }

    /// The raw symbol value.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EqCanonSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

/// A caller-owned equality interning table.
///
/// Same semantics as the [`EqSymbol`] associated functions, with an
/// explicit lifetime under the caller's control. All methods take `&self`;
/// the table synchronizes internally and is safe to share across threads.
pub struct EqTable {
    table: SymbolTable,
}

impl EqTable {
    /// Create an empty table.
    pub fn new() -> Self {
        EqTable {
            table: SymbolTable::new(),
        }
    }

    /// The process-wide table used by [`EqSymbol`]'s associated functions.
    pub fn global() -> &'static EqTable {
        &EQ_TABLE
    }

    /// Intern `s`, assigning the next free counter value to a new string.
    pub fn intern(&self, s: &str) -> EqSymbol {
        EqSymbol(self.table.intern_eq(s))
    }

    /// Intern a batch under a single lock acquisition.
    pub fn intern_many<S: AsRef<str>>(&self, ss: &[S]) -> Vec<EqSymbol> {
        self.table
            .intern_eq_many(ss)
            .into_iter()
            .map(EqSymbol)
            .collect()
    }

    /// Return the string `sym` was interned from; panics if this table
    /// never issued `sym`.
    pub fn resolve(&self, sym: EqSymbol) -> String {
        self.table.resolve(sym.0, "EqSymbol")
    }

    /// Discard every mapping, invalidating all previously issued handles.
    pub fn forget_all(&self) {
        self.table.forget_all()
    }

    /// Number of symbols currently assigned.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no symbols assigned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of size and intern traffic.
    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }
}

impl Default for EqTable {
    fn default() -> Self {
        EqTable::new()
    }
}

/// A caller-owned canonicalizing equality table.
///
/// Pass the same canonicalization function to every call against one table.
pub struct EqCanonTable {
    table: SymbolTable,
}

impl EqCanonTable {
    /// Create an empty table.
    pub fn new() -> Self {
        EqCanonTable {
            table: SymbolTable::new(),
        }
    }

    /// The process-wide table used by [`EqCanonSymbol`]'s associated
    /// functions.
    pub fn global() -> &'static EqCanonTable {
        &EQ_CANON_TABLE
    }

    /// Intern the canonical form of `s`, keeping `s` as the representative
    /// when the canonical form is new.
    pub fn intern<F>(&self, s: &str, canon: F) -> EqCanonSymbol
    where
        F: Fn(&str) -> String,
    {
        EqCanonSymbol(self.table.intern_eq_canon(s, canon))
    }

    /// Return the representative stored for `sym`; panics if this table
    /// never issued `sym`.
    pub fn resolve(&self, sym: EqCanonSymbol) -> String {
        self.table.resolve(sym.0, "EqCanonSymbol")
    }

    /// Discard every mapping, invalidating all previously issued handles.
    pub fn forget_all(&self) {
        self.table.forget_all()
    }

    /// Number of symbols currently assigned.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no symbols assigned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of size and intern traffic.
    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }
}

impl Default for EqCanonTable {
    fn default() -> Self {
        EqCanonTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn equal_strings_share_a_handle() {
        let table = EqTable::new();
        let a = table.intern("hello");
        let b = table.intern("hello");
        let c = table.intern("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn handles_survive_round_trips() {
        let table = EqTable::new();
        for s in ["", "a", "longer string with spaces", "ünïcödé 一二三"] {
            let sym = table.intern(s);
            assert_eq!(table.resolve(sym), s);
        }
    }

    #[test]
    fn duplicate_detection_in_encounter_order() {
        // Interning a name list into a set reports repeated names once.
        let names = [
            "Gunnar", "Högni", "Gjúki", "Gudrún", "Gotthorm", "Gjúki", "Óttar",
        ];
        let table = EqTable::new();
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for name in names {
            let sym = table.intern(name);
            if !seen.insert(sym) {
                dups.push(table.resolve(sym));
            }
        }
        assert_eq!(dups, vec!["Gjúki".to_string()]);
    }

    #[test]
    fn intern_many_is_element_wise_identical() {
        let table = EqTable::new();
        let batch = table.intern_many(&["x", "y", "x"]);
        assert_eq!(batch[0], table.intern("x"));
        assert_eq!(batch[1], table.intern("y"));
        assert_eq!(batch[0], batch[2]);
    }

    #[test]
    fn canonical_grouping_counts() {
        // Three spellings of one bird plus a coyote: two distinct handles.
        let fold = |s: &str| s.to_uppercase();
        let table = EqCanonTable::new();
        let strs = ["Roadrunner", "ROADRUNNER", "rOaDrUnNeR", "Coyote"];
        let syms: Vec<_> = strs.iter().map(|s| table.intern(s, fold)).collect();
        let distinct: std::collections::HashSet<_> = syms.iter().copied().collect();
        assert_eq!(distinct.len(), 2);

        let matches = syms
            .iter()
            .flat_map(|a| syms.iter().map(move |b| a == b))
            .filter(|&m| m)
            .count();
        // (n-1)^2 matches among the roadrunners plus the coyote with itself.
        assert_eq!(matches, 9 + 1);
    }

    #[test]
    fn concurrent_interning_agrees_on_handles() {
        let table = Arc::new(EqTable::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || table.intern("shared"))
            })
            .collect();
        let syms: Vec<EqSymbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(syms.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_inputs_yield_distinct_handles_across_threads() {
        let table = Arc::new(EqTable::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    (0..100)
                        .map(|j| table.intern(&format!("worker {i} item {j}")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(table.len(), 800);
    }

    #[test]
    #[should_panic(expected = "not a valid EqSymbol")]
    fn default_handle_is_invalid() {
        let table = EqTable::new();
        table.resolve(EqSymbol::default());
    }

    #[test]
    #[should_panic(expected = "not a valid EqCanonSymbol")]
    fn canon_default_handle_is_invalid() {
        let table = EqCanonTable::new();
        table.resolve(EqCanonSymbol::default());
    }

    #[test]
    #[should_panic(expected = "not a valid EqSymbol")]
    fn forget_all_invalidates_handles() {
        let table = EqTable::new();
        let sym = table.intern("gone");
        table.forget_all();
        table.resolve(sym);
    }
}
