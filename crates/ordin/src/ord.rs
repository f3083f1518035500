//! Order-preserving handle flavors.
//!
//! [`OrdSymbol`] maps a string to an integer handle whose numeric ordering
//! matches the lexicographic byte ordering of the interned strings: for any
//! two successfully interned strings, `intern(a) < intern(b)` exactly when
//! `a < b`. Sorting a slice of handles therefore sorts the strings they
//! stand for, without touching a single character.
//!
//! The price of that guarantee is a bounded value space. Symbols are issued
//! from a 64-level binary subdivision of the `u64` range, and a worst-case
//! sequence of single interns (strictly ascending or descending strings)
//! exhausts it on the 65th call, returning [`InternError::TableFull`]. The
//! escape hatch is the pre-announce protocol: register the expected strings
//! with [`OrdSymbol::announce`] or [`OrdSymbol::announce_many`] first, and
//! the next intern assigns the whole pending batch in one balanced pass that
//! comfortably fits even millions of strings. Announce as much of the
//! workload as you can, as early as you can; every unannounced single intern
//! nudges the allocator back toward the worst case.
//!
//! When the table does fill up, [`OrdSymbol::forget_all`] starts over from
//! scratch, and [`OrdSymbol::remap_all`] rebuilds the assignment in place,
//! returning an old-to-new translation map so in-flight handles can be
//! updated.
//!
//! [`OrdCanonSymbol`] threads a caller-supplied canonicalization function
//! through every call, ordering and deduplicating by canonical form.
//!
//! [`InternError::TableFull`]: crate::InternError::TableFull

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::error::InternResult;
use crate::table::{SymbolTable, TableStats};

/// Process-wide table backing [`OrdSymbol`]'s associated functions.
static ORD_TABLE: LazyLock<OrdTable> = LazyLock::new(OrdTable::new);

/// Process-wide table backing [`OrdCanonSymbol`]'s associated functions.
static ORD_CANON_TABLE: LazyLock<OrdCanonTable> = LazyLock::new(OrdCanonTable::new);

/// An interned string whose handle ordering matches string ordering.
///
/// Handles are 8 bytes and `Copy`. Comparison operators (`<`, `<=`, `>`,
/// `>=`, `==`, `!=`) agree with the corresponding comparisons on the
/// underlying strings. The default value is the reserved sentinel `0`;
/// resolving it panics.
///
/// # Examples
///
/// ```
/// use ordin::OrdSymbol;
///
/// OrdSymbol::announce_many(&["tomato", "azure", "wheat"]);
/// let azure = OrdSymbol::intern("azure").unwrap();
/// let tomato = OrdSymbol::intern("tomato").unwrap();
/// let wheat = OrdSymbol::intern("wheat").unwrap();
/// assert!(azure < tomato && tomato < wheat);
/// assert_eq!(tomato.resolve(), "tomato");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrdSymbol(u64);

impl OrdSymbol {
    /// Intern `s` in the process-wide order table.
    ///
    /// Any strings previously pre-announced are assigned in the same
    /// balanced batch. Equal strings always map to the same handle.
    ///
    /// # Errors
    ///
    /// [`InternError::TableFull`] when the allocator cannot fit the batch;
    /// recover with [`OrdSymbol::forget_all`] or [`OrdSymbol::remap_all`].
    ///
    /// [`InternError::TableFull`]: crate::InternError::TableFull
    #[inline]
    pub fn intern(s: &str) -> InternResult<Self> {
        ORD_TABLE.intern(s)
    }

    /// Announce that `s` will be interned later. Allocates no symbol.
    ///
    /// Announced strings accumulate until the next intern, which assigns
    /// them all at once in a balanced batch.
    #[inline]
    pub fn announce(s: &str) {
        ORD_TABLE.announce(s)
    }

    /// Announce a batch under a single lock acquisition.
    pub fn announce_many<S: AsRef<str>>(ss: &[S]) {
        ORD_TABLE.announce_many(ss)
    }

    /// Return the string this handle was interned from.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from the process-wide table: the
    /// default-constructed sentinel, a handle from an explicit [`OrdTable`],
    /// or a handle issued before a [`OrdSymbol::forget_all`].
    pub fn resolve(self) -> String {
        ORD_TABLE.resolve(self)
    }

    /// Discard all mappings of the process-wide order table.
    ///
    /// Existing handles become invalid; resolving one afterwards panics.
    pub fn forget_all() {
        ORD_TABLE.forget_all()
    }

    /// Re-issue a fresh symbol to every known string in the process-wide
    /// table, repacking the value space.
    ///
    /// Returns a map from each previously issued handle to its replacement;
    /// update any handles you have stored, then carry on. Pending announced
    /// strings take part in the rebuild (and so get dense assignments) but,
    /// having had no handle before, do not appear in the map.
    ///
    /// # Errors
    ///
    /// [`InternError::TableFull`] if even the rebuilt batch does not fit,
    /// [`InternError::RemapFailed`] if a known string went missing during
    /// the rebuild.
    ///
    /// [`InternError::TableFull`]: crate::InternError::TableFull
    /// [`InternError::RemapFailed`]: crate::InternError::RemapFailed
    pub fn remap_all() -> InternResult<FxHashMap<OrdSymbol, OrdSymbol>> {
        ORD_TABLE.remap_all()
    }

    /// The raw symbol value.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrdSymbol {
    /// Formats as the interned string. Panics on an invalid handle, like
    /// [`OrdSymbol::resolve`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

/// An interned string ordered and deduplicated by canonical form.
///
/// Every operation takes the canonicalization function as an argument; pass
/// the same pure function on every call against one table. Handle ordering
/// matches lexicographic ordering of the canonical forms.
///
/// # Examples
///
/// ```
/// use ordin::OrdCanonSymbol;
///
/// let fold = |s: &str| s.to_uppercase();
/// let a = OrdCanonSymbol::intern("apple", fold).unwrap();
/// let b = OrdCanonSymbol::intern("APPLE", fold).unwrap();
/// let c = OrdCanonSymbol::intern("cherry", fold).unwrap();
/// assert_eq!(a, b);
/// assert!(a < c);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrdCanonSymbol(u64);

impl OrdCanonSymbol {
    /// Intern the canonical form of `s` in the process-wide table.
    ///
    /// # Errors
    ///
    /// [`InternError::TableFull`] when the allocator cannot fit the batch.
    ///
    /// [`InternError::TableFull`]: crate::InternError::TableFull
    #[inline]
    pub fn intern<F>(s: &str, canon: F) -> InternResult<Self>
    where
        F: Fn(&str) -> String,
    {
        ORD_CANON_TABLE.intern(s, canon)
    }

    /// Announce that the canonical form of `s` will be interned later.
    #[inline]
    pub fn announce<F>(s: &str, canon: F)
    where
        F: Fn(&str) -> String,
    {
        ORD_CANON_TABLE.announce(s, canon)
    }

    /// Return the representative stored for this handle: the original
    /// string of the intern call that created it, or the canonical form for
    /// strings that were only ever announced.
    ///
    /// # Panics
    ///
    /// Panics on a handle the process-wide table does not know.
    pub fn resolve(self) -> String {
        ORD_CANON_TABLE.resolve(self)
    }

    /// Discard all mappings of the process-wide table.
    pub fn forget_all() {
        ORD_CANON_TABLE.forget_all()
    }

    /// The raw symbol value.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrdCanonSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

/// A caller-owned order-preserving interning table.
///
/// Same semantics as the [`OrdSymbol`] associated functions, with an
/// explicit lifetime under the caller's control. All methods take `&self`;
/// the table synchronizes internally and is safe to share across threads.
pub struct OrdTable {
    table: SymbolTable,
}

impl OrdTable {
    /// Create an empty table.
    pub fn new() -> Self {
        OrdTable {
            table: SymbolTable::new(),
        }
    }

    /// The process-wide table used by [`OrdSymbol`]'s associated functions.
    pub fn global() -> &'static OrdTable {
        &ORD_TABLE
    }

    /// Intern `s`, flushing any pending announcements in the same batch.
    pub fn intern(&self, s: &str) -> InternResult<OrdSymbol> {
        self.table.intern_ord(s).map(OrdSymbol)
    }

    /// Announce that `s` will be interned later.
    pub fn announce(&self, s: &str) {
        self.table.announce(s)
    }

    /// Announce a batch under a single lock acquisition.
    pub fn announce_many<S: AsRef<str>>(&self, ss: &[S]) {
        self.table.announce_many(ss)
    }

    /// Return the string `sym` was interned from; panics if this table
    /// never issued `sym`.
    pub fn resolve(&self, sym: OrdSymbol) -> String {
        self.table.resolve(sym.0, "OrdSymbol")
    }

    /// Discard every mapping, invalidating all previously issued handles.
    pub fn forget_all(&self) {
        self.table.forget_all()
    }

    /// Re-issue fresh symbols for every known string, returning the
    /// old-to-new translation map.
    pub fn remap_all(&self) -> InternResult<FxHashMap<OrdSymbol, OrdSymbol>> {
        let translation = self.table.remap()?;
        Ok(translation
            .into_iter()
            .map(|(old, new)| (OrdSymbol(old), OrdSymbol(new)))
            .collect())
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

impl Default for OrdTable {
    fn default() -> Self {
        OrdTable::new()
    }
}

/// A caller-owned canonicalizing order-preserving table.
///
/// Pass the same canonicalization function to every call against one table.
/// Remapping is not offered here: a rebuild works from canonical forms and
/// would discard the stored representatives.
pub struct OrdCanonTable {
    table: SymbolTable,
}

impl OrdCanonTable {
    /// Create an empty table.
    pub fn new() -> Self {
        OrdCanonTable {
            table: SymbolTable::new(),
        }
    }

    /// The process-wide table used by [`OrdCanonSymbol`]'s associated
    /// functions.
    pub fn global() -> &'static OrdCanonTable {
        &ORD_CANON_TABLE
    }

    /// Intern the canonical form of `s`, keeping `s` as the representative
    /// when the canonical form is new.
    pub fn intern<F>(&self, s: &str, canon: F) -> InternResult<OrdCanonSymbol>
    where
        F: Fn(&str) -> String,
    {
        self.table.intern_ord_canon(s, canon).map(OrdCanonSymbol)
    }

    /// Announce that the canonical form of `s` will be interned later.
    pub fn announce<F>(&self, s: &str, canon: F)
    where
        F: Fn(&str) -> String,
    {
        self.table.announce_canon(s, canon)
    }

    /// Return the representative stored for `sym`; panics if this table
    /// never issued `sym`.
    pub fn resolve(&self, sym: OrdCanonSymbol) -> String {
        self.table.resolve(sym.0, "OrdCanonSymbol")
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

impl Default for OrdCanonTable {
    fn default() -> Self {
        OrdCanonTable::new()
    }
}
