//! ordin - String interning with comparison-preserving integer symbols.
//!
//! Comparing two long strings costs a character-by-character scan; comparing
//! two integers costs one instruction. This crate maps strings to compact
//! integer handles so that programs performing many comparisons can pay the
//! string cost once, at intern time, and compare integers ever after.
//!
//! # Handle flavors
//!
//! Two kinds of handle are provided, each with a canonicalizing variant:
//!
//! - [`EqSymbol`] supports equality comparison only. Two handles are equal
//!   exactly when the interned strings are equal; the numeric values carry
//!   no further meaning. Allocation is a simple counter and never fails.
//! - [`OrdSymbol`] additionally preserves ordering: `<`, `==`, and `>` on
//!   handles agree with the lexicographic byte order of the strings. The
//!   allocator issues symbols from a bounded 64-bit value space and can run
//!   out on pathological insertion sequences.
//! - [`EqCanonSymbol`] and [`OrdCanonSymbol`] pass every input through a
//!   caller-supplied canonicalization function (case folding, say) before
//!   interning, so any two inputs with the same canonical form share one
//!   handle while the first interned original is retained for display.
//!
//! Each flavor has its own process-wide table behind associated functions
//! on the handle type, and an explicit table type ([`EqTable`],
//! [`EqCanonTable`], [`OrdTable`], [`OrdCanonTable`]) for callers who want
//! to own the lifetime. Handles resolve back to their strings, so no
//! information is lost by interning.
//!
//! # The pre-announce protocol
//!
//! Order-preserving symbols are assigned by position in a binary
//! subdivision of the value space, which a worst-case sequence of single
//! interns exhausts after 64 strings. When the workload is known up front,
//! announce it first; the next intern assigns all announced strings in one
//! balanced batch:
//!
//! ```
//! use ordin::OrdSymbol;
//!
//! OrdSymbol::announce_many(&["wheat", "azure", "tomato", "red"]);
//! let azure = OrdSymbol::intern("azure")?;
//! let red = OrdSymbol::intern("red")?;
//! assert!(azure < red);
//! # Ok::<(), ordin::InternError>(())
//! ```
//!
//! If the table still fills up, [`OrdSymbol::forget_all`] abandons all
//! existing handles, and [`OrdSymbol::remap_all`] repacks the value space
//! while handing back an old-to-new translation map.
//!
//! # Concurrency
//!
//! Every table is internally synchronized with a reader-writer lock and is
//! safe to use from any number of threads. Canonicalization functions run
//! under the writer lock and must be pure, fast, and must not call back
//! into the same table.

pub mod eq;
pub mod ord;

mod error;
mod table;

pub use eq::{EqCanonSymbol, EqCanonTable, EqSymbol, EqTable};
pub use error::{InternError, InternResult};
pub use ord::{OrdCanonSymbol, OrdCanonTable, OrdSymbol, OrdTable};
pub use table::TableStats;

// Re-export from external crates: the remap translation map is an FxHashMap.
pub use rustc_hash::FxHashMap;
