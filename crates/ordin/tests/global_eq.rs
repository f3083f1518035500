//! End-to-end coverage of the process-wide equality tables.
//!
//! The two flavors here use independent process-wide tables, so the two
//! sequences below can run in parallel with each other, but everything
//! touching one flavor's table stays inside a single test function.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use ordin::{EqCanonSymbol, EqSymbol};

#[test]
fn eq_flavor_end_to_end() {
    // Duplicate detection: interning a name list into a set reports each
    // repeated name, in encounter order.
    let names = [
        "Gunnar", "Högni", "Gjúki", "Gudrún", "Gotthorm", "Gjúki", "Óttar",
    ];
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for name in names {
        let sym = EqSymbol::intern(name);
        if !seen.insert(sym) {
            dups.push(sym.resolve());
        }
    }
    assert_eq!(dups, vec!["Gjúki".to_string()]);

    // Round trip, including through Display.
    for name in names {
        let sym = EqSymbol::intern(name);
        assert_eq!(sym.resolve(), name);
        assert_eq!(sym.to_string(), name);
    }

    // Bulk interning matches element-wise interning.
    let bulk = EqSymbol::intern_many(&names);
    for (sym, name) in bulk.iter().zip(names) {
        assert_eq!(*sym, EqSymbol::intern(name));
    }

    // Forgetting invalidates every previously issued handle.
    let stale = EqSymbol::intern("soon forgotten");
    EqSymbol::forget_all();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| stale.resolve()));
    assert!(outcome.is_err());

    // The table works again after the reset.
    let fresh = EqSymbol::intern("fresh start");
    assert_eq!(fresh.resolve(), "fresh start");
}

#[test]
fn eq_canon_flavor_end_to_end() {
    let fold = |s: &str| s.to_uppercase();

    // Three spellings of one bird plus a coyote: exactly two handles.
    let strs = ["Roadrunner", "ROADRUNNER", "rOaDrUnNeR", "Coyote"];
    let syms: Vec<EqCanonSymbol> = strs.iter().map(|s| EqCanonSymbol::intern(s, fold)).collect();
    let distinct: HashSet<EqCanonSymbol> = syms.iter().copied().collect();
    assert_eq!(distinct.len(), 2);

    // Cross product of equality comparisons: (n-1)^2 matches among the
    // roadrunner spellings plus the coyote with itself.
    let matches = syms
        .iter()
        .flat_map(|a| syms.iter().map(move |b| a == b))
        .filter(|&m| m)
        .count();
    assert_eq!(matches, 10);

    // The representative is the first interned spelling.
    assert_eq!(syms[2].resolve(), "Roadrunner");

    // Forgetting invalidates handles for this flavor too.
    EqCanonSymbol::forget_all();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| syms[0].resolve()));
    assert!(outcome.is_err());
}

#[test]
#[should_panic(expected = "not a valid EqSymbol")]
fn zero_eq_handle_panics() {
    // The sentinel is never assigned, so this is safe to run in parallel
    // with the sequences above.
    let _ = EqSymbol::default().resolve();
}

#[test]
#[should_panic(expected = "not a valid EqCanonSymbol")]
fn zero_eq_canon_handle_panics() {
    let _ = EqCanonSymbol::default().resolve();
}
