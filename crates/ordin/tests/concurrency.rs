//! Thread-safety properties of the process-wide tables.
//!
//! Concurrent interns of the same string must agree on one handle, and the
//! number of distinct handles must equal the number of distinct inputs.
//! Each test owns its flavor's process-wide table for the whole binary.

use std::collections::HashSet;
use std::thread;

use ordin::{EqSymbol, OrdSymbol};

const THREADS: usize = 8;
const STRINGS: usize = 64;

#[test]
fn eq_threads_agree_on_handles() {
    let rows: Vec<Vec<EqSymbol>> = (0..THREADS)
        .map(|_| {
            thread::spawn(|| {
                (0..STRINGS)
                    .map(|j| EqSymbol::intern(&format!("shared eq item {j:02}")))
                    .collect()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    for row in &rows[1..] {
        assert_eq!(row, &rows[0]);
    }
    let distinct: HashSet<EqSymbol> = rows.iter().flatten().copied().collect();
    assert_eq!(distinct.len(), STRINGS);
    for (j, sym) in rows[0].iter().enumerate() {
        assert_eq!(sym.resolve(), format!("shared eq item {j:02}"));
    }
}

#[test]
fn ord_threads_agree_on_handles_and_order() {
    let strs: Vec<String> = (0..STRINGS).map(|j| format!("shared ord item {j:02}")).collect();
    OrdSymbol::announce_many(&strs);

    let rows: Vec<Vec<OrdSymbol>> = (0..THREADS)
        .map(|_| {
            let strs = strs.clone();
            thread::spawn(move || {
                strs.iter()
                    .map(|s| OrdSymbol::intern(s).unwrap())
                    .collect()
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    for row in &rows[1..] {
        assert_eq!(row, &rows[0]);
    }
    let distinct: HashSet<OrdSymbol> = rows.iter().flatten().copied().collect();
    assert_eq!(distinct.len(), STRINGS);
    // The inputs were generated in ascending order; the handles must be too.
    assert!(rows[0].windows(2).all(|w| w[0] < w[1]));
}
