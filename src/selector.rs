//! Picking one winning candidate across the two pools.

use crate::{Candidate, Pool, SearchMode, SelectionOutcome};

/// Pool consulted first in `SearchMode::All`.
pub fn preferred_pool(mosaic_reduce_first: bool) -> Pool {
    if mosaic_reduce_first {
        Pool::B
    } else {
        Pool::A
    }
}

/// Picks the winner from already-filtered, source-ordered candidates.
///
/// Only pool precedence is decided here; within a pool the first
/// candidate in configured source order wins.
pub fn select(
    pool_a: Vec<Candidate>,
    pool_b: Vec<Candidate>,
    mode: SearchMode,
    mosaic_reduce_first: bool,
) -> SelectionOutcome {
    let first = |candidates: Vec<Candidate>| candidates.into_iter().next();

    let winner = match mode {
        SearchMode::PoolAOnly => first(pool_a),
        SearchMode::PoolBOnly => first(pool_b),
        SearchMode::All => {
            let (preferred, fallback) = match preferred_pool(mosaic_reduce_first) {
                Pool::A => (pool_a, pool_b),
                Pool::B => (pool_b, pool_a),
            };
            first(preferred).or_else(|| first(fallback))
        }
    };

    match winner {
        Some(candidate) => SelectionOutcome::Found(candidate),
        None => SelectionOutcome::NoResult,
    }
}
