#![allow(dead_code)]

//! Match identifiers — locally assigned at normalization time, never taken
//! from the model.
//!
//! Carried in `AppState` as `Arc<dyn MatchIdGenerator>` so tests can inject
//! a deterministic sequence and assert format/uniqueness properties.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Source of synthetic match ids. Implementations must yield ids whose
/// collision probability within a session is negligible (the default draws
/// from a 36^9 space).
pub trait MatchIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Default generator: 9 random base-36 characters.
pub struct RandomIdGenerator;

impl MatchIdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

/// Counter-backed generator producing `m000000000`, `m000000001`, ...
/// Deterministic; used in tests where exact ids matter.
#[derive(Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl MatchIdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("m{n:09}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_are_nine_base36_chars() {
        let ids = RandomIdGenerator;
        for _ in 0..50 {
            let id = ids.next_id();
            assert_eq!(id.len(), 9);
            assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_random_ids_are_distinct_within_a_run() {
        let ids = RandomIdGenerator;
        let generated: HashSet<String> = (0..200).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 200);
    }

    #[test]
    fn test_sequential_ids_count_up() {
        let ids = SequentialIdGenerator::default();
        assert_eq!(ids.next_id(), "m000000000");
        assert_eq!(ids.next_id(), "m000000001");
        assert_eq!(ids.next_id(), "m000000002");
    }
}
