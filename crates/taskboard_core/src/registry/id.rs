//! Task id generation.
//!
//! Ids are the creation timestamp in epoch milliseconds followed by a
//! bounded random suffix. Uniqueness is best effort at the source and
//! enforced against the target collection by [`unique_id`].

use crate::model::task::TaskId;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Exclusive upper bound of the random id suffix.
pub const ID_SUFFIX_BOUND: u32 = 10_000;
const MAX_FRESH_ATTEMPTS: usize = 8;

/// Source of candidate task ids.
pub trait IdSource {
    fn next_id(&mut self) -> TaskId;
}

/// Default id source: `<epoch_ms><random 0..10000>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdSource;

impl IdSource for TimestampIdSource {
    fn next_id(&mut self) -> TaskId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        let suffix = rand::thread_rng().gen_range(0..ID_SUFFIX_BOUND);
        TaskId::new(format!("{millis}{suffix}"))
    }
}

impl<F: FnMut() -> TaskId> IdSource for F {
    fn next_id(&mut self) -> TaskId {
        self()
    }
}

/// Draws an id from `source` that `is_taken` rejects for no existing task.
///
/// After repeated collisions the last candidate is disambiguated with a
/// numeric `-N` suffix, so this always terminates.
pub fn unique_id(source: &mut impl IdSource, is_taken: impl Fn(&TaskId) -> bool) -> TaskId {
    let mut candidate = source.next_id();
    for _ in 1..MAX_FRESH_ATTEMPTS {
        if !is_taken(&candidate) {
            return candidate;
        }
        candidate = source.next_id();
    }

    let base = candidate;
    if !is_taken(&base) {
        return base;
    }
    let mut n: u64 = 1;
    loop {
        let disambiguated = TaskId::new(format!("{base}-{n}"));
        if !is_taken(&disambiguated) {
            return disambiguated;
        }
        n += 1;
    }
}
