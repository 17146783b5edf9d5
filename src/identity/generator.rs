use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use super::Id;

/// Source of fresh identities. Implementations must never hand out the same value twice.
pub trait IdGenerator: Debug + Send + Sync {
    fn next_id(&self) -> Id;
}

/// Random (v4) UUIDs. The default for a namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Id {
        Id::from(Uuid::new_v4())
    }
}

/// Monotonic counter rendered as a UUID, for repeatable identities in tests and demos.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Id {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        Id::from(Uuid::from_u128(value as u128))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::*;

    use super::*;

    #[test]
    fn sequential_ids_are_repeatable() {
        let first = SequentialIds::starting_at(7);
        let second = SequentialIds::starting_at(7);

        for _ in 0..5 {
            assert_eq!(first.next_id(), second.next_id());
        }
    }

    #[rstest]
    #[case::random(Box::new(RandomIds))]
    #[case::sequential(Box::new(SequentialIds::default()))]
    fn generators_never_repeat(#[case] ids: Box<dyn IdGenerator>) {
        let seen = (0..1000).map(|_| ids.next_id()).collect::<HashSet<_>>();
        assert_eq!(seen.len(), 1000);
    }
}
