//! Global cap on simultaneously simulated dots

/// Count of released dots across all digits, bounded by a threshold
#[derive(Debug, Clone)]
pub struct ParticleBudget {
    count: usize,
    threshold: usize,
}

impl ParticleBudget {
    pub fn new(threshold: usize) -> Self {
        Self { count: 0, threshold }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Change the cap; particles above it are purged by the next cull passes
    pub fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;
    }

    /// True while more dots are simulated than the cap allows
    pub fn is_over(&self) -> bool {
        self.count > self.threshold
    }

    /// Dots simulated beyond the cap
    pub fn excess(&self) -> usize {
        self.count.saturating_sub(self.threshold)
    }

    /// Record `n` newly released dots. Never refused; anything past the cap
    /// is purged by the next cull pass.
    pub fn acquire(&mut self, n: usize) {
        self.count += n;
    }

    /// Return `n` slots to the pool
    pub fn release(&mut self, n: usize) {
        if n > self.count {
            log::error!(
                "Particle budget underflow: releasing {} with only {} held",
                n,
                self.count
            );
            debug_assert!(false, "particle budget released more than it held");
            self.count = 0;
        } else {
            self.count -= n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_can_oversubscribe() {
        let mut budget = ParticleBudget::new(150);
        for _ in 0..8 {
            budget.acquire(20);
        }
        assert_eq!(budget.count(), 160);
        assert!(budget.is_over());
        assert_eq!(budget.excess(), 10);

        budget.release(10);
        assert!(!budget.is_over());
        assert_eq!(budget.excess(), 0);
    }

    #[test]
    fn test_lowered_threshold_reports_over() {
        let mut budget = ParticleBudget::new(10);
        budget.acquire(10);
        assert!(!budget.is_over());
        budget.set_threshold(4);
        assert!(budget.is_over());
        budget.release(budget.excess());
        assert!(!budget.is_over());
        assert_eq!(budget.count(), 4);
    }

    #[test]
    fn test_zero_threshold() {
        let mut budget = ParticleBudget::new(0);
        budget.release(0);
        assert_eq!(budget.count(), 0);
        assert!(!budget.is_over());
        budget.acquire(1);
        assert!(budget.is_over());
    }

    proptest! {
        #[test]
        fn prop_count_matches_held_and_purge_restores_cap(
            threshold in 0usize..200,
            ops in prop::collection::vec((any::<bool>(), 0usize..30), 0..300),
        ) {
            let mut budget = ParticleBudget::new(threshold);
            let mut held = 0usize;
            for (acquire, n) in ops {
                if acquire {
                    budget.acquire(n);
                    held += n;
                } else {
                    let n = n.min(held);
                    budget.release(n);
                    held -= n;
                }
                prop_assert_eq!(budget.count(), held);

                let excess = budget.excess();
                budget.release(excess);
                held -= excess;
                prop_assert!(budget.count() <= threshold);
            }
        }
    }
}
