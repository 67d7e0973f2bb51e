use std::time::Duration;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::SchedulerError;

/// Discrete weighted choice over a fixed set of labelled actions.
///
/// Selection probability is proportional to each action's weight.
#[derive(Debug, Clone)]
pub struct WeightedTaskSet<T> {
    tasks: Vec<(T, u32)>,
    index: WeightedIndex<u32>,
}

impl<T: Clone> WeightedTaskSet<T> {
    pub fn new(tasks: Vec<(T, u32)>) -> Result<Self, SchedulerError> {
        if tasks.is_empty() {
            return Err(SchedulerError::Empty);
        }
        let index = WeightedIndex::new(tasks.iter().map(|(_, w)| *w))
            .map_err(|e| SchedulerError::InvalidWeights(e.to_string()))?;
        Ok(Self { tasks, index })
    }

    pub fn pick<R: Rng>(&self, rng: &mut R) -> T {
        self.tasks[self.index.sample(rng)].0.clone()
    }

    pub fn total_weight(&self) -> u32 {
        self.tasks.iter().map(|(_, w)| *w).sum()
    }

    pub fn tasks(&self) -> &[(T, u32)] {
        &self.tasks
    }
}

/// Uniform inter-task delay, like a human pausing between requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Pacing {
    pub fn between(min: Duration, max: Duration) -> Result<Self, SchedulerError> {
        if min > max {
            return Err(SchedulerError::InvalidPacing { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn between_secs(min: f64, max: f64) -> Result<Self, SchedulerError> {
        let min = Duration::try_from_secs_f64(min)
            .map_err(|e| SchedulerError::InvalidDelay(format!("min: {}", e)))?;
        let max = Duration::try_from_secs_f64(max)
            .map_err(|e| SchedulerError::InvalidDelay(format!("max: {}", e)))?;
        Self::between(min, max)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_frequencies_converge_to_weights() {
        let set = WeightedTaskSet::new(vec![
            ("weather", 3),
            ("tip", 2),
            ("gemma", 2),
            ("health", 1),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..n {
            *counts.entry(set.pick(&mut rng)).or_default() += 1;
        }

        let total = set.total_weight() as f64;
        for (label, weight) in set.tasks() {
            let expected = *weight as f64 / total;
            let observed = counts[label] as f64 / n as f64;
            assert!(
                (observed - expected).abs() < 0.02,
                "{}: observed {:.3}, expected {:.3}",
                label,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_four_to_one_ratio() {
        let set = WeightedTaskSet::new(vec![("conversation", 4), ("health", 1)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let conversations = (0..10_000)
            .filter(|_| set.pick(&mut rng) == "conversation")
            .count();
        assert!((7_700..=8_300).contains(&conversations), "{}", conversations);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let set = WeightedTaskSet::new(vec![(1, 1), (2, 1), (3, 1)]).unwrap();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let left: Vec<i32> = (0..100).map(|_| set.pick(&mut a)).collect();
        let right: Vec<i32> = (0..100).map(|_| set.pick(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(matches!(
            WeightedTaskSet::<&str>::new(vec![]),
            Err(SchedulerError::Empty)
        ));
        assert!(matches!(
            WeightedTaskSet::new(vec![("a", 0), ("b", 0)]),
            Err(SchedulerError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_pacing_stays_within_bounds() {
        let pacing = Pacing::between_secs(2.0, 5.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let delay = pacing.sample(&mut rng);
            assert!(delay >= pacing.min() && delay <= pacing.max(), "{:?}", delay);
        }
    }

    #[test]
    fn test_pacing_rejects_inverted_bounds() {
        assert!(Pacing::between_secs(3.0, 1.0).is_err());
        assert!(Pacing::between_secs(-1.0, 1.0).is_err());
        let fixed = Pacing::between_secs(1.0, 1.0).unwrap();
        assert_eq!(fixed.sample(&mut rand::thread_rng()), Duration::from_secs(1));
    }
}
