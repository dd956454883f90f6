//! # Dice Rolling
//!
//! Random draw primitives shared by every generation phase.
//!
//! All randomness in the crate flows through [`DiceRoller`], which owns a
//! seeded `StdRng`. Each operation consumes exactly one uniform draw, so a
//! given seed replays the same sequence of decisions across runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random source for dungeon generation.
///
/// Wraps a `StdRng` and exposes the draw operations the pipeline needs:
/// uniform and biased integer ranges, probability checks, and weighted
/// category picks. Construct with [`DiceRoller::seeded`] for reproducible
/// runs, or [`DiceRoller::from_rng`] to inject a prepared source.
///
/// # Examples
///
/// ```
/// use delve::DiceRoller;
///
/// let mut a = DiceRoller::seeded(7);
/// let mut b = DiceRoller::seeded(7);
/// assert_eq!(a.int(1, 100), b.int(1, 100));
/// ```
#[derive(Debug, Clone)]
pub struct DiceRoller {
    rng: StdRng,
}

impl DiceRoller {
    /// Creates a roller seeded from a `u64`, matching `StdRng::seed_from_u64`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a roller from an existing `StdRng`.
    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Draws a uniform `f64` in `[0, 1)`. Every other operation is built on
    /// this single draw.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws a uniform integer in `[min, max]` inclusive.
    ///
    /// Returns `min` when the range is empty or inverted.
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f64;
        let value = min + (self.unit() * span) as i32;
        value.min(max)
    }

    /// Draws an integer in `[min, max]` skewed by `bias` in `[-1, 1]`.
    ///
    /// A positive bias favors the top of the range, a negative bias the
    /// bottom, via a power curve on the unit draw: `t' = t^e` with
    /// `e = 1 / (1 + 2·bias)` for positive bias and `e = 1 + 2·|bias|`
    /// otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::DiceRoller;
    ///
    /// let mut dice = DiceRoller::seeded(3);
    /// let n = dice.biased_int(2, 8, 0.5);
    /// assert!((2..=8).contains(&n));
    /// ```
    pub fn biased_int(&mut self, min: i32, max: i32, bias: f64) -> i32 {
        if max <= min {
            return min;
        }
        let bias = bias.clamp(-1.0, 1.0);
        let exponent = if bias > 0.0 {
            1.0 / (1.0 + 2.0 * bias)
        } else {
            1.0 + 2.0 * bias.abs()
        };
        let t = self.unit().powf(exponent);
        let span = (max - min + 1) as f64;
        let value = min + (t * span) as i32;
        value.min(max)
    }

    /// Returns `true` with probability `p`. Values outside `[0, 1]` clamp to
    /// always-false / always-true.
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.unit() < p
    }

    /// Picks an index with probability proportional to its weight.
    ///
    /// Weights are normalized internally; non-positive entries contribute
    /// nothing. If the weights sum to zero the pick degenerates to uniform.
    pub fn weighted_pick(&mut self, weights: &[f64]) -> usize {
        debug_assert!(!weights.is_empty(), "weighted_pick on empty weights");
        if weights.is_empty() {
            return 0;
        }
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return self.int(0, weights.len() as i32 - 1) as usize;
        }
        let mut target = self.unit() * total;
        for (index, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            target -= weight;
            if target < 0.0 {
                return index;
            }
        }
        weights.len() - 1
    }

    /// Picks a uniform element from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.int(0, items.len() as i32 - 1) as usize;
        items.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_stays_in_bounds() {
        let mut dice = DiceRoller::seeded(1);
        for _ in 0..1000 {
            let n = dice.int(3, 9);
            assert!((3..=9).contains(&n));
        }
    }

    #[test]
    fn test_int_degenerate_range() {
        let mut dice = DiceRoller::seeded(1);
        assert_eq!(dice.int(5, 5), 5);
        assert_eq!(dice.int(7, 2), 7);
    }

    #[test]
    fn test_determinism_per_seed() {
        let mut a = DiceRoller::seeded(99);
        let mut b = DiceRoller::seeded(99);
        let draws_a: Vec<i32> = (0..50).map(|_| a.int(0, 1000)).collect();
        let draws_b: Vec<i32> = (0..50).map(|_| b.int(0, 1000)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_biased_int_skews_toward_max() {
        let mut dice = DiceRoller::seeded(42);
        let samples = 4000;
        let high: f64 = (0..samples)
            .map(|_| dice.biased_int(0, 10, 0.8) as f64)
            .sum::<f64>()
            / samples as f64;
        let low: f64 = (0..samples)
            .map(|_| dice.biased_int(0, 10, -0.8) as f64)
            .sum::<f64>()
            / samples as f64;
        assert!(
            high > low + 1.0,
            "positive bias mean {} should exceed negative bias mean {}",
            high,
            low
        );
    }

    #[test]
    fn test_chance_extremes() {
        let mut dice = DiceRoller::seeded(5);
        for _ in 0..100 {
            assert!(!dice.chance(0.0));
            assert!(dice.chance(1.0));
        }
    }

    #[test]
    fn test_weighted_pick_respects_zero_weights() {
        let mut dice = DiceRoller::seeded(11);
        for _ in 0..500 {
            let index = dice.weighted_pick(&[0.0, 1.0, 0.0]);
            assert_eq!(index, 1);
        }
    }

    #[test]
    fn test_weighted_pick_rough_proportions() {
        let mut dice = DiceRoller::seeded(23);
        let weights = [2.0, 2.0, 1.0, 1.0];
        let mut counts = [0usize; 4];
        let samples = 6000;
        for _ in 0..samples {
            counts[dice.weighted_pick(&weights)] += 1;
        }
        let share = |i: usize| counts[i] as f64 / samples as f64;
        assert!((share(0) - 0.33).abs() < 0.05);
        assert!((share(1) - 0.33).abs() < 0.05);
        assert!((share(2) - 0.17).abs() < 0.05);
        assert!((share(3) - 0.17).abs() < 0.05);
    }

    #[test]
    fn test_pick_empty_slice() {
        let mut dice = DiceRoller::seeded(1);
        let empty: [u8; 0] = [];
        assert!(dice.pick(&empty).is_none());
    }
}
