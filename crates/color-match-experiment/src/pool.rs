//! Per-group pool of candidate colors, sampled without replacement.
//!
//! Each group of trials draws from a fresh 54-color pool spanning a fixed
//! 6×3×3 HSB grid. The pool shrinks by one on every sample and is rebuilt
//! at each group transition.

use rand::Rng;

use crate::color::ColorSwatch;
use crate::error::EmptyPoolError;

/// Hues of the candidate grid, in degrees.
pub const POOL_HUES: [f64; 6] = [60.0, 120.0, 180.0, 240.0, 300.0, 360.0];
/// Saturation steps of the candidate grid, as percentages.
pub const POOL_SATURATIONS: [f64; 3] = [33.3, 66.7, 99.9];
/// Brightness steps of the candidate grid, as percentages.
pub const POOL_BRIGHTNESSES: [f64; 3] = [33.3, 66.7, 99.9];

/// Number of swatches in a freshly built pool.
pub const POOL_SIZE: usize = POOL_HUES.len() * POOL_SATURATIONS.len() * POOL_BRIGHTNESSES.len();

/// The set of not-yet-drawn candidate colors for the current group.
///
/// This is the single authoritative pool instance; any UI echo of the
/// remaining count reads through [`ColorPool::remaining`] rather than
/// keeping a parallel copy.
#[derive(Debug, Clone)]
pub struct ColorPool {
    colors: Vec<ColorSwatch>,
}

impl ColorPool {
    /// Build the full 54-element pool. Enumeration order is irrelevant
    /// since consumption is randomized.
    pub fn new() -> Self {
        let mut colors = Vec::with_capacity(POOL_SIZE);
        for &h in &POOL_HUES {
            for &s in &POOL_SATURATIONS {
                for &b in &POOL_BRIGHTNESSES {
                    colors.push(ColorSwatch::new(h, s, b));
                }
            }
        }
        Self { colors }
    }

    /// Draw one swatch uniformly at random among the remaining candidates,
    /// removing it from the pool.
    pub fn sample(&mut self, rng: &mut impl Rng) -> Result<ColorSwatch, EmptyPoolError> {
        if self.colors.is_empty() {
            return Err(EmptyPoolError);
        }
        let index = rng.random_range(0..self.colors.len());
        Ok(self.colors.swap_remove(index))
    }

    /// Discard the current pool and refill it. Called exactly once per
    /// group transition.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of swatches not yet drawn.
    pub fn remaining(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fresh_pool_spans_the_grid() {
        let pool = ColorPool::new();
        assert_eq!(pool.remaining(), 54);

        // Every grid point appears exactly once.
        for &h in &POOL_HUES {
            for &s in &POOL_SATURATIONS {
                for &b in &POOL_BRIGHTNESSES {
                    let expected = ColorSwatch::new(h, s, b);
                    let count = pool.colors.iter().filter(|c| **c == expected).count();
                    assert_eq!(count, 1, "swatch {expected} should appear once");
                }
            }
        }
    }

    #[test]
    fn test_sample_decrements_and_never_repeats() {
        let mut pool = ColorPool::new();
        let mut rng = StdRng::seed_from_u64(42);

        let mut drawn = Vec::new();
        for i in 0..54 {
            assert_eq!(pool.remaining(), 54 - i);
            let swatch = pool.sample(&mut rng).unwrap();
            assert!(
                !drawn.contains(&swatch),
                "swatch {swatch} drawn twice"
            );
            drawn.push(swatch);
        }

        assert!(pool.is_empty());
    }

    #[test]
    fn test_sample_on_empty_pool_fails() {
        let mut pool = ColorPool::new();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..54 {
            pool.sample(&mut rng).unwrap();
        }
        assert_eq!(pool.sample(&mut rng), Err(EmptyPoolError));
    }

    #[test]
    fn test_reset_refills_the_pool() {
        let mut pool = ColorPool::new();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            pool.sample(&mut rng).unwrap();
        }
        assert_eq!(pool.remaining(), 34);

        pool.reset();
        assert_eq!(pool.remaining(), 54);
    }

    #[test]
    fn test_sampling_is_reproducible_with_seed() {
        let mut pool1 = ColorPool::new();
        let mut pool2 = ColorPool::new();
        let mut rng1 = StdRng::seed_from_u64(12345);
        let mut rng2 = StdRng::seed_from_u64(12345);

        for _ in 0..54 {
            assert_eq!(pool1.sample(&mut rng1), pool2.sample(&mut rng2));
        }
    }

    #[test]
    fn test_different_seeds_produce_different_orders() {
        let mut pool1 = ColorPool::new();
        let mut pool2 = ColorPool::new();
        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(2);

        let order1: Vec<_> = (0..54).map(|_| pool1.sample(&mut rng1).unwrap()).collect();
        let order2: Vec<_> = (0..54).map(|_| pool2.sample(&mut rng2).unwrap()).collect();

        // Different seeds should diverge somewhere (overwhelmingly likely).
        assert_ne!(order1, order2);
    }
}
