//! Background color pairs and their per-session schedule.
//!
//! Six fixed left/right background pairs are derived from three base HSB
//! triples (a light, a mid, and a dark near-neutral blue). The pairs are
//! shuffled once per session and then looked up by group index.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::color::hsb_to_hsl;
use crate::error::OutOfRangeError;

/// The three base HSB triples the pairs are built from.
const LIGHT: (f64, f64, f64) = (240.0, 2.0, 97.0);
const DARK: (f64, f64, f64) = (240.0, 3.0, 11.0);
const MID: (f64, f64, f64) = (240.0, 3.0, 57.0);

/// Left and right background colors for one group, as CSS `hsl(...)` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackgroundPair {
    pub left: String,
    pub right: String,
}

fn css(triple: (f64, f64, f64)) -> String {
    hsb_to_hsl(triple.0, triple.1, triple.2).to_string()
}

/// Compute the six fixed background pairs: every ordered pairing of the
/// three base triples.
pub fn build_pairs() -> Vec<BackgroundPair> {
    [
        (LIGHT, DARK),
        (LIGHT, MID),
        (MID, DARK),
        (MID, LIGHT),
        (DARK, MID),
        (DARK, LIGHT),
    ]
    .into_iter()
    .map(|(left, right)| BackgroundPair {
        left: css(left),
        right: css(right),
    })
    .collect()
}

/// The session's shuffled background schedule, indexed by group number.
#[derive(Debug, Clone)]
pub struct BackgroundSchedule {
    pairs: Vec<BackgroundPair>,
}

impl BackgroundSchedule {
    /// Build the fixed pairs and shuffle them once. The schedule length
    /// equals the number of groups.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut pairs = build_pairs();
        pairs.shuffle(rng);
        Self { pairs }
    }

    /// Background pair for the given group index.
    pub fn pair_for_group(&self, index: usize) -> Result<&BackgroundPair, OutOfRangeError> {
        self.pairs.get(index).ok_or(OutOfRangeError {
            index,
            len: self.pairs.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
