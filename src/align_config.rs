/*!
Contains configuration information for the aligner.
Typical usage is to use the builder to construct the config, e.g.
```
use phon_align::align_config::{AlignAlgorithm, AlignConfig, AlignConfigBuilder};
let config: AlignConfig = AlignConfigBuilder::default()
    .algorithm(AlignAlgorithm::Merge)
    .build()
    .unwrap();
```
*/

use simple_error::SimpleError;
use std::fmt;
use std::str::FromStr;

use crate::cost_matrix::Move;

/// Enumeration of the alignment algorithms, which only differ in their move set.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum AlignAlgorithm {
    /// Needleman-Wunsch style: delete, insert, and substitute
    #[default]
    Standard,
    /// Standard moves plus one-to-two and two-to-one correspondences, modeling merges and splits
    Merge
}

impl AlignAlgorithm {
    /// Every algorithm, sorted by name
    pub const ALL: [AlignAlgorithm; 2] = [AlignAlgorithm::Merge, AlignAlgorithm::Standard];

    /// The moves a cell may be entered with
    pub fn moves(&self) -> &'static [Move] {
        match self {
            AlignAlgorithm::Standard => &[Move::Delete, Move::Insert, Move::Match],
            AlignAlgorithm::Merge => &Move::ALL
        }
    }

    /// The name used for lookups
    pub fn name(&self) -> &'static str {
        match self {
            AlignAlgorithm::Standard => "standard",
            AlignAlgorithm::Merge => "merge"
        }
    }
}

impl fmt::Display for AlignAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AlignAlgorithm {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlignAlgorithm::ALL.into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| SimpleError::new(format!("Unknown alignment algorithm {s:?}, expected one of {:?}", list_algorithms())))
    }
}

/// Returns the names of all available algorithms, sorted
pub fn list_algorithms() -> Vec<&'static str> {
    AlignAlgorithm::ALL.iter().map(|a| a.name()).collect()
}

/**
Contains configuration information for the aligner.
Typical usage is to use the builder to construct the config, e.g.
```
use phon_align::align_config::{AlignAlgorithm, AlignConfig, AlignConfigBuilder};
let config: AlignConfig = AlignConfigBuilder::default()
    .algorithm(AlignAlgorithm::Merge)
    .tie_tolerance(1e-9)
    .build()
    .unwrap();
```
*/
#[derive(derive_builder::Builder, Clone, Debug)]
#[builder(default)]
pub struct AlignConfig {
    /// The move set to align with
    pub algorithm: AlignAlgorithm,
    /// Moves whose cumulative cost is within this much of a cell's minimum are treated as ties.
    /// Must be non-negative; 0.0 means exact equality.
    /// When positive, alignments are re-scored and may cost more than the minimum.
    pub tie_tolerance: f64
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            // merges are opt-in
            algorithm: AlignAlgorithm::Standard,
            // exact comparison, anything else changes which alignments count as co-optimal
            tie_tolerance: 0.0
        }
    }
}
