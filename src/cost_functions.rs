/*!
Cost providers for the aligner.
The aligner only ever sees the `CostFunction` trait; any `Fn(&Segment<S>, &Segment<S>) -> Cost` is one.
A few simple providers are included here, e.g.:
```
use phon_align::cost_functions::{CostFunction, MismatchCost};
use phon_align::segment::Segment;
let cost_fn = MismatchCost::default();
assert_eq!(cost_fn.cost(&Segment::Single('a'), &Segment::Single('a')).unwrap(), 0.0);
assert_eq!(cost_fn.cost(&Segment::Single('a'), &Segment::Gap).unwrap(), 1.0);
```
*/

use log::warn;
use rustc_hash::FxHashMap as HashMap;
use simple_error::bail;
use std::fmt::Debug;
use std::hash::Hash;

use crate::segment::Segment;

/// Numeric cost type, lower is better
pub type Cost = f64;

/// Anything that can score one side against the other.
/// `Segment::Gap` is passed for indels and `Segment::Pair` for merges or splits.
/// Costs should be finite; NaN or infinite values make the minimum undefined and are not checked by the aligner.
pub trait CostFunction<S> {
    /// Returns the cost of corresponding `a` with `b`.
    /// # Errors
    /// * if the provider cannot score this combination; the aligner passes the error through unchanged
    fn cost(&self, a: &Segment<S>, b: &Segment<S>) -> Result<Cost, Box<dyn std::error::Error>>;
}

impl<S, F> CostFunction<S> for F
where
    F: Fn(&Segment<S>, &Segment<S>) -> Cost
{
    fn cost(&self, a: &Segment<S>, b: &Segment<S>) -> Result<Cost, Box<dyn std::error::Error>> {
        Ok(self(a, b))
    }
}

/// Equality based cost: segments are compared whole, so a merged pair never equals a single symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MismatchCost {
    /// Cost when both sides are equal
    pub matched: Cost,
    /// Cost when both sides are different
    pub mismatched: Cost,
    /// Cost when either side is a gap
    pub gap: Cost
}

impl Default for MismatchCost {
    fn default() -> Self {
        // plain edit distance
        Self {
            matched: 0.0,
            mismatched: 1.0,
            gap: 1.0
        }
    }
}

impl<S: PartialEq> CostFunction<S> for MismatchCost {
    fn cost(&self, a: &Segment<S>, b: &Segment<S>) -> Result<Cost, Box<dyn std::error::Error>> {
        Ok(if a.is_gap() || b.is_gap() {
            self.gap
        } else if a == b {
            self.matched
        } else {
            self.mismatched
        })
    }
}

/// One-hot style delta: -1 for identical segments, 1 for anything else, including gaps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UnitCost;

impl<S: PartialEq> CostFunction<S> for UnitCost {
    fn cost(&self, a: &Segment<S>, b: &Segment<S>) -> Result<Cost, Box<dyn std::error::Error>> {
        if a.is_gap() || b.is_gap() || a != b {
            Ok(1.0)
        } else {
            Ok(-1.0)
        }
    }
}

/// What a `LookupCost` does with a combination that is not in its table
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum UnknownPolicy {
    /// Return an error, which aborts the alignment
    #[default]
    Fail,
    /// Log a warning and use this cost instead
    Default(Cost)
}

/// Table driven cost, e.g. from a precomputed phoneme distance table.
/// Lookups are symmetric: an entry for (a, b) also scores (b, a).
#[derive(Clone, Debug)]
pub struct LookupCost<S: Eq + Hash> {
    /// Explicit entries
    table: HashMap<(Segment<S>, Segment<S>), Cost>,
    /// Cost of any correspondence with a gap
    gap: Cost,
    /// If set, identical segments get this cost without a table entry
    identity: Option<Cost>,
    /// Handling of combinations missing from the table
    unknown: UnknownPolicy
}

impl<S: Clone + Debug + Eq + Hash> LookupCost<S> {
    /// Creates an empty table.
    /// # Arguments
    /// * `gap` - the cost of any indel
    /// * `unknown` - what to do when a combination is missing
    pub fn new(gap: Cost, unknown: UnknownPolicy) -> LookupCost<S> {
        LookupCost {
            table: Default::default(),
            gap,
            identity: None,
            unknown
        }
    }

    /// Sets a cost that applies to every pair of identical segments
    pub fn with_identity(mut self, identity: Cost) -> LookupCost<S> {
        self.identity = Some(identity);
        self
    }

    /// Adds or replaces an entry; the reversed combination is covered too.
    pub fn insert(&mut self, a: Segment<S>, b: Segment<S>, cost: Cost) {
        self.table.insert((a, b), cost);
    }

    /// Returns the number of explicit entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn lookup(&self, a: &Segment<S>, b: &Segment<S>) -> Option<Cost> {
        // the key owns its segments, so a lookup needs cloned segments
        let key = (a.clone(), b.clone());
        if let Some(&c) = self.table.get(&key) {
            return Some(c);
        }
        let (a, b) = key;
        self.table.get(&(b, a)).cloned()
    }
}

impl<S: Clone + Debug + Eq + Hash> CostFunction<S> for LookupCost<S> {
    fn cost(&self, a: &Segment<S>, b: &Segment<S>) -> Result<Cost, Box<dyn std::error::Error>> {
        if a.is_gap() || b.is_gap() {
            return Ok(self.gap);
        }

        if let Some(c) = self.lookup(a, b) {
            return Ok(c);
        }

        match (self.identity, self.unknown) {
            (Some(identity), _) if a == b => Ok(identity),
            (_, UnknownPolicy::Default(default)) => {
                warn!("No cost entry for {:?} / {:?}, using {}", a, b, default);
                Ok(default)
            },
            (_, UnknownPolicy::Fail) => {
                bail!("No cost entry for {:?} / {:?}", a, b);
            }
        }
    }
}

/// Wraps a cost function so that its arguments are swapped, i.e. `f'(a, b) = f(b, a)`.
/// Aligning (B, A) with the swapped function mirrors aligning (A, B) with the original.
#[derive(Clone, Copy, Debug, Default)]
pub struct Swapped<C>(pub C);

impl<S, C: CostFunction<S>> CostFunction<S> for Swapped<C> {
    fn cost(&self, a: &Segment<S>, b: &Segment<S>) -> Result<Cost, Box<dyn std::error::Error>> {
        self.0.cost(b, a)
    }
}
