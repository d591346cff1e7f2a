/*!
The dynamic programming table shared by both alignment algorithms.
Each cell holds the minimum cumulative cost of aligning two prefixes and the full set of moves that reach that minimum.
Ties are kept, since each tied move may lead to a different optimal alignment.
*/

use log::{debug, trace};
use simple_error::bail;
use std::fmt;

use crate::cost_functions::{Cost, CostFunction};
use crate::segment::{Correspondence, Segment};

/// A single step into a cell of the table.
/// Conceptually, sequence A runs along the x-axis and sequence B along the y-axis.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Move {
    /// One symbol of A against a gap
    Delete,
    /// A gap against one symbol of B
    Insert,
    /// One symbol of A against one symbol of B, this is also the tag of the origin cell
    Match,
    /// One symbol of A against two consecutive symbols of B
    SplitA,
    /// Two consecutive symbols of A against one symbol of B
    SplitB
}

impl Move {
    /// All moves, in the order they are iterated within a back-set
    pub const ALL: [Move; 5] = [Move::Delete, Move::Insert, Move::Match, Move::SplitA, Move::SplitB];

    /// Returns the number of symbols consumed from (A, B), i.e. how far back the predecessor cell is
    pub fn offset(&self) -> (usize, usize) {
        match self {
            Move::Delete => (1, 0),
            Move::Insert => (0, 1),
            Move::Match => (1, 1),
            Move::SplitA => (1, 2),
            Move::SplitB => (2, 1)
        }
    }

    /// Returns true if this move can enter cell (x, y), i.e. the predecessor exists
    pub fn applies(&self, x: usize, y: usize) -> bool {
        let (dx, dy) = self.offset();
        x >= dx && y >= dy
    }

    /// Returns the correspondence produced by taking this move into cell (x, y).
    /// # Panics
    /// * if the move does not apply at (x, y) or (x, y) is outside the sequences
    pub fn correspondence<S: Clone>(&self, seq_a: &[S], seq_b: &[S], x: usize, y: usize) -> Correspondence<S> {
        let (dx, dy) = self.offset();
        (Segment::from_slice(&seq_a[x-dx..x]), Segment::from_slice(&seq_b[y-dy..y]))
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

/// The set of moves that achieve a cell's minimum cost
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct BackSet(u8);

impl BackSet {
    /// Creates a set containing a single move
    pub fn single(mv: Move) -> BackSet {
        BackSet(mv.bit())
    }

    pub fn insert(&mut self, mv: Move) {
        self.0 |= mv.bit();
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.0 & mv.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the contained moves in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        Move::ALL.into_iter().filter(|mv| self.contains(*mv))
    }
}

impl fmt::Debug for BackSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Move> for BackSet {
    fn from_iter<T: IntoIterator<Item = Move>>(iter: T) -> Self {
        let mut back = BackSet::default();
        for mv in iter {
            back.insert(mv);
        }
        back
    }
}

/// One cell of the table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatrixCell {
    /// Minimum cumulative cost to align the two prefixes
    pub cost: Cost,
    /// Every move that achieves `cost`
    pub back: BackSet
}

impl MatrixCell {
    /// The fixed base case at (0, 0)
    fn origin() -> MatrixCell {
        MatrixCell {
            cost: 0.0,
            back: BackSet::single(Move::Match)
        }
    }
}

/// Dense (len(A)+1) x (len(B)+1) table of cells, stored row-major by x.
/// A cell at (x, y) only ever depends on cells with x' <= x and y' <= y, so a single pass in increasing order fills it.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    /// len(A) + 1
    width: usize,
    /// len(B) + 1
    height: usize,
    /// All cells, index is x * height + y
    cells: Vec<MatrixCell>
}

impl CostMatrix {
    /// Fills a complete table for two sequences.
    /// For every cell, each applicable move in `moves` proposes a cost and the minimum wins; every move within `tie_tolerance` of that minimum joins the back-set.
    /// With a `tie_tolerance` of 0.0, only exactly equal costs tie.
    /// # Arguments
    /// * `seq_a` - the first sequence, consumed along x
    /// * `seq_b` - the second sequence, consumed along y
    /// * `moves` - the move set of the algorithm; must contain Delete and Insert for the edges to be reachable
    /// * `cost_fn` - scores each candidate move
    /// * `tie_tolerance` - non-negative slack for tie detection
    /// # Errors
    /// * if `tie_tolerance` is negative or NaN
    /// * if no move in `moves` can reach some cell
    /// * if `cost_fn` fails, the error is returned as-is
    pub fn fill<S, C>(seq_a: &[S], seq_b: &[S], moves: &[Move], cost_fn: &C, tie_tolerance: Cost) -> Result<CostMatrix, Box<dyn std::error::Error>>
    where
        S: Clone,
        C: CostFunction<S> + ?Sized
    {
        if !(tie_tolerance >= 0.0) {
            bail!("tie_tolerance must be non-negative, got {}", tie_tolerance);
        }

        let width = seq_a.len() + 1;
        let height = seq_b.len() + 1;
        let mut cells: Vec<MatrixCell> = Vec::with_capacity(width * height);

        for x in 0..width {
            for y in 0..height {
                if x == 0 && y == 0 {
                    cells.push(MatrixCell::origin());
                    continue;
                }

                // every proposal, indexed by the move discriminant
                let mut proposed: [Option<Cost>; 5] = [None; 5];
                let mut min_cost: Option<Cost> = None;
                for &mv in moves.iter() {
                    if !mv.applies(x, y) {
                        continue;
                    }

                    let (dx, dy) = mv.offset();
                    let (seg_a, seg_b) = mv.correspondence(seq_a, seq_b, x, y);
                    let step_cost = cost_fn.cost(&seg_a, &seg_b)?;
                    let total = cells[(x-dx) * height + (y-dy)].cost + step_cost;

                    proposed[mv as usize] = Some(total);
                    min_cost = Some(match min_cost {
                        Some(current) if current <= total => current,
                        _ => total
                    });
                }

                let cost = match min_cost {
                    Some(c) => c,
                    None => bail!("No move in {:?} reaches cell ({}, {})", moves, x, y)
                };

                let back: BackSet = Move::ALL.into_iter()
                    .filter(|&mv| match proposed[mv as usize] {
                        Some(total) if tie_tolerance == 0.0 => total == cost,
                        Some(total) => total - cost <= tie_tolerance,
                        None => false
                    })
                    .collect();

                trace!("({}, {}) => {} {:?}", x, y, cost, back);
                cells.push(MatrixCell { cost, back });
            }
        }

        let matrix = CostMatrix { width, height, cells };
        debug!("filled {}x{} cost matrix, total cost {}", width, height, matrix.total_cost());
        Ok(matrix)
    }

    /// Returns (len(A)+1, len(B)+1)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Flat index of cell (x, y)
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "cell ({x}, {y}) is outside {}x{}", self.width, self.height);
        x * self.height + y
    }

    pub fn cell(&self, x: usize, y: usize) -> &MatrixCell {
        &self.cells[self.index(x, y)]
    }

    pub fn cost(&self, x: usize, y: usize) -> Cost {
        self.cell(x, y).cost
    }

    pub fn back(&self, x: usize, y: usize) -> BackSet {
        self.cell(x, y).back
    }

    /// The cost of aligning both full sequences, i.e. the cost of every co-optimal alignment
    pub fn total_cost(&self) -> Cost {
        self.cost(self.width - 1, self.height - 1)
    }
}
