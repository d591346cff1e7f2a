/*!
Enumerates every co-optimal alignment recorded in a filled `CostMatrix`.
Starting from the final cell, every move in a cell's back-set is followed, so ties fan out into alternative histories.
Partial paths are memoized per cell and shared between all the cells that reach them.
*/

use itertools::Itertools;
use log::debug;
use rustc_hash::FxHashSet as HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::cost_matrix::{CostMatrix, Move};
use crate::segment::Correspondence;

/// A path from the origin to some cell, stored backwards as a linked list so that extensions share their prefix.
#[derive(Debug)]
struct PathNode {
    /// The move taken into the cell this node ends at
    mv: Move,
    /// The path leading up to the predecessor cell, None if the predecessor is the origin
    prev: Option<Rc<PathNode>>
}

/// All paths reaching one cell
type CellPaths = Vec<Option<Rc<PathNode>>>;

/// Returns every distinct correspondence sequence along a minimum cost path from (len(A), len(B)) to (0, 0).
/// Results are sorted, so the output is deterministic for fixed inputs.
/// Nothing is truncated: the number of paths can grow combinatorially with the number of tied cells, see `count_paths()`.
/// # Arguments
/// * `seq_a` - the sequence the matrix was filled with along x
/// * `seq_b` - the sequence the matrix was filled with along y
/// * `matrix` - the filled matrix
/// # Panics
/// * if the matrix dimensions do not match the sequences
pub fn backtrack<S>(seq_a: &[S], seq_b: &[S], matrix: &CostMatrix) -> Vec<Vec<Correspondence<S>>>
where
    S: Clone + Hash + Ord
{
    let (width, height) = matrix.dimensions();
    assert_eq!((width, height), (seq_a.len() + 1, seq_b.len() + 1), "matrix does not match the sequences");

    let mut memo: Vec<Option<CellPaths>> = vec![None; width * height];
    collect_paths(matrix, seq_a.len(), seq_b.len(), &mut memo);
    let end_paths = memo[matrix.index(seq_a.len(), seq_b.len())].take().unwrap_or_default();

    let num_paths = end_paths.len();
    let unique: HashSet<Vec<Correspondence<S>>> = end_paths.into_iter()
        .map(|path| to_correspondences(seq_a, seq_b, path))
        .collect();

    debug!("backtrack found {} paths, {} distinct", num_paths, unique.len());
    unique.into_iter().sorted().collect()
}

/// Fills in the memo entry for (x, y) after recursing into every predecessor in its back-set.
/// Results of different moves are alternatives, so they are unioned.
fn collect_paths(matrix: &CostMatrix, x: usize, y: usize, memo: &mut [Option<CellPaths>]) {
    let index = matrix.index(x, y);
    if memo[index].is_some() {
        return;
    }

    if x == 0 && y == 0 {
        // a single empty path
        memo[index] = Some(vec![None]);
        return;
    }

    let mut paths: CellPaths = vec![];
    for mv in matrix.back(x, y).iter() {
        let (dx, dy) = mv.offset();
        let (px, py) = (x - dx, y - dy);
        collect_paths(matrix, px, py, memo);

        if let Some(prev_paths) = memo[matrix.index(px, py)].as_ref() {
            paths.extend(prev_paths.iter().map(|prev| Some(Rc::new(PathNode {
                mv,
                prev: prev.clone()
            }))));
        }
    }
    memo[index] = Some(paths);
}

/// Walks a path backwards from the final cell and converts each move into its correspondence.
fn to_correspondences<S: Clone>(seq_a: &[S], seq_b: &[S], path: Option<Rc<PathNode>>) -> Vec<Correspondence<S>> {
    let mut corr = vec![];
    let (mut x, mut y) = (seq_a.len(), seq_b.len());
    let mut node = path;
    while let Some(n) = node {
        corr.push(n.mv.correspondence(seq_a, seq_b, x, y));
        let (dx, dy) = n.mv.offset();
        x -= dx;
        y -= dy;
        node = n.prev.clone();
    }
    assert_eq!((x, y), (0, 0));
    corr.reverse();
    corr
}

/// Counts the minimum cost paths from the final cell to the origin without building them.
/// This is cheap, so callers can check it before enumerating with `backtrack()`.
/// The count saturates at `u128::MAX`.
pub fn count_paths(matrix: &CostMatrix) -> u128 {
    let (width, height) = matrix.dimensions();
    let mut counts: Vec<u128> = vec![0; width * height];

    // same order as the fill, so every predecessor is counted before it is needed
    for x in 0..width {
        for y in 0..height {
            let index = matrix.index(x, y);
            if x == 0 && y == 0 {
                counts[index] = 1;
                continue;
            }
            let count = matrix.back(x, y).iter()
                .map(|mv| {
                    let (dx, dy) = mv.offset();
                    counts[matrix.index(x - dx, y - dy)]
                })
                .fold(0, |acc: u128, c| acc.saturating_add(c));
            counts[index] = count;
        }
    }

    counts[width * height - 1]
}
