/*!
The two alignment algorithms, which share the same table and backtracking and only differ in their move set.
Both return the full set of co-optimal alignments, not just one of them.
```
use phon_align::alignment::{align_merge, align_standard};
use phon_align::cost_functions::MismatchCost;
use phon_align::segment::Segment;

let word_a = ['з', 'а', 'м', 'б'];
let word_b = ['з', 'ъ', 'б'];

// two ways to line these up with plain edits
let alignments = align_standard(&word_a, &word_b, &MismatchCost::default()).unwrap();
assert_eq!(alignments.len(), 2);
assert_eq!(alignments[0].cost(), 2.0);

// one way if "ам" can merge into "ъ"
let alignments = align_merge(&word_a, &word_b, &MismatchCost::default()).unwrap();
assert_eq!(alignments.len(), 1);
assert_eq!(alignments[0].corr()[1], (Segment::Pair('а', 'м'), Segment::Single('ъ')));
```
*/

use itertools::Itertools;
use log::debug;
use std::fmt;
use std::hash::Hash;

use crate::align_config::{AlignAlgorithm, AlignConfig};
use crate::backtrack::backtrack;
use crate::cost_functions::{Cost, CostFunction};
use crate::cost_matrix::CostMatrix;
use crate::segment::{Correspondence, Segment};

/// Contains a single co-optimal alignment
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment<S> {
    /// Total cost of the alignment, i.e. the sum of the cost function over `corr`
    cost: Cost,
    /// Correspondences from the start of both sequences to the end
    corr: Vec<Correspondence<S>>
}

impl<S> Alignment<S> {
    /// Constructor
    pub fn new(cost: Cost, corr: Vec<Correspondence<S>>) -> Alignment<S> {
        Alignment {
            cost,
            corr
        }
    }

    // Getters
    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn corr(&self) -> &[Correspondence<S>] {
        &self.corr
    }

    pub fn into_corr(self) -> Vec<Correspondence<S>> {
        self.corr
    }

    /// Returns the same alignment with the two sides swapped
    pub fn mirrored(self) -> Alignment<S> {
        Alignment {
            cost: self.cost,
            corr: self.corr.into_iter().map(|(a, b)| (b, a)).collect()
        }
    }
}

impl<S: Clone> Alignment<S> {
    /// Reconstructs sequence A by concatenating the left side of every correspondence
    pub fn sequence_a(&self) -> Vec<S> {
        self.corr.iter()
            .flat_map(|(a, _)| a.symbols())
            .cloned()
            .collect()
    }

    /// Reconstructs sequence B by concatenating the right side of every correspondence
    pub fn sequence_b(&self) -> Vec<S> {
        self.corr.iter()
            .flat_map(|(_, b)| b.symbols())
            .cloned()
            .collect()
    }
}

/// Two tab-separated rows, A on top and B below, with `-` for gaps
impl<S: fmt::Display> fmt::Display for Alignment<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.corr.iter().map(|(a, _)| a).join("\t"))?;
        write!(f, "{}", self.corr.iter().map(|(_, b)| b).join("\t"))
    }
}

/// Aligns two sequences with the standard delete/insert/substitute moves, returning every co-optimal global alignment.
/// The cost function receives `Segment::Gap` on one side for indels.
/// Symbols must be `Ord` as well as `Hash` so the results can be returned in a fixed, sorted order.
/// # Arguments
/// * `seq_a` - the first sequence
/// * `seq_b` - the second sequence
/// * `cost_fn` - the cost of each correspondence, lower is better
/// # Errors
/// * if `cost_fn` fails, the error is passed through
pub fn align_standard<S, C>(seq_a: &[S], seq_b: &[S], cost_fn: &C) -> Result<Vec<Alignment<S>>, Box<dyn std::error::Error>>
where
    S: Clone + Hash + Ord,
    C: CostFunction<S> + ?Sized
{
    let config = AlignConfig {
        algorithm: AlignAlgorithm::Standard,
        ..Default::default()
    };
    align(seq_a, seq_b, cost_fn, &config)
}

/// Aligns two sequences allowing merges and splits in addition to the standard moves, returning every co-optimal global alignment.
/// The cost function must also handle `Segment::Pair` on either side.
/// Symbols must be `Ord` as well as `Hash` so the results can be returned in a fixed, sorted order.
/// # Arguments
/// * `seq_a` - the first sequence
/// * `seq_b` - the second sequence
/// * `cost_fn` - the cost of each correspondence, lower is better
/// # Errors
/// * if `cost_fn` fails, the error is passed through
pub fn align_merge<S, C>(seq_a: &[S], seq_b: &[S], cost_fn: &C) -> Result<Vec<Alignment<S>>, Box<dyn std::error::Error>>
where
    S: Clone + Hash + Ord,
    C: CostFunction<S> + ?Sized
{
    let config = AlignConfig {
        algorithm: AlignAlgorithm::Merge,
        ..Default::default()
    };
    align(seq_a, seq_b, cost_fn, &config)
}

/// Aligns two sequences as described by `config`.
/// The result is the set of co-optimal alignments, deduplicated and sorted by their correspondences.
/// Symbols must be `Ord` as well as `Hash` so the results can be returned in a fixed, sorted order.
/// With the default exact tie detection, all of them carry the minimum total cost.
/// With a positive `tie_tolerance`, near-ties are followed too, so each alignment is re-scored and costs may differ; slack can add up along a path.
/// # Arguments
/// * `seq_a` - the first sequence
/// * `seq_b` - the second sequence
/// * `cost_fn` - the cost of each correspondence, lower is better
/// * `config` - algorithm and tie handling
/// # Errors
/// * if the config is invalid
/// * if `cost_fn` fails, the error is passed through
pub fn align<S, C>(seq_a: &[S], seq_b: &[S], cost_fn: &C, config: &AlignConfig) -> Result<Vec<Alignment<S>>, Box<dyn std::error::Error>>
where
    S: Clone + Hash + Ord,
    C: CostFunction<S> + ?Sized
{
    let matrix = CostMatrix::fill(seq_a, seq_b, config.algorithm.moves(), cost_fn, config.tie_tolerance)?;
    let cost = matrix.total_cost();

    let alignments: Vec<Alignment<S>> = if config.tie_tolerance == 0.0 {
        backtrack(seq_a, seq_b, &matrix).into_iter()
            .map(|corr| Alignment::new(cost, corr))
            .collect()
    } else {
        // near-ties do not reach the cell minimum, so every path has to be scored on its own
        backtrack(seq_a, seq_b, &matrix).into_iter()
            .map(|corr| Ok(Alignment::new(score(&corr, cost_fn)?, corr)))
            .collect::<Result<_, Box<dyn std::error::Error>>>()?
    };

    debug!("{} alignment of {}x{}: {} co-optimal at cost {}", config.algorithm, seq_a.len(), seq_b.len(), alignments.len(), cost);
    Ok(alignments)
}

/// Sums the cost function over a correspondence sequence, in order from the start.
/// Along an exactly optimal path this reproduces the table's total cost.
/// # Errors
/// * if `cost_fn` fails, the error is passed through
pub fn score<S, C>(corr: &[Correspondence<S>], cost_fn: &C) -> Result<Cost, Box<dyn std::error::Error>>
where
    C: CostFunction<S> + ?Sized
{
    let mut total: Cost = 0.0;
    for (a, b) in corr.iter() {
        total += cost_fn.cost(a, b)?;
    }
    Ok(total)
}

/// Returns the correspondences of `seq` as sequence A against an empty sequence B
pub fn all_deletes<S: Clone>(seq: &[S]) -> Vec<Correspondence<S>> {
    seq.iter()
        .map(|s| (Segment::Single(s.clone()), Segment::Gap))
        .collect()
}

/// Returns the correspondences of an empty sequence A against `seq` as sequence B
pub fn all_inserts<S: Clone>(seq: &[S]) -> Vec<Correspondence<S>> {
    seq.iter()
        .map(|s| (Segment::Gap, Segment::Single(s.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use crate::align_config::AlignConfigBuilder;
    use crate::cost_functions::{LookupCost, MismatchCost, Swapped, UnitCost, UnknownPolicy};
    use crate::example_gen::generate_pair;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn single(c: char) -> Segment<char> {
        Segment::Single(c)
    }

    /// Textbook two-row Levenshtein distance to compare against
    fn levenshtein(a: &[u8], b: &[u8]) -> usize {
        let mut prev_row: Vec<usize> = (0..=b.len()).collect();
        let mut curr_row = vec![0; b.len() + 1];
        for (i, ca) in a.iter().enumerate() {
            curr_row[0] = i + 1;
            for (j, cb) in b.iter().enumerate() {
                let sub = if ca == cb { 0 } else { 1 };
                curr_row[j + 1] = (prev_row[j + 1] + 1)
                    .min(curr_row[j] + 1)
                    .min(prev_row[j] + sub);
            }
            prev_row.copy_from_slice(&curr_row);
        }
        prev_row[b.len()]
    }

    #[test]
    fn test_standard_two_alignments() {
        let a = chars("замб");
        let b = chars("зъб");
        let alignments = align_standard(&a, &b, &MismatchCost::default()).unwrap();
        assert_eq!(alignments, vec![
            Alignment::new(2.0, vec![
                (single('з'), single('з')),
                (single('а'), Segment::Gap),
                (single('м'), single('ъ')),
                (single('б'), single('б'))
            ]),
            Alignment::new(2.0, vec![
                (single('з'), single('з')),
                (single('а'), single('ъ')),
                (single('м'), Segment::Gap),
                (single('б'), single('б'))
            ])
        ]);
    }

    #[test_log::test]
    fn test_merge_single_alignment() {
        let a = chars("замб");
        let b = chars("зъб");
        let alignments = align_merge(&a, &b, &MismatchCost::default()).unwrap();
        assert_eq!(alignments, vec![
            Alignment::new(1.0, vec![
                (single('з'), single('з')),
                (Segment::Pair('а', 'м'), single('ъ')),
                (single('б'), single('б'))
            ])
        ]);
    }

    #[test]
    fn test_merge_split_a() {
        // the split goes the other way when B is the longer word
        let a = chars("зъб");
        let b = chars("замб");
        let alignments = align_merge(&a, &b, &MismatchCost::default()).unwrap();
        assert_eq!(alignments.len(), 1);
        assert_eq!(alignments[0].corr()[1], (single('ъ'), Segment::Pair('а', 'м')));
    }

    #[test]
    fn test_gcatgcu() {
        let a = chars("GCATGCU");
        let b = chars("GATTACA");
        let alignments = align_standard(&a, &b, &UnitCost).unwrap();
        assert_eq!(alignments.len(), 3);
        for alignment in alignments.iter() {
            assert_eq!(alignment.cost(), 0.0);
        }

        let expected = Alignment::new(0.0, vec![
            (single('G'), single('G')),
            (single('C'), Segment::Gap),
            (single('A'), single('A')),
            (single('T'), single('T')),
            (single('G'), single('T')),
            (Segment::Gap, single('A')),
            (single('C'), single('C')),
            (single('U'), single('A'))
        ]);
        assert!(alignments.contains(&expected));
    }

    #[derive(Debug, serde::Deserialize)]
    struct AlignmentRecord {
        cost: f64,
        row_a: String,
        row_b: String
    }

    /// Loads expected alignments from a csv file.
    /// Expected columns are "cost", "row_a", and "row_b"; rows are space separated symbols with "-" for gaps.
    /// # Arguments
    /// * `filename` - the file path to load
    fn load_alignment_csv(filename: &std::path::Path) -> Vec<Alignment<char>> {
        let to_segment = |token: &str| -> Segment<char> {
            let symbols: Vec<char> = token.chars().collect();
            if token == "-" {
                Segment::Gap
            } else {
                Segment::from_slice(&symbols)
            }
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(filename)
            .unwrap();

        let mut alignments = vec![];
        for row in csv_reader.deserialize() {
            let record: AlignmentRecord = row.unwrap();
            let corr: Vec<Correspondence<char>> = record.row_a.split(' ')
                .zip(record.row_b.split(' '))
                .map(|(a, b)| (to_segment(a), to_segment(b)))
                .collect();
            alignments.push(Alignment::new(record.cost, corr));
        }
        alignments
    }

    /// Entry point for file-based regression tests.
    /// # Arguments
    /// * `filename` - the csv with every expected alignment
    /// * `word_a` - first word
    /// * `word_b` - second word
    /// * `algorithm` - the algorithm to run
    /// * `cost_fn` - the cost function to run with
    fn run_test_file(filename: &str, word_a: &str, word_b: &str, algorithm: AlignAlgorithm, cost_fn: &dyn CostFunction<char>) {
        let mut expected = load_alignment_csv(&PathBuf::from(filename));
        expected.sort_by(|a1, a2| a1.corr().cmp(a2.corr()));

        let config = AlignConfigBuilder::default()
            .algorithm(algorithm)
            .build().unwrap();
        let alignments = align(&chars(word_a), &chars(word_b), cost_fn, &config).unwrap();
        assert_eq!(alignments, expected);

        // the fixture should describe the words we aligned
        for alignment in alignments.iter() {
            assert_eq!(alignment.sequence_a(), chars(word_a));
            assert_eq!(alignment.sequence_b(), chars(word_b));
        }
    }

    #[test]
    fn test_csv_gcatgcu() {
        run_test_file("./tests/gcatgcu_standard.csv", "GCATGCU", "GATTACA", AlignAlgorithm::Standard, &UnitCost);
    }

    #[test]
    fn test_csv_zamb_merge() {
        run_test_file("./tests/zamb_merge.csv", "замб", "зъб", AlignAlgorithm::Merge, &MismatchCost::default());
    }

    #[test]
    fn test_empty_inputs() {
        let empty: Vec<char> = vec![];
        let alignments = align_standard(&empty, &empty, &MismatchCost::default()).unwrap();
        assert_eq!(alignments, vec![Alignment::new(0.0, vec![])]);

        let alignments = align_merge(&empty, &empty, &MismatchCost::default()).unwrap();
        assert_eq!(alignments, vec![Alignment::new(0.0, vec![])]);
    }

    #[test]
    fn test_one_side_empty() {
        let a = chars("abc");
        let empty: Vec<char> = vec![];
        let gap_cost = MismatchCost { matched: 0.0, mismatched: 1.0, gap: 1.5 };

        let alignments = align_standard(&a, &empty, &gap_cost).unwrap();
        assert_eq!(alignments, vec![Alignment::new(4.5, all_deletes(&a))]);

        let alignments = align_merge(&empty, &a, &gap_cost).unwrap();
        assert_eq!(alignments, vec![Alignment::new(4.5, all_inserts(&a))]);
    }

    #[test]
    fn test_edit_distance_property() {
        for seed in 0..20 {
            let (seq_a, seq_b) = generate_pair(4, 12, 0.2, seed);
            let alignments = align_standard(&seq_a, &seq_b, &MismatchCost::default()).unwrap();
            let expected = levenshtein(&seq_a, &seq_b) as f64;

            assert!(!alignments.is_empty());
            for alignment in alignments.iter() {
                assert_eq!(alignment.cost(), expected);
                assert_eq!(alignment.sequence_a(), seq_a);
                assert_eq!(alignment.sequence_b(), seq_b);
            }
        }
    }

    #[test]
    fn test_merge_reconstructs() {
        for seed in 0..20 {
            let (seq_a, seq_b) = generate_pair(3, 8, 0.3, seed);
            let alignments = align_merge(&seq_a, &seq_b, &MismatchCost::default()).unwrap();
            assert!(!alignments.is_empty());
            for alignment in alignments.iter() {
                assert_eq!(alignment.sequence_a(), seq_a);
                assert_eq!(alignment.sequence_b(), seq_b);
            }

            // merges can only help, never hurt
            let standard = align_standard(&seq_a, &seq_b, &MismatchCost::default()).unwrap();
            assert!(alignments[0].cost() <= standard[0].cost());
        }
    }

    #[test]
    fn test_deterministic() {
        let (seq_a, seq_b) = generate_pair(4, 10, 0.3, 7);
        let first = align_merge(&seq_a, &seq_b, &UnitCost).unwrap();
        let second = align_merge(&seq_a, &seq_b, &UnitCost).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_symmetry() {
        // deliberately asymmetric costs so the swap matters
        let cost_fn = |a: &Segment<u8>, b: &Segment<u8>| -> Cost {
            match (a, b) {
                (_, Segment::Gap) => 1.0,
                (Segment::Gap, _) => 2.0,
                (a, b) if a == b => 0.0,
                _ => 2.5
            }
        };

        for seed in 0..10 {
            let (seq_a, seq_b) = generate_pair(4, 10, 0.3, seed);
            let forward = align_standard(&seq_a, &seq_b, &cost_fn).unwrap();
            let backward = align_standard(&seq_b, &seq_a, &Swapped(cost_fn)).unwrap();

            let mut mirrored: Vec<Alignment<u8>> = backward.into_iter().map(|a| a.mirrored()).collect();
            mirrored.sort_by(|a1, a2| a1.corr().cmp(a2.corr()));
            assert_eq!(forward, mirrored);
        }
    }

    #[test]
    fn test_tie_tolerance() {
        let cost_fn = |a: &Segment<char>, b: &Segment<char>| -> Cost {
            match (a, b) {
                (_, Segment::Gap) => 0.1,
                (Segment::Gap, _) => 0.2,
                _ => 0.3
            }
        };
        let a = chars("a");
        let b = chars("b");

        let alignments = align_standard(&a, &b, &cost_fn).unwrap();
        assert_eq!(alignments.len(), 1);

        let config = AlignConfigBuilder::default()
            .tie_tolerance(1e-9)
            .build().unwrap();
        let alignments = align(&a, &b, &cost_fn, &config).unwrap();
        assert_eq!(alignments.len(), 3);

        // only the substitution reaches the minimum, the gapped routes carry their own cost
        for alignment in alignments.iter() {
            assert_eq!(alignment.cost(), score(alignment.corr(), &cost_fn).unwrap());
        }
        let costs: Vec<Cost> = alignments.iter().map(|a| a.cost()).collect();
        assert_eq!(costs.iter().filter(|&&c| c == 0.3).count(), 1);
        assert_eq!(costs.iter().filter(|&&c| c != 0.3).count(), 2);
        assert!(costs.iter().all(|&c| c >= 0.3));

        let config = AlignConfigBuilder::default()
            .tie_tolerance(-1.0)
            .build().unwrap();
        assert!(align(&a, &b, &cost_fn, &config).is_err());
    }

    #[test]
    fn test_tie_tolerance_slack_adds_up() {
        // a substitution at 2.05 is within 0.1 of a pair of gaps
        let cost_fn = MismatchCost { matched: 0.0, mismatched: 2.05, gap: 1.0 };
        let a = chars("ab");
        let b = chars("cd");

        let exact = align_standard(&a, &b, &cost_fn).unwrap();
        assert!(exact.iter().all(|alignment| alignment.cost() == 4.0));

        let config = AlignConfigBuilder::default()
            .tie_tolerance(0.1)
            .build().unwrap();
        let alignments = align(&a, &b, &cost_fn, &config).unwrap();
        assert!(alignments.len() > exact.len());

        for alignment in alignments.iter() {
            assert_eq!(alignment.cost(), score(alignment.corr(), &cost_fn).unwrap());
            assert!(alignment.cost() >= 4.0);
        }

        // the double substitution picks up slack at both cells
        let double_sub = alignments.iter()
            .find(|alignment| alignment.corr() == [(single('a'), single('c')), (single('b'), single('d'))])
            .unwrap();
        assert_eq!(double_sub.cost(), 2.05 + 2.05);

        // every exact alignment is still there with the same cost
        for alignment in exact.iter() {
            assert!(alignments.contains(alignment));
        }
    }

    #[test]
    fn test_score() {
        let corr = vec![
            (single('з'), single('з')),
            (Segment::Pair('а', 'м'), single('ъ')),
            (single('б'), Segment::Gap)
        ];
        assert_eq!(score(&corr, &MismatchCost::default()).unwrap(), 2.0);
        assert_eq!(score::<char, MismatchCost>(&[], &MismatchCost::default()).unwrap(), 0.0);
    }

    #[test]
    fn test_cost_function_error_propagates() {
        // the table has no entry for some of the correspondences the aligner needs to score
        let mut cost_fn: LookupCost<char> = LookupCost::new(1.0, UnknownPolicy::Fail).with_identity(0.0);
        cost_fn.insert(single('а'), single('ъ'), 0.5);
        cost_fn.insert(single('м'), single('ъ'), 0.5);

        let a = chars("замб");
        let b = chars("зъб");
        assert!(align_merge(&a, &b, &cost_fn).is_err());
    }

    #[test]
    fn test_display() {
        let a = chars("замб");
        let b = chars("зъб");
        let alignments = align_merge(&a, &b, &MismatchCost::default()).unwrap();
        assert_eq!(alignments[0].to_string(), "з\tам\tб\nз\tъ\tб");
    }

    #[test]
    fn test_strings_as_symbols() {
        // multi-character phonetic segments are symbols too
        let a = vec!["t͡s", "a"];
        let b = vec!["t͡s", "a", "ː"];
        let alignments = align_standard(&a, &b, &MismatchCost::default()).unwrap();
        assert_eq!(alignments, vec![Alignment::new(1.0, vec![
            (Segment::Single("t͡s"), Segment::Single("t͡s")),
            (Segment::Single("a"), Segment::Single("a")),
            (Segment::Gap, Segment::Single("ː"))
        ])]);
    }
}
