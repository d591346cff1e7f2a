/*!
# phon_align
This library aligns pairs of phonetic transcriptions (or any other symbol sequences) to find sound correspondences between related languages.

Key benefits:
* Returns *every* co-optimal global alignment, not an arbitrary one of them
* Optional merge/split moves, letting one symbol correspond to two consecutive symbols on the other side
* Generic over the symbol type and the cost function, including fallible cost providers

Performance notes:
* Filling the table is O(mn) calls to the cost function
* The number of co-optimal alignments can grow combinatorially with the number of ties; use `backtrack::count_paths` to check before enumerating long inputs

# Example usage
```rust
use phon_align::alignment::align_standard;
use phon_align::cost_functions::UnitCost;
use phon_align::segment::Segment;

let seq_a: Vec<char> = "GCATGCU".chars().collect();
let seq_b: Vec<char> = "GATTACA".chars().collect();

// run the alignment and check the results
let alignments = align_standard(&seq_a, &seq_b, &UnitCost).unwrap();
assert_eq!(alignments.len(), 3);
assert!(alignments.iter().all(|a| a.cost() == 0.0));
assert_eq!(alignments[0].corr()[1], (Segment::Single('C'), Segment::Gap));
```
*/

/// Configuration for the aligner
pub mod align_config;
/// Main functionality for the standard and merge-extended alignments
pub mod alignment;
/// Enumeration of co-optimal paths through a filled table
pub mod backtrack;
/// The cost function interface and a few simple providers
pub mod cost_functions;
/// Dynamic programming table construction
pub mod cost_matrix;
/// Scoring predicted alignments against a gold standard
pub mod evaluation;
/// Utility for generating examples
pub mod example_gen;
/// Sequence symbols, gaps, and merged pairs
pub mod segment;
