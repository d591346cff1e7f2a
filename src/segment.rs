/*!
Symbols as they appear on one side of a correspondence.
A side is either a gap, a single symbol, or two consecutive symbols that were merged together.
*/

use std::fmt;

/// One side of a correspondence between two sequences.
/// The variant order matters: it controls how alignments are sorted for stable output.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Segment<S> {
    /// Nothing consumed on this side, i.e. an indel
    Gap,
    /// Exactly one symbol consumed
    Single(S),
    /// Two consecutive symbols consumed against a single symbol on the other side
    Pair(S, S)
}

/// A pair of (side A, side B) segments
pub type Correspondence<S> = (Segment<S>, Segment<S>);

impl<S> Segment<S> {
    /// Returns true if this is the gap marker
    pub fn is_gap(&self) -> bool {
        matches!(self, Segment::Gap)
    }

    /// Returns the number of sequence symbols this segment consumes: 0, 1, or 2
    pub fn len(&self) -> usize {
        match self {
            Segment::Gap => 0,
            Segment::Single(_) => 1,
            Segment::Pair(_, _) => 2
        }
    }

    /// Alias for `is_gap()`, a gap is the only segment that consumes nothing
    pub fn is_empty(&self) -> bool {
        self.is_gap()
    }

    /// Returns the consumed symbols in sequence order
    pub fn symbols(&self) -> Vec<&S> {
        match self {
            Segment::Gap => vec![],
            Segment::Single(s) => vec![s],
            Segment::Pair(s1, s2) => vec![s1, s2]
        }
    }
}

impl<S: Clone> Segment<S> {
    /// Builds a segment from a slice of 0, 1, or 2 symbols.
    /// # Panics
    /// * if the slice has more than 2 symbols
    pub fn from_slice(symbols: &[S]) -> Segment<S> {
        match symbols {
            [] => Segment::Gap,
            [s] => Segment::Single(s.clone()),
            [s1, s2] => Segment::Pair(s1.clone(), s2.clone()),
            _ => panic!("a segment holds at most two symbols, got {}", symbols.len())
        }
    }
}

impl<S: fmt::Display> fmt::Display for Segment<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Gap => write!(f, "-"),
            Segment::Single(s) => write!(f, "{s}"),
            Segment::Pair(s1, s2) => write!(f, "{s1}{s2}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert_eq!(Segment::<char>::Gap.len(), 0);
        assert!(Segment::<char>::Gap.is_gap());
        assert_eq!(Segment::Single('a').len(), 1);
        assert_eq!(Segment::Pair('a', 'м').len(), 2);
        assert!(!Segment::Pair('a', 'м').is_gap());
    }

    #[test]
    fn test_symbols_and_slice() {
        let seq = ['з', 'а', 'м'];
        assert_eq!(Segment::from_slice(&seq[0..0]), Segment::Gap);
        assert_eq!(Segment::from_slice(&seq[1..2]), Segment::Single('а'));
        assert_eq!(Segment::from_slice(&seq[1..3]), Segment::Pair('а', 'м'));
        assert_eq!(Segment::Pair('а', 'м').symbols(), vec![&'а', &'м']);
    }

    #[test]
    fn test_pair_is_never_single() {
        // equality is on the whole segment, a merged pair never matches a lone symbol
        assert_ne!(Segment::Pair('a', 'a'), Segment::Single('a'));
        assert!(Segment::Gap < Segment::Single('a'));
        assert!(Segment::Single('z') < Segment::Pair('a', 'a'));
    }

    #[test]
    fn test_display() {
        assert_eq!(Segment::<char>::Gap.to_string(), "-");
        assert_eq!(Segment::Single("ts").to_string(), "ts");
        assert_eq!(Segment::Pair('а', 'м').to_string(), "ам");
    }
}
