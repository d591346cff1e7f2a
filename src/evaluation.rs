/*!
Scores predicted alignments against gold-standard ones.
Both sides are keyed by whatever identifies a word pair, e.g. (language A, language B, concept).
*/

use itertools::Itertools;
use log::debug;
use simple_error::bail;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use crate::segment::Correspondence;

/// A single prediction that differs from the gold standard
#[derive(Clone, Debug, PartialEq)]
pub struct Mistake<K, S> {
    /// Identifies the word pair
    pub key: K,
    /// What was predicted
    pub predicted: Vec<Correspondence<S>>,
    /// What the gold standard says
    pub correct: Vec<Correspondence<S>>
}

/// Contains the result of an evaluation
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation<K, S> {
    /// Every incorrect prediction with its correct counterpart, sorted by key
    mistakes: Vec<Mistake<K, S>>,
    /// Number of predictions matching the gold standard
    num_correct: usize,
    /// Number of predictions
    num_all: usize
}

impl<K, S> Evaluation<K, S> {
    // Getters
    pub fn mistakes(&self) -> &[Mistake<K, S>] {
        &self.mistakes
    }

    pub fn num_correct(&self) -> usize {
        self.num_correct
    }

    pub fn num_all(&self) -> usize {
        self.num_all
    }

    /// Fraction of correct predictions, None if nothing was predicted
    pub fn accuracy(&self) -> Option<f64> {
        if self.num_all == 0 {
            None
        } else {
            Some(self.num_correct as f64 / self.num_all as f64)
        }
    }
}

/// Compares every predicted alignment against the gold alignment for the same key.
/// A prediction is correct only if its whole correspondence sequence equals the gold one.
/// # Arguments
/// * `gold` - the gold-standard alignments, must cover every predicted key
/// * `predicted` - the predicted alignments
/// # Errors
/// * if a predicted key has no gold alignment
pub fn evaluate<K, S, H1, H2>(
    gold: &HashMap<K, Vec<Correspondence<S>>, H1>,
    predicted: &HashMap<K, Vec<Correspondence<S>>, H2>
) -> Result<Evaluation<K, S>, Box<dyn std::error::Error>>
where
    K: Clone + Debug + Eq + Hash + Ord,
    S: Clone + PartialEq,
    H1: BuildHasher,
    H2: BuildHasher
{
    let mut mistakes = vec![];

    // sorted so the mistakes come out in a fixed order
    for key in predicted.keys().sorted() {
        let correct = match gold.get(key) {
            Some(c) => c,
            None => bail!("No gold alignment for {:?}", key)
        };

        let prediction = &predicted[key];
        if prediction != correct {
            mistakes.push(Mistake {
                key: key.clone(),
                predicted: prediction.clone(),
                correct: correct.clone()
            });
        }
    }

    let num_all = predicted.len();
    let num_correct = num_all - mistakes.len();
    debug!("evaluation: {num_correct} / {num_all} correct");

    Ok(Evaluation {
        mistakes,
        num_correct,
        num_all
    })
}
