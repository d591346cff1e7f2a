use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};

/// Creates a random sequence and a mutated copy of it, e.g. for testing and benchmarking alignments.
/// Symbols are `0..alphabet_size`.
/// # Arguments
/// * `alphabet_size` - the number of distinct symbols, e.g. for DNA it's 4
/// * `seq_len` - the length of the original sequence
/// * `error_rate` - overall error rate, assumes mismatch, insertion, and deletion are equally likely sub-components of this error rate
/// * `seed` - seed for the random generator, the same seed always gives the same pair
pub fn generate_pair(alphabet_size: u8, seq_len: usize, error_rate: f64, seed: u64) -> (Vec<u8>, Vec<u8>) {
    assert!(alphabet_size > 1);
    assert!((0.0..=1.0).contains(&error_rate));

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let base_distribution = Uniform::new(0, alphabet_size);
    let basem1_distribution = Uniform::new(1, alphabet_size);
    let error_distribution = Uniform::new(0.0, 1.0);
    let error_type_distribution = Uniform::new(0, 3);

    let original: Vec<u8> = (0..seq_len)
        .map(|_i| rng.sample(base_distribution))
        .collect();

    let mut mutated = vec![];
    let mut index = 0;
    while index < original.len() {
        let c = original[index];
        let is_error = rng.sample(error_distribution) < error_rate;
        if is_error {
            match rng.sample(error_type_distribution) {
                0 => {
                    // substitution, the offset is never 0 so it always changes
                    let sub_offset = rng.sample(basem1_distribution);
                    mutated.push(((c as u16 + sub_offset as u16) % alphabet_size as u16) as u8);
                    index += 1;
                },
                1 => {
                    // deletion
                    index += 1;
                },
                2 => {
                    // insertion
                    mutated.push(rng.sample(base_distribution));
                },
                _ => panic!("no impl")
            }
        } else {
            mutated.push(c);
            index += 1;
        }
    }

    (original, mutated)
}
