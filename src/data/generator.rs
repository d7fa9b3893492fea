use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::model::{Dataset, Item};

// ---------------------------------------------------------------------------
// Synthetic item generation
// ---------------------------------------------------------------------------

/// Draw a fresh seed from the thread-local generator.
pub fn random_seed() -> u64 {
    rand::rng().random()
}

/// Generate `count` items with every attribute uniform in `[0, 1)`.
///
/// The same `seed` always yields the same dataset.
pub fn generate(count: usize, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let items = (0..count)
        .map(|_| {
            Item::new(
                rng.random::<f64>(),
                rng.random::<f64>(),
                rng.random::<f64>(),
                rng.random::<f64>(),
                rng.random::<f64>(),
            )
        })
        .collect();
    Dataset::from_items(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_count_in_unit_interval() {
        let ds = generate(250, 7);
        assert_eq!(ds.len(), 250);
        for item in ds.items() {
            for v in [item.lightning, item.focus, item.sharpness, item.contrast, item.saturation] {
                assert!((0.0..1.0).contains(&v), "{v} out of range");
            }
        }
    }

    #[test]
    fn same_seed_same_dataset() {
        assert_eq!(generate(50, 42).items(), generate(50, 42).items());
        assert_ne!(generate(50, 42).items(), generate(50, 43).items());
    }

    #[test]
    fn zero_items() {
        assert!(generate(0, 1).is_empty());
    }
}
