use std::fmt;

use super::model::{Dataset, Item, ItemSet};

// ---------------------------------------------------------------------------
// FilterKind – the five built-in scoring functions
// ---------------------------------------------------------------------------

/// Number of stages in the pipeline. The set of kinds never changes.
pub const STAGE_COUNT: usize = 5;

/// Scoring function of a stage. Each kind raises one item attribute to a
/// fixed exponent and accepts the item when the result exceeds the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKind {
    Lightning,
    Focus,
    Sharpness,
    Contrast,
    Saturation,
}

impl FilterKind {
    /// Pipeline order.
    pub const ALL: [FilterKind; STAGE_COUNT] = [
        FilterKind::Lightning,
        FilterKind::Focus,
        FilterKind::Sharpness,
        FilterKind::Contrast,
        FilterKind::Saturation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Lightning => "lightning",
            FilterKind::Focus => "focus",
            FilterKind::Sharpness => "sharpness",
            FilterKind::Contrast => "contrast",
            FilterKind::Saturation => "saturation",
        }
    }

    pub fn exponent(self) -> f64 {
        match self {
            FilterKind::Lightning => 2.3,
            FilterKind::Focus => 1.7,
            FilterKind::Sharpness => 0.3,
            FilterKind::Contrast => 0.8,
            FilterKind::Saturation => 4.0,
        }
    }

    /// The attribute this kind looks at.
    pub fn attribute(self, item: &Item) -> f64 {
        match self {
            FilterKind::Lightning => item.lightning,
            FilterKind::Focus => item.focus,
            FilterKind::Sharpness => item.sharpness,
            FilterKind::Contrast => item.contrast,
            FilterKind::Saturation => item.saturation,
        }
    }

    /// Transformed attribute value.
    pub fn score(self, item: &Item) -> f64 {
        self.attribute(item).powf(self.exponent())
    }

    /// Verdict for one item: strictly above the threshold is approved.
    pub fn accepts(self, item: &Item, threshold: f64) -> bool {
        self.score(item) > threshold
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Partition – result of evaluating one stage
// ---------------------------------------------------------------------------

/// Approved/rejected split of one stage's input set.
///
/// Both halves keep the relative order of the input, and together they are
/// exactly the input with no overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub approved: ItemSet,
    pub rejected: ItemSet,
}

impl Partition {
    /// Size of the input set this partition was computed from.
    pub fn total(&self) -> usize {
        self.approved.len() + self.rejected.len()
    }

    /// Approved share of the input in percent; 0 when the input was empty.
    pub fn approval_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.approved.len() as f64 / total as f64 * 100.0
        }
    }

    pub fn rejection_percentage(&self) -> f64 {
        100.0 - self.approval_percentage()
    }
}

/// Split `input` by applying `kind` at `threshold` to every referenced item.
///
/// Indices that do not resolve in `dataset` are skipped; callers only ever
/// pass sets derived from the same dataset.
pub fn partition(dataset: &Dataset, input: &[usize], kind: FilterKind, threshold: f64) -> Partition {
    let mut out = Partition {
        approved: Vec::with_capacity(input.len()),
        rejected: Vec::with_capacity(input.len()),
    };
    for &idx in input {
        let Some(item) = dataset.get(idx) else {
            continue;
        };
        if kind.accepts(item, threshold) {
            out.approved.push(idx);
        } else {
            out.rejected.push(idx);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_items(
            (0..20)
                .map(|i| {
                    let v = i as f64 / 20.0;
                    Item::new(v, 1.0 - v - 0.01, (v * 7.0) % 1.0, (v * 3.0) % 1.0, v * v)
                })
                .collect(),
        )
    }

    #[test]
    fn scores_use_the_kind_specific_exponent() {
        let item = Item::new(0.5, 0.5, 0.5, 0.5, 0.5);
        assert!((FilterKind::Lightning.score(&item) - 0.5f64.powf(2.3)).abs() < 1e-12);
        assert!((FilterKind::Focus.score(&item) - 0.5f64.powf(1.7)).abs() < 1e-12);
        assert!((FilterKind::Sharpness.score(&item) - 0.5f64.powf(0.3)).abs() < 1e-12);
        assert!((FilterKind::Contrast.score(&item) - 0.5f64.powf(0.8)).abs() < 1e-12);
        assert!((FilterKind::Saturation.score(&item) - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn each_kind_reads_its_own_attribute() {
        let item = Item::new(0.1, 0.2, 0.3, 0.4, 0.5);
        let attrs: Vec<f64> = FilterKind::ALL.iter().map(|k| k.attribute(&item)).collect();
        assert_eq!(attrs, vec![0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn verdict_is_strictly_greater_than_threshold() {
        let item = Item::uniform(0.5);
        let score = FilterKind::Saturation.score(&item);
        assert!(!FilterKind::Saturation.accepts(&item, score));
        assert!(FilterKind::Saturation.accepts(&item, score - 1e-9));
        // Nothing scores above 1 and nothing scores below 0.
        assert!(!FilterKind::Sharpness.accepts(&Item::uniform(0.999), 1.0));
        assert!(!FilterKind::Sharpness.accepts(&Item::uniform(0.0), 0.0));
    }

    #[test]
    fn partition_is_disjoint_and_complete() {
        let ds = sample();
        let input = ds.all();
        for kind in FilterKind::ALL {
            for step in 0..=10 {
                let threshold = step as f64 / 10.0;
                let p = partition(&ds, &input, kind, threshold);
                assert_eq!(p.total(), input.len());
                assert!(p.approved.iter().all(|i| !p.rejected.contains(i)));
                let mut joined: Vec<usize> = p.approved.iter().chain(&p.rejected).copied().collect();
                joined.sort_unstable();
                assert_eq!(joined, input);
            }
        }
    }

    #[test]
    fn partition_respects_a_subset_input() {
        let ds = sample();
        let input = vec![3, 7, 11];
        let p = partition(&ds, &input, FilterKind::Lightning, 0.0);
        assert_eq!(p.approved, vec![3, 7, 11]);
        assert!(p.rejected.is_empty());
    }

    #[test]
    fn empty_input_gives_zero_rates() {
        let p = partition(&sample(), &[], FilterKind::Focus, 0.5);
        assert_eq!(p.total(), 0);
        assert_eq!(p.approval_percentage(), 0.0);
        assert_eq!(p.rejection_percentage(), 100.0);
    }

    #[test]
    fn names_follow_pipeline_order() {
        let names: Vec<&str> = FilterKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["lightning", "focus", "sharpness", "contrast", "saturation"]);
    }
}
