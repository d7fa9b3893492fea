/// Pipeline state and the evaluation engine.
///
/// ```text
///   SetThreshold / SetMode
///        │
///        ▼
///   ┌───────────────┐   dirty mask   ┌──────────┐
///   │ PipelineState │ ─────────────▶ │   Pass   │  one stage per step
///   └───────────────┘                └──────────┘
///        ▲                                │
///        └──────── commit(PassOutcome) ───┘
/// ```

pub mod engine;
pub mod error;
pub mod mask;

use std::fmt;

use serde::Serialize;

use crate::data::filter::{FilterKind, Partition, STAGE_COUNT};
#[cfg(test)]
use crate::data::model::Dataset;

pub use engine::{Pass, PassOutcome};
pub use error::PipelineError;
pub use mask::StageMask;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// How stages relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every stage sees the full dataset.
    #[default]
    Tuning,
    /// Each stage sees the previous stage's approved items.
    Filtering,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Filtering, Mode::Tuning];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Tuning => "Tuning",
            Mode::Filtering => "Filtering",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub kind: FilterKind,
    pub threshold: f64,
    /// Result of the last evaluation; empty until the first pass commits.
    pub result: Partition,
}

/// What the presentation layer shows for one stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSummary {
    pub name: &'static str,
    pub threshold: f64,
    pub approved: usize,
    pub rejected: usize,
}

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// The mutable record behind the pipeline: mode, thresholds, cached results
/// and which stages are stale.
///
/// Mutated only through [`set_threshold`](Self::set_threshold),
/// [`set_mode`](Self::set_mode) and [`commit`](Self::commit).
#[derive(Debug, Clone)]
pub struct PipelineState {
    stages: Vec<Stage>,
    mode: Mode,
    dirty: StageMask,
    initial_load: bool,
    /// Mode the committed results were computed in.
    results_mode: Option<Mode>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl PipelineState {
    /// Tuning mode, every stage dirty, every threshold at `threshold`.
    pub fn new(threshold: f64) -> Self {
        let stages = FilterKind::ALL
            .iter()
            .map(|&kind| Stage {
                kind,
                threshold,
                result: Partition::default(),
            })
            .collect();
        Self {
            stages,
            mode: Mode::Tuning,
            dirty: StageMask::ALL,
            initial_load: true,
            results_mode: None,
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn dirty(&self) -> StageMask {
        self.dirty
    }

    /// True until the first pass has committed.
    pub fn is_initial_load(&self) -> bool {
        self.initial_load
    }

    /// Mode of the last commit. Lags [`mode`](Self::mode) while the pass
    /// that follows a mode switch is still running.
    pub fn results_mode(&self) -> Option<Mode> {
        self.results_mode
    }

    /// Whether a pass is needed to bring the results up to date.
    pub fn needs_evaluation(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Check an update without applying it.
    pub fn validate_threshold(&self, index: usize, value: f64) -> Result<(), PipelineError> {
        if index >= self.stages.len() {
            return Err(PipelineError::UnknownStage {
                index,
                count: self.stages.len(),
            });
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(PipelineError::ThresholdOutOfRange { index, value });
        }
        Ok(())
    }

    /// Set stage `index`'s threshold and mark what it invalidates: the stage
    /// itself, plus every downstream stage in filtering mode.
    pub fn set_threshold(&mut self, index: usize, value: f64) -> Result<(), PipelineError> {
        self.validate_threshold(index, value)?;
        self.stages[index].threshold = value;
        let invalidated = match self.mode {
            Mode::Tuning => StageMask::single(index),
            Mode::Filtering => StageMask::from_stage(index),
        };
        self.dirty = self.dirty.union(invalidated);
        Ok(())
    }

    /// Switch mode. The meaning of every stage's input changes, so all stages
    /// become dirty, even when `mode` equals the current one.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.dirty = StageMask::ALL;
    }

    /// Write back the results of a finished pass.
    pub fn commit(&mut self, outcome: PassOutcome) {
        for (index, result) in outcome.results {
            if let Some(stage) = self.stages.get_mut(index) {
                stage.result = result;
            }
        }
        self.dirty = self.dirty.difference(outcome.evaluated);
        self.initial_load = false;
        self.results_mode = Some(outcome.mode);
    }

    /// Evaluate everything that is dirty, synchronously.
    #[cfg(test)]
    pub fn evaluate(&mut self, dataset: &Dataset) -> StageMask {
        let outcome = Pass::start(self, dataset).run(dataset);
        let evaluated = outcome.evaluated;
        self.commit(outcome);
        evaluated
    }

    /// Last stage's approved count over the dataset size, in percent.
    ///
    /// Only meaningful once filtering-mode results are committed; 0 otherwise
    /// and for an empty dataset.
    pub fn overall_approval_rate(&self, dataset_len: usize) -> f64 {
        let chained = self.mode == Mode::Filtering && self.results_mode == Some(Mode::Filtering);
        if !chained || dataset_len == 0 {
            return 0.0;
        }
        match self.stages.last() {
            Some(last) => last.result.approved.len() as f64 / dataset_len as f64 * 100.0,
            None => 0.0,
        }
    }

    pub fn summaries(&self) -> Vec<StageSummary> {
        self.stages
            .iter()
            .map(|s| StageSummary {
                name: s.kind.name(),
                threshold: s.threshold,
                approved: s.result.approved.len(),
                rejected: s.result.rejected.len(),
            })
            .collect()
    }
}

const _: () = assert!(STAGE_COUNT <= 8, "StageMask stores stages in a u8");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generator::generate;
    use crate::data::model::Item;

    fn settled(mode: Mode) -> (PipelineState, Dataset) {
        let ds = generate(100, 11);
        let mut p = PipelineState::default();
        p.set_mode(mode);
        p.evaluate(&ds);
        (p, ds)
    }

    #[test]
    fn initial_state() {
        let p = PipelineState::default();
        assert_eq!(p.mode(), Mode::Tuning);
        assert_eq!(p.dirty(), StageMask::ALL);
        assert!(p.is_initial_load());
        assert!(p.stages().iter().all(|s| s.threshold == 0.5 && s.result.total() == 0));
        let kinds: Vec<FilterKind> = p.stages().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, FilterKind::ALL);
    }

    #[test]
    fn tuning_threshold_marks_only_that_stage() {
        let (mut p, _) = settled(Mode::Tuning);
        p.set_threshold(2, 0.3).unwrap();
        assert_eq!(p.dirty(), StageMask::single(2));
    }

    #[test]
    fn filtering_threshold_marks_downstream() {
        let (mut p, _) = settled(Mode::Filtering);
        p.set_threshold(1, 0.3).unwrap();
        assert_eq!(p.dirty(), StageMask::from_stage(1));
    }

    #[test]
    fn mode_switch_marks_everything() {
        let (mut p, _) = settled(Mode::Tuning);
        assert!(!p.needs_evaluation());
        p.set_mode(Mode::Filtering);
        assert_eq!(p.dirty(), StageMask::ALL);
    }

    #[test]
    fn invalid_updates_leave_state_untouched() {
        let (mut p, _) = settled(Mode::Filtering);
        let before = p.stages().to_vec();
        assert_eq!(
            p.set_threshold(5, 0.2),
            Err(PipelineError::UnknownStage { index: 5, count: 5 })
        );
        assert!(matches!(
            p.set_threshold(0, 1.5),
            Err(PipelineError::ThresholdOutOfRange { index: 0, .. })
        ));
        assert!(p.set_threshold(0, -0.1).is_err());
        assert!(p.set_threshold(0, f64::NAN).is_err());
        assert_eq!(p.stages(), &before[..]);
        assert!(!p.needs_evaluation());
    }

    #[test]
    fn approval_rate_waits_for_the_filtering_commit() {
        let (mut p, ds) = settled(Mode::Tuning);
        p.set_mode(Mode::Filtering);
        // Results on hand are still the independent tuning-mode ones.
        assert_eq!(p.results_mode(), Some(Mode::Tuning));
        assert_eq!(p.overall_approval_rate(ds.len()), 0.0);

        p.evaluate(&ds);
        assert_eq!(p.results_mode(), Some(Mode::Filtering));
        let last = p.stages().last().unwrap().result.approved.len();
        assert_eq!(p.overall_approval_rate(ds.len()), last as f64 / 100.0 * 100.0);
    }

    #[test]
    fn boundary_thresholds_are_accepted() {
        let mut p = PipelineState::default();
        assert!(p.set_threshold(0, 0.0).is_ok());
        assert!(p.set_threshold(4, 1.0).is_ok());
    }

    #[test]
    fn commit_clears_dirty_and_initial_load() {
        let ds = generate(10, 3);
        let mut p = PipelineState::default();
        let evaluated = p.evaluate(&ds);
        assert_eq!(evaluated, StageMask::ALL);
        assert!(!p.needs_evaluation());
        assert!(!p.is_initial_load());
    }

    #[test]
    fn approval_rate_matches_final_stage_exactly() {
        let (p, ds) = settled(Mode::Filtering);
        let last = p.stages().last().unwrap().result.approved.len();
        assert_eq!(p.overall_approval_rate(ds.len()), last as f64 / 100.0 * 100.0);
    }

    #[test]
    fn approval_rate_is_zero_outside_filtering() {
        let (p, ds) = settled(Mode::Tuning);
        assert_eq!(p.overall_approval_rate(ds.len()), 0.0);
        let (p, _) = settled(Mode::Filtering);
        assert_eq!(p.overall_approval_rate(0), 0.0);
    }

    #[test]
    fn approval_rate_bounds() {
        let ds = Dataset::from_items(vec![Item::uniform(0.9); 4]);
        let mut p = PipelineState::new(0.0);
        p.set_mode(Mode::Filtering);
        p.evaluate(&ds);
        assert_eq!(p.overall_approval_rate(ds.len()), 100.0);

        p.set_threshold(4, 1.0).unwrap();
        p.evaluate(&ds);
        assert!(p.stages()[4].result.approved.is_empty());
        assert_eq!(p.overall_approval_rate(ds.len()), 0.0);
    }

    #[test]
    fn summaries_report_counts() {
        let (p, ds) = settled(Mode::Tuning);
        let summaries = p.summaries();
        assert_eq!(summaries.len(), STAGE_COUNT);
        for s in &summaries {
            assert_eq!(s.approved + s.rejected, ds.len());
            assert_eq!(s.threshold, 0.5);
        }
        assert_eq!(summaries[0].name, "lightning");
    }
}
