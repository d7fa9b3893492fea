use std::collections::VecDeque;

use crate::data::filter::{partition, FilterKind, Partition};
use crate::data::model::{Dataset, ItemSet};

use super::{Mode, PipelineState, StageMask};

// ---------------------------------------------------------------------------
// Work selection
// ---------------------------------------------------------------------------

/// Stages the next pass has to evaluate.
///
/// * Tuning: the dirty stages only, or every stage on the first pass of the
///   session. Untouched stages keep their earlier results.
/// * Filtering: the first dirty stage and everything downstream of it, since
///   each stage consumes its predecessor's approved set.
pub fn plan(state: &PipelineState) -> StageMask {
    match state.mode() {
        Mode::Tuning if state.is_initial_load() => StageMask::ALL,
        Mode::Tuning => state.dirty(),
        Mode::Filtering => state
            .dirty()
            .first()
            .map_or(StageMask::EMPTY, StageMask::from_stage),
    }
}

// ---------------------------------------------------------------------------
// Pass – one evaluation run over the planned stages
// ---------------------------------------------------------------------------

/// Results of a finished pass, ready for [`PipelineState::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct PassOutcome {
    pub mode: Mode,
    pub evaluated: StageMask,
    /// `(stage index, partition)` in ascending stage order.
    pub results: Vec<(usize, Partition)>,
}

/// An evaluation pass that can be advanced one stage at a time.
///
/// Thresholds and the filtering-mode seed input are captured when the pass
/// starts, so stepping never reads the pipeline state again. The caller must
/// not start a second pass before this one is committed.
#[derive(Debug, Clone)]
pub struct Pass {
    mode: Mode,
    plan: StageMask,
    remaining: VecDeque<(usize, FilterKind, f64)>,
    /// Filtering mode: input of the next stage.
    carry: ItemSet,
    results: Vec<(usize, Partition)>,
}

impl Pass {
    pub fn start(state: &PipelineState, dataset: &Dataset) -> Self {
        let plan = plan(state);
        let remaining = plan
            .iter()
            .map(|i| {
                let stage = &state.stages()[i];
                (i, stage.kind, stage.threshold)
            })
            .collect();
        let carry = match (state.mode(), plan.first()) {
            (Mode::Filtering, Some(first)) if first > 0 => {
                state.stages()[first - 1].result.approved.clone()
            }
            (Mode::Filtering, _) => dataset.all(),
            (Mode::Tuning, _) => ItemSet::new(),
        };
        log::debug!(
            "pass start: mode={} dirty={} plan={}",
            state.mode(),
            state.dirty(),
            plan
        );
        Self {
            mode: state.mode(),
            plan,
            remaining,
            carry,
            results: Vec::with_capacity(plan.len()),
        }
    }

    pub fn plan(&self) -> StageMask {
        self.plan
    }

    pub fn is_done(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Stages still to evaluate.
    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Evaluate the next planned stage. Returns `true` once nothing is left.
    pub fn step(&mut self, dataset: &Dataset) -> bool {
        let Some((index, kind, threshold)) = self.remaining.pop_front() else {
            return true;
        };
        let result = match self.mode {
            Mode::Tuning => partition(dataset, &dataset.all(), kind, threshold),
            Mode::Filtering => {
                let input = std::mem::take(&mut self.carry);
                let result = partition(dataset, &input, kind, threshold);
                self.carry = result.approved.clone();
                result
            }
        };
        log::trace!(
            "stage {index} ({kind}) @ {threshold}: {} approved, {} rejected",
            result.approved.len(),
            result.rejected.len()
        );
        self.results.push((index, result));
        self.is_done()
    }

    /// Advance up to `budget` stages. Returns `true` once nothing is left.
    pub fn advance(&mut self, dataset: &Dataset, budget: usize) -> bool {
        for _ in 0..budget {
            if self.step(dataset) {
                return true;
            }
        }
        self.is_done()
    }

    /// Run the remaining stages to completion.
    #[cfg(test)]
    pub fn run(mut self, dataset: &Dataset) -> PassOutcome {
        while !self.step(dataset) {}
        self.finish()
    }

    /// Hand over the results. Stages not yet stepped are left out, and stay
    /// dirty after the commit.
    pub fn finish(self) -> PassOutcome {
        let evaluated = self.results.iter().map(|(i, _)| *i).collect();
        PassOutcome {
            mode: self.mode,
            evaluated,
            results: self.results,
        }
    }
}
