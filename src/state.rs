use std::collections::VecDeque;

use crate::config::Settings;
use crate::data::generator;
use crate::data::model::Dataset;
use crate::pipeline::{Mode, Pass, PipelineError, PipelineState, StageSummary};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Operator input, produced by the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    SetThreshold { stage: usize, value: f64 },
    SetMode(Mode),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Owns the dataset, the pipeline and at most one in-flight evaluation pass.
/// Actions dispatched while a pass is running wait in a queue until that pass
/// has committed.
pub struct AppState {
    pub settings: Settings,

    /// Generated on the first tick.
    dataset: Option<Dataset>,

    pipeline: PipelineState,

    in_flight: Option<Pass>,

    queued: VecDeque<Action>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let pipeline = PipelineState::new(settings.default_threshold);
        Self {
            settings,
            dataset: None,
            pipeline,
            in_flight: None,
            queued: VecDeque::new(),
            status_message: None,
        }
    }

    /// Start from an existing dataset instead of generating one.
    #[cfg(test)]
    pub fn with_dataset(settings: Settings, dataset: Dataset) -> Self {
        let mut state = Self::new(settings);
        state.dataset = Some(dataset);
        state
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Last committed pipeline state.
    pub fn pipeline(&self) -> &PipelineState {
        &self.pipeline
    }

    /// Whether a pass is running or work is waiting.
    pub fn is_busy(&self) -> bool {
        self.dataset.is_none()
            || self.in_flight.is_some()
            || !self.queued.is_empty()
            || self.pipeline.needs_evaluation()
    }

    #[cfg(test)]
    pub fn pass_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    #[cfg(test)]
    pub fn queued_actions(&self) -> usize {
        self.queued.len()
    }

    /// Mode the pipeline will be in once queued actions are applied.
    pub fn target_mode(&self) -> Mode {
        self.queued
            .iter()
            .rev()
            .find_map(|a| match a {
                Action::SetMode(mode) => Some(*mode),
                _ => None,
            })
            .unwrap_or_else(|| self.pipeline.mode())
    }

    /// Threshold of `stage` once queued actions are applied.
    pub fn target_threshold(&self, stage: usize) -> Option<f64> {
        self.queued
            .iter()
            .rev()
            .find_map(|a| match *a {
                Action::SetThreshold { stage: s, value } if s == stage => Some(value),
                _ => None,
            })
            .or_else(|| self.pipeline.stage(stage).map(|s| s.threshold))
    }

    /// Accept an action. Invalid input is rejected immediately and never
    /// queued; valid input is applied now if the engine is idle, otherwise
    /// after the running pass commits.
    pub fn dispatch(&mut self, action: Action) -> Result<(), PipelineError> {
        if let Action::SetThreshold { stage, value } = action {
            if let Err(e) = self.pipeline.validate_threshold(stage, value) {
                log::warn!("rejected {action:?}: {e}");
                self.status_message = Some(e.to_string());
                return Err(e);
            }
        }
        self.status_message = None;
        if self.in_flight.is_some() {
            log::debug!("pass in flight, queueing {action:?}");
            self.queued.push_back(action);
            Ok(())
        } else {
            self.apply(action)
        }
    }

    fn apply(&mut self, action: Action) -> Result<(), PipelineError> {
        match action {
            Action::SetThreshold { stage, value } => self.pipeline.set_threshold(stage, value),
            Action::SetMode(mode) => {
                log::info!("mode: {} -> {}", self.pipeline.mode(), mode);
                self.pipeline.set_mode(mode);
                Ok(())
            }
        }
    }

    /// Advance the engine by one unit of work: generate the dataset, step the
    /// in-flight pass (committing it when done), or apply queued actions and
    /// start the next pass. Returns whether more work remains.
    pub fn tick(&mut self) -> bool {
        let Some(dataset) = self.dataset.as_ref() else {
            let seed = self.settings.seed.unwrap_or_else(generator::random_seed);
            let dataset = generator::generate(self.settings.item_count, seed);
            log::info!("generated {} items (seed {seed})", dataset.len());
            if dataset.is_empty() {
                log::warn!("item_count is 0; every stage will report empty results");
            }
            self.dataset = Some(dataset);
            return true;
        };

        if let Some(pass) = self.in_flight.as_mut() {
            if pass.advance(dataset, self.settings.stages_per_tick) {
                if let Some(pass) = self.in_flight.take() {
                    let outcome = pass.finish();
                    log::debug!("commit: mode={} stages={}", outcome.mode, outcome.evaluated);
                    self.pipeline.commit(outcome);
                    self.log_summary();
                }
            }
            return self.is_busy();
        }

        while let Some(action) = self.queued.pop_front() {
            if let Err(e) = self.apply(action) {
                log::warn!("dropped queued {action:?}: {e}");
            }
        }

        if self.pipeline.needs_evaluation() {
            if let Some(dataset) = self.dataset.as_ref() {
                let pass = Pass::start(&self.pipeline, dataset);
                log::debug!("pass started over stages {}", pass.plan());
                self.in_flight = Some(pass);
            }
        }
        self.is_busy()
    }

    /// Tick until every pending action has been evaluated and committed.
    #[cfg(test)]
    pub fn run_until_idle(&mut self) {
        while self.tick() {}
    }

    pub fn summaries(&self) -> Vec<StageSummary> {
        self.pipeline.summaries()
    }

    /// Overall approval rate in percent (filtering mode only).
    pub fn overall_approval_rate(&self) -> f64 {
        self.pipeline
            .overall_approval_rate(self.dataset.as_ref().map_or(0, Dataset::len))
    }

    fn log_summary(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let snapshot = serde_json::json!({
            "mode": self.pipeline.mode(),
            "stages": self.summaries(),
            "overall_approval_rate": self.overall_approval_rate(),
        });
        log::debug!("committed: {snapshot}");
    }
}
