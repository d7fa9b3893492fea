use thiserror::Error;

/// Invalid operator input. A rejected action leaves the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("unknown stage index {index} (pipeline has {count} stages)")]
    UnknownStage { index: usize, count: usize },
    #[error("threshold {value} for stage {index} is outside [0, 1]")]
    ThresholdOutOfRange { index: usize, value: f64 },
}
