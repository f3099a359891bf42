use thiserror::Error;

/// Configuration errors, surfaced to the caller before a trial starts. Once
/// a trial is running the only recoverable failures are participant mistakes,
/// which the controller handles internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("correct stimulus has {correct} units but distractor has {distractor}")]
    StimulusLengthMismatch { correct: usize, distractor: usize },

    #[error("side assignment has {sides} entries for {units} units")]
    SideAssignmentLength { sides: usize, units: usize },

    #[error("stimulus text produced no presentation units")]
    EmptyStimulus,

    #[error("no keys bound for the {0} response")]
    EmptyKeySet(&'static str),

    #[error("font cannot be measured: {0}")]
    UnmeasurableFont(String),

    #[error("surface geometry {width}x{height} is invalid")]
    InvalidGeometry { width: u32, height: u32 },
}
