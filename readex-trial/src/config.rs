use readex_core::{KeySet, SideAssignment};
use serde::{Deserialize, Serialize};

/// Status-band messages shown around the binary-choice stimulus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackMessages {
    /// Shown while awaiting a normal response.
    pub normal: String,
    /// Shown during the enforced delay after a mistake.
    pub error: String,
    /// Shown once keypresses register again at the same step.
    pub redo: String,
}

impl Default for FeedbackMessages {
    fn default() -> Self {
        Self {
            normal: String::new(),
            error: "Wrong!".to_owned(),
            redo: "Try again.".to_owned(),
        }
    }
}

/// Read-only parameters for one binary-choice (maze) trial. Supplied once by
/// the host; never mutated by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeParameters {
    pub correct: String,
    pub distractor: String,
    /// Literal delimiter grouping several words into one unit; whitespace
    /// splitting when absent.
    pub grouping: Option<String>,
    /// Explicit per-step placement of the correct unit. Generated by coin
    /// flips when absent.
    pub sides: Option<SideAssignment>,
    /// Whether a mistake restarts input capture at the same step (true) or
    /// ends the trial immediately (false).
    pub redo: bool,
    /// Enforced wait after a mistake before keypresses register again.
    /// `None` re-arms immediately.
    pub delay_ms: Option<f64>,
    pub left_keys: KeySet,
    pub right_keys: KeySet,
    /// Stimulus area geometry in pixels.
    pub width: f32,
    pub height: f32,
    pub messages: FeedbackMessages,
}

impl Default for MazeParameters {
    fn default() -> Self {
        Self {
            correct: String::new(),
            distractor: String::new(),
            grouping: None,
            sides: None,
            redo: true,
            delay_ms: Some(500.0),
            left_keys: KeySet::from('e'),
            right_keys: KeySet::from('i'),
            width: 600.0,
            height: 100.0,
            messages: FeedbackMessages::default(),
        }
    }
}

/// How the self-paced task reveals units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealStyle {
    /// Exactly one unit visible; all others are placeholders.
    Word,
    /// Whole lines up to the current one visible; later lines placeholders.
    Line,
    /// Everything visible; advancement is still gated by input.
    All,
}

/// Read-only parameters for one self-paced reading trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingParameters {
    pub stimulus: String,
    pub style: RevealStyle,
    pub grouping: Option<String>,
    pub advance_keys: KeySet,
    pub width: f32,
    pub height: f32,
    /// Hard cap on the trial; when it fires the trial completes with
    /// whatever record has accumulated.
    pub max_duration_ms: Option<f64>,
}

impl Default for ReadingParameters {
    fn default() -> Self {
        Self {
            stimulus: String::new(),
            style: RevealStyle::All,
            grouping: None,
            advance_keys: KeySet::from(' '),
            width: 800.0,
            height: 400.0,
            max_duration_ms: None,
        }
    }
}
