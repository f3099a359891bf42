use serde::{Deserialize, Serialize};

use crate::unit::SideAssignment;

/// Controller state machine positions. The transient outcomes of a key event
/// (advance, immediate retry) resolve synchronously inside the event callback
/// and never persist between events; only these states do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed but not started; no listener exists yet.
    Idle,
    /// A single-shot listener is armed and the clock is running.
    AwaitingInput,
    /// A mistake delay is pending; the listener is disarmed until it fires.
    MistakeDelay,
    /// Terminal. Finalization has run and the record has been handed off.
    Complete,
}

/// Recorded result of one binary-choice trial, handed to the host exactly
/// once at completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MazeRecord {
    /// Time to the first keypress attempt at each step, ms.
    pub rt_ms: Vec<f64>,
    /// Total elapsed time per step including retries and enforced delays,
    /// captured at the first correct response.
    pub cumulative_rt_ms: Vec<f64>,
    /// First-attempt correctness per step, 1 or 0.
    pub correct: Vec<u8>,
    pub words: Vec<String>,
    pub distractors: Vec<String>,
    pub sides: SideAssignment,
}

/// Recorded result of one self-paced reading trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    /// One reaction time per reveal step, ms.
    pub rt_ms: Vec<f64>,
    pub words: Vec<String>,
}
