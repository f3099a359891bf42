use serde::{Deserialize, Serialize};

/// Position on the drawing surface. `y` is the text baseline, matching the
/// coordinate the surface draws text at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One indivisible chunk of stimulus text revealed as a single presentation
/// step. Immutable once laid out for a trial.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationUnit {
    pub text: String,
    /// Sequence position, 0-based.
    pub index: usize,
    /// Measured width in surface pixels.
    pub width: f32,
    pub pos: Pos,
}

/// The two index-aligned competitors shown at one binary-choice step. Pairing
/// them in one struct makes the alignment invariant structural instead of a
/// convention across parallel arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPair {
    pub correct: PresentationUnit,
    pub distractor: PresentationUnit,
}

/// Which slot the correct unit occupies at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Per-step placement of the correct unit, same length as the unit sequence.
pub type SideAssignment = Vec<Side>;
