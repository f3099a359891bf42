use readex_core::{
    ConfigError, Pos, PresentationUnit, Side, SideAssignment, TextMeasure, UnitPair,
};

/// Slot geometry for the binary-choice presentation: two candidates compete
/// for a left and a right slot symmetric around the horizontal center,
/// separated by a padding gap on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub center: f32,
    pub padding: f32,
    /// Baseline for the single presentation line.
    pub base_y: f32,
}

impl SlotGeometry {
    /// Geometry for a surface of `width` pixels: center at width/2, padding
    /// a tenth of the width, baseline one and a half line heights down.
    pub fn for_surface(width: f32, measure: &dyn TextMeasure) -> Self {
        Self {
            center: width * 0.5,
            padding: width * 0.1,
            base_y: measure.line_height() * 1.5,
        }
    }

    /// Left-slot x for a unit of `width`: right edge flush against the
    /// padding boundary so the slot grows leftward with longer text.
    fn left_slot_x(&self, width: f32) -> f32 {
        self.center - self.padding - width
    }

    /// Right-slot x: left edge at the padding boundary.
    fn right_slot_x(&self) -> f32 {
        self.center + self.padding
    }
}

/// Lays out index-aligned correct/distractor sequences into positioned
/// pairs. `sides[i]` picks which slot the correct unit occupies at step i.
///
/// Sequence-length mismatches are configuration errors surfaced here, before
/// any trial state exists.
pub fn layout_pairs(
    correct: &[String],
    distractor: &[String],
    sides: &SideAssignment,
    geometry: SlotGeometry,
    measure: &dyn TextMeasure,
) -> Result<Vec<UnitPair>, ConfigError> {
    if correct.len() != distractor.len() {
        return Err(ConfigError::StimulusLengthMismatch {
            correct: correct.len(),
            distractor: distractor.len(),
        });
    }
    if sides.len() != correct.len() {
        return Err(ConfigError::SideAssignmentLength {
            sides: sides.len(),
            units: correct.len(),
        });
    }

    let mut pairs = Vec::with_capacity(correct.len());
    for (index, (correct_text, distractor_text)) in correct.iter().zip(distractor).enumerate() {
        let correct_width = measure.measure(correct_text);
        let distractor_width = measure.measure(distractor_text);
        let (correct_x, distractor_x) = match sides[index] {
            Side::Left => (
                geometry.left_slot_x(correct_width),
                geometry.right_slot_x(),
            ),
            Side::Right => (
                geometry.right_slot_x(),
                geometry.left_slot_x(distractor_width),
            ),
        };
        pairs.push(UnitPair {
            correct: PresentationUnit {
                text: correct_text.clone(),
                index,
                width: correct_width,
                pos: Pos::new(correct_x, geometry.base_y),
            },
            distractor: PresentationUnit {
                text: distractor_text.clone(),
                index,
                width: distractor_width,
                pos: Pos::new(distractor_x, geometry.base_y),
            },
        });
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn measure(&self, text: &str) -> f32 {
            text.chars().count() as f32 * 10.0
        }

        fn line_height(&self) -> f32 {
            20.0
        }
    }

    fn words(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn slots_never_overlap_the_center_gap() {
        let geometry = SlotGeometry::for_surface(600.0, &FixedMeasure);
        let pairs = layout_pairs(
            &words(&["cat", "extraordinarily"]),
            &words(&["incomprehensible", "it"]),
            &vec![Side::Left, Side::Right],
            geometry,
            &FixedMeasure,
        )
        .unwrap();

        for pair in &pairs {
            for unit in [&pair.correct, &pair.distractor] {
                if unit.pos.x < geometry.center {
                    // left slot: right edge flush against the boundary
                    assert_eq!(unit.pos.x + unit.width, geometry.center - geometry.padding);
                } else {
                    assert_eq!(unit.pos.x, geometry.center + geometry.padding);
                }
            }
        }
    }

    #[test]
    fn side_assignment_picks_the_correct_slot() {
        let geometry = SlotGeometry::for_surface(600.0, &FixedMeasure);
        let pairs = layout_pairs(
            &words(&["cat", "sat"]),
            &words(&["dog", "ran"]),
            &vec![Side::Left, Side::Right],
            geometry,
            &FixedMeasure,
        )
        .unwrap();

        assert!(pairs[0].correct.pos.x < geometry.center);
        assert!(pairs[0].distractor.pos.x > geometry.center);
        assert!(pairs[1].correct.pos.x > geometry.center);
        assert!(pairs[1].distractor.pos.x < geometry.center);
        assert_eq!(pairs[0].correct.pos.y, geometry.base_y);
    }

    #[test]
    fn length_mismatch_is_a_config_error() {
        let geometry = SlotGeometry::for_surface(600.0, &FixedMeasure);
        let err = layout_pairs(
            &words(&["a", "b"]),
            &words(&["c"]),
            &vec![Side::Left, Side::Left],
            geometry,
            &FixedMeasure,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::StimulusLengthMismatch {
                correct: 2,
                distractor: 1
            }
        );
    }

    #[test]
    fn side_assignment_length_mismatch_is_a_config_error() {
        let geometry = SlotGeometry::for_surface(600.0, &FixedMeasure);
        let err = layout_pairs(
            &words(&["a", "b"]),
            &words(&["c", "d"]),
            &vec![Side::Left],
            geometry,
            &FixedMeasure,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::SideAssignmentLength { sides: 1, units: 2 });
    }
}
