use readex_core::{Pos, PresentationUnit, TextMeasure};

/// Unit indices sharing one wrapped line, revealed together in the
/// line-at-a-time style. Derived from layout, not from the input text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGroup {
    pub indices: Vec<usize>,
}

/// Result of flowing a unit sequence across the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    pub units: Vec<PresentationUnit>,
    pub groups: Vec<LineGroup>,
    /// Vertical extent of the laid-out text, for sizing the surface.
    pub height: f32,
}

/// Lays units out left to right, wrapping to a new line whenever the next
/// unit would cross `surface_width`. The first baseline sits one line height
/// down; every wrap advances it by the probed line height. A unit wider than
/// the whole surface gets a line of its own rather than wrapping forever.
pub fn layout_flow(words: &[String], surface_width: f32, measure: &dyn TextMeasure) -> FlowLayout {
    let line_height = measure.line_height();
    let space = measure.measure(" ");

    let mut units = Vec::with_capacity(words.len());
    let mut groups: Vec<LineGroup> = vec![LineGroup {
        indices: Vec::new(),
    }];
    let mut x = 0.0f32;
    let mut base_y = line_height;

    for (index, word) in words.iter().enumerate() {
        let width = measure.measure(word);
        if x > 0.0 && x + width > surface_width {
            x = 0.0;
            base_y += line_height;
            groups.push(LineGroup {
                indices: Vec::new(),
            });
        }
        groups
            .last_mut()
            .expect("at least one line group")
            .indices
            .push(index);
        units.push(PresentationUnit {
            text: word.clone(),
            index,
            width,
            pos: Pos::new(x, base_y),
        });
        x += width + space;
    }

    if units.is_empty() {
        groups.clear();
    }

    FlowLayout {
        units,
        groups,
        height: base_y + line_height * 0.5,
    }
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
    fn wraps_when_the_next_unit_would_cross_the_edge() {
        // widths 40 + space 10 + 40 = 90 fits; the third word would start
        // at 100 and cross 120, so it wraps.
        let flow = layout_flow(&words(&["aaaa", "bbbb", "cccc"]), 120.0, &FixedMeasure);

        assert_eq!(flow.units[0].pos, Pos::new(0.0, 20.0));
        assert_eq!(flow.units[1].pos, Pos::new(50.0, 20.0));
        assert_eq!(flow.units[2].pos, Pos::new(0.0, 40.0));
        assert_eq!(flow.groups.len(), 2);
        assert_eq!(flow.groups[0].indices, vec![0, 1]);
        assert_eq!(flow.groups[1].indices, vec![2]);
    }

    #[test]
    fn a_unit_exactly_filling_the_line_does_not_wrap() {
        let flow = layout_flow(&words(&["aaaa", "bbbbbbb"]), 120.0, &FixedMeasure);
        // second word starts at 50 and ends exactly at 120
        assert_eq!(flow.units[1].pos, Pos::new(50.0, 20.0));
        assert_eq!(flow.groups.len(), 1);
    }

    #[test]
    fn an_oversized_unit_gets_its_own_line() {
        let flow = layout_flow(
            &words(&["a", "wwwwwwwwwwwwwwww", "b"]),
            100.0,
            &FixedMeasure,
        );
        assert_eq!(flow.units[1].pos, Pos::new(0.0, 40.0));
        assert_eq!(flow.units[2].pos, Pos::new(0.0, 60.0));
        assert_eq!(flow.groups.len(), 3);
    }

    #[test]
    fn height_covers_the_last_baseline() {
        let flow = layout_flow(&words(&["aaaa", "bbbb", "cccc"]), 120.0, &FixedMeasure);
        assert!(flow.height > flow.units[2].pos.y);
    }

    #[test]
    fn empty_input_has_no_groups() {
        let flow = layout_flow(&[], 120.0, &FixedMeasure);
        assert!(flow.units.is_empty());
        assert!(flow.groups.is_empty());
    }
}
