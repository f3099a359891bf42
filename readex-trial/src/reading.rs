use log::debug;

use readex_core::{
    ConfigError, ControllerState, PresentationUnit, ReadingRecord, Surface, TextMeasure, segment,
};
use readex_layout::{FlowLayout, LineGroup, layout_flow};
use readex_timing::{TimeoutHandle, TimeoutQueue, Timer};

use crate::config::{ReadingParameters, RevealStyle};
use crate::listener::AdvanceListener;

/// One self-paced reading trial: the reduced form of the maze machine. A
/// single advance key set moves exactly one reveal step per qualifying
/// event; there is no correctness concept and no retry branch. An optional
/// maximum-duration timer is the only non-input-driven transition.
pub struct ReadingSession<T: Timer<Timestamp = u64>> {
    timer: T,
    timeouts: TimeoutQueue,
    listener: AdvanceListener,
    units: Vec<PresentationUnit>,
    groups: Vec<LineGroup>,
    style: RevealStyle,
    step: usize,
    step_count: usize,
    max_timeout: Option<TimeoutHandle>,
    max_duration_ms: Option<f64>,
    state: ControllerState,
    record: ReadingRecord,
    on_finish: Option<Box<dyn FnOnce(ReadingRecord)>>,
}

impl<T: Timer<Timestamp = u64>> ReadingSession<T> {
    pub fn new(
        params: ReadingParameters,
        timer: T,
        measure: &dyn TextMeasure,
        on_finish: impl FnOnce(ReadingRecord) + 'static,
    ) -> Result<Self, ConfigError> {
        if params.advance_keys.is_empty() {
            return Err(ConfigError::EmptyKeySet("advance"));
        }

        let words = segment(&params.stimulus, params.grouping.as_deref());
        if words.is_empty() {
            return Err(ConfigError::EmptyStimulus);
        }

        let FlowLayout { units, groups, .. } = layout_flow(&words, params.width, measure);
        let step_count = match params.style {
            RevealStyle::Line => groups.len(),
            RevealStyle::Word | RevealStyle::All => units.len(),
        };

        Ok(Self {
            timer,
            timeouts: TimeoutQueue::new(),
            listener: AdvanceListener::new(params.advance_keys),
            units,
            groups,
            style: params.style,
            step: 0,
            step_count,
            max_timeout: None,
            max_duration_ms: params.max_duration_ms,
            state: ControllerState::Idle,
            record: ReadingRecord {
                words,
                ..ReadingRecord::default()
            },
            on_finish: Some(Box::new(on_finish)),
        })
    }

    /// Begin the trial with step 0 revealed, and arm the hard cap if one is
    /// configured.
    pub fn start(&mut self, surface: &mut dyn Surface) {
        if self.state != ControllerState::Idle {
            return;
        }
        self.draw_visible(surface);
        let now = self.timer.now();
        if let Some(max) = self.max_duration_ms {
            self.max_timeout = Some(self.timeouts.schedule(now, max));
        }
        self.listener.arm(now);
        self.state = ControllerState::AwaitingInput;
        debug!(
            "reading trial started, {} steps ({:?} style)",
            self.step_count, self.style
        );
    }

    /// Deliver a raw key event. Each qualifying event records one reaction
    /// time and advances one reveal step; responding to the final revealed
    /// step completes the trial, so no step is ever skipped and no extra
    /// event beyond the step count is needed.
    pub fn handle_key(&mut self, key: char, surface: &mut dyn Surface) {
        if self.state != ControllerState::AwaitingInput {
            return;
        }
        let Some(armed_at) = self.listener.take(key) else {
            return;
        };
        let rt_ms = self.timer.elapsed(armed_at).as_secs_f64() * 1e3;
        self.record.rt_ms.push(rt_ms);
        self.step += 1;
        if self.step >= self.step_count {
            self.finish(surface);
        } else {
            self.draw_visible(surface);
            self.listener.arm(self.timer.now());
        }
    }

    /// Poll pending timeouts. A fired maximum-duration timer completes the
    /// trial with whatever record has accumulated.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        if self.state == ControllerState::Complete {
            return;
        }
        let now = self.timer.now();
        for fired in self.timeouts.fire_due(now) {
            if self.max_timeout == Some(fired) {
                debug!("reading trial hit the maximum duration");
                self.finish(surface);
            }
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == ControllerState::Complete
    }

    fn draw_visible(&self, surface: &mut dyn Surface) {
        surface.clear();
        match self.style {
            RevealStyle::All => {
                for unit in &self.units {
                    surface.draw_text(&unit.text, unit.pos);
                }
            }
            RevealStyle::Word => {
                for (j, unit) in self.units.iter().enumerate() {
                    if j == self.step {
                        surface.draw_text(&unit.text, unit.pos);
                    } else {
                        surface.draw_placeholder(unit.width, unit.pos);
                    }
                }
            }
            RevealStyle::Line => {
                for (line, group) in self.groups.iter().enumerate() {
                    for &index in &group.indices {
                        let unit = &self.units[index];
                        if line <= self.step {
                            surface.draw_text(&unit.text, unit.pos);
                        } else {
                            surface.draw_placeholder(unit.width, unit.pos);
                        }
                    }
                }
            }
        }
    }

    fn finish(&mut self, surface: &mut dyn Surface) {
        if self.state == ControllerState::Complete {
            return;
        }
        self.state = ControllerState::Complete;
        self.timeouts.cancel_all();
        self.max_timeout = None;
        self.listener.disarm();
        surface.clear();
        debug!(
            "reading trial complete, {} of {} steps",
            self.record.rt_ms.len(),
            self.step_count
        );
        if let Some(done) = self.on_finish.take() {
            done(std::mem::take(&mut self.record));
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_timeouts(&self) -> usize {
        self.timeouts.pending()
    }

    #[cfg(test)]
    pub(crate) fn listener_armed(&self) -> bool {
        self.listener.is_armed()
    }
}
