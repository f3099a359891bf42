use log::debug;
use rand::Rng;

use readex_core::{
    ConfigError, ControllerState, MazeRecord, Side, SideAssignment, Surface, TextMeasure, UnitPair,
    segment,
};
use readex_layout::{SlotGeometry, layout_pairs};
use readex_timing::{TimeoutHandle, TimeoutQueue, Timer};

use crate::config::{FeedbackMessages, MazeParameters};
use crate::listener::ChoiceListener;

/// One binary-choice trial: a forced choice between the correct continuation
/// and a distractor at every step, with retry/delay handling on mistakes.
///
/// Construction validates the configuration and lays everything out;
/// [`start`](Self::start) draws the first step and opens input capture. The
/// host forwards raw keys to [`handle_key`](Self::handle_key) and polls
/// [`tick`](Self::tick); the finish callback runs exactly once, after all
/// timers and the listener are torn down.
pub struct MazeSession<T: Timer<Timestamp = u64>> {
    timer: T,
    timeouts: TimeoutQueue,
    listener: ChoiceListener,
    pairs: Vec<UnitPair>,
    sides: SideAssignment,
    step: usize,
    first_attempt: bool,
    accumulated_ms: f64,
    redo: bool,
    delay_ms: Option<f64>,
    delay_timeout: Option<TimeoutHandle>,
    messages: FeedbackMessages,
    state: ControllerState,
    record: MazeRecord,
    on_finish: Option<Box<dyn FnOnce(MazeRecord)>>,
}

impl<T: Timer<Timestamp = u64>> MazeSession<T> {
    pub fn new<R: Rng>(
        params: MazeParameters,
        timer: T,
        rng: &mut R,
        measure: &dyn TextMeasure,
        on_finish: impl FnOnce(MazeRecord) + 'static,
    ) -> Result<Self, ConfigError> {
        if params.left_keys.is_empty() {
            return Err(ConfigError::EmptyKeySet("left"));
        }
        if params.right_keys.is_empty() {
            return Err(ConfigError::EmptyKeySet("right"));
        }

        let correct = segment(&params.correct, params.grouping.as_deref());
        let distractor = segment(&params.distractor, params.grouping.as_deref());
        if correct.is_empty() {
            return Err(ConfigError::EmptyStimulus);
        }

        let sides = match params.sides {
            Some(sides) => sides,
            None => (0..correct.len())
                .map(|_| {
                    if rng.random_bool(0.5) {
                        Side::Right
                    } else {
                        Side::Left
                    }
                })
                .collect(),
        };

        let geometry = SlotGeometry::for_surface(params.width, measure);
        let pairs = layout_pairs(&correct, &distractor, &sides, geometry, measure)?;

        let record = MazeRecord {
            words: correct,
            distractors: distractor,
            sides: sides.clone(),
            ..MazeRecord::default()
        };

        Ok(Self {
            timer,
            timeouts: TimeoutQueue::new(),
            listener: ChoiceListener::new(params.left_keys, params.right_keys),
            pairs,
            sides,
            step: 0,
            first_attempt: true,
            accumulated_ms: 0.0,
            redo: params.redo,
            delay_ms: params.delay_ms,
            delay_timeout: None,
            messages: params.messages,
            state: ControllerState::Idle,
            record,
            on_finish: Some(Box::new(on_finish)),
        })
    }

    /// Begin the trial: draw step 0, arm the listener, start the clock.
    pub fn start(&mut self, surface: &mut dyn Surface) {
        if self.state != ControllerState::Idle {
            return;
        }
        surface.set_status(&self.messages.normal);
        self.draw_step(surface);
        self.listener.arm(self.timer.now());
        self.state = ControllerState::AwaitingInput;
        debug!("maze trial started, {} steps", self.pairs.len());
    }

    /// Deliver a raw key event. Keys outside the scoped sets, or any key
    /// while the listener is disarmed (delay window, completed trial), are
    /// dropped without touching the record.
    pub fn handle_key(&mut self, key: char, surface: &mut dyn Surface) {
        if self.state != ControllerState::AwaitingInput {
            return;
        }
        let Some((selection, armed_at)) = self.listener.take(key) else {
            return;
        };
        let rt_ms = self.timer.elapsed(armed_at).as_secs_f64() * 1e3;
        let target = self.sides[self.step];

        // First-attempt RT and correctness are recorded once per step, no
        // matter how many retries follow.
        if self.first_attempt {
            self.record.rt_ms.push(rt_ms);
            self.record.correct.push(u8::from(selection == target));
        }
        self.accumulated_ms += rt_ms;

        if selection == target {
            self.record.cumulative_rt_ms.push(self.accumulated_ms);
            self.accumulated_ms = 0.0;
            self.first_attempt = true;
            self.step += 1;
            debug!("step {} answered in {:.1} ms", self.step - 1, rt_ms);
            if self.step >= self.pairs.len() {
                self.finish(surface);
            } else {
                surface.set_status(&self.messages.normal);
                self.draw_step(surface);
                self.listener.arm(self.timer.now());
            }
        } else {
            self.first_attempt = false;
            if !self.redo {
                self.finish(surface);
            } else if let Some(delay) = self.delay_ms {
                // The enforced wait counts toward the step's cumulative
                // time from the moment it is imposed.
                self.accumulated_ms += delay;
                surface.set_status(&self.messages.error);
                self.state = ControllerState::MistakeDelay;
                self.delay_timeout = Some(self.timeouts.schedule(self.timer.now(), delay));
            } else {
                surface.set_status(&self.messages.redo);
                self.listener.arm(self.timer.now());
            }
        }
    }

    /// Poll pending timeouts. The only timer a maze trial schedules is the
    /// mistake delay; when it fires, input capture reopens at the same step.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        if self.state == ControllerState::Complete {
            return;
        }
        let now = self.timer.now();
        for fired in self.timeouts.fire_due(now) {
            if self.delay_timeout == Some(fired) {
                self.delay_timeout = None;
                surface.set_status(&self.messages.redo);
                self.listener.arm(self.timer.now());
                self.state = ControllerState::AwaitingInput;
            }
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == ControllerState::Complete
    }

    fn draw_step(&self, surface: &mut dyn Surface) {
        surface.clear();
        let pair = &self.pairs[self.step];
        surface.draw_text(&pair.correct.text, pair.correct.pos);
        surface.draw_text(&pair.distractor.text, pair.distractor.pos);
    }

    /// Terminal transition. Runs synchronously within the completing event:
    /// every timer and the listener are cancelled before the host callback
    /// sees the record, so nothing can fire against a finished session.
    fn finish(&mut self, surface: &mut dyn Surface) {
        if self.state == ControllerState::Complete {
            return;
        }
        self.state = ControllerState::Complete;
        self.timeouts.cancel_all();
        self.delay_timeout = None;
        self.listener.disarm();
        surface.clear();
        surface.set_status("");
        debug!("maze trial complete after {} steps", self.step);
        if let Some(done) = self.on_finish.take() {
            done(std::mem::take(&mut self.record));
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_timeouts(&self) -> usize {
        self.timeouts.pending()
    }

    #[cfg(test)]
    pub(crate) fn scheduled_timeouts(&self) -> u64 {
        self.timeouts.scheduled_total()
    }

    #[cfg(test)]
    pub(crate) fn listener_armed(&self) -> bool {
        self.listener.is_armed()
    }

    #[cfg(test)]
    pub(crate) fn side_assignment(&self) -> &SideAssignment {
        &self.sides
    }
}
