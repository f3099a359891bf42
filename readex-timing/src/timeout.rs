/// Handle returned by [`TimeoutQueue::schedule`]. Cancelling an already
/// fired or cancelled handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutHandle(u64);

/// Single-shot timer service for the cooperative event loop.
///
/// Deadlines are polled: the session calls [`fire_due`](Self::fire_due) from
/// its tick and dispatches on the returned handles. An entry is removed the
/// moment it fires, so a handle can never fire twice, and `cancel_all` at
/// finalization guarantees nothing fires against a torn-down session.
#[derive(Debug, Default)]
pub struct TimeoutQueue {
    next_id: u64,
    scheduled_total: u64,
    /// (handle, deadline in ns on the session timer's clock)
    entries: Vec<(TimeoutHandle, u64)>,
}

impl TimeoutQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timeout `delay_ms` after `now_ns`.
    pub fn schedule(&mut self, now_ns: u64, delay_ms: f64) -> TimeoutHandle {
        let handle = TimeoutHandle(self.next_id);
        self.next_id += 1;
        self.scheduled_total += 1;
        let deadline = now_ns.saturating_add((delay_ms.max(0.0) * 1e6) as u64);
        self.entries.push((handle, deadline));
        handle
    }

    /// Idempotent: cancelling an unknown handle does nothing.
    pub fn cancel(&mut self, handle: TimeoutHandle) {
        self.entries.retain(|(h, _)| *h != handle);
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every timeout whose deadline has passed, ordered by
    /// deadline.
    pub fn fire_due(&mut self, now_ns: u64) -> Vec<TimeoutHandle> {
        let mut due: Vec<(TimeoutHandle, u64)> = Vec::new();
        self.entries.retain(|&(handle, deadline)| {
            if deadline <= now_ns {
                due.push((handle, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, deadline)| deadline);
        due.into_iter().map(|(handle, _)| handle).collect()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Count of timeouts ever scheduled on this queue.
    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_past_deadlines_in_order() {
        let mut q = TimeoutQueue::new();
        let late = q.schedule(0, 500.0);
        let early = q.schedule(0, 100.0);
        let future = q.schedule(0, 900.0);

        assert_eq!(q.fire_due(50_000_000), vec![]);
        assert_eq!(q.fire_due(600_000_000), vec![early, late]);
        assert_eq!(q.pending(), 1);
        assert_eq!(q.fire_due(1_000_000_000), vec![future]);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn a_fired_handle_never_fires_again() {
        let mut q = TimeoutQueue::new();
        let h = q.schedule(0, 100.0);
        assert_eq!(q.fire_due(200_000_000), vec![h]);
        assert_eq!(q.fire_due(400_000_000), vec![]);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimeoutQueue::new();
        let h = q.schedule(0, 100.0);
        q.cancel(h);
        q.cancel(h);
        assert_eq!(q.pending(), 0);
        assert_eq!(q.fire_due(u64::MAX), vec![]);
    }

    #[test]
    fn cancel_all_drops_everything_but_keeps_the_count() {
        let mut q = TimeoutQueue::new();
        q.schedule(0, 100.0);
        q.schedule(0, 200.0);
        q.cancel_all();
        assert_eq!(q.pending(), 0);
        assert_eq!(q.scheduled_total(), 2);
    }
}
