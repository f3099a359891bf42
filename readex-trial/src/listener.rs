use readex_core::{KeySet, Side};

/// Single-shot subscription scoped to the left/right choice keys.
///
/// Arming stamps the moment input capture opened; delivering a scoped key
/// consumes the arming, so each captured reaction time is attributable to
/// exactly one key event. Keys outside both sets leave the listener armed
/// and are never seen by the controller. Disarming is idempotent.
#[derive(Debug, Clone)]
pub struct ChoiceListener {
    left: KeySet,
    right: KeySet,
    armed_at: Option<u64>,
}

impl ChoiceListener {
    pub fn new(left: KeySet, right: KeySet) -> Self {
        Self {
            left,
            right,
            armed_at: None,
        }
    }

    pub fn arm(&mut self, now_ns: u64) {
        self.armed_at = Some(now_ns);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Deliver a raw key. Returns the classified side and the arm timestamp,
    /// disarming the listener, or `None` if the listener is disarmed or the
    /// key is out of scope.
    pub fn take(&mut self, key: char) -> Option<(Side, u64)> {
        let armed_at = self.armed_at?;
        let side = if self.left.contains(key) {
            Side::Left
        } else if self.right.contains(key) {
            Side::Right
        } else {
            return None;
        };
        self.armed_at = None;
        Some((side, armed_at))
    }
}

/// Single-shot subscription scoped to one advance key set.
#[derive(Debug, Clone)]
pub struct AdvanceListener {
    keys: KeySet,
    armed_at: Option<u64>,
}

impl AdvanceListener {
    pub fn new(keys: KeySet) -> Self {
        Self {
            keys,
            armed_at: None,
        }
    }

    pub fn arm(&mut self, now_ns: u64) {
        self.armed_at = Some(now_ns);
    }

    pub fn disarm(&mut self) {
        self.armed_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Deliver a raw key, returning the arm timestamp when it qualifies.
    pub fn take(&mut self, key: char) -> Option<u64> {
        let armed_at = self.armed_at?;
        if !self.keys.contains(key) {
            return None;
        }
        self.armed_at = None;
        Some(armed_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_scope_keys_leave_the_listener_armed() {
        let mut listener = ChoiceListener::new(KeySet::from('e'), KeySet::from('i'));
        listener.arm(42);
        assert_eq!(listener.take('x'), None);
        assert!(listener.is_armed());
        assert_eq!(listener.take('i'), Some((Side::Right, 42)));
        assert!(!listener.is_armed());
    }

    #[test]
    fn delivery_is_single_shot() {
        let mut listener = ChoiceListener::new(KeySet::from('e'), KeySet::from('i'));
        listener.arm(0);
        assert!(listener.take('e').is_some());
        assert_eq!(listener.take('e'), None);
    }

    #[test]
    fn disarm_is_idempotent() {
        let mut listener = AdvanceListener::new(KeySet::from(' '));
        listener.arm(0);
        listener.disarm();
        listener.disarm();
        assert_eq!(listener.take(' '), None);
    }
}
