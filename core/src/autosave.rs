/// Debounced autosave scheduling, independent of any timer primitive.
///
/// Every persistence-eligible mutation calls [`Debounce::request`]; the host
/// arms a one-shot timer only when it returns a delay, so a burst of
/// mutations schedules a single write. When the timer fires the host calls
/// [`Debounce::fire`] and, if it returns true, serializes the state as it is
/// *then*, never the state at scheduling time. Writes are best-effort; a
/// failed write does not reschedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Debounce {
    delay_ms: u32,
    pending: bool,
}

/// Delay between the first mutation of a burst and the save write.
pub const AUTOSAVE_DELAY_MS: u32 = 400;

impl Debounce {
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: false,
        }
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the delay to arm a timer with, or `None` when a write is
    /// already pending.
    pub fn request(&mut self) -> Option<u32> {
        if self.pending {
            None
        } else {
            self.pending = true;
            Some(self.delay_ms)
        }
    }

    /// The armed timer elapsed. True when a write is due now.
    pub fn fire(&mut self) -> bool {
        core::mem::take(&mut self.pending)
    }

    /// Drops any pending write (new game, shutdown). Safe when idle.
    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(AUTOSAVE_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_mutations_schedules_one_write() {
        let mut debounce = Debounce::default();
        assert_eq!(debounce.request(), Some(AUTOSAVE_DELAY_MS));
        assert_eq!(debounce.request(), None);
        assert_eq!(debounce.request(), None);

        assert!(debounce.fire());
        // fired: nothing pending anymore
        assert!(!debounce.fire());
    }

    #[test]
    fn mutation_after_fire_schedules_again() {
        let mut debounce = Debounce::new(100);
        debounce.request();
        debounce.fire();
        assert_eq!(debounce.request(), Some(100));
    }

    #[test]
    fn cancel_is_idempotent_and_suppresses_the_write() {
        let mut debounce = Debounce::default();
        debounce.cancel(); // never scheduled: still fine
        debounce.request();
        debounce.cancel();
        debounce.cancel();
        assert!(!debounce.fire());
    }
}
