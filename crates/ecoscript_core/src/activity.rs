use crate::effect::Commit;

/// Delayed-action state machine owned by each organism.
///
/// An activity is idle until [`Activity::begin`] queues a commit with a
/// delay. Each [`Activity::advance`] counts one tick; once the count reaches
/// the delay the commit is handed back to the caller and the activity is
/// idle again. The commit is moved out when released, so it can be applied
/// at most once.
#[derive(Debug, Clone, Default)]
pub struct Activity {
    ticks: u32,
    ticks_needed: u32,
    pending: Option<Commit>,
}

impl Activity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn ticks_elapsed(&self) -> u32 {
        self.ticks
    }

    #[must_use]
    pub fn ticks_needed(&self) -> u32 {
        self.ticks_needed
    }

    /// Queues `commit` to be released after `delay` ticks. A zero delay
    /// releases it immediately.
    pub fn begin(&mut self, delay: u32, commit: Commit) -> Option<Commit> {
        self.ticks = 0;
        self.ticks_needed = delay;
        self.pending = Some(commit);
        self.release_if_due()
    }

    /// Counts one tick. Returns the commit when it is due. Does nothing on an
    /// idle activity.
    pub fn advance(&mut self) -> Option<Commit> {
        if self.pending.is_none() {
            return None;
        }
        self.ticks += 1;
        self.release_if_due()
    }

    fn release_if_due(&mut self) -> Option<Commit> {
        if self.ticks >= self.ticks_needed {
            self.pending.take()
        } else {
            None
        }
    }
}
