use std::time::Duration;

use serde::Serialize;

/// Work the controller defers by a fixed display delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum DeferredTask {
    /// Return a control from its transient Success label to Idle.
    ResetControl { control_id: String },
    /// Swap the loading skeleton for the real item details.
    RevealItemDetails,
    /// Leave the page once the busy label has been shown for a moment.
    Navigate { url: String },
    /// Restore a login-required button and ask the user to log in.
    PromptLogin { control_id: String },
}

#[derive(Debug, Clone)]
struct Entry {
    due: Duration,
    seq: u64,
    task: DeferredTask,
}

/// Single-threaded timer queue on a virtual clock.
///
/// Nothing fires on its own: the host advances the clock and runs whatever
/// became due, which keeps every delay deterministic under test.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    epoch: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: DeferredTask) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        self.entries.push(entry);
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumped by every [`TimerQueue::clear`].
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Drop every queued task, e.g. when the page is left.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.epoch += 1;
    }

    /// Time until the earliest task is due, or `None` when nothing is queued.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries
            .iter()
            .map(|e| e.due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return due tasks, earliest first.
    /// Tasks due at the same instant keep their scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<DeferredTask> {
        self.now += by;

        let now = self.now;
        let (mut due, waiting): (Vec<Entry>, Vec<Entry>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = waiting;

        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.task).collect()
    }
}
