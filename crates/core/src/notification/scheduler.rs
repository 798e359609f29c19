//! Notification lifecycle scheduler

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use super::{NotificationPayload, NotificationTask, TaskHandle, TaskState, Transition};
use crate::clock::Clock;
use crate::config::NotificationConfig;

/// Timer ordering key; `seq` breaks ties between equal deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct TimerKey {
    deadline: Duration,
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerPurpose {
    /// Visible period elapsed
    Dismiss,
    /// Exit grace period elapsed
    Remove,
}

#[derive(Debug)]
struct Entry {
    task: NotificationTask,
    timer: Option<TimerKey>,
}

/// Owns every notification task and the one timer each may have armed
///
/// All methods are synchronous. Time only moves when [`tick`](Self::tick) is
/// called; each tick fires the timers that were due when it started, so a
/// task that enters Dismissing stays there for at least one tick.
///
/// Transitions wait in a log bounded by `NotificationConfig::transition_log`
/// until [`drain_transitions`](Self::drain_transitions) takes them.
///
/// # Example
///
/// ```
/// use sentinelx_core::clock::ManualClock;
/// use sentinelx_core::{NotificationConfig, NotificationPayload, NotificationScheduler, TaskState, ToastLevel};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let mut scheduler = NotificationScheduler::new(Arc::new(clock.clone()), NotificationConfig::default());
///
/// let handle = scheduler.schedule(
///     NotificationPayload::toast("Scan complete", ToastLevel::Success),
///     Duration::from_secs(3),
/// );
/// assert_eq!(scheduler.state(handle), Some(TaskState::Visible));
///
/// clock.advance(Duration::from_secs(3));
/// scheduler.tick();
/// assert_eq!(scheduler.state(handle), Some(TaskState::Dismissing));
/// ```
pub struct NotificationScheduler {
    clock: Arc<dyn Clock>,
    config: NotificationConfig,
    next_handle: u64,
    next_timer_seq: u64,
    entries: HashMap<TaskHandle, Entry>,
    timers: BTreeMap<TimerKey, (TaskHandle, TimerPurpose)>,
    awaiting_attach: Vec<TaskHandle>,
    transitions: VecDeque<Transition>,
    performed: usize,
}

impl NotificationScheduler {
    pub fn new(clock: Arc<dyn Clock>, config: NotificationConfig) -> Self {
        Self {
            clock,
            config,
            next_handle: 0,
            next_timer_seq: 0,
            entries: HashMap::new(),
            timers: BTreeMap::new(),
            awaiting_attach: Vec::new(),
            transitions: VecDeque::new(),
            performed: 0,
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Current scheduler time
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Show a widget now and dismiss it after `duration`.
    ///
    /// A zero duration still shows the widget; it starts dismissing on the
    /// next tick.
    pub fn schedule(&mut self, payload: NotificationPayload, duration: Duration) -> TaskHandle {
        let handle = self.create(payload, duration);
        self.attach(handle);
        handle
    }

    /// [`schedule`](Self::schedule) with the configured duration for the kind
    pub fn schedule_default(&mut self, payload: NotificationPayload) -> TaskHandle {
        let duration = self.config.duration_for(payload.kind());
        self.schedule(payload, duration)
    }

    /// Create a widget that attaches (becomes visible) on the next tick.
    pub fn schedule_deferred(
        &mut self,
        payload: NotificationPayload,
        duration: Duration,
    ) -> TaskHandle {
        let handle = self.create(payload, duration);
        self.awaiting_attach.push(handle);
        handle
    }

    /// Force a task into Dismissing.
    ///
    /// Returns `true` if the task was Pending or Visible. Cancelling a task
    /// that is already dismissing, removed, or unknown does nothing.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.entries.get(&handle).map(|e| e.task.state) {
            Some(TaskState::Pending) | Some(TaskState::Visible) => {
                self.awaiting_attach.retain(|h| *h != handle);
                self.begin_dismiss(handle);
                true
            }
            _ => {
                tracing::trace!(handle = %handle, "cancel ignored");
                false
            }
        }
    }

    /// Cancel every Pending or Visible task. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let mut handles: Vec<TaskHandle> = self
            .entries
            .values()
            .filter(|e| matches!(e.task.state, TaskState::Pending | TaskState::Visible))
            .map(|e| e.task.handle)
            .collect();
        handles.sort();
        handles.into_iter().filter(|h| self.cancel(*h)).count()
    }

    /// Advance the state machines to the clock's current time.
    ///
    /// Returns the number of transitions performed.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let performed = self.performed;

        // Snapshot due timers first: anything armed during this tick waits
        let due: Vec<TimerKey> = self
            .timers
            .range(
                ..=TimerKey {
                    deadline: now,
                    seq: u64::MAX,
                },
            )
            .map(|(key, _)| *key)
            .collect();

        for handle in std::mem::take(&mut self.awaiting_attach) {
            self.attach(handle);
        }

        for key in due {
            // A transition earlier in this tick may already have disarmed it
            let Some((handle, purpose)) = self.timers.remove(&key) else {
                continue;
            };
            if let Some(entry) = self.entries.get_mut(&handle) {
                entry.timer = None;
            }
            match purpose {
                TimerPurpose::Dismiss => self.begin_dismiss(handle),
                TimerPurpose::Remove => self.remove(handle),
            }
        }

        self.performed - performed
    }

    /// State of a task. Collected tasks report `Removed`; handles this
    /// scheduler never issued report `None`.
    pub fn state(&self, handle: TaskHandle) -> Option<TaskState> {
        match self.entries.get(&handle) {
            Some(entry) => Some(entry.task.state),
            None if handle.0 < self.next_handle => Some(TaskState::Removed),
            None => None,
        }
    }

    pub fn task(&self, handle: TaskHandle) -> Option<&NotificationTask> {
        self.entries.get(&handle).map(|e| &e.task)
    }

    /// Tasks currently on screen (Visible or Dismissing), oldest first
    pub fn on_screen(&self) -> Vec<&NotificationTask> {
        let mut tasks: Vec<&NotificationTask> = self
            .entries
            .values()
            .map(|e| &e.task)
            .filter(|t| matches!(t.state, TaskState::Visible | TaskState::Dismissing))
            .collect();
        tasks.sort_by_key(|t| t.handle);
        tasks
    }

    /// Number of armed timers
    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of tasks not yet removed
    pub fn active_tasks(&self) -> usize {
        self.entries.len()
    }

    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest time at which a tick has work to do
    pub fn next_deadline(&self) -> Option<Duration> {
        if !self.awaiting_attach.is_empty() {
            return Some(self.clock.now());
        }
        self.timers.keys().next().map(|key| key.deadline)
    }

    /// Take the transitions recorded since the last drain, oldest first
    pub fn drain_transitions(&mut self) -> Vec<Transition> {
        self.transitions.drain(..).collect()
    }

    /// Number of transitions waiting to be drained
    pub fn retained_transitions(&self) -> usize {
        self.transitions.len()
    }

    fn create(&mut self, payload: NotificationPayload, duration: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;

        let task = NotificationTask {
            handle,
            payload,
            created_at: self.clock.now(),
            duration,
            state: TaskState::Pending,
        };
        tracing::debug!(handle = %handle, kind = %task.kind(), duration_ms = duration.as_millis() as u64, "notification created");
        self.entries.insert(handle, Entry { task, timer: None });
        handle
    }

    fn attach(&mut self, handle: TaskHandle) {
        let duration = match self.entries.get(&handle) {
            Some(entry) if entry.task.state == TaskState::Pending => entry.task.duration,
            _ => return,
        };
        self.set_state(handle, TaskState::Visible);
        self.arm(handle, duration, TimerPurpose::Dismiss);
    }

    fn begin_dismiss(&mut self, handle: TaskHandle) {
        let kind = match self.entries.get(&handle) {
            Some(entry) => entry.task.kind(),
            None => return,
        };
        self.disarm(handle);
        self.set_state(handle, TaskState::Dismissing);
        let grace = self.config.grace_for(kind);
        self.arm(handle, grace, TimerPurpose::Remove);
    }

    fn remove(&mut self, handle: TaskHandle) {
        self.disarm(handle);
        self.set_state(handle, TaskState::Removed);
        self.entries.remove(&handle);
    }

    fn set_state(&mut self, handle: TaskHandle, to: TaskState) {
        let at = self.clock.now();
        let Some(entry) = self.entries.get_mut(&handle) else {
            return;
        };
        let from = entry.task.state;
        entry.task.state = to;
        tracing::debug!(handle = %handle, from = %from, to = %to, "notification transition");
        self.performed += 1;

        let capacity = self.config.transition_log;
        if capacity == 0 {
            return;
        }
        if self.transitions.len() >= capacity {
            self.transitions.pop_front();
            tracing::trace!(capacity, "transition log full, dropped oldest");
        }
        self.transitions.push_back(Transition {
            handle,
            payload: entry.task.payload.clone(),
            from,
            to,
            at,
        });
    }

    fn arm(&mut self, handle: TaskHandle, after: Duration, purpose: TimerPurpose) {
        self.disarm(handle);
        let key = TimerKey {
            deadline: self.clock.now() + after,
            seq: self.next_timer_seq,
        };
        self.next_timer_seq += 1;
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.timer = Some(key);
            self.timers.insert(key, (handle, purpose));
        }
    }

    fn disarm(&mut self, handle: TaskHandle) {
        if let Some(key) = self.entries.get_mut(&handle).and_then(|e| e.timer.take()) {
            self.timers.remove(&key);
        }
    }
}

impl std::fmt::Debug for NotificationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationScheduler")
            .field("now", &self.clock.now())
            .field("active_tasks", &self.entries.len())
            .field("live_timers", &self.timers.len())
            .finish()
    }
}
