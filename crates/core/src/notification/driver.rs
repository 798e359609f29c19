//! Async driver for the scheduler
//!
//! Sleeps until the next timer deadline, ticks, and hands every transition to
//! a sink. The scheduler's clock has to advance with tokio time
//! ([`TokioClock`](crate::clock::TokioClock)); with a manual clock nothing
//! would ever come due.

use parking_lot::Mutex;

use super::{NotificationScheduler, Transition};

/// Drive `scheduler` until every task has been removed.
///
/// The lock is only held while ticking or draining, never across a sleep, so
/// other callers may schedule or cancel tasks while the driver runs.
pub async fn run_until_idle<F>(scheduler: &Mutex<NotificationScheduler>, mut sink: F)
where
    F: FnMut(Transition),
{
    loop {
        let (transitions, wait) = {
            let mut guard = scheduler.lock();
            let transitions = guard.drain_transitions();
            let wait = if guard.is_idle() {
                None
            } else {
                let now = guard.now();
                guard.next_deadline().map(|deadline| deadline.saturating_sub(now))
            };
            (transitions, wait)
        };

        for transition in transitions {
            sink(transition);
        }

        let Some(wait) = wait else {
            break;
        };
        tokio::time::sleep(wait).await;
        scheduler.lock().tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TokioClock;
    use crate::config::NotificationConfig;
    use crate::notification::{NotificationPayload, TaskState, ToastLevel};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_runs_every_task_to_removal() {
        let scheduler = Mutex::new(NotificationScheduler::new(
            Arc::new(TokioClock::new()),
            NotificationConfig::default(),
        ));
        let start = tokio::time::Instant::now();

        let (toast, sms) = {
            let mut guard = scheduler.lock();
            (
                guard.schedule_default(NotificationPayload::toast("Scanning", ToastLevel::Info)),
                guard.schedule_default(NotificationPayload::sms("a@b.c", 3)),
            )
        };

        let mut seen = Vec::new();
        run_until_idle(&scheduler, |t| seen.push((t.handle, t.to, t.at))).await;

        // SMS: 5000ms visible + 400ms grace
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(5400), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(5450), "{elapsed:?}");

        let toast_states: Vec<TaskState> = seen
            .iter()
            .filter(|(h, _, _)| *h == toast)
            .map(|(_, s, _)| *s)
            .collect();
        assert_eq!(
            toast_states,
            vec![TaskState::Visible, TaskState::Dismissing, TaskState::Removed]
        );

        let sms_removed_at = seen
            .iter()
            .find(|(h, s, _)| *h == sms && *s == TaskState::Removed)
            .map(|(_, _, at)| *at)
            .unwrap();
        assert!(sms_removed_at >= Duration::from_millis(5400));

        let guard = scheduler.lock();
        assert!(guard.is_idle());
        assert_eq!(guard.live_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_immediately_when_idle() {
        let scheduler = Mutex::new(NotificationScheduler::new(
            Arc::new(TokioClock::new()),
            NotificationConfig::default(),
        ));
        let mut count = 0;
        run_until_idle(&scheduler, |_| count += 1).await;
        assert_eq!(count, 0);
    }
}
