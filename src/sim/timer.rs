//! Deferred one-shot events
//!
//! Events are scheduled with a delay and released by `advance` once the
//! accumulated elapsed time reaches their due time. Nothing can be cancelled.

use serde::{Deserialize, Serialize};

/// Events that fire after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEvent {
    /// Show the failure screen after the death animation
    RevealFailureScreen,
    /// Open the first quiz after crossing the finish line
    StartQuiz,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    due: f64,
    seq: u64,
    event: TimedEvent,
}

/// Timer queue drained once per frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    now: f64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time seen by the queue (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, event: TimedEvent) -> bool {
        self.pending.iter().any(|p| p.event == event)
    }

    /// Schedule `event` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, event: TimedEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now + delay.max(0.0) as f64,
            seq,
            event,
        });
    }

    /// Advance time and return every event now due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<TimedEvent> {
        self.now += dt.max(0.0) as f64;

        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_delay_not_before() {
        let mut timers = TimerQueue::new();
        timers.schedule(3.0, TimedEvent::RevealFailureScreen);

        for _ in 0..5 {
            assert!(timers.advance(0.5).is_empty());
        }
        assert_eq!(timers.advance(0.5), vec![TimedEvent::RevealFailureScreen]);
        assert!(timers.is_empty());
        assert!(timers.advance(10.0).is_empty());
    }

    #[test]
    fn test_releases_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(5.0, TimedEvent::StartQuiz);
        timers.schedule(3.0, TimedEvent::RevealFailureScreen);
        assert_eq!(timers.len(), 2);
        assert!(timers.is_pending(TimedEvent::StartQuiz));

        assert_eq!(
            timers.advance(6.0),
            vec![TimedEvent::RevealFailureScreen, TimedEvent::StartQuiz]
        );
    }

    #[test]
    fn test_same_due_time_keeps_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(1.0, TimedEvent::StartQuiz);
        timers.schedule(1.0, TimedEvent::RevealFailureScreen);
        assert_eq!(
            timers.advance(1.0),
            vec![TimedEvent::StartQuiz, TimedEvent::RevealFailureScreen]
        );
    }

    #[test]
    fn test_delay_counts_from_schedule_time() {
        let mut timers = TimerQueue::new();
        timers.advance(10.0);
        timers.schedule(2.0, TimedEvent::StartQuiz);
        assert!(timers.advance(1.5).is_empty());
        assert_eq!(timers.advance(0.5), vec![TimedEvent::StartQuiz]);
    }
}
