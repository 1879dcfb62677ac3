// core/timer.rs
//
// One-shot deferred tasks driven by simulated time.
//
// Usage:
//   let mut timers = Scheduler::new();
//   let handle = timers.schedule(1.0, Deferred::Respawn);
//   for task in timers.advance(dt) { ... }   // fires once the delay has elapsed
//   timers.cancel(handle);                   // no-op if already fired

/// Handle to a scheduled task, usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u32);

#[derive(Debug, Clone)]
struct Pending<T> {
    handle: TimerHandle,
    due: f64,
    payload: T,
}

/// Single-shot timer queue. Each task fires exactly once, in due-time order
/// (ties broken by scheduling order), unless cancelled first.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: f64,
    next_id: u32,
    pending: Vec<Pending<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Schedule `payload` to fire after `delay` seconds of simulated time.
    /// Negative delays fire on the next advance.
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            handle,
            due: self.now + delay.max(0.0) as f64,
            payload,
        });
        handle
    }

    /// Cancel a pending task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|p| p.handle == handle) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Whether the task is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Advance simulated time and return the payloads of every task now due.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt.max(0.0) as f64;
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.remove(i));
            } else {
                i += 1;
            }
        }
        // Stable sort keeps scheduling order among equal due times.
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|p| p.payload).collect()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_delay() {
        let mut timers = Scheduler::new();
        let handle = timers.schedule(1.0, "respawn");
        assert!(timers.advance(0.5).is_empty());
        assert!(timers.is_pending(handle));
        assert_eq!(timers.advance(0.5), vec!["respawn"]);
        assert!(!timers.is_pending(handle));
        assert!(timers.advance(10.0).is_empty());
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut timers = Scheduler::new();
        let handle = timers.schedule(0.1, 7u32);
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.advance(1.0).is_empty());
        assert!(!timers.is_pending(handle));
    }

    #[test]
    fn due_order_then_schedule_order() {
        let mut timers = Scheduler::new();
        timers.schedule(0.3, 'c');
        timers.schedule(0.1, 'a');
        timers.schedule(0.1, 'b');
        assert_eq!(timers.advance(1.0), vec!['a', 'b', 'c']);
    }

    #[test]
    fn delay_is_relative_to_current_time() {
        let mut timers = Scheduler::new();
        timers.advance(5.0);
        timers.schedule(1.0, ());
        assert!(timers.advance(0.9).is_empty());
        assert_eq!(timers.advance(0.2).len(), 1);
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut timers = Scheduler::new();
        timers.schedule(-1.0, 1);
        timers.schedule(0.0, 2);
        assert_eq!(timers.advance(0.0), vec![1, 2]);
    }
}
