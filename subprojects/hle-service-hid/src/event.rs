//! Edge-triggered notification primitive.
//!
//! An [`Event`] carries no payload. [`Event::signal`] latches it; a waiter that consumes the
//! latch clears it, so one signal wakes one consumer once.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Single-slot, auto-clearing notification.
#[derive(Debug, Default)]
pub struct Event {
    signaled: Mutex<bool>,
    cond: Condvar,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the event and wakes every waiter.
    pub fn signal(&self) {
        *self.signaled.lock() = true;
        self.cond.notify_all();
    }

    /// Clears the latch without waking anyone.
    pub fn clear(&self) {
        *self.signaled.lock() = false;
    }

    /// Returns `true` if the event is latched.
    pub fn is_signaled(&self) -> bool {
        *self.signaled.lock()
    }

    /// Consumes the latch if set.
    pub fn try_consume(&self) -> bool {
        core::mem::take(&mut *self.signaled.lock())
    }

    /// Waits up to `timeout` for the latch and consumes it.
    ///
    /// Returns `false` if the timeout elapsed without a signal.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut signaled = self.signaled.lock();
        let _ = self.cond.wait_while_for(&mut signaled, |signaled| !*signaled, timeout);
        core::mem::take(&mut *signaled)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
        time::Instant,
    };

    use super::*;

    #[test]
    fn test_signal_is_consumed_once() {
        let event = Event::new();
        assert!(!event.try_consume());

        event.signal();
        event.signal();
        assert!(event.is_signaled());
        assert!(event.try_consume());
        assert!(!event.try_consume());
    }

    #[test]
    fn test_wait_timeout_without_signal() {
        let event = Event::new();
        assert!(!event.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn test_wait_timeout_ignores_wakeups_without_signal() {
        let event = Arc::new(Event::new());
        let done = Arc::new(AtomicBool::new(false));
        let notifier = {
            let event = Arc::clone(&event);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    event.cond.notify_all();
                    thread::sleep(Duration::from_millis(1));
                }
            })
        };

        let timeout = Duration::from_millis(50);
        let start = Instant::now();
        assert!(!event.wait_timeout(timeout));
        assert!(start.elapsed() >= timeout);

        done.store(true, Ordering::Relaxed);
        notifier.join().unwrap();
    }

    #[test]
    fn test_wait_wakes_on_signal_from_other_thread() {
        let event = Arc::new(Event::new());
        let signaler = {
            let event = Arc::clone(&event);
            thread::spawn(move || event.signal())
        };

        assert!(event.wait_timeout(Duration::from_secs(5)));
        signaler.join().unwrap();
        assert!(!event.is_signaled());
    }
}
