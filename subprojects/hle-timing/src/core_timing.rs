//! Virtual-time event scheduler.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    sync::Arc,
    time::Duration,
};

use parking_lot::Mutex;

use crate::{
    counter,
    event::{EventType, TimedCallback},
};

/// Scheduling surface consumed by periodic emulated services.
///
/// Implementations must not hold internal locks while invoking event callbacks, so that
/// a callback may reschedule itself.
pub trait Scheduler: Send + Sync {
    /// Creates a reusable event bound to `callback`.
    fn create_event(&self, name: &str, callback: TimedCallback) -> Arc<EventType>;

    /// Queues `event` to fire `after` the current emulated time.
    fn schedule_event(&self, after: Duration, event: &Arc<EventType>);

    /// Removes every pending firing of `event`.
    fn unschedule_event(&self, event: &Arc<EventType>);

    /// Returns the current emulated time.
    fn global_time(&self) -> Duration;

    /// Returns the current value of the emulated 19.2 MHz system counter.
    fn cpu_ticks(&self) -> u64 {
        counter::ns_to_ticks(duration_to_ns(self.global_time()))
    }
}

/// Computes the delay until the next firing of a periodic event.
///
/// The observed lateness is subtracted from the nominal cadence and clamped at zero, so an
/// event that is overdue by more than a whole period fires again immediately.
#[inline]
pub fn next_delay(cadence: Duration, lateness: Duration) -> Duration {
    cadence.saturating_sub(lateness)
}

/// Deterministic emulated clock.
///
/// Time only moves when [`CoreTiming::advance`] is called. Every event whose deadline falls
/// within the advanced window fires in deadline order; events sharing a deadline fire in the
/// order they were scheduled.
pub struct CoreTiming {
    inner: Mutex<Inner>,
}

struct Inner {
    global_ns: u64,
    next_fifo_id: u64,
    queue: BinaryHeap<Reverse<QueuedEvent>>,
}

struct QueuedEvent {
    time_ns: u64,
    fifo_id: u64,
    event: Arc<EventType>,
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.time_ns, self.fifo_id).cmp(&(other.time_ns, other.fifo_id))
    }
}

impl CoreTiming {
    /// Creates a clock starting at time zero with no pending events.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                global_ns: 0,
                next_fifo_id: 0,
                queue: BinaryHeap::new(),
            }),
        }
    }

    /// Moves emulated time forward by `by`, firing every event that becomes due.
    ///
    /// Callbacks run without the queue lock held. Events they schedule with a deadline inside
    /// the advanced window fire within the same call.
    pub fn advance(&self, by: Duration) {
        let target = {
            let mut inner = self.inner.lock();
            inner.global_ns = inner.global_ns.saturating_add(duration_to_ns(by));
            inner.global_ns
        };

        loop {
            let due = {
                let mut inner = self.inner.lock();
                if inner
                    .queue
                    .peek()
                    .is_some_and(|Reverse(next)| next.time_ns <= target)
                {
                    inner.queue.pop()
                } else {
                    None
                }
            };

            let Some(Reverse(due)) = due else {
                break;
            };

            let late = Duration::from_nanos(target - due.time_ns);
            tracing::trace!(event = due.event.name(), late_ns = late.as_nanos() as u64, "firing");
            due.event.fire(late);
        }
    }

    /// Returns the number of pending firings across all events.
    pub fn pending_events(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Returns `true` if `event` has at least one pending firing.
    pub fn is_scheduled(&self, event: &Arc<EventType>) -> bool {
        self.inner
            .lock()
            .queue
            .iter()
            .any(|Reverse(queued)| Arc::ptr_eq(&queued.event, event))
    }

    /// Returns the deadline of the earliest pending firing, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .lock()
            .queue
            .peek()
            .map(|Reverse(next)| Duration::from_nanos(next.time_ns))
    }
}

impl Default for CoreTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for CoreTiming {
    fn create_event(&self, name: &str, callback: TimedCallback) -> Arc<EventType> {
        Arc::new(EventType::new(name, callback))
    }

    fn schedule_event(&self, after: Duration, event: &Arc<EventType>) {
        let mut inner = self.inner.lock();
        let time_ns = inner.global_ns.saturating_add(duration_to_ns(after));
        let fifo_id = inner.next_fifo_id;
        inner.next_fifo_id += 1;
        inner.queue.push(Reverse(QueuedEvent {
            time_ns,
            fifo_id,
            event: Arc::clone(event),
        }));
    }

    fn unschedule_event(&self, event: &Arc<EventType>) {
        self.inner
            .lock()
            .queue
            .retain(|Reverse(queued)| !Arc::ptr_eq(&queued.event, event));
    }

    fn global_time(&self) -> Duration {
        Duration::from_nanos(self.inner.lock().global_ns)
    }
}

fn duration_to_ns(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
