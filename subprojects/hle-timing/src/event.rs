use std::{fmt, time::Duration};

/// Callback invoked when a scheduled event fires.
///
/// The argument is how late the event ran relative to its deadline.
pub type TimedCallback = Box<dyn Fn(Duration) + Send + Sync>;

/// A named, reusable timed event.
///
/// Events are compared by identity: scheduling the same [`EventType`] twice queues two
/// firings, and unscheduling removes every pending firing of that event.
pub struct EventType {
    name: String,
    callback: TimedCallback,
}

impl EventType {
    pub(crate) fn new(name: impl Into<String>, callback: TimedCallback) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }

    /// Returns the event's debug name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn fire(&self, late: Duration) {
        (self.callback)(late)
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
