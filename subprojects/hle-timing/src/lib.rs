//! Emulated core timing.
//!
//! This crate provides the virtual clock that drives every periodic activity of the
//! high-level emulated services:
//! - A [`Scheduler`] abstraction exposing "schedule after duration" and "cancel"
//! - [`CoreTiming`], a deterministic virtual-time implementation of that abstraction
//! - Conversions between emulated nanoseconds and the 19.2 MHz system counter
//!
//! Events are created once with a callback and can then be (re)scheduled any number of
//! times. When an event fires, its callback receives how late it ran relative to the
//! deadline it was scheduled for, so periodic users can correct for drift with
//! [`next_delay`].

mod core_timing;
pub mod counter;
mod event;

pub use self::{
    core_timing::{CoreTiming, Scheduler, next_delay},
    event::{EventType, TimedCallback},
};
