//! Shared memory layout and access for HID service.

pub mod layout;
pub mod lifo;
pub mod types;

pub use layout::{HID_SHARED_MEMORY_SIZE, HidSharedMemory, Lifo, NPAD_COUNT, Section};
pub use lifo::{CommonLifoHeader, LIFO_ENTRY_COUNT, LifoState, get_states};
pub use types::*;
