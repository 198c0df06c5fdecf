//! Basic xpad controller.
//!
//! The four basic xpad LIFOs only advance their sampling counters; no host device ever
//! backs them.

use zerocopy::{FromZeros, IntoBytes};

use super::{ControllerBase, UpdateContext};
use crate::shmem::{
    Lifo, Section,
    layout::{XpadSharedMemoryFormat, XpadState},
};

pub struct XPad {
    shared_memory: XpadSharedMemoryFormat,
}

impl XPad {
    pub fn new() -> Self {
        Self {
            shared_memory: XpadSharedMemoryFormat::new_zeroed(),
        }
    }

    pub fn shared_memory(&self) -> &XpadSharedMemoryFormat {
        &self.shared_memory
    }
}

impl Default for XPad {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerBase for XPad {
    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        for pad in &mut self.shared_memory.pads {
            pad.push(ctx.cpu_ticks, XpadState::default());
        }
        ctx.write(Section::XPAD, self.shared_memory.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use hle_sys_mem::{Permissions, SharedMemory};

    use super::*;
    use crate::shmem::HID_SHARED_MEMORY_SIZE;

    #[test]
    fn test_every_pad_advances() {
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut xpad = XPad::new();
        for ticks in 0..3 {
            xpad.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: ticks });
        }

        for pad in &xpad.shared_memory().pads {
            assert_eq!(pad.header.count.get(), 3);
            assert_eq!(pad.latest().sampling_number.get(), 3);
        }
    }
}
