//! Header-only placeholder controller.
//!
//! Used for device classes whose section carries no entries (home, sleep and capture
//! buttons) and for the six-axis slot, which owns no section at all.

use zerocopy::IntoBytes;

use super::{ControllerBase, UpdateContext};
use crate::shmem::{CommonLifoHeader, LIFO_ENTRY_COUNT, Section};

#[derive(Debug, Default)]
pub struct Stubbed {
    section: Option<Section>,
    header: CommonLifoHeader,
}

impl Stubbed {
    /// A placeholder that publishes its rolling header into `section`.
    pub fn with_section(section: Section) -> Self {
        Self {
            section: Some(section),
            header: CommonLifoHeader::default(),
        }
    }

    /// A placeholder that never writes.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &CommonLifoHeader {
        &self.header
    }
}

impl ControllerBase for Stubbed {
    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        let Some(section) = self.section else {
            return;
        };

        self.header.advance(ctx.cpu_ticks, LIFO_ENTRY_COUNT);
        ctx.write(section, self.header.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use hle_sys_mem::{Permissions, SharedMemory};

    use super::*;
    use crate::shmem::HID_SHARED_MEMORY_SIZE;

    #[test]
    fn test_header_rolls_within_section() {
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut stubbed = Stubbed::with_section(Section::SLEEP_BUTTON);
        for ticks in 1..=20 {
            stubbed.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: ticks });
        }

        assert_eq!(stubbed.header().count.get(), 16);
        assert_eq!(stubbed.header().tail.get(), 20 % 17);
        let bytes = shmem.read(Section::SLEEP_BUTTON.offset, 0x20).unwrap();
        assert_eq!(bytes.as_slice(), stubbed.header().as_bytes());
    }

    #[test]
    fn test_detached_never_writes() {
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut stubbed = Stubbed::detached();
        stubbed.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: 5 });

        assert_eq!(stubbed.header().count.get(), 0);
        assert!(shmem.with_bytes(|bytes| bytes.iter().all(|&b| b == 0)));
    }
}
