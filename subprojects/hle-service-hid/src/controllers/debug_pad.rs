//! Debug pad controller.

use std::sync::Arc;

use hle_settings::Settings;
use zerocopy::{FromZeros, IntoBytes};

use super::{ControllerBase, UpdateContext};
use crate::{
    input::{AnalogStick, InputBackend},
    shmem::{
        AnalogStickState, DeviceAttribute, Lifo, Section,
        layout::{DebugPadSharedMemoryFormat, DebugPadState},
    },
};

pub struct DebugPad {
    settings: Arc<Settings>,
    input: Arc<dyn InputBackend>,
    shared_memory: DebugPadSharedMemoryFormat,
    enabled: bool,
}

impl DebugPad {
    pub fn new(settings: Arc<Settings>, input: Arc<dyn InputBackend>) -> Self {
        let enabled = settings.values().debug_pad_enabled;
        Self {
            settings,
            input,
            shared_memory: DebugPadSharedMemoryFormat::new_zeroed(),
            enabled,
        }
    }

    pub fn shared_memory(&self) -> &DebugPadSharedMemoryFormat {
        &self.shared_memory
    }
}

impl ControllerBase for DebugPad {
    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        let mut state = DebugPadState::default();
        if self.enabled {
            let sample = self.input.debug_pad_state();
            state.attribute.set(DeviceAttribute::IS_CONNECTED.bits());
            state.buttons.set(sample.buttons.bits());
            state.l_stick = stick(sample.l_stick);
            state.r_stick = stick(sample.r_stick);
        }

        self.shared_memory.push(ctx.cpu_ticks, state);
        ctx.write(Section::DEBUG_PAD, self.shared_memory.as_bytes());
    }

    fn on_load_input_devices(&mut self) {
        self.enabled = self.settings.values().debug_pad_enabled;
    }
}

fn stick(stick: AnalogStick) -> AnalogStickState {
    AnalogStickState::new(stick.x, stick.y)
}

#[cfg(test)]
mod tests {
    use hle_settings::Values;
    use hle_sys_mem::{Permissions, SharedMemory};

    use super::*;
    use crate::{
        input::{DebugPadSample, testing::FakeInput},
        shmem::{DebugPadButton, HID_SHARED_MEMORY_SIZE},
    };

    #[test]
    fn test_disabled_debug_pad_publishes_disconnected_entries() {
        let input = Arc::new(FakeInput::default());
        *input.debug_pad.lock() = DebugPadSample {
            buttons: DebugPadButton::A,
            ..DebugPadSample::default()
        };
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut pad = DebugPad::new(Arc::new(Settings::default()), input);

        pad.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: 10 });
        let latest = pad.shared_memory().latest();
        assert_eq!(latest.attribute.get(), 0);
        assert_eq!(latest.buttons.get(), 0);
        assert_eq!(latest.sampling_number.get(), 1);
    }

    #[test]
    fn test_enabled_debug_pad_copies_host_state() {
        let input = Arc::new(FakeInput::default());
        *input.debug_pad.lock() = DebugPadSample {
            buttons: DebugPadButton::A | DebugPadButton::START,
            l_stick: AnalogStick { x: 100, y: -100 },
            r_stick: AnalogStick { x: -5, y: 5 },
        };
        let settings = Arc::new(Settings::new(Values {
            debug_pad_enabled: true,
            ..Values::default()
        }));
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut pad = DebugPad::new(settings, input);

        pad.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: 10 });

        let bytes = shmem.read(Section::DEBUG_PAD.offset, Section::DEBUG_PAD.size).unwrap();
        assert_eq!(bytes.as_slice(), pad.shared_memory().as_bytes());

        let latest = pad.shared_memory().latest();
        assert_eq!(latest.attribute.get(), DeviceAttribute::IS_CONNECTED.bits());
        assert_eq!(latest.buttons.get(), (DebugPadButton::A | DebugPadButton::START).bits());
        assert_eq!(latest.l_stick, AnalogStickState::new(100, -100));
        assert_eq!(latest.r_stick, AnalogStickState::new(-5, 5));
    }
}
