//! Mouse controller.

use std::sync::Arc;

use hle_settings::Settings;
use zerocopy::{FromZeros, IntoBytes};

use super::{ControllerBase, UpdateContext, touchscreen::to_screen};
use crate::{
    input::InputBackend,
    shmem::{
        Lifo, MouseAttribute, Section,
        layout::{MouseSharedMemoryFormat, MouseState},
    },
};

pub struct Mouse {
    settings: Arc<Settings>,
    input: Arc<dyn InputBackend>,
    shared_memory: MouseSharedMemoryFormat,
    enabled: bool,
}

impl Mouse {
    pub fn new(settings: Arc<Settings>, input: Arc<dyn InputBackend>) -> Self {
        let enabled = settings.values().mouse_enabled;
        Self {
            settings,
            input,
            shared_memory: MouseSharedMemoryFormat::new_zeroed(),
            enabled,
        }
    }

    pub fn shared_memory(&self) -> &MouseSharedMemoryFormat {
        &self.shared_memory
    }
}

impl ControllerBase for Mouse {
    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        let mut state = MouseState::default();
        if self.enabled {
            let sample = self.input.mouse_state();
            let last = *self.shared_memory.latest();
            let (x, y) = to_screen(sample.x, sample.y);
            let (x, y) = (x as i32, y as i32);

            state.x.set(x);
            state.y.set(y);
            state.delta_x.set(x - last.x.get());
            state.delta_y.set(y - last.y.get());
            state.wheel_delta_x.set(sample.wheel_x);
            state.wheel_delta_y.set(sample.wheel_y);
            state.buttons.set(sample.buttons.bits());
            state
                .attribute
                .set((MouseAttribute::TRANSFERABLE | MouseAttribute::IS_CONNECTED).bits());
        }

        self.shared_memory.push(ctx.cpu_ticks, state);
        ctx.write(Section::MOUSE, self.shared_memory.as_bytes());
    }

    fn on_load_input_devices(&mut self) {
        self.enabled = self.settings.values().mouse_enabled;
    }
}

#[cfg(test)]
mod tests {
    use hle_settings::Values;
    use hle_sys_mem::{Permissions, SharedMemory};

    use super::*;
    use crate::{
        input::{MouseSample, testing::FakeInput},
        shmem::{HID_SHARED_MEMORY_SIZE, MouseButton},
    };

    #[test]
    fn test_mouse_reports_position_and_deltas() {
        let input = Arc::new(FakeInput::default());
        let settings = Arc::new(Settings::new(Values {
            mouse_enabled: true,
            ..Values::default()
        }));
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut mouse = Mouse::new(settings, input.clone());

        *input.mouse.lock() = MouseSample { x: 0.5, y: 0.5, ..MouseSample::default() };
        mouse.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: 1 });

        *input.mouse.lock() = MouseSample {
            x: 0.75,
            y: 0.25,
            wheel_y: -1,
            buttons: MouseButton::LEFT,
            ..MouseSample::default()
        };
        mouse.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: 2 });

        let latest = mouse.shared_memory().latest();
        assert_eq!((latest.x.get(), latest.y.get()), (960, 180));
        assert_eq!((latest.delta_x.get(), latest.delta_y.get()), (320, -180));
        assert_eq!(latest.wheel_delta_y.get(), -1);
        assert_eq!(latest.buttons.get(), MouseButton::LEFT.bits());
        assert_ne!(latest.attribute.get() & MouseAttribute::IS_CONNECTED.bits(), 0);
    }

    #[test]
    fn test_disabled_mouse_is_disconnected() {
        let input = Arc::new(FakeInput::default());
        *input.mouse.lock() = MouseSample { x: 0.5, y: 0.5, ..MouseSample::default() };
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut mouse = Mouse::new(Arc::new(Settings::default()), input);

        mouse.on_update(&UpdateContext { shared_memory: &shmem, cpu_ticks: 1 });
        let latest = mouse.shared_memory().latest();
        assert_eq!(latest.sampling_number.get(), 1);
        assert_eq!(latest.attribute.get(), 0);
        assert_eq!((latest.x.get(), latest.y.get()), (0, 0));
    }
}
