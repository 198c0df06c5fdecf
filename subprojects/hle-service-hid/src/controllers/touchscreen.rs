//! Touch screen controller.

use std::sync::Arc;

use hle_settings::{Settings, TouchscreenConfig};
use zerocopy::{FromZeros, IntoBytes};

use super::{ControllerBase, UpdateContext};
use crate::{
    input::InputBackend,
    shmem::{
        Lifo, Section, TouchAttribute,
        layout::{TouchScreenSharedMemoryFormat, TouchScreenState},
    },
};

/// Width of the undocked screen in pixels.
pub const SCREEN_WIDTH: u32 = 1280;
/// Height of the undocked screen in pixels.
pub const SCREEN_HEIGHT: u32 = 720;

/// Converts a normalized coordinate pair into screen pixels.
pub(crate) fn to_screen(x: f32, y: f32) -> (u32, u32) {
    let scale = |value: f32, extent: u32| {
        ((value.clamp(0.0, 1.0) * extent as f32) as u32).min(extent - 1)
    };
    (scale(x, SCREEN_WIDTH), scale(y, SCREEN_HEIGHT))
}

pub struct Touchscreen {
    settings: Arc<Settings>,
    input: Arc<dyn InputBackend>,
    shared_memory: Box<TouchScreenSharedMemoryFormat>,
    config: TouchscreenConfig,
    last_touch: u64,
    was_pressed: bool,
}

impl Touchscreen {
    pub fn new(settings: Arc<Settings>, input: Arc<dyn InputBackend>) -> Self {
        let config = settings.values().touchscreen;
        Self {
            settings,
            input,
            shared_memory: Box::new(TouchScreenSharedMemoryFormat::new_zeroed()),
            config,
            last_touch: 0,
            was_pressed: false,
        }
    }

    pub fn shared_memory(&self) -> &TouchScreenSharedMemoryFormat {
        &self.shared_memory
    }
}

impl ControllerBase for Touchscreen {
    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        let sample = self.input.touch_state();
        let pressed = sample.pressed && self.config.enabled;

        let mut state = TouchScreenState::default();
        if pressed {
            let (x, y) = to_screen(sample.x, sample.y);
            let touch = &mut state.touches[0];

            let mut attribute = TouchAttribute::empty();
            if !self.was_pressed {
                attribute |= TouchAttribute::START;
            }
            touch.attribute.set(attribute.bits());
            touch.delta_time.set(ctx.cpu_ticks.wrapping_sub(self.last_touch));
            touch.finger.set(self.config.finger);
            touch.x.set(x);
            touch.y.set(y);
            touch.diameter_x.set(self.config.diameter_x);
            touch.diameter_y.set(self.config.diameter_y);
            touch.rotation_angle.set(self.config.rotation_angle);
            state.entry_count.set(1);

            self.last_touch = ctx.cpu_ticks;
        }
        self.was_pressed = pressed;

        self.shared_memory.push(ctx.cpu_ticks, state);
        ctx.write(Section::TOUCH_SCREEN, self.shared_memory.as_bytes());
    }

    fn on_load_input_devices(&mut self) {
        self.config = self.settings.values().touchscreen;
    }
}
