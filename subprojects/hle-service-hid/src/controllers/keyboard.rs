//! Keyboard controller.

use std::sync::Arc;

use hle_settings::Settings;
use zerocopy::{FromZeros, IntoBytes};

use super::{ControllerBase, UpdateContext};
use crate::{
    input::InputBackend,
    shmem::{
        DeviceAttribute, Lifo, Section,
        layout::{KeyboardSharedMemoryFormat, KeyboardState},
    },
};

pub struct Keyboard {
    settings: Arc<Settings>,
    input: Arc<dyn InputBackend>,
    shared_memory: KeyboardSharedMemoryFormat,
    enabled: bool,
}

impl Keyboard {
    pub fn new(settings: Arc<Settings>, input: Arc<dyn InputBackend>) -> Self {
        let enabled = settings.values().keyboard_enabled;
        Self {
            settings,
            input,
            shared_memory: KeyboardSharedMemoryFormat::new_zeroed(),
            enabled,
        }
    }

    pub fn shared_memory(&self) -> &KeyboardSharedMemoryFormat {
        &self.shared_memory
    }
}

impl ControllerBase for Keyboard {
    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        let mut state = KeyboardState::default();
        if self.enabled {
            let sample = self.input.keyboard_state();
            state.keys = sample.keys;
            state.modifiers.set(sample.modifiers.bits());
            state.attribute.set(DeviceAttribute::IS_CONNECTED.bits());
        }

        self.shared_memory.push(ctx.cpu_ticks, state);
        ctx.write(Section::KEYBOARD, self.shared_memory.as_bytes());
    }

    fn on_load_input_devices(&mut self) {
        self.enabled = self.settings.values().keyboard_enabled;
    }
}
