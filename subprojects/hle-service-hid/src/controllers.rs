//! HID controllers.
//!
//! Every device class owns one controller. Controllers keep a private copy of their
//! shared-memory section, update it on each tick and copy the whole section into the
//! region in a single write, so the guest never observes a half-updated record.

use hle_sys_mem::SharedMemory;

use crate::shmem::Section;

pub mod debug_pad;
pub mod gesture;
pub mod keyboard;
pub mod mouse;
pub mod npad;
pub mod stubbed;
pub mod touchscreen;
pub mod xpad;

pub use self::{
    debug_pad::DebugPad, gesture::Gesture, keyboard::Keyboard, mouse::Mouse, npad::NPad,
    stubbed::Stubbed, touchscreen::Touchscreen, xpad::XPad,
};

/// Per-tick environment handed to controllers.
pub struct UpdateContext<'a> {
    pub shared_memory: &'a SharedMemory,
    /// System counter value at the start of the tick
    pub cpu_ticks: u64,
}

impl UpdateContext<'_> {
    /// Copies `bytes` into `section` in one step.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` does not fit `section` or the section lies outside the region.
    pub fn write(&self, section: Section, bytes: &[u8]) {
        assert!(
            bytes.len() <= section.size,
            "record of {:#x} bytes exceeds section {section:?}",
            bytes.len()
        );
        if let Err(err) = self.shared_memory.write(section.offset, bytes) {
            panic!("section {section:?} is outside the shared memory: {err}");
        }
    }
}

/// Capability interface shared by every controller.
pub trait ControllerBase {
    /// Called when the controller transitions to active.
    fn on_init(&mut self) {}

    /// Called when the controller transitions to inactive.
    fn on_release(&mut self) {}

    /// Pad-cadence update.
    fn on_update(&mut self, ctx: &UpdateContext<'_>);

    /// Motion-cadence update.
    fn on_motion_update(&mut self, ctx: &UpdateContext<'_>) {
        let _ = ctx;
    }

    /// Reloads host input bindings and configuration.
    fn on_load_input_devices(&mut self) {}
}

/// Tagged controller variant stored in the registry table.
pub enum Controller {
    DebugPad(DebugPad),
    Touchscreen(Touchscreen),
    Mouse(Mouse),
    Keyboard(Keyboard),
    XPad(XPad),
    Stubbed(Stubbed),
    NPad(Box<NPad>),
    Gesture(Gesture),
}

impl Controller {
    fn as_base_mut(&mut self) -> &mut dyn ControllerBase {
        match self {
            Self::DebugPad(controller) => controller,
            Self::Touchscreen(controller) => controller,
            Self::Mouse(controller) => controller,
            Self::Keyboard(controller) => controller,
            Self::XPad(controller) => controller,
            Self::Stubbed(controller) => controller,
            Self::NPad(controller) => controller.as_mut(),
            Self::Gesture(controller) => controller,
        }
    }
}

impl ControllerBase for Controller {
    fn on_init(&mut self) {
        self.as_base_mut().on_init();
    }

    fn on_release(&mut self) {
        self.as_base_mut().on_release();
    }

    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        self.as_base_mut().on_update(ctx);
    }

    fn on_motion_update(&mut self, ctx: &UpdateContext<'_>) {
        self.as_base_mut().on_motion_update(ctx);
    }

    fn on_load_input_devices(&mut self) {
        self.as_base_mut().on_load_input_devices();
    }
}
