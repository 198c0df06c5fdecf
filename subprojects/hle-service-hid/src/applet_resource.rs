//! Controller registry.
//!
//! [`AppletResource`] owns one controller per [`DeviceClass`] in a fixed table and runs the
//! pad and motion update passes over the active ones, in table order.

use std::sync::Arc;

use hle_settings::Settings;
use hle_sys_mem::SharedMemory;

use crate::{
    controllers::{
        Controller, ControllerBase, DebugPad, Gesture, Keyboard, Mouse, NPad, Stubbed,
        Touchscreen, UpdateContext, XPad,
    },
    input::InputBackend,
    shmem::Section,
};

/// Device classes, in registration (and update) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum DeviceClass {
    DebugPad,
    Touchscreen,
    Mouse,
    Keyboard,
    XPad,
    HomeButton,
    SleepButton,
    CaptureButton,
    SixAxisSensor,
    NPad,
    Gesture,
}

impl DeviceClass {
    pub const COUNT: usize = 11;

    pub const ALL: [Self; Self::COUNT] = [
        Self::DebugPad,
        Self::Touchscreen,
        Self::Mouse,
        Self::Keyboard,
        Self::XPad,
        Self::HomeButton,
        Self::SleepButton,
        Self::CaptureButton,
        Self::SixAxisSensor,
        Self::NPad,
        Self::Gesture,
    ];

    /// Classes active right after construction.
    pub const DEFAULT_ACTIVE: [Self; 2] = [Self::NPad, Self::Touchscreen];
}

struct ControllerEntry {
    controller: Controller,
    active: bool,
}

/// The registry and the shared memory it publishes into.
pub struct AppletResource {
    shared_memory: Arc<SharedMemory>,
    settings: Arc<Settings>,
    controllers: Vec<ControllerEntry>,
    shut_down: bool,
}

impl AppletResource {
    /// Builds every controller and activates the default classes.
    pub fn new(
        shared_memory: Arc<SharedMemory>,
        settings: Arc<Settings>,
        input: Arc<dyn InputBackend>,
    ) -> Self {
        let controllers = DeviceClass::ALL
            .into_iter()
            .map(|class| {
                let settings = Arc::clone(&settings);
                let input = Arc::clone(&input);
                let controller = match class {
                    DeviceClass::DebugPad => Controller::DebugPad(DebugPad::new(settings, input)),
                    DeviceClass::Touchscreen => {
                        Controller::Touchscreen(Touchscreen::new(settings, input))
                    }
                    DeviceClass::Mouse => Controller::Mouse(Mouse::new(settings, input)),
                    DeviceClass::Keyboard => Controller::Keyboard(Keyboard::new(settings, input)),
                    DeviceClass::XPad => Controller::XPad(XPad::new()),
                    DeviceClass::HomeButton => {
                        Controller::Stubbed(Stubbed::with_section(Section::HOME_BUTTON))
                    }
                    DeviceClass::SleepButton => {
                        Controller::Stubbed(Stubbed::with_section(Section::SLEEP_BUTTON))
                    }
                    DeviceClass::CaptureButton => {
                        Controller::Stubbed(Stubbed::with_section(Section::CAPTURE_BUTTON))
                    }
                    DeviceClass::SixAxisSensor => Controller::Stubbed(Stubbed::detached()),
                    DeviceClass::NPad => Controller::NPad(Box::new(NPad::new(settings, input))),
                    DeviceClass::Gesture => Controller::Gesture(Gesture::new(settings, input)),
                };
                ControllerEntry {
                    controller,
                    active: false,
                }
            })
            .collect();

        let mut resource = Self {
            shared_memory,
            settings,
            controllers,
            shut_down: false,
        };
        for class in DeviceClass::DEFAULT_ACTIVE {
            resource.activate_controller(class);
        }
        resource
    }

    pub fn shared_memory(&self) -> &Arc<SharedMemory> {
        &self.shared_memory
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Marks `class` active. The controller is initialized on the inactive-to-active edge.
    pub fn activate_controller(&mut self, class: DeviceClass) {
        let entry = &mut self.controllers[class as usize];
        if entry.active {
            return;
        }

        tracing::debug!(?class, "activating controller");
        entry.active = true;
        entry.controller.on_init();
    }

    /// Marks `class` inactive. The controller is released on the active-to-inactive edge.
    pub fn deactivate_controller(&mut self, class: DeviceClass) {
        let entry = &mut self.controllers[class as usize];
        if !entry.active {
            return;
        }

        tracing::debug!(?class, "deactivating controller");
        entry.active = false;
        entry.controller.on_release();
    }

    pub fn is_controller_active(&self, class: DeviceClass) -> bool {
        self.controllers[class as usize].active
    }

    pub fn controller(&self, class: DeviceClass) -> &Controller {
        &self.controllers[class as usize].controller
    }

    pub fn npad(&self) -> &NPad {
        match self.controller(DeviceClass::NPad) {
            Controller::NPad(npad) => npad,
            _ => unreachable!("registry slot {:?} holds another controller", DeviceClass::NPad),
        }
    }

    pub fn npad_mut(&mut self) -> &mut NPad {
        match &mut self.controllers[DeviceClass::NPad as usize].controller {
            Controller::NPad(npad) => npad,
            _ => unreachable!("registry slot {:?} holds another controller", DeviceClass::NPad),
        }
    }

    /// Pad-cadence pass.
    ///
    /// Consumes the rebind flag once; if it was set every controller, active or not,
    /// reloads its input devices before the active ones update.
    pub fn update_controllers(&mut self, cpu_ticks: u64) {
        if self.shut_down {
            return;
        }

        if self.settings.take_device_reload_pending() {
            tracing::debug!("reloading input devices");
            for entry in &mut self.controllers {
                entry.controller.on_load_input_devices();
            }
        }

        let ctx = UpdateContext {
            shared_memory: &self.shared_memory,
            cpu_ticks,
        };
        for entry in self.controllers.iter_mut().filter(|entry| entry.active) {
            entry.controller.on_update(&ctx);
        }
    }

    /// Motion-cadence pass.
    pub fn update_motion(&mut self, cpu_ticks: u64) {
        if self.shut_down {
            return;
        }

        let ctx = UpdateContext {
            shared_memory: &self.shared_memory,
            cpu_ticks,
        };
        for entry in self.controllers.iter_mut().filter(|entry| entry.active) {
            entry.controller.on_motion_update(&ctx);
        }
    }

    /// Stops all further update passes.
    pub fn shut_down(&mut self) {
        self.shut_down = true;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}
