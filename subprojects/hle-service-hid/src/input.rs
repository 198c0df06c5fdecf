//! Host input abstraction.
//!
//! Controllers poll an [`InputBackend`] once per tick. Every poll must return immediately
//! with the latest known sample; a backend never blocks waiting for new host input.

use crate::{
    controllers::npad::DeviceIndex,
    shmem::{DebugPadButton, KeyboardModifier, MouseButton, NpadButton},
};

/// Analog stick position, each axis in `-0x7FFF..=0x7FFF`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalogStick {
    pub x: i32,
    pub y: i32,
}

/// Buttons and sticks of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NpadSample {
    pub buttons: NpadButton,
    pub l_stick: AnalogStick,
    pub r_stick: AnalogStick,
}

/// One motion sensor reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    /// Acceleration in G
    pub accel: [f32; 3],
    /// Angular velocity in revolutions per second
    pub gyro: [f32; 3],
    /// Accumulated rotation in revolutions
    pub rotation: [f32; 3],
    /// Orientation basis vectors
    pub orientation: [[f32; 3]; 3],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugPadSample {
    pub buttons: DebugPadButton,
    pub l_stick: AnalogStick,
    pub r_stick: AnalogStick,
}

/// Touch screen state in normalized coordinates (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchSample {
    pub pressed: bool,
    pub x: f32,
    pub y: f32,
}

/// Mouse state with the position in normalized coordinates (`0.0..=1.0`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseSample {
    pub x: f32,
    pub y: f32,
    pub wheel_x: i32,
    pub wheel_y: i32,
    pub buttons: MouseButton,
}

/// Keyboard state as a 256-bit key bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardSample {
    pub keys: [u8; 32],
    pub modifiers: KeyboardModifier,
}

/// Amplitude/frequency pair delivered to a host rumble motor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostVibration {
    pub amp_low: f32,
    pub freq_low: f32,
    pub amp_high: f32,
    pub freq_high: f32,
}

/// Non-blocking source of host input.
///
/// Players are addressed by their slot index (`0..10`, handheld at 8). Every method has a
/// neutral default so backends only implement the devices they provide.
pub trait InputBackend: Send + Sync {
    fn npad_state(&self, player: usize) -> NpadSample {
        let _ = player;
        NpadSample::default()
    }

    /// Returns the motion sample of one side of a player's controller, if it has motion.
    fn motion_state(&self, player: usize, device: DeviceIndex) -> Option<MotionSample> {
        let _ = (player, device);
        None
    }

    fn debug_pad_state(&self) -> DebugPadSample {
        DebugPadSample::default()
    }

    fn touch_state(&self) -> TouchSample {
        TouchSample::default()
    }

    fn mouse_state(&self) -> MouseSample {
        MouseSample::default()
    }

    fn keyboard_state(&self) -> KeyboardSample {
        KeyboardSample::default()
    }

    /// Forwards a vibration to the host device.
    ///
    /// Returns `true` if the host accepted it.
    fn set_vibration(&self, player: usize, device: DeviceIndex, value: HostVibration) -> bool {
        let _ = (player, device, value);
        false
    }
}

/// Backend with no host devices attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl InputBackend for NullInput {}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::*;

    /// Scriptable backend that records vibrations.
    #[derive(Default)]
    pub struct FakeInput {
        pub npad: Mutex<[NpadSample; 10]>,
        pub motion: Mutex<Option<MotionSample>>,
        pub touch: Mutex<TouchSample>,
        pub mouse: Mutex<MouseSample>,
        pub keyboard: Mutex<KeyboardSample>,
        pub debug_pad: Mutex<DebugPadSample>,
        pub vibrations: Mutex<Vec<(usize, DeviceIndex, HostVibration)>>,
        pub accept_vibration: Mutex<bool>,
    }

    impl InputBackend for FakeInput {
        fn npad_state(&self, player: usize) -> NpadSample {
            self.npad.lock()[player]
        }

        fn motion_state(&self, _player: usize, _device: DeviceIndex) -> Option<MotionSample> {
            *self.motion.lock()
        }

        fn debug_pad_state(&self) -> DebugPadSample {
            *self.debug_pad.lock()
        }

        fn touch_state(&self) -> TouchSample {
            *self.touch.lock()
        }

        fn mouse_state(&self) -> MouseSample {
            *self.mouse.lock()
        }

        fn keyboard_state(&self) -> KeyboardSample {
            *self.keyboard.lock()
        }

        fn set_vibration(&self, player: usize, device: DeviceIndex, value: HostVibration) -> bool {
            self.vibrations.lock().push((player, device, value));
            *self.accept_vibration.lock()
        }
    }
}
