//! Basic input state types.

use bitflags::bitflags;
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout,
    little_endian::{F32, I32},
};

/// Analog stick state with X and Y coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct AnalogStickState {
    pub x: I32,
    pub y: I32,
}

impl AnalogStickState {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: I32::new(x),
            y: I32::new(y),
        }
    }
}

/// 3D vector for sensor data.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct Vector {
    pub x: F32,
    pub y: F32,
    pub z: F32,
}

impl Vector {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: F32::new(x),
            y: F32::new(y),
            z: F32::new(z),
        }
    }

    /// Squared euclidean length.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        let (x, y, z) = (self.x.get(), self.y.get(), self.z.get());
        x * x + y * y + z * z
    }
}

bitflags! {
    /// Supported Npad styles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[repr(transparent)]
    pub struct NpadStyleSet: u32 {
        /// Pro Controller
        const FULL_KEY = 1 << 0;
        /// Joy-Con controller in handheld mode
        const HANDHELD = 1 << 1;
        /// Joy-Con controller in dual mode
        const JOY_DUAL = 1 << 2;
        /// Joy-Con left controller in single mode
        const JOY_LEFT = 1 << 3;
        /// Joy-Con right controller in single mode
        const JOY_RIGHT = 1 << 4;
        /// GameCube controller
        const GC = 1 << 5;
        /// Poké Ball Plus controller
        const PALMA = 1 << 6;
        /// NES/Famicom controller
        const LARK = 1 << 7;
        /// NES/Famicom controller in handheld mode
        const HANDHELD_LARK = 1 << 8;
        /// SNES controller
        const LUCIA = 1 << 9;
        /// Generic external controller
        const SYSTEM_EXT = 1 << 29;
        /// Generic controller
        const SYSTEM = 1 << 30;
    }
}

bitflags! {
    /// Npad button state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[repr(transparent)]
    pub struct NpadButton: u64 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const STICK_L = 1 << 4;
        const STICK_R = 1 << 5;
        const L = 1 << 6;
        const R = 1 << 7;
        const ZL = 1 << 8;
        const ZR = 1 << 9;
        const PLUS = 1 << 10;
        const MINUS = 1 << 11;
        const LEFT = 1 << 12;
        const UP = 1 << 13;
        const RIGHT = 1 << 14;
        const DOWN = 1 << 15;
        const STICK_L_LEFT = 1 << 16;
        const STICK_L_UP = 1 << 17;
        const STICK_L_RIGHT = 1 << 18;
        const STICK_L_DOWN = 1 << 19;
        const STICK_R_LEFT = 1 << 20;
        const STICK_R_UP = 1 << 21;
        const STICK_R_RIGHT = 1 << 22;
        const STICK_R_DOWN = 1 << 23;
        const LEFT_SL = 1 << 24;
        const LEFT_SR = 1 << 25;
        const RIGHT_SL = 1 << 26;
        const RIGHT_SR = 1 << 27;
        const PALMA = 1 << 28;
        const HANDHELD_LEFT_B = 1 << 30;

        /// Buttons physically present on a Joy-Con (L)
        const JOY_LEFT_MASK = Self::STICK_L.bits() | Self::L.bits() | Self::ZL.bits()
            | Self::MINUS.bits() | Self::LEFT.bits() | Self::UP.bits() | Self::RIGHT.bits()
            | Self::DOWN.bits() | Self::STICK_L_LEFT.bits() | Self::STICK_L_UP.bits()
            | Self::STICK_L_RIGHT.bits() | Self::STICK_L_DOWN.bits() | Self::LEFT_SL.bits()
            | Self::LEFT_SR.bits();
        /// Buttons physically present on a Joy-Con (R)
        const JOY_RIGHT_MASK = Self::A.bits() | Self::B.bits() | Self::X.bits() | Self::Y.bits()
            | Self::STICK_R.bits() | Self::R.bits() | Self::ZR.bits() | Self::PLUS.bits()
            | Self::STICK_R_LEFT.bits() | Self::STICK_R_UP.bits() | Self::STICK_R_RIGHT.bits()
            | Self::STICK_R_DOWN.bits() | Self::RIGHT_SL.bits() | Self::RIGHT_SR.bits();
    }
}

bitflags! {
    /// Npad connection attributes stored in every Npad LIFO entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct NpadAttribute: u32 {
        const IS_CONNECTED = 1 << 0;
        const IS_WIRED = 1 << 1;
        const IS_LEFT_CONNECTED = 1 << 2;
        const IS_LEFT_WIRED = 1 << 3;
        const IS_RIGHT_CONNECTED = 1 << 4;
        const IS_RIGHT_WIRED = 1 << 5;
    }
}

bitflags! {
    /// Physical device kinds backing an Npad.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct NpadDeviceType: u32 {
        const FULL_KEY = 1 << 0;
        const DEBUG_PAD = 1 << 1;
        const HANDHELD_LEFT = 1 << 2;
        const HANDHELD_RIGHT = 1 << 3;
        const JOY_LEFT = 1 << 4;
        const JOY_RIGHT = 1 << 5;
        const PALMA = 1 << 6;
    }
}

bitflags! {
    /// Npad system properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct NpadSystemProperties: u64 {
        const IS_CHARGING_JOY_DUAL = 1 << 0;
        const IS_CHARGING_JOY_LEFT = 1 << 1;
        const IS_CHARGING_JOY_RIGHT = 1 << 2;
        const IS_POWERED_JOY_DUAL = 1 << 3;
        const IS_POWERED_JOY_LEFT = 1 << 4;
        const IS_POWERED_JOY_RIGHT = 1 << 5;
        const IS_SYSTEM_UNSUPPORTED_BUTTON = 1 << 9;
        const IS_SYSTEM_EXT_UNSUPPORTED_BUTTON = 1 << 10;
        const IS_VERTICAL = 1 << 11;
        const IS_HORIZONTAL = 1 << 12;
        const USE_PLUS = 1 << 13;
        const USE_MINUS = 1 << 14;
        const USE_DIRECTIONAL_BUTTONS = 1 << 15;
    }
}

bitflags! {
    /// Npad system button properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct NpadSystemButtonProperties: u32 {
        const IS_UNINTENDED_HOME_BUTTON_INPUT_PROTECTION_ENABLED = 1 << 0;
    }
}

bitflags! {
    /// Six-axis sensor state attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct SixAxisSensorAttribute: u32 {
        const IS_CONNECTED = 1 << 0;
        const IS_INTERPOLATED = 1 << 1;
    }
}

bitflags! {
    /// Debug pad button state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct DebugPadButton: u32 {
        const A = 1 << 0;
        const B = 1 << 1;
        const X = 1 << 2;
        const Y = 1 << 3;
        const L = 1 << 4;
        const R = 1 << 5;
        const ZL = 1 << 6;
        const ZR = 1 << 7;
        const START = 1 << 8;
        const SELECT = 1 << 9;
        const LEFT = 1 << 10;
        const UP = 1 << 11;
        const RIGHT = 1 << 12;
        const DOWN = 1 << 13;
    }
}

bitflags! {
    /// Mouse button state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct MouseButton: u32 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const FORWARD = 1 << 3;
        const BACK = 1 << 4;
    }
}

bitflags! {
    /// Mouse attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct MouseAttribute: u32 {
        const TRANSFERABLE = 1 << 0;
        const IS_CONNECTED = 1 << 1;
    }
}

bitflags! {
    /// Keyboard modifier keys and lock states.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct KeyboardModifier: u32 {
        const CONTROL = 1 << 0;
        const SHIFT = 1 << 1;
        const LEFT_ALT = 1 << 2;
        const RIGHT_ALT = 1 << 3;
        const GUI = 1 << 4;
        const CAPS_LOCK = 1 << 8;
        const SCROLL_LOCK = 1 << 9;
        const NUM_LOCK = 1 << 10;
        const KATAKANA = 1 << 11;
        const HIRAGANA = 1 << 12;
    }
}

bitflags! {
    /// Attributes shared by single-device formats (debug pad, keyboard, basic xpad).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct DeviceAttribute: u32 {
        const IS_CONNECTED = 1 << 0;
    }
}

bitflags! {
    /// Touch point attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct TouchAttribute: u32 {
        const START = 1 << 0;
        const END = 1 << 1;
    }
}

bitflags! {
    /// Gesture attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[repr(transparent)]
    pub struct GestureAttribute: u32 {
        const IS_NEW_TOUCH = 1 << 4;
        const IS_DOUBLE_TAP = 1 << 8;
    }
}
