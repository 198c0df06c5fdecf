//! HID shared memory layout (0x40000 bytes).
//!
//! This module defines the exact memory layout of the HID shared memory region.
//! All structures must match the official layout exactly for correct operation: guest
//! software maps the region read-only and parses it as a rigid binary structure.
//!
//! Every record is built from unaligned little-endian field types, so `#[repr(C)]` adds no
//! implicit padding and the byte image produced by [`IntoBytes::as_bytes`] is the wire
//! format. Sizes and offsets are pinned at compile time.

use core::mem::{offset_of, size_of};

use static_assertions::const_assert_eq;
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout,
    little_endian::{F32, I32, U32, U64},
};

use super::{
    lifo::{CommonLifoHeader, LIFO_ENTRY_COUNT, LifoState, get_states, push_state},
    types::{AnalogStickState, Vector},
};

/// Size of the HID shared memory region.
pub const HID_SHARED_MEMORY_SIZE: usize = 0x40000;

/// Number of Npad entries in shared memory (players 1-8, handheld, other).
pub const NPAD_COUNT: usize = 10;

/// Number of basic xpad LIFOs.
pub const XPAD_COUNT: usize = 4;

/// Maximum number of simultaneous touch points per touch screen sample.
pub const TOUCH_STATE_COUNT: usize = 16;

/// Maximum number of points tracked by a gesture sample.
pub const GESTURE_POINT_COUNT: usize = 4;

/// A fixed-size LIFO section: a header followed by its entry ring.
pub trait Lifo {
    type State: LifoState;

    fn header(&self) -> &CommonLifoHeader;

    fn entries(&self) -> &[Self::State];

    fn parts_mut(&mut self) -> (&mut CommonLifoHeader, &mut [Self::State]);

    /// Append `state` as the newest entry.
    fn push(&mut self, timestamp: u64, state: Self::State) {
        let (header, entries) = self.parts_mut();
        push_state(header, entries, timestamp, state);
    }

    /// Returns the newest entry.
    fn latest(&self) -> &Self::State {
        let entries = self.entries();
        &entries[self.header().tail.get() as usize % entries.len()]
    }

    /// Read the newest-first consistent run of entries into `out`.
    fn read_states(&self, out: &mut [Self::State]) -> usize {
        get_states(self.header(), self.entries(), out)
    }
}

/// Implements [`LifoState`] for entries carrying two mirrored sampling numbers.
macro_rules! impl_sampled_state {
    ($($state:ty),+ $(,)?) => {$(
        impl LifoState for $state {
            fn sampling_number(&self) -> u64 {
                self.sampling_number.get()
            }

            fn set_sampling_number(&mut self, sampling_number: u64) {
                self.sampling_number.set(sampling_number);
                self.sampling_number2.set(sampling_number);
            }
        }
    )+};
}

/// Implements [`Lifo`] for a section with `header` and `entries` fields.
macro_rules! impl_lifo {
    ($($format:ty => $state:ty),+ $(,)?) => {$(
        impl Lifo for $format {
            type State = $state;

            fn header(&self) -> &CommonLifoHeader {
                &self.header
            }

            fn entries(&self) -> &[$state] {
                &self.entries
            }

            fn parts_mut(&mut self) -> (&mut CommonLifoHeader, &mut [$state]) {
                (&mut self.header, &mut self.entries)
            }
        }
    )+};
}

// Debug pad

/// Debug pad sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DebugPadState {
    pub sampling_number: U64,
    pub sampling_number2: U64,
    pub attribute: U32,
    pub buttons: U32,
    pub r_stick: AnalogStickState,
    pub l_stick: AnalogStickState,
}

/// Debug pad section (0x400 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DebugPadSharedMemoryFormat {
    pub header: CommonLifoHeader,
    pub entries: [DebugPadState; LIFO_ENTRY_COUNT],
    _padding: [u8; 0x138],
}

// Touch screen

/// A single touch point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct TouchState {
    /// System counter ticks since the previous touch
    pub delta_time: U64,
    pub attribute: U32,
    pub finger: U32,
    pub x: U32,
    pub y: U32,
    pub diameter_x: U32,
    pub diameter_y: U32,
    pub rotation_angle: U32,
    pub reserved: U32,
}

/// Touch screen sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct TouchScreenState {
    pub sampling_number: U64,
    pub sampling_number2: U64,
    pub entry_count: U32,
    pub reserved: U32,
    pub touches: [TouchState; TOUCH_STATE_COUNT],
}

/// Touch screen section (0x3000 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct TouchScreenSharedMemoryFormat {
    pub header: CommonLifoHeader,
    pub entries: [TouchScreenState; LIFO_ENTRY_COUNT],
    _padding: [u8; 0x3C8],
}

// Mouse

/// Mouse sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct MouseState {
    pub sampling_number: U64,
    pub sampling_number2: U64,
    pub x: I32,
    pub y: I32,
    pub delta_x: I32,
    pub delta_y: I32,
    pub wheel_delta_x: I32,
    pub wheel_delta_y: I32,
    pub buttons: U32,
    pub attribute: U32,
}

/// Mouse section (0x400 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct MouseSharedMemoryFormat {
    pub header: CommonLifoHeader,
    pub entries: [MouseState; LIFO_ENTRY_COUNT],
    _padding: [u8; 0xB0],
}

// Keyboard

/// Keyboard sample: a 256-bit key bitmap plus modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct KeyboardState {
    pub sampling_number: U64,
    pub sampling_number2: U64,
    pub modifiers: U32,
    pub attribute: U32,
    pub keys: [u8; 32],
}

/// Keyboard section (0x400 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct KeyboardSharedMemoryFormat {
    pub header: CommonLifoHeader,
    pub entries: [KeyboardState; LIFO_ENTRY_COUNT],
    _padding: [u8; 0x28],
}

// Basic xpad

/// Basic xpad sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct XpadState {
    pub sampling_number: U64,
    pub sampling_number2: U64,
    pub attribute: U32,
    pub buttons: U32,
    pub l_stick: AnalogStickState,
    pub r_stick: AnalogStickState,
}

/// One basic xpad LIFO (0x400 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct XpadLifo {
    pub header: CommonLifoHeader,
    pub entries: [XpadState; LIFO_ENTRY_COUNT],
    _padding: [u8; 0x138],
}

/// Basic xpad section: four independent LIFOs.
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct XpadSharedMemoryFormat {
    pub pads: [XpadLifo; XPAD_COUNT],
}

// Header-only sections

/// Header-only section used by the home, sleep and capture buttons (0x200 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct StubbedSharedMemoryFormat {
    pub header: CommonLifoHeader,
    _padding: [u8; 0x1E0],
}

// Gesture

/// A gesture contact point in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct GesturePoint {
    pub x: I32,
    pub y: I32,
}

/// Gesture sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct GestureState {
    pub sampling_number: U64,
    pub sampling_number2: U64,
    pub detection_count: U64,
    pub gesture_type: U32,
    pub direction: U32,
    pub x: I32,
    pub y: I32,
    pub delta_x: I32,
    pub delta_y: I32,
    pub velocity_x: F32,
    pub velocity_y: F32,
    pub attributes: U32,
    pub scale: F32,
    pub rotation_angle: F32,
    pub point_count: I32,
    pub points: [GesturePoint; GESTURE_POINT_COUNT],
}

/// Gesture section (0x800 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct GestureSharedMemoryFormat {
    pub header: CommonLifoHeader,
    pub entries: [GestureState; LIFO_ENTRY_COUNT],
    _padding: [u8; 0xF8],
}

// Npad

/// Controller color record for full-key style controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadFullKeyColorState {
    pub attribute: U32,
    pub body: U32,
    pub button: U32,
}

/// Controller color record for Joy-Con style controllers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadJoyColorState {
    pub attribute: U32,
    pub left_body: U32,
    pub left_button: U32,
    pub right_body: U32,
    pub right_button: U32,
}

/// Npad sample shared by every controller style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadGenericState {
    pub sampling_number: U64,
    pub sampling_number2: U64,
    pub buttons: U64,
    pub l_stick: AnalogStickState,
    pub r_stick: AnalogStickState,
    pub attributes: U32,
    pub reserved: U32,
}

/// Npad style LIFO (0x350 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadLifo {
    pub header: CommonLifoHeader,
    pub entries: [NpadGenericState; LIFO_ENTRY_COUNT],
}

/// Six-axis sensor sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct SixAxisSensorState {
    pub delta_time: U64,
    pub sampling_number: U64,
    pub acceleration: Vector,
    pub angular_velocity: Vector,
    pub angle: Vector,
    pub direction: [Vector; 3],
    pub attribute: U32,
    pub reserved: U32,
}

impl LifoState for SixAxisSensorState {
    fn sampling_number(&self) -> u64 {
        self.sampling_number.get()
    }

    fn set_sampling_number(&mut self, sampling_number: u64) {
        self.sampling_number.set(sampling_number);
    }
}

/// Six-axis sensor LIFO (0x680 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct SixAxisSensorLifo {
    pub header: CommonLifoHeader,
    pub entries: [SixAxisSensorState; LIFO_ENTRY_COUNT],
}

/// Per-player Npad entry (0x5000 bytes).
#[derive(Debug, Clone, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadInternalState {
    pub style_set: U32,
    pub joy_assignment_mode: U32,
    pub fullkey_color: NpadFullKeyColorState,
    pub joycon_color: NpadJoyColorState,
    pub fullkey_lifo: NpadLifo,
    pub handheld_lifo: NpadLifo,
    pub joy_dual_lifo: NpadLifo,
    pub joy_left_lifo: NpadLifo,
    pub joy_right_lifo: NpadLifo,
    pub palma_lifo: NpadLifo,
    pub system_ext_lifo: NpadLifo,
    pub sixaxis_fullkey_lifo: SixAxisSensorLifo,
    pub sixaxis_handheld_lifo: SixAxisSensorLifo,
    pub sixaxis_dual_left_lifo: SixAxisSensorLifo,
    pub sixaxis_dual_right_lifo: SixAxisSensorLifo,
    pub sixaxis_left_lifo: SixAxisSensorLifo,
    pub sixaxis_right_lifo: SixAxisSensorLifo,
    pub device_type: U32,
    pub reserved: U32,
    pub system_properties: U64,
    pub button_properties: U32,
    pub battery_level: [U32; 3],
    _padding: [u8; 0x1188],
}

impl NpadInternalState {
    /// Style LIFOs in shared-memory order.
    pub fn style_lifos_mut(&mut self) -> [&mut NpadLifo; 7] {
        [
            &mut self.fullkey_lifo,
            &mut self.handheld_lifo,
            &mut self.joy_dual_lifo,
            &mut self.joy_left_lifo,
            &mut self.joy_right_lifo,
            &mut self.palma_lifo,
            &mut self.system_ext_lifo,
        ]
    }

    /// Six-axis LIFOs in shared-memory order.
    pub fn sixaxis_lifos_mut(&mut self) -> [&mut SixAxisSensorLifo; 6] {
        [
            &mut self.sixaxis_fullkey_lifo,
            &mut self.sixaxis_handheld_lifo,
            &mut self.sixaxis_dual_left_lifo,
            &mut self.sixaxis_dual_right_lifo,
            &mut self.sixaxis_left_lifo,
            &mut self.sixaxis_right_lifo,
        ]
    }
}

impl_sampled_state!(
    DebugPadState,
    TouchScreenState,
    MouseState,
    KeyboardState,
    XpadState,
    GestureState,
    NpadGenericState,
);

impl_lifo!(
    DebugPadSharedMemoryFormat => DebugPadState,
    TouchScreenSharedMemoryFormat => TouchScreenState,
    MouseSharedMemoryFormat => MouseState,
    KeyboardSharedMemoryFormat => KeyboardState,
    XpadLifo => XpadState,
    GestureSharedMemoryFormat => GestureState,
    NpadLifo => NpadGenericState,
    SixAxisSensorLifo => SixAxisSensorState,
);

// Whole region

/// HID shared memory structure (0x40000 bytes).
///
/// This contains all input device states in a fixed layout.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct HidSharedMemory {
    pub debug_pad: DebugPadSharedMemoryFormat,
    pub touchscreen: TouchScreenSharedMemoryFormat,
    pub mouse: MouseSharedMemoryFormat,
    pub keyboard: KeyboardSharedMemoryFormat,
    pub xpad: XpadSharedMemoryFormat,
    pub home_button: StubbedSharedMemoryFormat,
    pub sleep_button: StubbedSharedMemoryFormat,
    pub capture_button: StubbedSharedMemoryFormat,
    pub input_detector: [u8; 0x800],
    pub unique_pad: [u8; 0x4000],
    pub npad: [NpadInternalState; NPAD_COUNT],
    pub gesture: GestureSharedMemoryFormat,
    pub console_six_axis_sensor: [u8; 0x20],
    _padding: [u8; 0x3DE0],
}

impl HidSharedMemory {
    /// Size of the shared memory region.
    pub const SIZE: usize = HID_SHARED_MEMORY_SIZE;
}

/// Byte range of one device section within the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub offset: usize,
    pub size: usize,
}

impl Section {
    pub const DEBUG_PAD: Self = Self::new(
        offset_of!(HidSharedMemory, debug_pad),
        size_of::<DebugPadSharedMemoryFormat>(),
    );
    pub const TOUCH_SCREEN: Self = Self::new(
        offset_of!(HidSharedMemory, touchscreen),
        size_of::<TouchScreenSharedMemoryFormat>(),
    );
    pub const MOUSE: Self = Self::new(
        offset_of!(HidSharedMemory, mouse),
        size_of::<MouseSharedMemoryFormat>(),
    );
    pub const KEYBOARD: Self = Self::new(
        offset_of!(HidSharedMemory, keyboard),
        size_of::<KeyboardSharedMemoryFormat>(),
    );
    pub const XPAD: Self = Self::new(
        offset_of!(HidSharedMemory, xpad),
        size_of::<XpadSharedMemoryFormat>(),
    );
    pub const HOME_BUTTON: Self = Self::new(
        offset_of!(HidSharedMemory, home_button),
        size_of::<StubbedSharedMemoryFormat>(),
    );
    pub const SLEEP_BUTTON: Self = Self::new(
        offset_of!(HidSharedMemory, sleep_button),
        size_of::<StubbedSharedMemoryFormat>(),
    );
    pub const CAPTURE_BUTTON: Self = Self::new(
        offset_of!(HidSharedMemory, capture_button),
        size_of::<StubbedSharedMemoryFormat>(),
    );
    pub const NPAD: Self = Self::new(
        offset_of!(HidSharedMemory, npad),
        size_of::<[NpadInternalState; NPAD_COUNT]>(),
    );
    pub const GESTURE: Self = Self::new(
        offset_of!(HidSharedMemory, gesture),
        size_of::<GestureSharedMemoryFormat>(),
    );

    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// The entry of the Npad at `index` within [`Section::NPAD`].
    pub const fn npad_entry(index: usize) -> Self {
        let size = size_of::<NpadInternalState>();
        Self::new(Self::NPAD.offset + index * size, size)
    }

    /// One past the last byte of the section.
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }
}

const_assert_eq!(size_of::<CommonLifoHeader>(), 0x20);
const_assert_eq!(size_of::<DebugPadState>(), 0x28);
const_assert_eq!(size_of::<DebugPadSharedMemoryFormat>(), 0x400);
const_assert_eq!(size_of::<TouchState>(), 0x28);
const_assert_eq!(size_of::<TouchScreenState>(), 0x298);
const_assert_eq!(size_of::<TouchScreenSharedMemoryFormat>(), 0x3000);
const_assert_eq!(size_of::<MouseState>(), 0x30);
const_assert_eq!(size_of::<MouseSharedMemoryFormat>(), 0x400);
const_assert_eq!(size_of::<KeyboardState>(), 0x38);
const_assert_eq!(size_of::<KeyboardSharedMemoryFormat>(), 0x400);
const_assert_eq!(size_of::<XpadState>(), 0x28);
const_assert_eq!(size_of::<XpadLifo>(), 0x400);
const_assert_eq!(size_of::<StubbedSharedMemoryFormat>(), 0x200);
const_assert_eq!(size_of::<GestureState>(), 0x68);
const_assert_eq!(size_of::<GestureSharedMemoryFormat>(), 0x800);
const_assert_eq!(size_of::<NpadGenericState>(), 0x30);
const_assert_eq!(size_of::<NpadLifo>(), 0x350);
const_assert_eq!(size_of::<SixAxisSensorState>(), 0x60);
const_assert_eq!(size_of::<SixAxisSensorLifo>(), 0x680);
const_assert_eq!(size_of::<NpadInternalState>(), 0x5000);
const_assert_eq!(offset_of!(NpadInternalState, fullkey_lifo), 0x28);
const_assert_eq!(offset_of!(NpadInternalState, sixaxis_fullkey_lifo), 0x1758);
const_assert_eq!(offset_of!(NpadInternalState, device_type), 0x3E58);
const_assert_eq!(offset_of!(NpadInternalState, system_properties), 0x3E60);
const_assert_eq!(offset_of!(NpadInternalState, button_properties), 0x3E68);
const_assert_eq!(offset_of!(NpadInternalState, battery_level), 0x3E6C);
const_assert_eq!(size_of::<HidSharedMemory>(), HID_SHARED_MEMORY_SIZE);
const_assert_eq!(offset_of!(HidSharedMemory, touchscreen), 0x0400);
const_assert_eq!(offset_of!(HidSharedMemory, mouse), 0x3400);
const_assert_eq!(offset_of!(HidSharedMemory, keyboard), 0x3800);
const_assert_eq!(offset_of!(HidSharedMemory, xpad), 0x3C00);
const_assert_eq!(offset_of!(HidSharedMemory, home_button), 0x4C00);
const_assert_eq!(offset_of!(HidSharedMemory, sleep_button), 0x4E00);
const_assert_eq!(offset_of!(HidSharedMemory, capture_button), 0x5000);
const_assert_eq!(offset_of!(HidSharedMemory, npad), 0x9A00);
const_assert_eq!(offset_of!(HidSharedMemory, gesture), 0x3BA00);
const_assert_eq!(offset_of!(HidSharedMemory, console_six_axis_sensor), 0x3C200);
