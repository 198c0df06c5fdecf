//! Npad identifiers, handles and modes.

use hle_settings::ControllerType;
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout,
    little_endian::{F32, U32},
};

use crate::{
    result::{ResultCode, hid},
    shmem::NpadStyleSet,
};

/// Npad identifier as used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum NpadId {
    Player1 = 0,
    Player2 = 1,
    Player3 = 2,
    Player4 = 3,
    Player5 = 4,
    Player6 = 5,
    Player7 = 6,
    Player8 = 7,
    Other = 0x10,
    Handheld = 0x20,
}

impl NpadId {
    /// Every id, in slot order.
    pub const ALL: [Self; 10] = [
        Self::Player1,
        Self::Player2,
        Self::Player3,
        Self::Player4,
        Self::Player5,
        Self::Player6,
        Self::Player7,
        Self::Player8,
        Self::Handheld,
        Self::Other,
    ];

    /// Returns the slot index backing this id.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Handheld => 8,
            Self::Other => 9,
            player => player as usize,
        }
    }

    /// Returns the id stored at slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid slot.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Returns `true` for the eight regular player ids.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.index() < 8
    }
}

impl TryFrom<u32> for NpadId {
    type Error = NpadError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|id| id.raw() == raw)
            .ok_or(NpadError::InvalidNpadId(raw))
    }
}

/// Side of a controller addressed by a device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeviceIndex {
    Left = 0,
    Right = 1,
    None = 2,
}

impl DeviceIndex {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::None),
            _ => None,
        }
    }
}

/// Emulated controller kind connected to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum NpadType {
    #[default]
    None = 0,
    ProController = 1,
    Handheld = 2,
    JoyconDual = 3,
    JoyconLeft = 4,
    JoyconRight = 5,
    Pokeball = 6,
}

impl NpadType {
    /// Style bit reported for this controller kind.
    pub const fn style(self) -> NpadStyleSet {
        match self {
            Self::None => NpadStyleSet::empty(),
            Self::ProController => NpadStyleSet::FULL_KEY,
            Self::Handheld => NpadStyleSet::HANDHELD,
            Self::JoyconDual => NpadStyleSet::JOY_DUAL,
            Self::JoyconLeft => NpadStyleSet::JOY_LEFT,
            Self::JoyconRight => NpadStyleSet::JOY_RIGHT,
            Self::Pokeball => NpadStyleSet::PALMA,
        }
    }

    /// Returns `true` if the controller has a physical `side`.
    pub const fn has_side(self, side: DeviceIndex) -> bool {
        match (self, side) {
            (
                Self::ProController | Self::Handheld | Self::JoyconDual,
                DeviceIndex::Left | DeviceIndex::Right,
            ) => true,
            (Self::JoyconLeft, DeviceIndex::Left) | (Self::JoyconRight, DeviceIndex::Right) => true,
            _ => false,
        }
    }

    /// Returns `true` for single Joy-Con kinds.
    pub const fn is_single_joycon(self) -> bool {
        matches!(self, Self::JoyconLeft | Self::JoyconRight)
    }

    pub const fn to_settings(self) -> Option<ControllerType> {
        match self {
            Self::None => None,
            Self::ProController => Some(ControllerType::ProController),
            Self::Handheld => Some(ControllerType::Handheld),
            Self::JoyconDual => Some(ControllerType::DualJoyconDetached),
            Self::JoyconLeft => Some(ControllerType::LeftJoycon),
            Self::JoyconRight => Some(ControllerType::RightJoycon),
            Self::Pokeball => Some(ControllerType::Pokeball),
        }
    }
}

impl From<ControllerType> for NpadType {
    fn from(controller_type: ControllerType) -> Self {
        match controller_type {
            ControllerType::ProController => Self::ProController,
            ControllerType::DualJoyconDetached => Self::JoyconDual,
            ControllerType::LeftJoycon => Self::JoyconLeft,
            ControllerType::RightJoycon => Self::JoyconRight,
            ControllerType::Handheld => Self::Handheld,
            ControllerType::Pokeball => Self::Pokeball,
        }
    }
}

/// Addresses one side of one controller (vibration and six-axis handles).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DeviceHandle {
    pub npad_type: u8,
    pub npad_id: u8,
    pub device_index: u8,
    _pad: u8,
}

impl DeviceHandle {
    pub const fn new(npad_type: NpadType, npad_id: NpadId, device_index: DeviceIndex) -> Self {
        Self {
            npad_type: npad_type as u8,
            npad_id: npad_id.raw() as u8,
            device_index: device_index as u8,
            _pad: 0,
        }
    }

    /// Resolves the addressed Npad.
    pub fn npad_id(&self) -> Result<NpadId, NpadError> {
        NpadId::try_from(u32::from(self.npad_id))
    }

    /// Resolves the addressed side; `None` and unknown indices are rejected.
    pub fn side(&self) -> Result<DeviceIndex, NpadError> {
        match DeviceIndex::from_raw(self.device_index) {
            Some(side @ (DeviceIndex::Left | DeviceIndex::Right)) => Ok(side),
            _ => Err(NpadError::DeviceIndexOutOfRange(self.device_index)),
        }
    }
}

/// Joy-Con assignment of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum NpadAssignments {
    #[default]
    Dual = 0,
    Single = 1,
}

/// Orientation in which single Joy-Cons are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u64)]
pub enum NpadHoldType {
    #[default]
    Vertical = 0,
    Horizontal = 1,
}

impl NpadHoldType {
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(Self::Vertical),
            1 => Some(Self::Horizontal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u64)]
pub enum NpadHandheldActivationMode {
    #[default]
    Dual = 0,
    Single = 1,
    None = 2,
}

impl NpadHandheldActivationMode {
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(Self::Dual),
            1 => Some(Self::Single),
            2 => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u64)]
pub enum NpadCommunicationMode {
    Mode5ms = 0,
    Mode10ms = 1,
    Mode15ms = 2,
    #[default]
    Default = 3,
}

impl NpadCommunicationMode {
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(Self::Mode5ms),
            1 => Some(Self::Mode10ms),
            2 => Some(Self::Mode15ms),
            3 => Some(Self::Default),
            _ => None,
        }
    }
}

/// Gyroscope zero-point calibration profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum GyroscopeZeroDriftMode {
    Loose = 0,
    #[default]
    Standard = 1,
    Tight = 2,
}

impl GyroscopeZeroDriftMode {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Loose),
            1 => Some(Self::Standard),
            2 => Some(Self::Tight),
            _ => None,
        }
    }
}

/// Player LED pattern, one bit per LED starting at the leftmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct LedPattern(u64);

impl LedPattern {
    pub const fn new(position1: bool, position2: bool, position3: bool, position4: bool) -> Self {
        Self(
            position1 as u64
                | (position2 as u64) << 1
                | (position3 as u64) << 2
                | (position4 as u64) << 3,
        )
    }

    /// Pattern shown by the controller assigned to `id`.
    pub const fn for_npad(id: NpadId) -> Self {
        match id {
            NpadId::Player1 => Self::new(true, false, false, false),
            NpadId::Player2 => Self::new(true, true, false, false),
            NpadId::Player3 => Self::new(true, true, true, false),
            NpadId::Player4 => Self::new(true, true, true, true),
            NpadId::Player5 => Self::new(true, false, false, true),
            NpadId::Player6 => Self::new(true, false, true, false),
            NpadId::Player7 => Self::new(true, false, true, true),
            NpadId::Player8 => Self::new(false, true, true, false),
            NpadId::Other | NpadId::Handheld => Self(0),
        }
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Amplitude/frequency sample for a linear resonant actuator.
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VibrationValue {
    pub amp_low: F32,
    pub freq_low: F32,
    pub amp_high: F32,
    pub freq_high: F32,
}

impl VibrationValue {
    pub fn new(amp_low: f32, freq_low: f32, amp_high: f32, freq_high: f32) -> Self {
        Self {
            amp_low: F32::new(amp_low),
            freq_low: F32::new(freq_low),
            amp_high: F32::new(amp_high),
            freq_high: F32::new(freq_high),
        }
    }

    /// Zero amplitude at the resonant frequencies.
    pub fn neutral() -> Self {
        Self::new(0.0, 160.0, 0.0, 320.0)
    }
}

impl Default for VibrationValue {
    fn default() -> Self {
        Self::neutral()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum VibrationDeviceType {
    Unknown = 0,
    LinearResonantActuator = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum VibrationDevicePosition {
    None = 0,
    Left = 1,
    Right = 2,
}

/// Wire record returned by `GetVibrationDeviceInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VibrationDeviceInfo {
    pub device_type: U32,
    pub position: U32,
}

impl VibrationDeviceInfo {
    pub fn new(device_type: VibrationDeviceType, position: VibrationDevicePosition) -> Self {
        Self {
            device_type: U32::new(device_type as u32),
            position: U32::new(position as u32),
        }
    }
}

/// Error returned by fallible Npad operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NpadError {
    #[error("invalid npad id {0:#x}")]
    InvalidNpadId(u32),
    #[error("npad {0:?} has no connected controller")]
    NotConnected(NpadId),
    #[error("npad {0:?} is not a single joy-con")]
    IsDualJoycon(NpadId),
    #[error("npads {0:?} and {1:?} hold the same joy-con side")]
    IsSameType(NpadId, NpadId),
    #[error("device index {0} is out of range")]
    DeviceIndexOutOfRange(u8),
    #[error("{handles} vibration handles but {values} values")]
    VibrationArraySizeMismatch { handles: usize, values: usize },
}

impl NpadError {
    /// Guest-visible result code of the error.
    pub const fn result_code(&self) -> ResultCode {
        match self {
            Self::InvalidNpadId(_) => hid::INVALID_NPAD_ID,
            Self::NotConnected(_) => hid::NPAD_NOT_CONNECTED,
            Self::IsDualJoycon(_) => hid::NPAD_IS_DUAL_JOYCON,
            Self::IsSameType(..) => hid::NPAD_IS_SAME_TYPE,
            Self::DeviceIndexOutOfRange(_) => hid::NPAD_DEVICE_INDEX_OUT_OF_RANGE,
            Self::VibrationArraySizeMismatch { .. } => hid::VIBRATION_ARRAY_SIZE_MISMATCH,
        }
    }
}

impl From<NpadError> for ResultCode {
    fn from(err: NpadError) -> Self {
        err.result_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npad_id_index_round_trip() {
        for (index, id) in NpadId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), index);
            assert_eq!(NpadId::from_index(index), id);
            assert_eq!(NpadId::try_from(id.raw()), Ok(id));
        }
        assert_eq!(NpadId::Handheld.index(), 8);
        assert_eq!(NpadId::Other.index(), 9);
    }

    #[test]
    fn test_invalid_npad_id_is_rejected() {
        assert_eq!(NpadId::try_from(8), Err(NpadError::InvalidNpadId(8)));
        assert_eq!(
            NpadId::try_from(0x21).unwrap_err().result_code(),
            hid::INVALID_NPAD_ID
        );
    }

    #[test]
    fn test_led_patterns() {
        let patterns: Vec<u64> = NpadId::ALL
            .into_iter()
            .map(|id| LedPattern::for_npad(id).raw())
            .collect();
        assert_eq!(
            patterns,
            vec![0b0001, 0b0011, 0b0111, 0b1111, 0b1001, 0b0101, 0b1101, 0b0110, 0, 0]
        );
    }

    #[test]
    fn test_device_handle_side() {
        let handle = DeviceHandle::new(NpadType::JoyconDual, NpadId::Player2, DeviceIndex::Right);
        assert_eq!(handle.npad_id(), Ok(NpadId::Player2));
        assert_eq!(handle.side(), Ok(DeviceIndex::Right));

        let handle = DeviceHandle::new(NpadType::JoyconDual, NpadId::Player2, DeviceIndex::None);
        assert_eq!(
            handle.side().unwrap_err().result_code(),
            hid::NPAD_DEVICE_INDEX_OUT_OF_RANGE
        );
    }

    #[test]
    fn test_sides_by_type() {
        assert!(NpadType::ProController.has_side(DeviceIndex::Left));
        assert!(NpadType::JoyconLeft.has_side(DeviceIndex::Left));
        assert!(!NpadType::JoyconLeft.has_side(DeviceIndex::Right));
        assert!(!NpadType::JoyconRight.has_side(DeviceIndex::Left));
        assert!(!NpadType::Pokeball.has_side(DeviceIndex::Left));
        assert!(!NpadType::JoyconDual.has_side(DeviceIndex::None));
    }
}
