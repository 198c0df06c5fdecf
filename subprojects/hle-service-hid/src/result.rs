//! Result codes returned to the guest.
//!
//! Every response of the HID command surface starts with a 32-bit result code. The code is
//! structured as follows:
//!
//! - **Bits 0-8:** Module ID
//! - **Bits 9-21:** Description
//! - **Bits 22-31:** Reserved
//!
//! A code of zero is success.
//!
//! # References
//! - [Switchbrew Wiki: Error Codes](https://switchbrew.org/wiki/Error_codes)

const MODULE_BITS: u32 = 9;
const DESCRIPTION_BITS: u32 = 13;
const MODULE_MASK: u32 = (1 << MODULE_BITS) - 1;
const DESCRIPTION_MASK: u32 = (1 << DESCRIPTION_BITS) - 1;

/// Modules that produce result codes in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Module {
    /// Service framework (request marshalling)
    Sf = 10,
    /// Human input devices
    Hid = 202,
}

/// A guest-visible result code.
///
/// # Formatting
///
/// The code is formatted as `2XXX-YYYY` where:
///  - `XXX` is `2000` + module number
///  - `YYYY` is the `description`
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ResultCode(u32);

impl ResultCode {
    /// Successful result code
    pub const SUCCESS: Self = Self(0);

    /// Builds a result code from its module and description.
    #[inline]
    pub const fn from_parts(module: Module, description: u32) -> Self {
        Self((module as u32 & MODULE_MASK) | ((description & DESCRIPTION_MASK) << MODULE_BITS))
    }

    /// Returns the raw module number
    #[inline]
    pub const fn module(&self) -> u32 {
        self.0 & MODULE_MASK
    }

    /// Returns the description value
    #[inline]
    pub const fn description(&self) -> u32 {
        (self.0 >> MODULE_BITS) & DESCRIPTION_MASK
    }

    /// Returns the raw value (`u32`) of this result code
    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:04}", 2000 + self.module(), self.description())
    }
}

impl core::fmt::Debug for ResultCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResultCode")
            .field("code", &format_args!("{}", self))
            .field("module", &self.module())
            .field("description", &self.description())
            .field("raw", &format_args!("{:#x}", self.0))
            .finish()
    }
}

impl core::error::Error for ResultCode {}

/// HID result codes.
pub mod hid {
    use super::{Module, ResultCode};

    pub const INVALID_NPAD_DEVICE_HANDLE: ResultCode = ResultCode::from_parts(Module::Hid, 100);
    pub const NPAD_DEVICE_INDEX_OUT_OF_RANGE: ResultCode = ResultCode::from_parts(Module::Hid, 107);
    pub const VIBRATION_ARRAY_SIZE_MISMATCH: ResultCode = ResultCode::from_parts(Module::Hid, 131);
    pub const NPAD_IS_DUAL_JOYCON: ResultCode = ResultCode::from_parts(Module::Hid, 601);
    pub const NPAD_IS_SAME_TYPE: ResultCode = ResultCode::from_parts(Module::Hid, 602);
    pub const INVALID_NPAD_ID: ResultCode = ResultCode::from_parts(Module::Hid, 709);
    pub const NPAD_NOT_CONNECTED: ResultCode = ResultCode::from_parts(Module::Hid, 710);
}

/// Service framework result codes.
pub mod sf {
    use super::{Module, ResultCode};

    /// The request payload is too short for the command's input record
    pub const INVALID_REQUEST: ResultCode = ResultCode::from_parts(Module::Sf, 202);
}
