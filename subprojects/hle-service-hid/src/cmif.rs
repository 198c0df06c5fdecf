//! CMIF command handling for the HID service.
//!
//! Each command reads a fixed-size input record from the request payload, runs the typed
//! operation under the service lock and answers with a [`Response`]. Serialized, a response
//! is the 32-bit result code followed by the output payload.
//!
//! Input records are `#[repr(C)]` with explicit padding so that their layout matches the
//! guest's request structures byte for byte.

use std::sync::Arc;

use hle_sys_mem::SharedMemory;
use static_assertions::const_assert_eq;
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout,
    little_endian::{F32, U32, U64},
};

use crate::{
    Hid,
    applet_resource::{AppletResource, DeviceClass},
    controllers::npad::{
        DeviceHandle, DeviceIndex, FusionParameters, GyroscopeZeroDriftMode, NpadAssignments,
        NpadCommunicationMode, NpadError, NpadHandheldActivationMode, NpadHoldType, NpadId,
        VibrationValue,
    },
    event::Event,
    proto::{self, active_vibration_device_list_cmds, applet_resource_cmds, cmds},
    result::{ResultCode, sf},
    shmem::NpadStyleSet,
};

/// Incoming command payload.
#[derive(Debug, Clone, Default)]
pub struct Request {
    data: Vec<u8>,
    buffers: Vec<Vec<u8>>,
}

impl Request {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            buffers: Vec::new(),
        }
    }

    /// A request without payload.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A request whose payload is the bytes of `record`.
    pub fn from_record<T: IntoBytes + Immutable>(record: &T) -> Self {
        Self::new(record.as_bytes())
    }

    /// Appends an input buffer; buffers are addressed by the order they were added.
    pub fn with_buffer(mut self, buffer: impl Into<Vec<u8>>) -> Self {
        self.buffers.push(buffer.into());
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn read<T: FromBytes>(&self) -> Result<T, RequestError> {
        T::read_from_prefix(&self.data)
            .map(|(record, _)| record)
            .map_err(|_| RequestError::Truncated {
                expected: size_of::<T>(),
                actual: self.data.len(),
            })
    }

    fn buffer(&self, index: usize) -> Result<&[u8], RequestError> {
        self.buffers
            .get(index)
            .map(Vec::as_slice)
            .ok_or(RequestError::MissingBuffer(index))
    }

    /// Reinterprets input buffer `index` as an array of records.
    fn buffer_records<T>(&self, index: usize) -> Result<&[T], RequestError>
    where
        T: FromBytes + KnownLayout + Immutable,
    {
        let buffer = self.buffer(index)?;
        <[T]>::ref_from_bytes(buffer).map_err(|_| RequestError::InvalidBuffer {
            index,
            len: buffer.len(),
            record_size: size_of::<T>(),
        })
    }
}

/// Kernel objects and sub-interfaces handed back with a response.
#[derive(Clone)]
pub enum Object {
    SharedMemory(Arc<SharedMemory>),
    Event(Arc<Event>),
    /// An `IAppletResource` session
    AppletResource,
    /// An `IActiveVibrationDeviceList` session
    ActiveVibrationDeviceList,
}

/// Outgoing command response.
#[derive(Clone)]
pub struct Response {
    result: ResultCode,
    data: Vec<u8>,
    objects: Vec<Object>,
    implemented: bool,
}

impl Response {
    pub fn ok() -> Self {
        Self::error(ResultCode::SUCCESS)
    }

    pub fn error(result: ResultCode) -> Self {
        Self {
            result,
            data: Vec::new(),
            objects: Vec::new(),
            implemented: true,
        }
    }

    /// Inert answer to a command the service knows of but does not provide.
    pub fn not_implemented() -> Self {
        Self {
            implemented: false,
            ..Self::ok()
        }
    }

    pub fn with_u32(mut self, value: u32) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn with_u64(mut self, value: u64) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn with_f32(mut self, value: f32) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Booleans are written as a full 32-bit word.
    pub fn with_bool(self, value: bool) -> Self {
        self.with_u32(u32::from(value))
    }

    pub fn with_record<T: IntoBytes + Immutable>(mut self, record: &T) -> Self {
        self.data.extend_from_slice(record.as_bytes());
        self
    }

    pub fn with_object(mut self, object: Object) -> Self {
        self.objects.push(object);
        self
    }

    pub fn result(&self) -> ResultCode {
        self.result
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn is_implemented(&self) -> bool {
        self.implemented
    }

    /// Serializes the response: result code, then output payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.data.len());
        bytes.extend_from_slice(&self.result.to_raw().to_le_bytes());
        bytes.extend_from_slice(&self.data);
        bytes
    }
}

/// Error raised while decoding or executing a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The payload is shorter than the command's input record.
    #[error("request payload is {actual} bytes, expected at least {expected}")]
    Truncated { expected: usize, actual: usize },
    /// A required input buffer was not supplied.
    #[error("missing input buffer {0}")]
    MissingBuffer(usize),
    /// An input buffer does not hold a whole number of records.
    #[error("input buffer {index} is {len} bytes, not a multiple of {record_size}")]
    InvalidBuffer {
        index: usize,
        len: usize,
        record_size: usize,
    },
    /// An enumerated field carries an unknown value.
    #[error("invalid {name} {value}")]
    InvalidEnum { name: &'static str, value: u64 },
    #[error(transparent)]
    Npad(#[from] NpadError),
}

impl RequestError {
    /// Guest-visible result code of the error.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Npad(err) => err.result_code(),
            _ => sf::INVALID_REQUEST,
        }
    }
}

/// Input of commands that only take the applet resource user id.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct AruidInput {
    pub aruid: U64,
}

/// Input of `ActivateNpadWithRevision`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct ActivateNpadInput {
    pub revision: U32,
    _pad: U32,
    pub aruid: U64,
}

/// Input of per-Npad commands.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadIdInput {
    pub npad_id: U32,
    _pad: U32,
    pub aruid: U64,
}

/// Input of `GetPlayerLedPattern`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct LedPatternInput {
    pub npad_id: U32,
}

/// Input of `SetNpadJoyAssignmentModeSingle`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadModeInput {
    pub npad_id: U32,
    _pad: U32,
    pub aruid: U64,
    pub device_index: U64,
}

/// Input of commands that pair two Npads.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct NpadPairInput {
    pub npad_id_1: U32,
    pub npad_id_2: U32,
    pub aruid: U64,
}

/// Input of `EnableUnintendedHomeButtonInputProtection`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct HomeProtectionInput {
    pub enabled: u8,
    _pad: [u8; 3],
    pub npad_id: U32,
    pub aruid: U64,
}

/// Input of `SetSupportedNpadStyleSet`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct StyleSetInput {
    pub style_set: U32,
    _pad: U32,
    pub aruid: U64,
}

/// Input of setters taking an aruid and a 64-bit mode.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct ModeInput {
    pub aruid: U64,
    pub mode: U64,
}

/// Input of commands addressing one device.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DeviceHandleInput {
    pub handle: DeviceHandle,
    _pad: U32,
    pub aruid: U64,
}

/// Input of `EnableSixAxisSensorFusion`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct SixAxisFusionInput {
    pub enabled: u8,
    _pad: [u8; 3],
    pub handle: DeviceHandle,
    pub aruid: U64,
}

/// Input of `SetSixAxisSensorFusionParameters`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct FusionParametersInput {
    pub handle: DeviceHandle,
    pub parameter1: F32,
    pub parameter2: F32,
    _pad: U32,
    pub aruid: U64,
}

/// Input of `SetGyroscopeZeroDriftMode`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct DriftModeInput {
    pub handle: DeviceHandle,
    pub drift_mode: U32,
    pub aruid: U64,
}

/// Input of vibration commands that take a bare device handle.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct VibrationDeviceInput {
    pub handle: DeviceHandle,
}

/// Input of `SendVibrationValue`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct SendVibrationInput {
    pub handle: DeviceHandle,
    pub value: VibrationValue,
    _pad: U32,
    pub aruid: U64,
}

/// Input of `PermitVibration`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct PermitVibrationInput {
    pub permitted: u8,
}

const_assert_eq!(size_of::<AruidInput>(), 0x8);
const_assert_eq!(size_of::<ActivateNpadInput>(), 0x10);
const_assert_eq!(size_of::<NpadIdInput>(), 0x10);
const_assert_eq!(size_of::<NpadModeInput>(), 0x18);
const_assert_eq!(size_of::<NpadPairInput>(), 0x10);
const_assert_eq!(size_of::<HomeProtectionInput>(), 0x10);
const_assert_eq!(size_of::<StyleSetInput>(), 0x10);
const_assert_eq!(size_of::<ModeInput>(), 0x10);
const_assert_eq!(size_of::<DeviceHandleInput>(), 0x10);
const_assert_eq!(size_of::<SixAxisFusionInput>(), 0x10);
const_assert_eq!(size_of::<FusionParametersInput>(), 0x18);
const_assert_eq!(size_of::<DriftModeInput>(), 0x10);
const_assert_eq!(size_of::<SendVibrationInput>(), 0x20);

impl Hid {
    /// Handles an IHidServer command.
    pub fn handle_request(&self, command_id: u32, request: &Request) -> Response {
        if let Some(name) = proto::not_implemented_name(command_id) {
            tracing::warn!(command_id, name, "command not implemented");
            return Response::not_implemented();
        }

        let mut resource = self.lock();
        respond(command_id, hid_server(&mut resource, command_id, request))
    }

    /// Handles an IAppletResource command.
    pub fn handle_applet_resource_request(&self, command_id: u32, _request: &Request) -> Response {
        match command_id {
            applet_resource_cmds::GET_SHARED_MEMORY_HANDLE => {
                Response::ok().with_object(Object::SharedMemory(self.shared_memory()))
            }
            _ => unknown_command("IAppletResource", command_id),
        }
    }

    /// Handles an IActiveVibrationDeviceList command.
    pub fn handle_vibration_device_list_request(
        &self,
        command_id: u32,
        request: &Request,
    ) -> Response {
        let mut resource = self.lock();
        let result = match command_id {
            active_vibration_device_list_cmds::INITIALIZE_VIBRATION_DEVICE => {
                request.read::<VibrationDeviceInput>().and_then(|input| {
                    resource.npad_mut().initialize_vibration_device(input.handle)?;
                    Ok(Response::ok())
                })
            }
            _ => Ok(unknown_command("IActiveVibrationDeviceList", command_id)),
        };
        respond(command_id, result)
    }
}

fn respond(command_id: u32, result: Result<Response, RequestError>) -> Response {
    result.unwrap_or_else(|err| {
        tracing::debug!(command_id, %err, "command failed");
        Response::error(err.result_code())
    })
}

fn unknown_command(interface: &'static str, command_id: u32) -> Response {
    tracing::warn!(interface, command_id, "unknown command");
    Response::not_implemented()
}

fn stub(name: &'static str) -> Response {
    tracing::warn!(name, "(STUBBED) command called");
    Response::ok()
}

fn activate(
    resource: &mut AppletResource,
    request: &Request,
    class: DeviceClass,
) -> Result<Response, RequestError> {
    let input = request.read::<AruidInput>()?;
    tracing::debug!(aruid = input.aruid.get(), ?class, "activate");
    resource.activate_controller(class);
    Ok(Response::ok())
}

fn npad_id(raw: U32) -> Result<NpadId, RequestError> {
    Ok(NpadId::try_from(raw.get())?)
}

fn invalid_enum(name: &'static str, value: u64) -> RequestError {
    RequestError::InvalidEnum { name, value }
}

fn hid_server(
    resource: &mut AppletResource,
    command_id: u32,
    request: &Request,
) -> Result<Response, RequestError> {
    match command_id {
        cmds::CREATE_APPLET_RESOURCE => {
            let input = request.read::<AruidInput>()?;
            tracing::debug!(aruid = input.aruid.get(), "applet resource created");
            Ok(Response::ok().with_object(Object::AppletResource))
        }
        cmds::ACTIVATE_DEBUG_PAD => activate(resource, request, DeviceClass::DebugPad),
        cmds::ACTIVATE_TOUCH_SCREEN => activate(resource, request, DeviceClass::Touchscreen),
        cmds::ACTIVATE_MOUSE => activate(resource, request, DeviceClass::Mouse),
        cmds::ACTIVATE_KEYBOARD => activate(resource, request, DeviceClass::Keyboard),
        cmds::SEND_KEYBOARD_LOCK_KEY_EVENT => Ok(stub("SendKeyboardLockKeyEvent")),
        cmds::ACTIVATE_XPAD => activate(resource, request, DeviceClass::XPad),
        cmds::GET_XPAD_IDS => Ok(stub("GetXpadIds").with_u64(0)),
        cmds::ACTIVATE_SIX_AXIS_SENSOR
        | cmds::DEACTIVATE_SIX_AXIS_SENSOR
        | cmds::START_SIX_AXIS_SENSOR
        | cmds::STOP_SIX_AXIS_SENSOR => {
            let input = request.read::<DeviceHandleInput>()?;
            let enabled = matches!(
                command_id,
                cmds::ACTIVATE_SIX_AXIS_SENSOR | cmds::START_SIX_AXIS_SENSOR
            );
            resource.npad_mut().set_sixaxis_enabled(input.handle, enabled)?;
            Ok(Response::ok())
        }
        cmds::IS_SIX_AXIS_SENSOR_FUSION_ENABLED => {
            let input = request.read::<DeviceHandleInput>()?;
            let enabled = resource.npad().is_sixaxis_fusion_enabled(input.handle)?;
            Ok(Response::ok().with_bool(enabled))
        }
        cmds::ENABLE_SIX_AXIS_SENSOR_FUSION => {
            let input = request.read::<SixAxisFusionInput>()?;
            resource
                .npad_mut()
                .set_sixaxis_fusion_enabled(input.handle, input.enabled != 0)?;
            Ok(Response::ok())
        }
        cmds::SET_SIX_AXIS_SENSOR_FUSION_PARAMETERS => {
            let input = request.read::<FusionParametersInput>()?;
            let parameters = FusionParameters {
                parameter1: input.parameter1.get(),
                parameter2: input.parameter2.get(),
            };
            resource.npad_mut().set_sixaxis_fusion_parameters(input.handle, parameters)?;
            Ok(Response::ok())
        }
        cmds::GET_SIX_AXIS_SENSOR_FUSION_PARAMETERS => {
            let input = request.read::<DeviceHandleInput>()?;
            let parameters = resource.npad().sixaxis_fusion_parameters(input.handle)?;
            Ok(Response::ok()
                .with_f32(parameters.parameter1)
                .with_f32(parameters.parameter2))
        }
        cmds::RESET_SIX_AXIS_SENSOR_FUSION_PARAMETERS => {
            let input = request.read::<DeviceHandleInput>()?;
            resource.npad_mut().reset_sixaxis_fusion_parameters(input.handle)?;
            Ok(Response::ok())
        }
        cmds::SET_GYROSCOPE_ZERO_DRIFT_MODE => {
            let input = request.read::<DriftModeInput>()?;
            let raw = input.drift_mode.get();
            let mode = GyroscopeZeroDriftMode::from_raw(raw)
                .ok_or(invalid_enum("drift mode", raw.into()))?;
            resource.npad_mut().set_gyroscope_zero_drift_mode(input.handle, mode)?;
            Ok(Response::ok())
        }
        cmds::GET_GYROSCOPE_ZERO_DRIFT_MODE => {
            let input = request.read::<DeviceHandleInput>()?;
            let mode = resource.npad().gyroscope_zero_drift_mode(input.handle)?;
            Ok(Response::ok().with_u32(mode as u32))
        }
        cmds::RESET_GYROSCOPE_ZERO_DRIFT_MODE => {
            let input = request.read::<DeviceHandleInput>()?;
            resource.npad_mut().reset_gyroscope_zero_drift_mode(input.handle)?;
            Ok(Response::ok())
        }
        cmds::IS_SIX_AXIS_SENSOR_AT_REST => {
            let input = request.read::<DeviceHandleInput>()?;
            let at_rest = resource.npad().is_sixaxis_at_rest(input.handle)?;
            Ok(Response::ok().with_bool(at_rest))
        }
        cmds::ACTIVATE_GESTURE => activate(resource, request, DeviceClass::Gesture),
        cmds::SET_SUPPORTED_NPAD_STYLE_SET => {
            let input = request.read::<StyleSetInput>()?;
            resource
                .npad_mut()
                .set_supported_style_set(NpadStyleSet::from_bits_retain(input.style_set.get()));
            Ok(Response::ok())
        }
        cmds::GET_SUPPORTED_NPAD_STYLE_SET => {
            request.read::<AruidInput>()?;
            Ok(Response::ok().with_u32(resource.npad().supported_style_set().bits()))
        }
        cmds::SET_SUPPORTED_NPAD_ID_TYPE => {
            request.read::<AruidInput>()?;
            let ids: Vec<u32> = request
                .buffer_records::<U32>(0)?
                .iter()
                .map(|id| id.get())
                .collect();
            resource.npad_mut().set_supported_npad_id_types(&ids)?;
            Ok(Response::ok())
        }
        cmds::ACTIVATE_NPAD => activate(resource, request, DeviceClass::NPad),
        cmds::ACTIVATE_NPAD_WITH_REVISION => {
            let input = request.read::<ActivateNpadInput>()?;
            tracing::debug!(
                revision = input.revision.get(),
                aruid = input.aruid.get(),
                "activate npad"
            );
            resource.activate_controller(DeviceClass::NPad);
            Ok(Response::ok())
        }
        cmds::DEACTIVATE_NPAD => {
            request.read::<AruidInput>()?;
            resource.deactivate_controller(DeviceClass::NPad);
            Ok(Response::ok())
        }
        cmds::ACQUIRE_NPAD_STYLE_SET_UPDATE_EVENT_HANDLE => {
            let input = request.read::<NpadIdInput>()?;
            let event = resource.npad().style_set_changed_event(npad_id(input.npad_id)?);
            Ok(Response::ok().with_object(Object::Event(event)))
        }
        cmds::DISCONNECT_NPAD => {
            let input = request.read::<NpadIdInput>()?;
            resource.npad_mut().disconnect_npad(npad_id(input.npad_id)?);
            Ok(Response::ok())
        }
        cmds::GET_PLAYER_LED_PATTERN => {
            let input = request.read::<LedPatternInput>()?;
            let pattern = resource.npad().led_pattern(npad_id(input.npad_id)?);
            Ok(Response::ok().with_u64(pattern.raw()))
        }
        cmds::SET_NPAD_JOY_HOLD_TYPE => {
            let input = request.read::<ModeInput>()?;
            let raw = input.mode.get();
            let hold_type = NpadHoldType::from_raw(raw).ok_or(invalid_enum("hold type", raw))?;
            resource.npad_mut().set_hold_type(hold_type);
            Ok(Response::ok())
        }
        cmds::GET_NPAD_JOY_HOLD_TYPE => {
            request.read::<AruidInput>()?;
            Ok(Response::ok().with_u64(resource.npad().hold_type() as u64))
        }
        cmds::SET_NPAD_JOY_ASSIGNMENT_MODE_SINGLE_BY_DEFAULT => {
            let input = request.read::<NpadIdInput>()?;
            resource
                .npad_mut()
                .set_npad_mode(npad_id(input.npad_id)?, NpadAssignments::Single, DeviceIndex::Left);
            Ok(Response::ok())
        }
        cmds::SET_NPAD_JOY_ASSIGNMENT_MODE_SINGLE => {
            let input = request.read::<NpadModeInput>()?;
            let side = match input.device_index.get() {
                0 => DeviceIndex::Left,
                1 => DeviceIndex::Right,
                raw => return Err(invalid_enum("device index", raw)),
            };
            resource
                .npad_mut()
                .set_npad_mode(npad_id(input.npad_id)?, NpadAssignments::Single, side);
            Ok(Response::ok())
        }
        cmds::SET_NPAD_JOY_ASSIGNMENT_MODE_DUAL => {
            let input = request.read::<NpadIdInput>()?;
            resource
                .npad_mut()
                .set_npad_mode(npad_id(input.npad_id)?, NpadAssignments::Dual, DeviceIndex::None);
            Ok(Response::ok())
        }
        cmds::MERGE_SINGLE_JOY_AS_DUAL_JOY => {
            let input = request.read::<NpadPairInput>()?;
            let (id_1, id_2) = (npad_id(input.npad_id_1)?, npad_id(input.npad_id_2)?);
            resource.npad_mut().merge_single_joy_as_dual_joy(id_1, id_2)?;
            Ok(Response::ok())
        }
        cmds::START_LR_ASSIGNMENT_MODE => {
            request.read::<AruidInput>()?;
            resource.npad_mut().start_lr_assignment_mode();
            Ok(Response::ok())
        }
        cmds::STOP_LR_ASSIGNMENT_MODE => {
            request.read::<AruidInput>()?;
            resource.npad_mut().stop_lr_assignment_mode();
            Ok(Response::ok())
        }
        cmds::SET_NPAD_HANDHELD_ACTIVATION_MODE => {
            let input = request.read::<ModeInput>()?;
            let raw = input.mode.get();
            let mode = NpadHandheldActivationMode::from_raw(raw)
                .ok_or(invalid_enum("handheld activation mode", raw))?;
            resource.npad_mut().set_handheld_activation_mode(mode);
            Ok(Response::ok())
        }
        cmds::GET_NPAD_HANDHELD_ACTIVATION_MODE => {
            request.read::<AruidInput>()?;
            Ok(Response::ok().with_u64(resource.npad().handheld_activation_mode() as u64))
        }
        cmds::SWAP_NPAD_ASSIGNMENT => {
            let input = request.read::<NpadPairInput>()?;
            let (id_1, id_2) = (npad_id(input.npad_id_1)?, npad_id(input.npad_id_2)?);
            resource.npad_mut().swap_npad_assignment(id_1, id_2)?;
            Ok(Response::ok())
        }
        cmds::IS_UNINTENDED_HOME_BUTTON_INPUT_PROTECTION_ENABLED => {
            let input = request.read::<NpadIdInput>()?;
            let enabled = resource
                .npad()
                .is_unintended_home_button_input_protection_enabled(npad_id(input.npad_id)?);
            Ok(Response::ok().with_bool(enabled))
        }
        cmds::ENABLE_UNINTENDED_HOME_BUTTON_INPUT_PROTECTION => {
            let input = request.read::<HomeProtectionInput>()?;
            let id = npad_id(input.npad_id)?;
            resource
                .npad_mut()
                .set_unintended_home_button_input_protection(id, input.enabled != 0);
            Ok(Response::ok())
        }
        cmds::GET_VIBRATION_DEVICE_INFO => {
            let input = request.read::<VibrationDeviceInput>()?;
            let info = resource.npad().vibration_device_info(input.handle)?;
            Ok(Response::ok().with_record(&info))
        }
        cmds::SEND_VIBRATION_VALUE => {
            let input = request.read::<SendVibrationInput>()?;
            resource.npad_mut().vibrate_controller(input.handle, input.value)?;
            Ok(Response::ok())
        }
        cmds::GET_ACTUAL_VIBRATION_VALUE => {
            let input = request.read::<DeviceHandleInput>()?;
            let value = resource.npad().last_vibration(input.handle)?;
            Ok(Response::ok().with_record(&value))
        }
        cmds::CREATE_ACTIVE_VIBRATION_DEVICE_LIST => {
            Ok(Response::ok().with_object(Object::ActiveVibrationDeviceList))
        }
        cmds::PERMIT_VIBRATION => {
            let input = request.read::<PermitVibrationInput>()?;
            resource.settings().set_vibration_enabled(input.permitted != 0);
            Ok(Response::ok())
        }
        cmds::IS_VIBRATION_PERMITTED => {
            Ok(Response::ok().with_bool(resource.settings().vibration_enabled()))
        }
        cmds::SEND_VIBRATION_VALUES => {
            request.read::<AruidInput>()?;
            let handles = request.buffer_records::<DeviceHandle>(0)?;
            let values = request.buffer_records::<VibrationValue>(1)?;
            resource.npad_mut().vibrate_controllers(handles, values)?;
            Ok(Response::ok())
        }
        cmds::BEGIN_PERMIT_VIBRATION_SESSION | cmds::END_PERMIT_VIBRATION_SESSION => {
            request.read::<AruidInput>()?;
            let permitted = command_id == cmds::BEGIN_PERMIT_VIBRATION_SESSION;
            resource.npad_mut().set_vibration_session_permitted(permitted);
            Ok(Response::ok())
        }
        cmds::IS_VIBRATION_DEVICE_MOUNTED => {
            let input = request.read::<VibrationDeviceInput>()?;
            Ok(Response::ok().with_bool(resource.npad().is_vibration_device_mounted(input.handle)))
        }
        cmds::ACTIVATE_CONSOLE_SIX_AXIS_SENSOR => Ok(stub("ActivateConsoleSixAxisSensor")),
        cmds::START_CONSOLE_SIX_AXIS_SENSOR => Ok(stub("StartConsoleSixAxisSensor")),
        cmds::STOP_CONSOLE_SIX_AXIS_SENSOR => Ok(stub("StopConsoleSixAxisSensor")),
        cmds::ACTIVATE_SEVEN_SIX_AXIS_SENSOR => Ok(stub("ActivateSevenSixAxisSensor")),
        cmds::START_SEVEN_SIX_AXIS_SENSOR => Ok(stub("StartSevenSixAxisSensor")),
        cmds::STOP_SEVEN_SIX_AXIS_SENSOR => Ok(stub("StopSevenSixAxisSensor")),
        cmds::INITIALIZE_SEVEN_SIX_AXIS_SENSOR => Ok(stub("InitializeSevenSixAxisSensor")),
        cmds::FINALIZE_SEVEN_SIX_AXIS_SENSOR => Ok(stub("FinalizeSevenSixAxisSensor")),
        cmds::RESET_SEVEN_SIX_AXIS_SENSOR_TIMESTAMP => Ok(stub("ResetSevenSixAxisSensorTimestamp")),
        cmds::SET_IS_PALMA_ALL_CONNECTABLE => Ok(stub("SetIsPalmaAllConnectable")),
        cmds::SET_PALMA_BOOST_MODE => Ok(stub("SetPalmaBoostMode")),
        cmds::SET_NPAD_COMMUNICATION_MODE => {
            let input = request.read::<ModeInput>()?;
            let raw = input.mode.get();
            let mode = NpadCommunicationMode::from_raw(raw)
                .ok_or(invalid_enum("communication mode", raw))?;
            resource.npad_mut().set_communication_mode(mode);
            Ok(Response::ok())
        }
        cmds::GET_NPAD_COMMUNICATION_MODE => {
            Ok(Response::ok().with_u64(resource.npad().communication_mode() as u64))
        }
        _ => Ok(unknown_command("IHidServer", command_id)),
    }
}

#[cfg(test)]
mod tests {
    use hle_settings::Settings;
    use hle_timing::CoreTiming;
    use proptest::prelude::*;
    use zerocopy::FromZeros;

    use super::*;
    use crate::{
        controllers::npad::{NpadType, VibrationDevicePosition, VibrationDeviceType},
        create_shared_memory,
        input::testing::FakeInput,
        result::hid,
    };

    fn service() -> Hid {
        Hid::new(
            Arc::new(CoreTiming::new()),
            Arc::new(Settings::default()),
            Arc::new(FakeInput::default()),
            create_shared_memory(),
        )
    }

    fn npad_request(id: u32) -> Request {
        let mut input = NpadIdInput::new_zeroed();
        input.npad_id.set(id);
        Request::from_record(&input)
    }

    fn pair_request(id_1: u32, id_2: u32) -> Request {
        let mut input = NpadPairInput::new_zeroed();
        input.npad_id_1.set(id_1);
        input.npad_id_2.set(id_2);
        Request::from_record(&input)
    }

    fn handle_request(handle: DeviceHandle) -> Request {
        let mut input = DeviceHandleInput::new_zeroed();
        input.handle = handle;
        Request::from_record(&input)
    }

    fn aruid_request() -> Request {
        Request::from_record(&AruidInput::new_zeroed())
    }

    fn player1(side: DeviceIndex) -> DeviceHandle {
        DeviceHandle::new(NpadType::ProController, NpadId::Player1, side)
    }

    fn entry_bytes(hid: &Hid, id: NpadId) -> Vec<u8> {
        hid.lock().npad().entry(id).as_bytes().to_vec()
    }

    #[test]
    fn test_response_starts_with_status_code() {
        let hid = service();

        let response = hid.handle_request(cmds::GET_SUPPORTED_NPAD_STYLE_SET, &aruid_request());

        let bytes = response.to_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &[0; 4]);
        let style_set = u32::from_le_bytes(bytes[4..].try_into().unwrap());
        assert_eq!(style_set, crate::controllers::npad::DEFAULT_STYLE_SET.bits());
    }

    #[test]
    fn test_swap_with_disconnected_slot_fails_without_changes() {
        let hid = service();
        let before = (entry_bytes(&hid, NpadId::Player1), entry_bytes(&hid, NpadId::Player2));

        let response = hid.handle_request(cmds::SWAP_NPAD_ASSIGNMENT, &pair_request(0, 1));

        assert_eq!(response.result(), hid::NPAD_NOT_CONNECTED);
        assert_eq!(&response.to_bytes()[..4], &hid::NPAD_NOT_CONNECTED.to_raw().to_le_bytes());
        let after = (entry_bytes(&hid, NpadId::Player1), entry_bytes(&hid, NpadId::Player2));
        assert_eq!(before, after);
    }

    #[test]
    fn test_invalid_npad_id_is_rejected() {
        let hid = service();

        let response = hid.handle_request(cmds::DISCONNECT_NPAD, &npad_request(9));

        assert_eq!(response.result(), hid::INVALID_NPAD_ID);
        assert!(hid.lock().npad().is_connected(NpadId::Player1));
    }

    #[test]
    fn test_short_payload_is_invalid_request() {
        let hid = service();

        let response = hid.handle_request(cmds::SWAP_NPAD_ASSIGNMENT, &Request::new([0u8; 4]));

        assert_eq!(response.result(), sf::INVALID_REQUEST);
        assert!(response.data().is_empty());
    }

    #[test]
    fn test_not_implemented_commands_are_inert() {
        let hid = service();

        for command_id in [40, 73, 133, 405, 500, 529, 2000, 9999] {
            let response = hid.handle_request(command_id, &Request::empty());
            assert!(!response.is_implemented(), "{command_id}");
            assert!(response.result().is_success());
        }
    }

    #[test]
    fn test_stubbed_commands_succeed() {
        let hid = service();

        for command_id in [cmds::SEND_KEYBOARD_LOCK_KEY_EVENT, 300, 306, 310, 522, 525] {
            let response = hid.handle_request(command_id, &Request::empty());
            assert!(response.is_implemented(), "{command_id}");
            assert!(response.result().is_success());
        }
        let response = hid.handle_request(cmds::GET_XPAD_IDS, &Request::empty());
        assert_eq!(response.data(), &0u64.to_le_bytes());
    }

    #[test]
    fn test_activation_commands_reach_registry() {
        let hid = service();
        assert!(!hid.lock().is_controller_active(DeviceClass::Keyboard));

        hid.handle_request(cmds::ACTIVATE_KEYBOARD, &aruid_request());
        hid.handle_request(cmds::DEACTIVATE_NPAD, &aruid_request());

        let resource = hid.lock();
        assert!(resource.is_controller_active(DeviceClass::Keyboard));
        assert!(!resource.is_controller_active(DeviceClass::NPad));
    }

    #[test]
    fn test_activate_six_axis_sensor_enables_handle() {
        let hid = service();
        let handle = player1(DeviceIndex::Left);

        let response = hid.handle_request(cmds::ACTIVATE_SIX_AXIS_SENSOR, &handle_request(handle));
        assert!(response.result().is_success());
        assert_eq!(hid.lock().npad().is_sixaxis_enabled(handle), Ok(true));

        let response =
            hid.handle_request(cmds::DEACTIVATE_SIX_AXIS_SENSOR, &handle_request(handle));
        assert!(response.result().is_success());
        assert_eq!(hid.lock().npad().is_sixaxis_enabled(handle), Ok(false));
    }

    #[test]
    fn test_dual_mode_is_idempotent() {
        let hid = service();

        hid.handle_request(cmds::SET_NPAD_JOY_ASSIGNMENT_MODE_DUAL, &npad_request(0));
        let once = entry_bytes(&hid, NpadId::Player1);
        hid.handle_request(cmds::SET_NPAD_JOY_ASSIGNMENT_MODE_DUAL, &npad_request(0));

        assert_eq!(entry_bytes(&hid, NpadId::Player1), once);
        assert_eq!(hid.lock().npad().assignment_mode(NpadId::Player1), NpadAssignments::Dual);
    }

    #[test]
    fn test_single_mode_splits_dual_joycon() {
        let hid = service();
        hid.lock().npad_mut().connect_controller(NpadType::JoyconDual, NpadId::Player1);

        let mut input = NpadModeInput::new_zeroed();
        input.device_index.set(1);
        let request = Request::from_record(&input);
        let response = hid.handle_request(cmds::SET_NPAD_JOY_ASSIGNMENT_MODE_SINGLE, &request);

        assert!(response.result().is_success());
        let resource = hid.lock();
        assert_eq!(resource.npad().npad_type(NpadId::Player1), NpadType::JoyconRight);
        assert_eq!(resource.npad().npad_type(NpadId::Player2), NpadType::JoyconLeft);
    }

    #[test]
    fn test_merge_command() {
        let hid = service();
        {
            let mut resource = hid.lock();
            let npad = resource.npad_mut();
            npad.connect_controller(NpadType::JoyconLeft, NpadId::Player1);
            npad.connect_controller(NpadType::JoyconRight, NpadId::Player2);
        }

        let response = hid.handle_request(cmds::MERGE_SINGLE_JOY_AS_DUAL_JOY, &pair_request(0, 1));

        assert!(response.result().is_success());
        let resource = hid.lock();
        assert_eq!(resource.npad().npad_type(NpadId::Player1), NpadType::JoyconDual);
        assert!(!resource.npad().is_connected(NpadId::Player2));
    }

    #[test]
    fn test_reset_fusion_parameters_restores_defaults() {
        let hid = service();
        let mut input = FusionParametersInput::new_zeroed();
        input.handle = player1(DeviceIndex::Left);
        input.parameter1.set(1.0);
        input.parameter2.set(2.0);
        let request = Request::from_record(&input);
        hid.handle_request(cmds::SET_SIX_AXIS_SENSOR_FUSION_PARAMETERS, &request);

        let request = handle_request(player1(DeviceIndex::Left));
        hid.handle_request(cmds::RESET_SIX_AXIS_SENSOR_FUSION_PARAMETERS, &request);
        let response = hid.handle_request(cmds::GET_SIX_AXIS_SENSOR_FUSION_PARAMETERS, &request);

        let defaults = FusionParameters::default();
        let expected =
            [defaults.parameter1.to_le_bytes(), defaults.parameter2.to_le_bytes()].concat();
        assert_eq!(response.data(), expected.as_slice());
    }

    #[test]
    fn test_drift_mode_rejects_unknown_value() {
        let hid = service();
        let mut input = DriftModeInput::new_zeroed();
        input.handle = player1(DeviceIndex::Left);
        input.drift_mode.set(7);

        let request = Request::from_record(&input);
        let response = hid.handle_request(cmds::SET_GYROSCOPE_ZERO_DRIFT_MODE, &request);
        assert_eq!(response.result(), sf::INVALID_REQUEST);

        input.drift_mode.set(GyroscopeZeroDriftMode::Tight as u32);
        let request = Request::from_record(&input);
        hid.handle_request(cmds::SET_GYROSCOPE_ZERO_DRIFT_MODE, &request);
        let response = hid.handle_request(
            cmds::GET_GYROSCOPE_ZERO_DRIFT_MODE,
            &handle_request(player1(DeviceIndex::Left)),
        );
        assert_eq!(response.data(), &(GyroscopeZeroDriftMode::Tight as u32).to_le_bytes());
    }

    #[test]
    fn test_style_set_update_event_is_signaled() {
        let hid = service();
        let response =
            hid.handle_request(cmds::ACQUIRE_NPAD_STYLE_SET_UPDATE_EVENT_HANDLE, &npad_request(0));
        let Some(Object::Event(event)) = response.objects().first().cloned() else {
            panic!("expected an event object");
        };
        event.clear();

        let mut input = StyleSetInput::new_zeroed();
        input.style_set.set(NpadStyleSet::FULL_KEY.bits());
        hid.handle_request(cmds::SET_SUPPORTED_NPAD_STYLE_SET, &Request::from_record(&input));

        assert!(event.try_consume());
    }

    #[test]
    fn test_supported_npad_ids_from_buffer() {
        let hid = service();
        let ids = [0u32, 1, 0x20].map(u32::to_le_bytes).concat();

        let response = hid.handle_request(
            cmds::SET_SUPPORTED_NPAD_ID_TYPE,
            &aruid_request().with_buffer(ids),
        );
        assert!(response.result().is_success());
        assert_eq!(
            hid.lock().npad().supported_npad_ids(),
            &[NpadId::Player1, NpadId::Player2, NpadId::Handheld]
        );

        let response = hid.handle_request(cmds::SET_SUPPORTED_NPAD_ID_TYPE, &aruid_request());
        assert_eq!(response.result(), sf::INVALID_REQUEST);
    }

    #[test]
    fn test_vibration_round_trip() {
        let hid = service();
        let value = VibrationValue::new(0.5, 160.0, 0.25, 320.0);
        let mut input = SendVibrationInput::new_zeroed();
        input.handle = player1(DeviceIndex::Right);
        input.value = value;

        let request = Request::from_record(&input);
        let response = hid.handle_request(cmds::SEND_VIBRATION_VALUE, &request);
        assert!(response.result().is_success());

        let response = hid.handle_request(
            cmds::GET_ACTUAL_VIBRATION_VALUE,
            &handle_request(player1(DeviceIndex::Right)),
        );
        assert_eq!(response.data(), value.as_bytes());
    }

    #[test]
    fn test_vibration_values_require_matching_buffers() {
        let hid = service();
        let handles = [player1(DeviceIndex::Left), player1(DeviceIndex::Right)];
        let values = [VibrationValue::new(0.5, 160.0, 0.5, 320.0)];

        let request = aruid_request()
            .with_buffer(handles.as_bytes())
            .with_buffer(values.as_bytes());
        let response = hid.handle_request(cmds::SEND_VIBRATION_VALUES, &request);

        assert_eq!(response.result(), hid::VIBRATION_ARRAY_SIZE_MISMATCH);
    }

    #[test]
    fn test_permit_vibration_toggles_global_flag() {
        let hid = service();

        let mut input = PermitVibrationInput::new_zeroed();
        input.permitted = 0;
        hid.handle_request(cmds::PERMIT_VIBRATION, &Request::from_record(&input));

        let response = hid.handle_request(cmds::IS_VIBRATION_PERMITTED, &Request::empty());
        assert_eq!(response.data(), &0u32.to_le_bytes());
        assert!(!hid.settings().vibration_enabled());
    }

    #[test]
    fn test_vibration_device_info_and_mount() {
        let hid = service();
        let mut input = VibrationDeviceInput::new_zeroed();
        input.handle = player1(DeviceIndex::Left);
        let request = Request::from_record(&input);

        let response = hid.handle_request(cmds::GET_VIBRATION_DEVICE_INFO, &request);
        let expected = crate::controllers::npad::VibrationDeviceInfo::new(
            VibrationDeviceType::LinearResonantActuator,
            VibrationDevicePosition::Left,
        );
        assert_eq!(response.data(), expected.as_bytes());

        let response = hid.handle_request(cmds::IS_VIBRATION_DEVICE_MOUNTED, &request);
        assert_eq!(response.data(), &1u32.to_le_bytes());
    }

    #[test]
    fn test_initialize_vibration_device_resets_value() {
        let hid = service();
        let handle = player1(DeviceIndex::Left);
        hid.lock()
            .npad_mut()
            .vibrate_controller(handle, VibrationValue::new(1.0, 160.0, 1.0, 320.0))
            .unwrap();

        let mut input = VibrationDeviceInput::new_zeroed();
        input.handle = handle;
        let response = hid.handle_vibration_device_list_request(
            active_vibration_device_list_cmds::INITIALIZE_VIBRATION_DEVICE,
            &Request::from_record(&input),
        );

        assert!(response.result().is_success());
        assert_eq!(hid.lock().npad().last_vibration(handle), Ok(VibrationValue::neutral()));
    }

    #[test]
    fn test_applet_resource_hands_out_shared_memory() {
        let hid = service();

        let response = hid.handle_request(cmds::CREATE_APPLET_RESOURCE, &aruid_request());
        assert!(matches!(response.objects(), [Object::AppletResource]));

        let response = hid.handle_applet_resource_request(
            applet_resource_cmds::GET_SHARED_MEMORY_HANDLE,
            &Request::empty(),
        );
        let [Object::SharedMemory(shared_memory)] = response.objects() else {
            panic!("expected the shared memory object");
        };
        assert!(Arc::ptr_eq(shared_memory, &hid.shared_memory()));
    }

    #[test]
    fn test_mode_getters_reflect_setters() {
        let hid = service();

        let mut input = ModeInput::new_zeroed();
        input.mode.set(NpadHoldType::Horizontal as u64);
        hid.handle_request(cmds::SET_NPAD_JOY_HOLD_TYPE, &Request::from_record(&input));
        input.mode.set(NpadCommunicationMode::Mode10ms as u64);
        hid.handle_request(cmds::SET_NPAD_COMMUNICATION_MODE, &Request::from_record(&input));

        let response = hid.handle_request(cmds::GET_NPAD_JOY_HOLD_TYPE, &aruid_request());
        assert_eq!(response.data(), &1u64.to_le_bytes());
        let response = hid.handle_request(cmds::GET_NPAD_COMMUNICATION_MODE, &aruid_request());
        assert_eq!(response.data(), &1u64.to_le_bytes());

        input.mode.set(9);
        let request = Request::from_record(&input);
        let response = hid.handle_request(cmds::SET_NPAD_HANDHELD_ACTIVATION_MODE, &request);
        assert_eq!(response.result(), sf::INVALID_REQUEST);
    }

    proptest! {
        #[test]
        fn test_fusion_parameters_round_trip(
            parameter1 in -10.0f32..10.0,
            parameter2 in -10.0f32..10.0,
        ) {
            let hid = service();
            let mut input = FusionParametersInput::new_zeroed();
            input.handle = player1(DeviceIndex::Left);
            input.parameter1.set(parameter1);
            input.parameter2.set(parameter2);

            let request = Request::from_record(&input);
            let response =
                hid.handle_request(cmds::SET_SIX_AXIS_SENSOR_FUSION_PARAMETERS, &request);
            prop_assert!(response.result().is_success());

            let response = hid.handle_request(
                cmds::GET_SIX_AXIS_SENSOR_FUSION_PARAMETERS,
                &handle_request(player1(DeviceIndex::Left)),
            );
            let expected = [parameter1.to_le_bytes(), parameter2.to_le_bytes()].concat();
            prop_assert_eq!(response.data(), expected.as_slice());
        }
    }
}
