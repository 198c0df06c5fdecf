//! HID protocol constants.

/// Service name for HID.
pub const SERVICE_NAME: &str = "hid";

/// Name of the shared memory object handed to the guest.
pub const SHARED_MEMORY_NAME: &str = "HID:SharedMemory";

/// Pad update period (1000 Hz).
pub const PAD_UPDATE_PERIOD_NS: u64 = 1_000_000;

/// Motion update period (~66.67 Hz).
pub const MOTION_UPDATE_PERIOD_NS: u64 = 15_000_000;

/// IHidServer command IDs
pub mod cmds {
    pub const CREATE_APPLET_RESOURCE: u32 = 0;
    pub const ACTIVATE_DEBUG_PAD: u32 = 1;

    // Touch screen
    pub const ACTIVATE_TOUCH_SCREEN: u32 = 11;

    // Mouse
    pub const ACTIVATE_MOUSE: u32 = 21;

    // Keyboard
    pub const ACTIVATE_KEYBOARD: u32 = 31;
    pub const SEND_KEYBOARD_LOCK_KEY_EVENT: u32 = 32;

    // Xpad
    pub const ACTIVATE_XPAD: u32 = 51;
    pub const GET_XPAD_IDS: u32 = 55;

    // Six-axis sensor
    pub const ACTIVATE_SIX_AXIS_SENSOR: u32 = 60;
    pub const DEACTIVATE_SIX_AXIS_SENSOR: u32 = 61;
    pub const START_SIX_AXIS_SENSOR: u32 = 66;
    pub const STOP_SIX_AXIS_SENSOR: u32 = 67;
    pub const IS_SIX_AXIS_SENSOR_FUSION_ENABLED: u32 = 68;
    pub const ENABLE_SIX_AXIS_SENSOR_FUSION: u32 = 69;
    pub const SET_SIX_AXIS_SENSOR_FUSION_PARAMETERS: u32 = 70;
    pub const GET_SIX_AXIS_SENSOR_FUSION_PARAMETERS: u32 = 71;
    pub const RESET_SIX_AXIS_SENSOR_FUSION_PARAMETERS: u32 = 72;
    pub const SET_GYROSCOPE_ZERO_DRIFT_MODE: u32 = 79;
    pub const GET_GYROSCOPE_ZERO_DRIFT_MODE: u32 = 80;
    pub const RESET_GYROSCOPE_ZERO_DRIFT_MODE: u32 = 81;
    pub const IS_SIX_AXIS_SENSOR_AT_REST: u32 = 82;

    // Gesture
    pub const ACTIVATE_GESTURE: u32 = 91;

    // Npad
    pub const SET_SUPPORTED_NPAD_STYLE_SET: u32 = 100;
    pub const GET_SUPPORTED_NPAD_STYLE_SET: u32 = 101;
    pub const SET_SUPPORTED_NPAD_ID_TYPE: u32 = 102;
    pub const ACTIVATE_NPAD: u32 = 103;
    pub const DEACTIVATE_NPAD: u32 = 104;
    pub const ACQUIRE_NPAD_STYLE_SET_UPDATE_EVENT_HANDLE: u32 = 106;
    pub const DISCONNECT_NPAD: u32 = 107;
    pub const GET_PLAYER_LED_PATTERN: u32 = 108;
    pub const ACTIVATE_NPAD_WITH_REVISION: u32 = 109;
    pub const SET_NPAD_JOY_HOLD_TYPE: u32 = 120;
    pub const GET_NPAD_JOY_HOLD_TYPE: u32 = 121;
    pub const SET_NPAD_JOY_ASSIGNMENT_MODE_SINGLE_BY_DEFAULT: u32 = 122;
    pub const SET_NPAD_JOY_ASSIGNMENT_MODE_SINGLE: u32 = 123;
    pub const SET_NPAD_JOY_ASSIGNMENT_MODE_DUAL: u32 = 124;
    pub const MERGE_SINGLE_JOY_AS_DUAL_JOY: u32 = 125;
    pub const START_LR_ASSIGNMENT_MODE: u32 = 126;
    pub const STOP_LR_ASSIGNMENT_MODE: u32 = 127;
    pub const SET_NPAD_HANDHELD_ACTIVATION_MODE: u32 = 128;
    pub const GET_NPAD_HANDHELD_ACTIVATION_MODE: u32 = 129;
    pub const SWAP_NPAD_ASSIGNMENT: u32 = 130;
    pub const IS_UNINTENDED_HOME_BUTTON_INPUT_PROTECTION_ENABLED: u32 = 131;
    pub const ENABLE_UNINTENDED_HOME_BUTTON_INPUT_PROTECTION: u32 = 132;

    // Vibration
    pub const GET_VIBRATION_DEVICE_INFO: u32 = 200;
    pub const SEND_VIBRATION_VALUE: u32 = 201;
    pub const GET_ACTUAL_VIBRATION_VALUE: u32 = 202;
    pub const CREATE_ACTIVE_VIBRATION_DEVICE_LIST: u32 = 203;
    pub const PERMIT_VIBRATION: u32 = 204;
    pub const IS_VIBRATION_PERMITTED: u32 = 205;
    pub const SEND_VIBRATION_VALUES: u32 = 206;
    pub const BEGIN_PERMIT_VIBRATION_SESSION: u32 = 209;
    pub const END_PERMIT_VIBRATION_SESSION: u32 = 210;
    pub const IS_VIBRATION_DEVICE_MOUNTED: u32 = 211;

    // Console six-axis sensor
    pub const ACTIVATE_CONSOLE_SIX_AXIS_SENSOR: u32 = 300;
    pub const START_CONSOLE_SIX_AXIS_SENSOR: u32 = 301;
    pub const STOP_CONSOLE_SIX_AXIS_SENSOR: u32 = 302;
    pub const ACTIVATE_SEVEN_SIX_AXIS_SENSOR: u32 = 303;
    pub const START_SEVEN_SIX_AXIS_SENSOR: u32 = 304;
    pub const STOP_SEVEN_SIX_AXIS_SENSOR: u32 = 305;
    pub const INITIALIZE_SEVEN_SIX_AXIS_SENSOR: u32 = 306;
    pub const FINALIZE_SEVEN_SIX_AXIS_SENSOR: u32 = 307;
    pub const RESET_SEVEN_SIX_AXIS_SENSOR_TIMESTAMP: u32 = 310;

    // Palma
    pub const SET_IS_PALMA_ALL_CONNECTABLE: u32 = 522;
    pub const SET_PALMA_BOOST_MODE: u32 = 525;

    // Communication mode
    pub const SET_NPAD_COMMUNICATION_MODE: u32 = 1000;
    pub const GET_NPAD_COMMUNICATION_MODE: u32 = 1001;
}

/// IAppletResource command IDs
pub mod applet_resource_cmds {
    pub const GET_SHARED_MEMORY_HANDLE: u32 = 0;
}

/// IActiveVibrationDeviceList command IDs
pub mod active_vibration_device_list_cmds {
    pub const INITIALIZE_VIBRATION_DEVICE: u32 = 0;
}

/// IHidServer commands known on the platform but not provided.
pub const NOT_IMPLEMENTED: &[(u32, &str)] = &[
    (40, "AcquireXpadIdEventHandle"),
    (41, "ReleaseXpadIdEventHandle"),
    (56, "ActivateJoyXpad"),
    (58, "GetJoyXpadLifoHandle"),
    (59, "GetJoyXpadIds"),
    (62, "GetSixAxisSensorLifoHandle"),
    (63, "ActivateJoySixAxisSensor"),
    (64, "DeactivateJoySixAxisSensor"),
    (65, "GetJoySixAxisSensorLifoHandle"),
    (73, "SetAccelerometerParameters"),
    (74, "GetAccelerometerParameters"),
    (75, "ResetAccelerometerParameters"),
    (76, "SetAccelerometerPlayMode"),
    (77, "GetAccelerometerPlayMode"),
    (78, "ResetAccelerometerPlayMode"),
    (83, "IsFirmwareUpdateAvailableForSixAxisSensor"),
    (133, "SetNpadJoyAssignmentModeSingleWithDestination"),
    (134, "SetNpadAnalogStickUseCenterClamp"),
    (135, "SetNpadCaptureButtonAssignment"),
    (136, "ClearNpadCaptureButtonAssignment"),
    (207, "SendVibrationGcErmCommand"),
    (208, "GetActualVibrationGcErmCommand"),
    (308, "SetSevenSixAxisSensorFusionStrength"),
    (309, "GetSevenSixAxisSensorFusionStrength"),
    (400, "IsUsbFullKeyControllerEnabled"),
    (401, "EnableUsbFullKeyController"),
    (402, "IsUsbFullKeyControllerConnected"),
    (403, "HasBattery"),
    (404, "HasLeftRightBattery"),
    (405, "GetNpadInterfaceType"),
    (406, "GetNpadLeftRightInterfaceType"),
    (407, "GetNpadOfHighestBatteryLevel"),
    (408, "GetNpadOfHighestBatteryLevelForJoyRight"),
    (500, "GetPalmaConnectionHandle"),
    (501, "InitializePalma"),
    (502, "AcquirePalmaOperationCompleteEvent"),
    (503, "GetPalmaOperationInfo"),
    (504, "PlayPalmaActivity"),
    (505, "SetPalmaFrModeType"),
    (506, "ReadPalmaStep"),
    (507, "EnablePalmaStep"),
    (508, "ResetPalmaStep"),
    (509, "ReadPalmaApplicationSection"),
    (510, "WritePalmaApplicationSection"),
    (511, "ReadPalmaUniqueCode"),
    (512, "SetPalmaUniqueCodeInvalid"),
    (513, "WritePalmaActivityEntry"),
    (514, "WritePalmaRgbLedPatternEntry"),
    (515, "WritePalmaWaveEntry"),
    (516, "SetPalmaDataBaseIdentificationVersion"),
    (517, "GetPalmaDataBaseIdentificationVersion"),
    (518, "SuspendPalmaFeature"),
    (519, "GetPalmaOperationResult"),
    (520, "ReadPalmaPlayLog"),
    (521, "ResetPalmaPlayLog"),
    (523, "SetIsPalmaPairedConnectable"),
    (524, "PairPalma"),
    (526, "CancelWritePalmaWaveEntry"),
    (527, "EnablePalmaBoostMode"),
    (528, "GetPalmaBluetoothAddress"),
    (529, "SetDisallowedPalmaConnection"),
    (1002, "SetTouchScreenConfiguration"),
    (1003, "IsFirmwareUpdateNeededForNotification"),
    (2000, "ActivateDigitizer"),
];

/// Returns the platform name of a known but unprovided command.
pub fn not_implemented_name(command_id: u32) -> Option<&'static str> {
    NOT_IMPLEMENTED
        .iter()
        .find(|(id, _)| *id == command_id)
        .map(|(_, name)| *name)
}
