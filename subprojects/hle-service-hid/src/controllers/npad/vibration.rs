//! Vibration devices of the Npad slots.
//!
//! A device is one side of a connected controller. Requests are forwarded to the host only
//! while vibration is permitted both globally and for the current session; the latest
//! accepted value is remembered per device whether or not the host motor took it.

use super::{
    NPad,
    types::{
        DeviceHandle, DeviceIndex, NpadError, VibrationDeviceInfo, VibrationDevicePosition,
        VibrationDeviceType, VibrationValue,
    },
};
use crate::input::HostVibration;

impl NPad {
    /// Returns `true` while vibration is enabled globally and permitted for the session.
    pub fn is_vibration_permitted(&self) -> bool {
        self.settings.vibration_enabled() && self.vibration_session_permitted
    }

    pub fn set_vibration_session_permitted(&mut self, permitted: bool) {
        self.vibration_session_permitted = permitted;
    }

    /// Returns `true` if `handle` names a side present on a connected controller.
    pub fn is_vibration_device_mounted(&self, handle: DeviceHandle) -> bool {
        let (Ok(id), Ok(side)) = (handle.npad_id(), handle.side()) else {
            return false;
        };
        let slot = &self.slots[id.index()];
        slot.connected && slot.npad_type.has_side(side)
    }

    /// Resets the device to neutral.
    pub fn initialize_vibration_device(&mut self, handle: DeviceHandle) -> Result<(), NpadError> {
        let id = handle.npad_id()?;
        let side = handle.side()?;
        self.slots[id.index()].vibration[side as usize] = VibrationValue::neutral();
        Ok(())
    }

    pub fn vibration_device_info(
        &self,
        handle: DeviceHandle,
    ) -> Result<VibrationDeviceInfo, NpadError> {
        handle.npad_id()?;
        let side = handle.side()?;

        // Every kind with a motor encodes to 1..=5 in the handle's type byte.
        let device_type = if (1..=5).contains(&handle.npad_type) {
            VibrationDeviceType::LinearResonantActuator
        } else {
            VibrationDeviceType::Unknown
        };
        let position = match side {
            DeviceIndex::Left => VibrationDevicePosition::Left,
            DeviceIndex::Right => VibrationDevicePosition::Right,
            DeviceIndex::None => VibrationDevicePosition::None,
        };
        Ok(VibrationDeviceInfo::new(device_type, position))
    }

    /// Sends `value` to the device named by `handle`.
    ///
    /// Requests for unmounted devices, or while vibration is not permitted, succeed without
    /// effect.
    pub fn vibrate_controller(
        &mut self,
        handle: DeviceHandle,
        value: VibrationValue,
    ) -> Result<(), NpadError> {
        let id = handle.npad_id()?;
        let side = handle.side()?;
        if !self.is_vibration_permitted() || !self.is_vibration_device_mounted(handle) {
            tracing::trace!(?id, ?side, "vibration dropped");
            return Ok(());
        }

        let index = id.index();
        let latest = &mut self.slots[index].vibration[side as usize];
        if *latest == value {
            return Ok(());
        }

        *latest = value;
        if !self.input.set_vibration(index, side, host_vibration(&value)) {
            tracing::debug!(?id, ?side, "host rejected vibration");
        }
        Ok(())
    }

    /// Sends each value to the device at the same position in `handles`.
    pub fn vibrate_controllers(
        &mut self,
        handles: &[DeviceHandle],
        values: &[VibrationValue],
    ) -> Result<(), NpadError> {
        if handles.len() != values.len() {
            return Err(NpadError::VibrationArraySizeMismatch {
                handles: handles.len(),
                values: values.len(),
            });
        }
        for handle in handles {
            handle.npad_id()?;
            handle.side()?;
        }

        for (handle, value) in handles.iter().zip(values) {
            self.vibrate_controller(*handle, *value)?;
        }
        Ok(())
    }

    /// Latest value accepted for the device, neutral if none was.
    pub fn last_vibration(&self, handle: DeviceHandle) -> Result<VibrationValue, NpadError> {
        let id = handle.npad_id()?;
        let side = handle.side()?;
        Ok(self.slots[id.index()].vibration[side as usize])
    }

    /// Stops both motors of the controller in slot `index`.
    pub(super) fn stop_vibration(&mut self, index: usize) {
        let neutral = VibrationValue::neutral();
        let slot = &mut self.slots[index];
        for side in [DeviceIndex::Left, DeviceIndex::Right] {
            slot.vibration[side as usize] = neutral;
            if slot.connected && slot.npad_type.has_side(side) {
                self.input.set_vibration(index, side, host_vibration(&neutral));
            }
        }
    }
}

fn host_vibration(value: &VibrationValue) -> HostVibration {
    HostVibration {
        amp_low: value.amp_low.get(),
        freq_low: value.freq_low.get(),
        amp_high: value.amp_high.get(),
        freq_high: value.freq_high.get(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hle_settings::{ControllerType, Settings, Values};

    use super::*;
    use crate::{
        controllers::{ControllerBase, npad::types::{NpadId, NpadType}},
        input::testing::FakeInput,
        result::hid,
    };

    fn setup(controller_type: ControllerType) -> (Arc<Settings>, Arc<FakeInput>, NPad) {
        let mut values = Values::default();
        values.players[0].controller_type = controller_type;
        let settings = Arc::new(Settings::new(values));
        let input = Arc::new(FakeInput::default());
        let mut npad = NPad::new(settings.clone(), input.clone());
        npad.on_init();
        (settings, input, npad)
    }

    fn handle(side: DeviceIndex) -> DeviceHandle {
        DeviceHandle::new(NpadType::ProController, NpadId::Player1, side)
    }

    #[test]
    fn test_permitted_vibration_is_stored_and_forwarded() {
        let (_, input, mut npad) = setup(ControllerType::ProController);
        let value = VibrationValue::new(0.5, 160.0, 0.25, 320.0);

        npad.vibrate_controller(handle(DeviceIndex::Right), value).unwrap();

        assert_eq!(npad.last_vibration(handle(DeviceIndex::Right)), Ok(value));
        assert_eq!(npad.last_vibration(handle(DeviceIndex::Left)), Ok(VibrationValue::neutral()));
        let vibrations = input.vibrations.lock();
        assert_eq!(vibrations.len(), 1);
        assert_eq!(vibrations[0].0, 0);
        assert_eq!(vibrations[0].1, DeviceIndex::Right);
        assert_eq!(vibrations[0].2.amp_low, 0.5);
    }

    #[test]
    fn test_disabled_vibration_keeps_previous_value() {
        let (settings, input, mut npad) = setup(ControllerType::ProController);
        let first = VibrationValue::new(0.5, 160.0, 0.5, 320.0);
        npad.vibrate_controller(handle(DeviceIndex::Left), first).unwrap();

        settings.set_vibration_enabled(false);
        let strong = VibrationValue::new(1.0, 160.0, 1.0, 320.0);
        npad.vibrate_controller(handle(DeviceIndex::Left), strong).unwrap();

        assert_eq!(npad.last_vibration(handle(DeviceIndex::Left)), Ok(first));
        assert_eq!(input.vibrations.lock().len(), 1);
    }

    #[test]
    fn test_session_permission_gates_vibration() {
        let (_, input, mut npad) = setup(ControllerType::ProController);
        npad.set_vibration_session_permitted(false);

        let strong = VibrationValue::new(1.0, 160.0, 1.0, 320.0);
        npad.vibrate_controller(handle(DeviceIndex::Left), strong).unwrap();

        assert_eq!(npad.last_vibration(handle(DeviceIndex::Left)), Ok(VibrationValue::neutral()));
        assert!(input.vibrations.lock().is_empty());
    }

    #[test]
    fn test_single_joycon_mounts_one_side() {
        let (_, _, npad) = setup(ControllerType::LeftJoycon);
        let left = DeviceHandle::new(NpadType::JoyconLeft, NpadId::Player1, DeviceIndex::Left);
        let right = DeviceHandle::new(NpadType::JoyconLeft, NpadId::Player1, DeviceIndex::Right);
        let absent = DeviceHandle::new(NpadType::JoyconLeft, NpadId::Player2, DeviceIndex::Left);

        assert!(npad.is_vibration_device_mounted(left));
        assert!(!npad.is_vibration_device_mounted(right));
        assert!(!npad.is_vibration_device_mounted(absent));
    }

    #[test]
    fn test_invalid_handles_are_rejected() {
        let (_, _, mut npad) = setup(ControllerType::ProController);
        let value = VibrationValue::neutral();

        let err = npad.vibrate_controller(handle(DeviceIndex::None), value).unwrap_err();
        assert_eq!(err.result_code(), hid::NPAD_DEVICE_INDEX_OUT_OF_RANGE);

        let mut bad_id = handle(DeviceIndex::Left);
        bad_id.npad_id = 9;
        let err = npad.vibrate_controller(bad_id, value).unwrap_err();
        assert_eq!(err.result_code(), hid::INVALID_NPAD_ID);
    }

    #[test]
    fn test_batch_requires_matching_lengths() {
        let (_, input, mut npad) = setup(ControllerType::ProController);
        let handles = [handle(DeviceIndex::Left), handle(DeviceIndex::Right)];
        let value = VibrationValue::new(0.5, 160.0, 0.5, 320.0);

        let err = npad.vibrate_controllers(&handles, &[value]).unwrap_err();
        assert_eq!(err.result_code(), hid::VIBRATION_ARRAY_SIZE_MISMATCH);
        assert!(input.vibrations.lock().is_empty());

        npad.vibrate_controllers(&handles, &[value, value]).unwrap();
        assert_eq!(input.vibrations.lock().len(), 2);
    }

    #[test]
    fn test_device_info_reports_actuator_side() {
        let (_, _, npad) = setup(ControllerType::ProController);
        let info = npad.vibration_device_info(handle(DeviceIndex::Right)).unwrap();
        assert_eq!(info.device_type.get(), VibrationDeviceType::LinearResonantActuator as u32);
        assert_eq!(info.position.get(), VibrationDevicePosition::Right as u32);
    }
}
