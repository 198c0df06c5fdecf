//! Npad controller.
//!
//! Owns the ten per-player Npad entries. A slot is either disconnected or holds one
//! emulated controller kind; connecting a slot writes its static description (style, colors,
//! device type, properties, battery) and every tick appends one sample to each of its style
//! LIFOs. Joy-Con splitting, merging and swapping rewrite the slot table and re-describe the
//! affected entries.
//!
//! Player configuration is mirrored into [`Settings`] so a later input reload sees the
//! current layout.

use std::sync::Arc;

use hle_settings::{HANDHELD_INDEX, PlayerInput, Players, Settings};
use hle_timing::counter;
use zerocopy::{FromZeros, IntoBytes, little_endian::U32};

use super::{ControllerBase, UpdateContext};
use crate::{
    event::Event,
    input::{AnalogStick, InputBackend, NpadSample},
    shmem::{
        AnalogStickState, Lifo, NPAD_COUNT, NpadAttribute, NpadButton, NpadDeviceType,
        NpadStyleSet, NpadSystemButtonProperties, NpadSystemProperties, Section,
        layout::{
            NpadFullKeyColorState, NpadGenericState, NpadInternalState, NpadJoyColorState,
            SixAxisSensorState,
        },
    },
};

pub mod sixaxis;
pub mod types;
mod vibration;

pub use self::{
    sixaxis::{AtRestDetector, FusionParameters, SixAxisState},
    types::{
        DeviceHandle, DeviceIndex, GyroscopeZeroDriftMode, LedPattern, NpadAssignments,
        NpadCommunicationMode, NpadError, NpadHandheldActivationMode, NpadHoldType, NpadId,
        NpadType, VibrationDeviceInfo, VibrationDevicePosition, VibrationDeviceType,
        VibrationValue,
    },
};

/// Styles supported when the guest never declared any.
pub const DEFAULT_STYLE_SET: NpadStyleSet = NpadStyleSet::FULL_KEY
    .union(NpadStyleSet::HANDHELD)
    .union(NpadStyleSet::JOY_DUAL)
    .union(NpadStyleSet::JOY_LEFT)
    .union(NpadStyleSet::JOY_RIGHT)
    .union(NpadStyleSet::PALMA);

/// Index of each style LIFO in [`NpadInternalState::style_lifos_mut`].
mod style_lifo {
    pub const FULL_KEY: usize = 0;
    pub const HANDHELD: usize = 1;
    pub const JOY_DUAL: usize = 2;
    pub const JOY_LEFT: usize = 3;
    pub const JOY_RIGHT: usize = 4;
    pub const PALMA: usize = 5;
    pub const SYSTEM_EXT: usize = 6;
}

/// Index of each sensor LIFO in [`NpadInternalState::sixaxis_lifos_mut`].
mod sixaxis_lifo {
    pub const FULL_KEY: usize = 0;
    pub const HANDHELD: usize = 1;
    pub const DUAL_LEFT: usize = 2;
    pub const DUAL_RIGHT: usize = 3;
    pub const LEFT: usize = 4;
    pub const RIGHT: usize = 5;
}

/// Battery cells report "full".
const BATTERY_FULL: u32 = 2;

#[derive(Debug)]
struct Slot {
    npad_type: NpadType,
    connected: bool,
    assignment: NpadAssignments,
    home_protection: bool,
    sixaxis: SixAxisState,
    /// Latest value sent to each side, indexed by [`DeviceIndex`]
    vibration: [VibrationValue; 2],
    style_set_changed: Arc<Event>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            npad_type: NpadType::None,
            connected: false,
            assignment: NpadAssignments::Dual,
            home_protection: true,
            sixaxis: SixAxisState::default(),
            vibration: [VibrationValue::neutral(); 2],
            style_set_changed: Arc::new(Event::new()),
        }
    }
}

pub struct NPad {
    settings: Arc<Settings>,
    input: Arc<dyn InputBackend>,
    entries: Vec<NpadInternalState>,
    slots: [Slot; NPAD_COUNT],
    style_set: NpadStyleSet,
    supported_ids: Vec<NpadId>,
    hold_type: NpadHoldType,
    handheld_activation_mode: NpadHandheldActivationMode,
    communication_mode: NpadCommunicationMode,
    vibration_session_permitted: bool,
    lr_assignment_mode: bool,
    motion_enabled: bool,
    /// Player configuration applied by the last load, `None` until initialized
    loaded_players: Option<Players>,
    last_motion_ticks: u64,
}

impl NPad {
    pub fn new(settings: Arc<Settings>, input: Arc<dyn InputBackend>) -> Self {
        let motion_enabled = settings.values().motion_enabled;
        Self {
            settings,
            input,
            entries: (0..NPAD_COUNT).map(|_| NpadInternalState::new_zeroed()).collect(),
            slots: Default::default(),
            style_set: NpadStyleSet::empty(),
            supported_ids: Vec::new(),
            hold_type: NpadHoldType::default(),
            handheld_activation_mode: NpadHandheldActivationMode::default(),
            communication_mode: NpadCommunicationMode::default(),
            vibration_session_permitted: true,
            lr_assignment_mode: false,
            motion_enabled,
            loaded_players: None,
            last_motion_ticks: 0,
        }
    }

    /// The ten entries in shared-memory order.
    pub fn shared_memory(&self) -> &[NpadInternalState] {
        &self.entries
    }

    pub fn entry(&self, id: NpadId) -> &NpadInternalState {
        &self.entries[id.index()]
    }

    /// Controller kind connected to `id`, [`NpadType::None`] when disconnected.
    pub fn npad_type(&self, id: NpadId) -> NpadType {
        let slot = &self.slots[id.index()];
        if slot.connected { slot.npad_type } else { NpadType::None }
    }

    pub fn is_connected(&self, id: NpadId) -> bool {
        self.slots[id.index()].connected
    }

    pub fn assignment_mode(&self, id: NpadId) -> NpadAssignments {
        self.slots[id.index()].assignment
    }

    pub fn supported_style_set(&self) -> NpadStyleSet {
        self.style_set
    }

    /// Replaces the supported styles, dropping unknown bits.
    ///
    /// Every slot's style-set-changed event is signaled if the set changed.
    pub fn set_supported_style_set(&mut self, style_set: NpadStyleSet) {
        let style_set = NpadStyleSet::from_bits_truncate(style_set.bits());
        if style_set == self.style_set {
            return;
        }

        tracing::debug!(?style_set, "supported npad styles changed");
        self.style_set = style_set;
        for slot in &self.slots {
            slot.style_set_changed.signal();
        }
    }

    pub fn supported_npad_ids(&self) -> &[NpadId] {
        &self.supported_ids
    }

    /// Replaces the supported id list. The list is left untouched if any id is invalid.
    pub fn set_supported_npad_id_types(&mut self, raw_ids: &[u32]) -> Result<(), NpadError> {
        let ids = raw_ids
            .iter()
            .map(|&raw| NpadId::try_from(raw))
            .collect::<Result<Vec<_>, _>>()?;
        self.supported_ids = ids;
        Ok(())
    }

    pub fn hold_type(&self) -> NpadHoldType {
        self.hold_type
    }

    pub fn set_hold_type(&mut self, hold_type: NpadHoldType) {
        self.hold_type = hold_type;
    }

    pub fn handheld_activation_mode(&self) -> NpadHandheldActivationMode {
        self.handheld_activation_mode
    }

    pub fn set_handheld_activation_mode(&mut self, mode: NpadHandheldActivationMode) {
        self.handheld_activation_mode = mode;
    }

    pub fn communication_mode(&self) -> NpadCommunicationMode {
        self.communication_mode
    }

    pub fn set_communication_mode(&mut self, mode: NpadCommunicationMode) {
        self.communication_mode = mode;
    }

    pub fn style_set_changed_event(&self, id: NpadId) -> Arc<Event> {
        Arc::clone(&self.slots[id.index()].style_set_changed)
    }

    pub fn led_pattern(&self, id: NpadId) -> LedPattern {
        LedPattern::for_npad(id)
    }

    /// Connects `npad_type` at `id`. Handheld controllers always land in the handheld slot.
    pub fn connect_controller(&mut self, npad_type: NpadType, id: NpadId) {
        if npad_type == NpadType::None {
            self.disconnect_npad(id);
            return;
        }

        let index = if npad_type == NpadType::Handheld {
            HANDHELD_INDEX
        } else {
            id.index()
        };

        let slot = &mut self.slots[index];
        slot.npad_type = npad_type;
        slot.connected = true;
        slot.assignment = if npad_type.is_single_joycon() {
            NpadAssignments::Single
        } else {
            NpadAssignments::Dual
        };

        tracing::debug!(id = ?NpadId::from_index(index), ?npad_type, "npad connected");
        self.store_player_config(index);
        self.describe_slot(index);
    }

    /// Disconnects the controller at `id`, stopping any vibration first.
    pub fn disconnect_npad(&mut self, id: NpadId) {
        let index = id.index();
        self.stop_vibration(index);

        let slot = &mut self.slots[index];
        slot.connected = false;
        slot.npad_type = NpadType::None;
        slot.assignment = NpadAssignments::Dual;
        slot.sixaxis.at_rest.clear();

        let entry = &mut self.entries[index];
        entry.style_set.set(0);
        entry.joy_assignment_mode.set(NpadAssignments::Dual as u32);
        entry.fullkey_color = NpadFullKeyColorState::default();
        entry.joycon_color = NpadJoyColorState::default();
        entry.device_type.set(0);
        entry.system_properties.set(0);
        entry.button_properties.set(0);
        entry.battery_level = [U32::new(0); 3];

        tracing::debug!(?id, "npad disconnected");
        self.store_player_config(index);
        self.slots[index].style_set_changed.signal();
    }

    /// Changes the Joy-Con assignment of `id`.
    ///
    /// Switching a dual Joy-Con pair to single keeps the `side` half (left unless `Right`)
    /// in place and moves the other half to the first free player slot, dropping it if no
    /// slot is free. Switching to single is a no-op for every other controller kind.
    pub fn set_npad_mode(&mut self, id: NpadId, mode: NpadAssignments, side: DeviceIndex) {
        let index = id.index();
        match mode {
            NpadAssignments::Dual => {
                self.slots[index].assignment = NpadAssignments::Dual;
                self.entries[index].joy_assignment_mode.set(NpadAssignments::Dual as u32);
            }
            NpadAssignments::Single => {
                let slot = &self.slots[index];
                if !slot.connected || slot.npad_type != NpadType::JoyconDual {
                    return;
                }

                let (kept, moved) = match side {
                    DeviceIndex::Right => (NpadType::JoyconRight, NpadType::JoyconLeft),
                    DeviceIndex::Left | DeviceIndex::None => {
                        (NpadType::JoyconLeft, NpadType::JoyconRight)
                    }
                };
                self.connect_controller(kept, id);
                match self.first_free_player_slot() {
                    Some(free) => self.connect_controller(moved, NpadId::from_index(free)),
                    None => tracing::warn!(?id, ?moved, "no free npad for the split joy-con"),
                }
            }
        }
    }

    /// Merges two single Joy-Cons of opposite sides into a dual pair at `id_1`.
    pub fn merge_single_joy_as_dual_joy(
        &mut self,
        id_1: NpadId,
        id_2: NpadId,
    ) -> Result<(), NpadError> {
        for id in [id_1, id_2] {
            let slot = &self.slots[id.index()];
            if !slot.connected {
                return Err(NpadError::NotConnected(id));
            }
            if !slot.npad_type.is_single_joycon() || slot.assignment != NpadAssignments::Single {
                return Err(NpadError::IsDualJoycon(id));
            }
        }
        if self.slots[id_1.index()].npad_type == self.slots[id_2.index()].npad_type {
            return Err(NpadError::IsSameType(id_1, id_2));
        }

        self.disconnect_npad(id_2);
        self.connect_controller(NpadType::JoyconDual, id_1);
        Ok(())
    }

    /// Exchanges the controllers of two player slots.
    ///
    /// Requests involving the handheld or "other" ids are accepted and ignored.
    pub fn swap_npad_assignment(&mut self, id_1: NpadId, id_2: NpadId) -> Result<(), NpadError> {
        if !id_1.is_player() || !id_2.is_player() {
            return Ok(());
        }

        for id in [id_1, id_2] {
            let slot = &self.slots[id.index()];
            if !slot.connected || !self.is_controller_supported(slot.npad_type) {
                return Err(NpadError::NotConnected(id));
            }
        }

        let (index_1, index_2) = (id_1.index(), id_2.index());
        let (type_1, type_2) = (self.slots[index_1].npad_type, self.slots[index_2].npad_type);
        let (assignment_1, assignment_2) =
            (self.slots[index_1].assignment, self.slots[index_2].assignment);
        self.slots[index_1].npad_type = type_2;
        self.slots[index_1].assignment = assignment_2;
        self.slots[index_2].npad_type = type_1;
        self.slots[index_2].assignment = assignment_1;

        for index in [index_1, index_2] {
            self.store_player_config(index);
            self.describe_slot(index);
        }
        Ok(())
    }

    pub fn start_lr_assignment_mode(&mut self) {
        self.lr_assignment_mode = true;
    }

    pub fn stop_lr_assignment_mode(&mut self) {
        self.lr_assignment_mode = false;
    }

    pub fn is_lr_assignment_mode_enabled(&self) -> bool {
        self.lr_assignment_mode
    }

    pub fn is_unintended_home_button_input_protection_enabled(&self, id: NpadId) -> bool {
        self.slots[id.index()].home_protection
    }

    pub fn set_unintended_home_button_input_protection(&mut self, id: NpadId, enabled: bool) {
        let index = id.index();
        self.slots[index].home_protection = enabled;
        if self.slots[index].connected {
            self.entries[index].button_properties.set(button_properties(enabled).bits());
        }
    }

    pub fn set_sixaxis_enabled(
        &mut self,
        handle: DeviceHandle,
        enabled: bool,
    ) -> Result<(), NpadError> {
        let sixaxis = self.sixaxis_mut(handle)?;
        sixaxis.enabled = enabled;
        if !enabled {
            sixaxis.at_rest.clear();
        }
        Ok(())
    }

    pub fn is_sixaxis_enabled(&self, handle: DeviceHandle) -> Result<bool, NpadError> {
        Ok(self.sixaxis(handle)?.enabled)
    }

    pub fn set_sixaxis_fusion_enabled(
        &mut self,
        handle: DeviceHandle,
        enabled: bool,
    ) -> Result<(), NpadError> {
        self.sixaxis_mut(handle)?.fusion_enabled = enabled;
        Ok(())
    }

    pub fn is_sixaxis_fusion_enabled(&self, handle: DeviceHandle) -> Result<bool, NpadError> {
        Ok(self.sixaxis(handle)?.fusion_enabled)
    }

    pub fn set_sixaxis_fusion_parameters(
        &mut self,
        handle: DeviceHandle,
        parameters: FusionParameters,
    ) -> Result<(), NpadError> {
        self.sixaxis_mut(handle)?.fusion_parameters = parameters;
        Ok(())
    }

    pub fn sixaxis_fusion_parameters(
        &self,
        handle: DeviceHandle,
    ) -> Result<FusionParameters, NpadError> {
        Ok(self.sixaxis(handle)?.fusion_parameters)
    }

    pub fn reset_sixaxis_fusion_parameters(
        &mut self,
        handle: DeviceHandle,
    ) -> Result<(), NpadError> {
        self.sixaxis_mut(handle)?.fusion_parameters = FusionParameters::default();
        Ok(())
    }

    pub fn set_gyroscope_zero_drift_mode(
        &mut self,
        handle: DeviceHandle,
        mode: GyroscopeZeroDriftMode,
    ) -> Result<(), NpadError> {
        self.sixaxis_mut(handle)?.drift_mode = mode;
        Ok(())
    }

    pub fn gyroscope_zero_drift_mode(
        &self,
        handle: DeviceHandle,
    ) -> Result<GyroscopeZeroDriftMode, NpadError> {
        Ok(self.sixaxis(handle)?.drift_mode)
    }

    pub fn reset_gyroscope_zero_drift_mode(
        &mut self,
        handle: DeviceHandle,
    ) -> Result<(), NpadError> {
        self.sixaxis_mut(handle)?.drift_mode = GyroscopeZeroDriftMode::default();
        Ok(())
    }

    pub fn is_sixaxis_at_rest(&self, handle: DeviceHandle) -> Result<bool, NpadError> {
        Ok(self.sixaxis(handle)?.at_rest.is_at_rest())
    }

    fn sixaxis(&self, handle: DeviceHandle) -> Result<&SixAxisState, NpadError> {
        Ok(&self.slots[handle.npad_id()?.index()].sixaxis)
    }

    fn sixaxis_mut(&mut self, handle: DeviceHandle) -> Result<&mut SixAxisState, NpadError> {
        Ok(&mut self.slots[handle.npad_id()?.index()].sixaxis)
    }

    fn is_controller_supported(&self, npad_type: NpadType) -> bool {
        if !self.style_set.contains(npad_type.style()) || npad_type == NpadType::None {
            return false;
        }

        if npad_type == NpadType::Handheld {
            self.supported_ids.contains(&NpadId::Handheld)
        } else {
            self.supported_ids.iter().any(|id| id.is_player())
        }
    }

    fn first_free_player_slot(&self) -> Option<usize> {
        self.slots[..8].iter().position(|slot| !slot.connected)
    }

    /// Writes the static description of a connected slot and signals its event.
    fn describe_slot(&mut self, index: usize) {
        let player = self.settings.values().players[index];
        let slot = &self.slots[index];
        let (device_type, properties) = match slot.npad_type {
            NpadType::None => (NpadDeviceType::empty(), NpadSystemProperties::empty()),
            NpadType::ProController => (NpadDeviceType::FULL_KEY, vertical_properties()),
            NpadType::Handheld => (
                NpadDeviceType::HANDHELD_LEFT | NpadDeviceType::HANDHELD_RIGHT,
                vertical_properties(),
            ),
            NpadType::JoyconDual => (
                NpadDeviceType::JOY_LEFT | NpadDeviceType::JOY_RIGHT,
                vertical_properties(),
            ),
            NpadType::JoyconLeft => (
                NpadDeviceType::JOY_LEFT,
                NpadSystemProperties::IS_HORIZONTAL | NpadSystemProperties::USE_MINUS,
            ),
            NpadType::JoyconRight => (
                NpadDeviceType::JOY_RIGHT,
                NpadSystemProperties::IS_HORIZONTAL | NpadSystemProperties::USE_PLUS,
            ),
            NpadType::Pokeball => (NpadDeviceType::PALMA, NpadSystemProperties::empty()),
        };

        let entry = &mut self.entries[index];
        entry.style_set.set(slot.npad_type.style().bits());
        entry.joy_assignment_mode.set(slot.assignment as u32);
        entry.fullkey_color = NpadFullKeyColorState {
            attribute: U32::new(0),
            body: U32::new(player.body_color_left),
            button: U32::new(player.button_color_left),
        };
        entry.joycon_color = NpadJoyColorState {
            attribute: U32::new(0),
            left_body: U32::new(player.body_color_left),
            left_button: U32::new(player.button_color_left),
            right_body: U32::new(player.body_color_right),
            right_button: U32::new(player.button_color_right),
        };
        entry.device_type.set(device_type.bits());
        entry.system_properties.set(properties.bits());
        entry.button_properties.set(button_properties(slot.home_protection).bits());
        entry.battery_level = [U32::new(BATTERY_FULL); 3];

        slot.style_set_changed.signal();
    }

    /// Mirrors the slot's connection into the player configuration.
    fn store_player_config(&mut self, index: usize) {
        let slot = &self.slots[index];
        let (connected, controller_type) = (slot.connected, slot.npad_type.to_settings());
        let apply = |player: &mut PlayerInput| {
            player.connected = connected;
            if let Some(controller_type) = controller_type {
                player.controller_type = controller_type;
            }
        };

        self.settings.update(|values| apply(&mut values.players[index]));
        if let Some(loaded) = &mut self.loaded_players {
            apply(&mut loaded[index]);
        }
    }

    /// Applies one player's configuration to its slot.
    fn apply_player_config(&mut self, index: usize, player: PlayerInput) {
        let npad_type = if index == HANDHELD_INDEX {
            NpadType::Handheld
        } else {
            NpadType::from(player.controller_type)
        };

        if player.connected {
            self.connect_controller(npad_type, NpadId::from_index(index));
        } else {
            let target = if npad_type == NpadType::Handheld { HANDHELD_INDEX } else { index };
            if self.slots[target].connected {
                self.disconnect_npad(NpadId::from_index(target));
            }
        }
    }

    fn style_states(npad_type: NpadType, sample: NpadSample) -> [NpadGenericState; 7] {
        let mut states = [NpadGenericState::default(); 7];
        let (lifo, buttons, l_stick, r_stick, attributes) = match npad_type {
            NpadType::None => return states,
            NpadType::ProController => (
                style_lifo::FULL_KEY,
                sample.buttons,
                sample.l_stick,
                sample.r_stick,
                NpadAttribute::IS_CONNECTED | NpadAttribute::IS_WIRED,
            ),
            NpadType::Handheld => (
                style_lifo::HANDHELD,
                sample.buttons,
                sample.l_stick,
                sample.r_stick,
                NpadAttribute::all(),
            ),
            NpadType::JoyconDual => (
                style_lifo::JOY_DUAL,
                sample.buttons,
                sample.l_stick,
                sample.r_stick,
                NpadAttribute::IS_CONNECTED
                    | NpadAttribute::IS_LEFT_CONNECTED
                    | NpadAttribute::IS_RIGHT_CONNECTED,
            ),
            NpadType::JoyconLeft => (
                style_lifo::JOY_LEFT,
                sample.buttons & NpadButton::JOY_LEFT_MASK,
                sample.l_stick,
                AnalogStick::default(),
                NpadAttribute::IS_CONNECTED | NpadAttribute::IS_LEFT_CONNECTED,
            ),
            NpadType::JoyconRight => (
                style_lifo::JOY_RIGHT,
                sample.buttons & NpadButton::JOY_RIGHT_MASK,
                AnalogStick::default(),
                sample.r_stick,
                NpadAttribute::IS_CONNECTED | NpadAttribute::IS_RIGHT_CONNECTED,
            ),
            NpadType::Pokeball => (
                style_lifo::PALMA,
                sample.buttons,
                sample.l_stick,
                sample.r_stick,
                NpadAttribute::IS_CONNECTED,
            ),
        };

        states[lifo] = generic_state(buttons, l_stick, r_stick, attributes);
        states[style_lifo::SYSTEM_EXT] =
            generic_state(buttons, l_stick, r_stick, NpadAttribute::IS_CONNECTED);
        states
    }
}

impl ControllerBase for NPad {
    fn on_init(&mut self) {
        if self.style_set.is_empty() {
            self.style_set = DEFAULT_STYLE_SET;
        }
        if self.supported_ids.is_empty() {
            self.supported_ids = NpadId::ALL.to_vec();
        }

        let (mut players, motion_enabled) = {
            let values = self.settings.values();
            (values.players.clone(), values.motion_enabled)
        };
        self.motion_enabled = motion_enabled;

        // Player 1 (or handheld, if player 1 is configured as such) is always present.
        if !players.iter().any(|player| player.connected) {
            players[0].connected = true;
        }

        for (index, player) in players.iter().enumerate() {
            if player.connected {
                self.apply_player_config(index, *player);
            }
        }
        self.loaded_players = Some(self.settings.values().players.clone());
    }

    fn on_release(&mut self) {
        for index in 0..NPAD_COUNT {
            self.stop_vibration(index);
        }
        self.loaded_players = None;
    }

    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let slot = &self.slots[index];
            let states = if slot.connected {
                Self::style_states(slot.npad_type, self.input.npad_state(index))
            } else {
                [NpadGenericState::default(); 7]
            };

            for (lifo, state) in entry.style_lifos_mut().into_iter().zip(states) {
                lifo.push(ctx.cpu_ticks, state);
            }
        }

        ctx.write(Section::NPAD, self.entries.as_slice().as_bytes());
    }

    fn on_motion_update(&mut self, ctx: &UpdateContext<'_>) {
        let delta_time = counter::ticks_to_ns(ctx.cpu_ticks.saturating_sub(self.last_motion_ticks));
        self.last_motion_ticks = ctx.cpu_ticks;

        for (index, entry) in self.entries.iter_mut().enumerate() {
            let slot = &mut self.slots[index];
            if !slot.connected {
                continue;
            }

            let mut states = [SixAxisSensorState::default(); 6];
            if slot.sixaxis.enabled && self.motion_enabled {
                let sensors: &[(usize, DeviceIndex)] = match slot.npad_type {
                    NpadType::ProController => &[(sixaxis_lifo::FULL_KEY, DeviceIndex::Left)],
                    NpadType::Handheld => &[(sixaxis_lifo::HANDHELD, DeviceIndex::Left)],
                    NpadType::JoyconDual => &[
                        (sixaxis_lifo::DUAL_LEFT, DeviceIndex::Left),
                        (sixaxis_lifo::DUAL_RIGHT, DeviceIndex::Right),
                    ],
                    NpadType::JoyconLeft => &[(sixaxis_lifo::LEFT, DeviceIndex::Left)],
                    NpadType::JoyconRight => &[(sixaxis_lifo::RIGHT, DeviceIndex::Right)],
                    NpadType::None | NpadType::Pokeball => &[],
                };

                for &(lifo, device) in sensors {
                    if let Some(sample) = self.input.motion_state(index, device) {
                        states[lifo] = sixaxis::sensor_state(&sample, delta_time);
                        slot.sixaxis.at_rest.record(states[lifo].angular_velocity.length_squared());
                    }
                }
            }

            for (lifo, state) in entry.sixaxis_lifos_mut().into_iter().zip(states) {
                lifo.push(ctx.cpu_ticks, state);
            }
        }

        ctx.write(Section::NPAD, self.entries.as_slice().as_bytes());
    }

    fn on_load_input_devices(&mut self) {
        let (players, motion_enabled) = {
            let values = self.settings.values();
            (values.players.clone(), values.motion_enabled)
        };
        self.motion_enabled = motion_enabled;

        let Some(previous) = self.loaded_players.as_mut() else {
            return;
        };
        let previous = core::mem::replace(previous, players.clone());
        for (index, (old, new)) in previous.iter().zip(players.iter()).enumerate() {
            if old != new {
                tracing::debug!(index, "player configuration changed");
                self.apply_player_config(index, *new);
            }
        }
    }
}

fn vertical_properties() -> NpadSystemProperties {
    NpadSystemProperties::IS_VERTICAL
        | NpadSystemProperties::USE_PLUS
        | NpadSystemProperties::USE_MINUS
}

fn button_properties(home_protection: bool) -> NpadSystemButtonProperties {
    if home_protection {
        NpadSystemButtonProperties::IS_UNINTENDED_HOME_BUTTON_INPUT_PROTECTION_ENABLED
    } else {
        NpadSystemButtonProperties::empty()
    }
}

fn generic_state(
    buttons: NpadButton,
    l_stick: AnalogStick,
    r_stick: AnalogStick,
    attributes: NpadAttribute,
) -> NpadGenericState {
    let mut state = NpadGenericState::default();
    state.buttons.set(buttons.bits());
    state.l_stick = AnalogStickState::new(l_stick.x, l_stick.y);
    state.r_stick = AnalogStickState::new(r_stick.x, r_stick.y);
    state.attributes.set(attributes.bits());
    state
}
