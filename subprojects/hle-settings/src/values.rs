//! Persistent configuration values.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Number of configurable players: eight regular players, handheld and "other".
pub const NUM_PLAYERS: usize = 10;

/// Index of the handheld player in [`Players`].
pub const HANDHELD_INDEX: usize = 8;

/// Default Joy-Con (L) body color.
pub const JOYCON_BODY_NEON_BLUE: u32 = 0x0AB9E6;
/// Default Joy-Con (L) button color.
pub const JOYCON_BUTTONS_NEON_BLUE: u32 = 0x001E1E;
/// Default Joy-Con (R) body color.
pub const JOYCON_BODY_NEON_RED: u32 = 0xFF3C28;
/// Default Joy-Con (R) button color.
pub const JOYCON_BUTTONS_NEON_RED: u32 = 0x1E0A0A;

/// Emulated controller kinds a player can be configured as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerType {
    #[default]
    ProController,
    DualJoyconDetached,
    LeftJoycon,
    RightJoycon,
    Handheld,
    Pokeball,
}

/// Per-player input configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInput {
    pub connected: bool,
    pub controller_type: ControllerType,
    pub body_color_left: u32,
    pub button_color_left: u32,
    pub body_color_right: u32,
    pub button_color_right: u32,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self {
            connected: false,
            controller_type: ControllerType::ProController,
            body_color_left: JOYCON_BODY_NEON_BLUE,
            button_color_left: JOYCON_BUTTONS_NEON_BLUE,
            body_color_right: JOYCON_BODY_NEON_RED,
            button_color_right: JOYCON_BUTTONS_NEON_RED,
        }
    }
}

/// The fixed table of player configurations.
///
/// Serialized as a list of up to [`NUM_PLAYERS`] entries; missing trailing entries take
/// their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PlayerInput>", into = "Vec<PlayerInput>")]
pub struct Players([PlayerInput; NUM_PLAYERS]);

impl Players {
    /// Returns an iterator over every player configuration, in player order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerInput> {
        self.0.iter()
    }
}

impl Default for Players {
    fn default() -> Self {
        let mut players = [PlayerInput::default(); NUM_PLAYERS];
        players[0].connected = true;
        Self(players)
    }
}

impl Index<usize> for Players {
    type Output = PlayerInput;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Players {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl TryFrom<Vec<PlayerInput>> for Players {
    type Error = TooManyPlayersError;

    fn try_from(list: Vec<PlayerInput>) -> Result<Self, Self::Error> {
        if list.len() > NUM_PLAYERS {
            return Err(TooManyPlayersError(list.len()));
        }

        let mut players = [PlayerInput::default(); NUM_PLAYERS];
        players[..list.len()].copy_from_slice(&list);
        Ok(Self(players))
    }
}

impl From<Players> for Vec<PlayerInput> {
    fn from(players: Players) -> Self {
        players.0.to_vec()
    }
}

/// Error returned when a configuration lists more players than the console supports.
#[derive(Debug, thiserror::Error)]
#[error("at most {NUM_PLAYERS} players can be configured, found {0}")]
pub struct TooManyPlayersError(pub usize);

/// Touchscreen emulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchscreenConfig {
    pub enabled: bool,
    pub finger: u32,
    pub diameter_x: u32,
    pub diameter_y: u32,
    pub rotation_angle: u32,
}

impl Default for TouchscreenConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            finger: 0,
            diameter_x: 15,
            diameter_y: 15,
            rotation_angle: 0,
        }
    }
}

/// The full set of input-related configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Values {
    /// Initial state of the process-wide vibration flag.
    pub vibration_enabled: bool,
    pub motion_enabled: bool,
    pub keyboard_enabled: bool,
    pub mouse_enabled: bool,
    pub debug_pad_enabled: bool,
    pub touchscreen: TouchscreenConfig,
    pub players: Players,
}

impl Default for Values {
    fn default() -> Self {
        Self {
            vibration_enabled: true,
            motion_enabled: true,
            keyboard_enabled: false,
            mouse_enabled: false,
            debug_pad_enabled: false,
            touchscreen: TouchscreenConfig::default(),
            players: Players::default(),
        }
    }
}
