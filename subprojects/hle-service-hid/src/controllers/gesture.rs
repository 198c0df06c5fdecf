//! Gesture controller.
//!
//! Gestures are derived from the touch screen sample of the host: a new contact starts a
//! `Touch`, a held contact reports `Press` or `Pan` depending on movement, and lifting the
//! contact reports `Complete`.

use std::sync::Arc;

use hle_settings::Settings;
use hle_timing::counter;
use zerocopy::{FromZeros, IntoBytes};

use super::{ControllerBase, UpdateContext, touchscreen::to_screen};
use crate::{
    input::InputBackend,
    shmem::{
        GestureAttribute, Lifo, Section,
        layout::{GesturePoint, GestureSharedMemoryFormat, GestureState},
    },
};

/// Gesture kinds reported to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum GestureType {
    Idle = 0,
    Complete = 1,
    Cancel = 2,
    Touch = 3,
    Press = 4,
    Tap = 5,
    Pan = 6,
    Swipe = 7,
    Pinch = 8,
    Rotate = 9,
}

/// Dominant direction of a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum GestureDirection {
    None = 0,
    Left = 1,
    Up = 2,
    Right = 3,
    Down = 4,
}

impl GestureDirection {
    fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx, dy) {
            (0, 0) => Self::None,
            _ if dx.abs() >= dy.abs() => {
                if dx > 0 {
                    Self::Right
                } else {
                    Self::Left
                }
            }
            _ if dy > 0 => Self::Down,
            _ => Self::Up,
        }
    }
}

pub struct Gesture {
    settings: Arc<Settings>,
    input: Arc<dyn InputBackend>,
    shared_memory: GestureSharedMemoryFormat,
    touch_enabled: bool,
    detection_count: u64,
    last_point: Option<(i32, i32)>,
    last_ticks: u64,
}

impl Gesture {
    pub fn new(settings: Arc<Settings>, input: Arc<dyn InputBackend>) -> Self {
        let touch_enabled = settings.values().touchscreen.enabled;
        Self {
            settings,
            input,
            shared_memory: GestureSharedMemoryFormat::new_zeroed(),
            touch_enabled,
            detection_count: 0,
            last_point: None,
            last_ticks: 0,
        }
    }

    pub fn shared_memory(&self) -> &GestureSharedMemoryFormat {
        &self.shared_memory
    }

    fn next_state(&mut self, ticks: u64) -> GestureState {
        let sample = self.input.touch_state();
        let point = (sample.pressed && self.touch_enabled).then(|| {
            let (x, y) = to_screen(sample.x, sample.y);
            (x as i32, y as i32)
        });

        let mut state = GestureState::default();
        let (gesture_type, (x, y)) = match (self.last_point, point) {
            (None, Some(point)) => {
                self.detection_count += 1;
                state.attributes.set(GestureAttribute::IS_NEW_TOUCH.bits());
                (GestureType::Touch, point)
            }
            (Some((last_x, last_y)), Some((x, y))) => {
                let (dx, dy) = (x - last_x, y - last_y);
                if (dx, dy) == (0, 0) {
                    (GestureType::Press, (x, y))
                } else {
                    let elapsed_ns = counter::ticks_to_ns(ticks.saturating_sub(self.last_ticks));
                    let elapsed = elapsed_ns as f32 / 1e9;
                    if elapsed > 0.0 {
                        state.velocity_x.set(dx as f32 / elapsed);
                        state.velocity_y.set(dy as f32 / elapsed);
                    }
                    state.delta_x.set(dx);
                    state.delta_y.set(dy);
                    state.direction.set(GestureDirection::from_delta(dx, dy) as u32);
                    (GestureType::Pan, (x, y))
                }
            }
            (Some(last), None) => (GestureType::Complete, last),
            (None, None) => (GestureType::Idle, (0, 0)),
        };

        state.gesture_type.set(gesture_type as u32);
        state.detection_count.set(self.detection_count);
        state.x.set(x);
        state.y.set(y);
        state.scale.set(1.0);
        if point.is_some() {
            state.point_count.set(1);
            state.points[0] = GesturePoint {
                x: x.into(),
                y: y.into(),
            };
        }

        self.last_point = point;
        self.last_ticks = ticks;
        state
    }
}

impl ControllerBase for Gesture {
    fn on_update(&mut self, ctx: &UpdateContext<'_>) {
        let state = self.next_state(ctx.cpu_ticks);
        self.shared_memory.push(ctx.cpu_ticks, state);
        ctx.write(Section::GESTURE, self.shared_memory.as_bytes());
    }

    fn on_load_input_devices(&mut self) {
        self.touch_enabled = self.settings.values().touchscreen.enabled;
    }
}

#[cfg(test)]
mod tests {
    use hle_sys_mem::{Permissions, SharedMemory};

    use super::*;
    use crate::{
        input::{TouchSample, testing::FakeInput},
        shmem::HID_SHARED_MEMORY_SIZE,
    };

    fn step(gesture: &mut Gesture, shmem: &SharedMemory, ticks: u64) -> GestureState {
        gesture.on_update(&UpdateContext { shared_memory: shmem, cpu_ticks: ticks });
        *gesture.shared_memory().latest()
    }

    #[test]
    fn test_touch_press_pan_complete_sequence() {
        let input = Arc::new(FakeInput::default());
        let shmem = SharedMemory::create(
            HID_SHARED_MEMORY_SIZE,
            Permissions::RW,
            Permissions::R,
            "hid",
        );
        let mut gesture = Gesture::new(Arc::new(Settings::default()), input.clone());

        let idle = step(&mut gesture, &shmem, 0);
        assert_eq!(idle.gesture_type.get(), GestureType::Idle as u32);

        *input.touch.lock() = TouchSample { pressed: true, x: 0.5, y: 0.5 };
        let touch = step(&mut gesture, &shmem, counter::CNTFRQ / 1000);
        assert_eq!(touch.gesture_type.get(), GestureType::Touch as u32);
        assert_eq!(touch.detection_count.get(), 1);
        assert_eq!(touch.attributes.get(), GestureAttribute::IS_NEW_TOUCH.bits());
        assert_eq!(touch.point_count.get(), 1);

        let press = step(&mut gesture, &shmem, 2 * counter::CNTFRQ / 1000);
        assert_eq!(press.gesture_type.get(), GestureType::Press as u32);

        *input.touch.lock() = TouchSample { pressed: true, x: 0.75, y: 0.5 };
        let pan = step(&mut gesture, &shmem, 3 * counter::CNTFRQ / 1000);
        assert_eq!(pan.gesture_type.get(), GestureType::Pan as u32);
        assert_eq!(pan.delta_x.get(), 320);
        assert_eq!(pan.direction.get(), GestureDirection::Right as u32);
        assert!(pan.velocity_x.get() > 0.0);

        *input.touch.lock() = TouchSample::default();
        let complete = step(&mut gesture, &shmem, 4 * counter::CNTFRQ / 1000);
        assert_eq!(complete.gesture_type.get(), GestureType::Complete as u32);
        assert_eq!(complete.point_count.get(), 0);
        assert_eq!(complete.detection_count.get(), 1);
    }

    #[test]
    fn test_direction_from_delta() {
        assert_eq!(GestureDirection::from_delta(0, 0), GestureDirection::None);
        assert_eq!(GestureDirection::from_delta(-3, 1), GestureDirection::Left);
        assert_eq!(GestureDirection::from_delta(1, 5), GestureDirection::Down);
        assert_eq!(GestureDirection::from_delta(1, -5), GestureDirection::Up);
    }
}
