//! Human Input Device (HID) service emulation.
//!
//! This crate emulates the guest-facing side of the HID service, which publishes:
//! - Controller input (Npad) for up to eight players plus handheld
//! - Touch screen, mouse and keyboard
//! - Six-axis sensors (gyroscope/accelerometer)
//! - Vibration/rumble
//! - Gesture recognition
//!
//! Input is published through a shared memory region (0x40000 bytes) of LIFO ring
//! buffers that the guest reads without calling into the service. Two periodic events
//! keep it fresh: a pad update every 1ms and a motion update every 15ms.
//!
//! Every update and every command runs under one service lock, so the guest never sees
//! a command interleaved with a half-finished tick.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use hle_settings::Settings;
use hle_sys_mem::{Permissions, SharedMemory};
use hle_timing::{EventType, Scheduler, next_delay};
use parking_lot::{Mutex, MutexGuard};

pub mod applet_resource;
pub mod cmif;
pub mod controllers;
pub mod event;
pub mod input;
pub mod proto;
pub mod result;
pub mod shmem;

use self::shmem::HID_SHARED_MEMORY_SIZE;
pub use self::{
    applet_resource::{AppletResource, DeviceClass},
    cmif::{Object, Request, RequestError, Response},
    input::{InputBackend, NullInput},
    proto::SERVICE_NAME,
    result::ResultCode,
};

const PAD_UPDATE_PERIOD: Duration = Duration::from_nanos(proto::PAD_UPDATE_PERIOD_NS);
const MOTION_UPDATE_PERIOD: Duration = Duration::from_nanos(proto::MOTION_UPDATE_PERIOD_NS);

/// Creates a zeroed HID shared memory region, writable by the service and read-only for
/// the guest.
pub fn create_shared_memory() -> Arc<SharedMemory> {
    Arc::new(SharedMemory::create(
        HID_SHARED_MEMORY_SIZE,
        Permissions::RW,
        Permissions::R,
        proto::SHARED_MEMORY_NAME,
    ))
}

/// HID service instance.
///
/// Dropping it cancels both update events; no update runs once the drop has begun.
pub struct Hid {
    inner: Arc<HidInner>,
}

struct HidInner {
    resource: Mutex<AppletResource>,
    scheduler: Arc<dyn Scheduler>,
    pad_update_event: Arc<EventType>,
    motion_update_event: Arc<EventType>,
}

impl Hid {
    /// Creates the service and schedules the first pad and motion updates.
    ///
    /// Input devices are (re)loaded on the first pad update.
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        settings: Arc<Settings>,
        input: Arc<dyn InputBackend>,
        shared_memory: Arc<SharedMemory>,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<HidInner>| {
            let pad_update_event = scheduler.create_event(
                "HID::UpdatePadCallback",
                Box::new({
                    let weak = weak.clone();
                    move |late| {
                        if let Some(inner) = weak.upgrade() {
                            inner.update_pads(late);
                        }
                    }
                }),
            );
            let motion_update_event = scheduler.create_event(
                "HID::MotionPadCallback",
                Box::new({
                    let weak = weak.clone();
                    move |late| {
                        if let Some(inner) = weak.upgrade() {
                            inner.update_motion(late);
                        }
                    }
                }),
            );

            HidInner {
                resource: Mutex::new(AppletResource::new(
                    shared_memory,
                    Arc::clone(&settings),
                    input,
                )),
                scheduler: Arc::clone(&scheduler),
                pad_update_event,
                motion_update_event,
            }
        });

        settings.reload_input_devices();
        scheduler.schedule_event(PAD_UPDATE_PERIOD, &inner.pad_update_event);
        scheduler.schedule_event(MOTION_UPDATE_PERIOD, &inner.motion_update_event);
        tracing::debug!("HID service started");

        Self { inner }
    }

    /// Acquires the service lock.
    pub fn lock(&self) -> MutexGuard<'_, AppletResource> {
        self.inner.resource.lock()
    }

    pub fn shared_memory(&self) -> Arc<SharedMemory> {
        Arc::clone(self.lock().shared_memory())
    }

    pub fn settings(&self) -> Arc<Settings> {
        Arc::clone(self.lock().settings())
    }
}

impl Drop for Hid {
    fn drop(&mut self) {
        let mut resource = self.inner.resource.lock();
        resource.shut_down();
        self.inner.scheduler.unschedule_event(&self.inner.pad_update_event);
        self.inner.scheduler.unschedule_event(&self.inner.motion_update_event);
        tracing::debug!("HID service stopped");
    }
}

impl HidInner {
    fn update_pads(&self, late: Duration) {
        let mut resource = self.resource.lock();
        if resource.is_shut_down() {
            return;
        }

        resource.update_controllers(self.scheduler.cpu_ticks());
        self.scheduler
            .schedule_event(next_delay(PAD_UPDATE_PERIOD, late), &self.pad_update_event);
    }

    fn update_motion(&self, late: Duration) {
        let mut resource = self.resource.lock();
        if resource.is_shut_down() {
            return;
        }

        resource.update_motion(self.scheduler.cpu_ticks());
        self.scheduler
            .schedule_event(next_delay(MOTION_UPDATE_PERIOD, late), &self.motion_update_event);
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use hle_timing::CoreTiming;
    use zerocopy::FromBytes;

    use super::*;
    use crate::{
        controllers::npad::{DeviceHandle, DeviceIndex, NpadId, NpadType},
        input::testing::FakeInput,
        shmem::{
            Lifo, NpadButton, Section,
            layout::{NpadGenericState, NpadInternalState, NpadLifo, TouchScreenSharedMemoryFormat},
        },
    };

    struct Fixture {
        timing: Arc<CoreTiming>,
        settings: Arc<Settings>,
        input: Arc<FakeInput>,
        hid: Hid,
    }

    fn fixture() -> Fixture {
        let timing = Arc::new(CoreTiming::new());
        let settings = Arc::new(Settings::default());
        let input = Arc::new(FakeInput::default());
        let hid = Hid::new(timing.clone(), settings.clone(), input.clone(), create_shared_memory());
        Fixture {
            timing,
            settings,
            input,
            hid,
        }
    }

    fn read_npad(hid: &Hid, id: NpadId) -> NpadInternalState {
        let section = Section::npad_entry(id.index());
        let bytes = hid.shared_memory().read(section.offset, section.size).unwrap();
        NpadInternalState::read_from_bytes(&bytes).unwrap()
    }

    /// Steps the clock one millisecond at a time so every periodic firing is on time.
    fn advance_ms(timing: &CoreTiming, ms: u64) {
        for _ in 0..ms {
            timing.advance(Duration::from_millis(1));
        }
    }

    fn fullkey_lifo(hid: &Hid) -> NpadLifo {
        read_npad(hid, NpadId::Player1).fullkey_lifo
    }

    #[test]
    fn test_first_update_fires_after_one_period() {
        let fixture = fixture();

        fixture.timing.advance(Duration::from_micros(999));
        assert_eq!(fullkey_lifo(&fixture.hid).latest().sampling_number.get(), 0);

        fixture.timing.advance(Duration::from_micros(1));
        assert_eq!(fullkey_lifo(&fixture.hid).latest().sampling_number.get(), 1);
    }

    #[test]
    fn test_pad_lifo_advances_once_per_millisecond() {
        let fixture = fixture();

        advance_ms(&fixture.timing, 10);

        let lifo = fullkey_lifo(&fixture.hid);
        assert_eq!(lifo.latest().sampling_number.get(), 10);
        assert_eq!(lifo.header.count.get(), 10);
    }

    #[test]
    fn test_motion_runs_every_fifteen_milliseconds() {
        let fixture = fixture();
        let handle = DeviceHandle::new(NpadType::ProController, NpadId::Player1, DeviceIndex::Left);
        fixture.hid.lock().npad_mut().set_sixaxis_enabled(handle, true).unwrap();
        *fixture.input.motion.lock() = Some(Default::default());

        advance_ms(&fixture.timing, 44);
        let entry = read_npad(&fixture.hid, NpadId::Player1);
        assert_eq!(entry.sixaxis_fullkey_lifo.latest().sampling_number.get(), 2);

        fixture.timing.advance(Duration::from_millis(1));
        let entry = read_npad(&fixture.hid, NpadId::Player1);
        assert_eq!(entry.sixaxis_fullkey_lifo.latest().sampling_number.get(), 3);
    }

    #[test]
    fn test_rebind_is_consumed_by_one_tick() {
        let fixture = fixture();
        assert!(fixture.settings.is_device_reload_pending());

        fixture.timing.advance(Duration::from_millis(1));
        assert!(!fixture.settings.is_device_reload_pending());

        fixture.settings.reload_input_devices();
        fixture.timing.advance(Duration::from_millis(1));
        assert!(!fixture.settings.is_device_reload_pending());
        fixture.timing.advance(Duration::from_millis(1));
        assert!(!fixture.settings.is_device_reload_pending());
    }

    #[test]
    fn test_inputs_reach_shared_memory() {
        let fixture = fixture();
        fixture.input.npad.lock()[0].buttons = NpadButton::A;
        fixture.input.touch.lock().pressed = true;

        fixture.timing.advance(Duration::from_millis(1));

        assert_eq!(fullkey_lifo(&fixture.hid).latest().buttons.get(), NpadButton::A.bits());
        let section = Section::TOUCH_SCREEN;
        let bytes = fixture.hid.shared_memory().read(section.offset, section.size).unwrap();
        let touch = TouchScreenSharedMemoryFormat::read_from_bytes(&bytes).unwrap();
        assert_eq!(touch.latest().entry_count.get(), 1);
    }

    #[test]
    fn test_drop_cancels_updates() {
        let fixture = fixture();
        assert_eq!(fixture.timing.pending_events(), 2);
        advance_ms(&fixture.timing, 3);

        let shared_memory = fixture.hid.shared_memory();
        drop(fixture.hid);
        assert_eq!(fixture.timing.pending_events(), 0);

        let before = shared_memory.read(Section::NPAD.offset, Section::NPAD.size).unwrap();
        advance_ms(&fixture.timing, 30);
        let after = shared_memory.read(Section::NPAD.offset, Section::NPAD.size).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_commands_interleaved_with_ticks_keep_records_consistent() {
        let fixture = fixture();
        let hid = Arc::new(fixture.hid);
        let timing = fixture.timing;

        let ticker = {
            let timing = Arc::clone(&timing);
            thread::spawn(move || {
                for _ in 0..200 {
                    timing.advance(Duration::from_millis(1));
                }
            })
        };
        let commander = {
            let hid = Arc::clone(&hid);
            thread::spawn(move || {
                for round in 0..200 {
                    let mut resource = hid.lock();
                    let npad = resource.npad_mut();
                    if round % 2 == 0 {
                        npad.disconnect_npad(NpadId::Player2);
                    } else {
                        npad.connect_controller(NpadType::JoyconDual, NpadId::Player2);
                    }
                }
            })
        };
        ticker.join().unwrap();
        commander.join().unwrap();

        for id in [NpadId::Player1, NpadId::Player2] {
            let entry = read_npad(&hid, id);
            let mut states = [NpadGenericState::default(); 16];
            let read = entry.fullkey_lifo.read_states(&mut states);
            assert!(read > 0 || entry.fullkey_lifo.header.count.get() == 0, "{id:?}");
            for state in &states[..read] {
                assert_eq!(state.sampling_number.get(), state.sampling_number2.get());
            }
        }
    }
}
