//! Six-axis sensor state of one Npad slot.

use super::types::GyroscopeZeroDriftMode;
use crate::{
    input::MotionSample,
    shmem::{SixAxisSensorAttribute, Vector, layout::SixAxisSensorState},
};

/// Number of recent gyroscope samples the at-rest detector looks at.
pub const AT_REST_WINDOW: usize = 8;

/// Squared angular velocity below which a sample counts as still.
pub const AT_REST_THRESHOLD: f32 = 0.0001;

/// Sensor fusion tuning pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionParameters {
    pub parameter1: f32,
    pub parameter2: f32,
}

impl Default for FusionParameters {
    fn default() -> Self {
        Self {
            parameter1: 0.03,
            parameter2: 0.4,
        }
    }
}

/// Rolling window of squared gyroscope magnitudes.
#[derive(Debug, Clone, Default)]
pub struct AtRestDetector {
    samples: [f32; AT_REST_WINDOW],
    len: usize,
    next: usize,
}

impl AtRestDetector {
    pub fn record(&mut self, gyro_length_squared: f32) {
        self.samples[self.next] = gyro_length_squared;
        self.next = (self.next + 1) % AT_REST_WINDOW;
        self.len = (self.len + 1).min(AT_REST_WINDOW);
    }

    /// Returns `true` when every recorded sample is below [`AT_REST_THRESHOLD`].
    ///
    /// A detector that has seen no samples reports at rest.
    pub fn is_at_rest(&self) -> bool {
        self.samples[..self.len].iter().all(|&sample| sample < AT_REST_THRESHOLD)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct SixAxisState {
    pub enabled: bool,
    pub fusion_enabled: bool,
    pub fusion_parameters: FusionParameters,
    pub drift_mode: GyroscopeZeroDriftMode,
    pub at_rest: AtRestDetector,
}

impl Default for SixAxisState {
    fn default() -> Self {
        Self {
            enabled: false,
            fusion_enabled: true,
            fusion_parameters: FusionParameters::default(),
            drift_mode: GyroscopeZeroDriftMode::default(),
            at_rest: AtRestDetector::default(),
        }
    }
}

/// Converts a host motion sample into a sensor LIFO entry.
pub fn sensor_state(sample: &MotionSample, delta_time: u64) -> SixAxisSensorState {
    let vector = |[x, y, z]: [f32; 3]| Vector::new(x, y, z);

    let mut state = SixAxisSensorState::default();
    state.delta_time.set(delta_time);
    state.acceleration = vector(sample.accel);
    state.angular_velocity = vector(sample.gyro);
    state.angle = vector(sample.rotation);
    state.direction = sample.orientation.map(vector);
    state.attribute.set(SixAxisSensorAttribute::IS_CONNECTED.bits());
    state
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_empty_detector_is_at_rest() {
        assert!(AtRestDetector::default().is_at_rest());
    }

    #[test]
    fn test_motion_leaves_window_after_eight_samples() {
        let mut detector = AtRestDetector::default();
        detector.record(1.0);
        assert!(!detector.is_at_rest());

        for _ in 0..AT_REST_WINDOW - 1 {
            detector.record(0.0);
            assert!(!detector.is_at_rest());
        }
        detector.record(0.0);
        assert!(detector.is_at_rest());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut detector = AtRestDetector::default();
        detector.record(AT_REST_THRESHOLD);
        assert!(!detector.is_at_rest());
        detector.clear();
        detector.record(AT_REST_THRESHOLD / 2.0);
        assert!(detector.is_at_rest());
    }

    #[test]
    fn test_sensor_state_copies_sample() {
        let sample = MotionSample {
            accel: [0.0, 0.0, -1.0],
            gyro: [0.5, 0.0, 0.0],
            rotation: [0.25, 0.0, 0.0],
            orientation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        };

        let state = sensor_state(&sample, 15);
        assert_eq!(state.delta_time.get(), 15);
        assert_eq!(state.acceleration.z.get(), -1.0);
        assert_eq!(state.angular_velocity.x.get(), 0.5);
        assert_eq!(state.direction[2].z.get(), 1.0);
        assert_eq!(state.attribute.get(), SixAxisSensorAttribute::IS_CONNECTED.bits());
    }

    proptest! {
        #[test]
        fn test_detector_matches_last_window(
            samples in prop::collection::vec(0.0f32..0.001, 0..32),
        ) {
            let mut detector = AtRestDetector::default();
            for &sample in &samples {
                detector.record(sample);
            }

            let window = &samples[samples.len().saturating_sub(AT_REST_WINDOW)..];
            let expected = window.iter().all(|&sample| sample < AT_REST_THRESHOLD);
            prop_assert_eq!(detector.is_at_rest(), expected);
        }
    }
}
