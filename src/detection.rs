//! Free-fall detection bring-up and detection state.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::component::FreeFallSensor;
use crate::config::FreeFallConfig;
use crate::error::{DetectionError, ProbeError, Stage};
use crate::ISM330DHCX_ID;

/// Whether a free-fall event was seen since the flag was last cleared.
///
/// Meant to live in a `static` shared by the interrupt handler and the main
/// loop. Only loads and stores are used, so it works on cores without
/// compare-and-swap. [`FreeFallDetection::handler`] is the single writer that
/// sets the flag; a clear racing with a set on a preemptive system may lose
/// that event.
#[derive(Debug, Default)]
pub struct DetectionFlag {
    detected: AtomicBool,
}

impl DetectionFlag {
    pub const fn new() -> Self {
        Self {
            detected: AtomicBool::new(false),
        }
    }

    /// Current state: `0` no free-fall, `1` free-fall detected.
    pub fn get(&self) -> u32 {
        u32::from(self.is_set())
    }

    /// Sets the state; any nonzero value is stored as `1`.
    pub fn set(&self, value: u32) {
        self.detected.store(value != 0, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.detected.load(Ordering::Acquire)
    }
}

/// Free-fall detection on top of a [`FreeFallSensor`].
///
/// Lifecycle: [`init`](Self::init) arms the sensor, [`handler`](Self::handler)
/// latches events into the [`DetectionFlag`], [`set_state(0)`](Self::set_state)
/// re-arms, [`deinit`](Self::deinit) stops sensing. `init` may be called
/// again at any time; it clears the flag and reprograms the sensor, without
/// undoing a partially applied earlier configuration.
pub struct FreeFallDetection<'a, S> {
    sensor: S,
    flag: &'a DetectionFlag,
    config: FreeFallConfig,
}

impl<'a, S: FreeFallSensor> FreeFallDetection<'a, S> {
    /// Binds `sensor` and `flag` with the build-time configuration.
    pub fn new(sensor: S, flag: &'a DetectionFlag) -> Self {
        Self::with_config(sensor, flag, FreeFallConfig::new())
    }

    pub fn with_config(sensor: S, flag: &'a DetectionFlag, config: FreeFallConfig) -> Self {
        Self {
            sensor,
            flag,
            config,
        }
    }

    pub fn config(&self) -> &FreeFallConfig {
        &self.config
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Gives the sensor back. The flag keeps its last value.
    pub fn release(self) -> S {
        self.sensor
    }

    /// `0` no free-fall, `1` free-fall detected.
    pub fn get_state(&self) -> u32 {
        self.flag.get()
    }

    /// Sets or clears the detected state; any nonzero value means detected.
    pub fn set_state(&self, state: u32) {
        self.flag.set(state);
    }

    /// Reads the sensor event status and latches a free-fall event.
    ///
    /// Call it when the configured interrupt pin fires. A failed status read
    /// drops the event: it is only logged, nothing is reported to the caller.
    pub fn handler(&mut self) {
        match self.sensor.event_status() {
            Ok(status) => {
                if status.free_fall && self.get_state() == 0 {
                    self.set_state(1);
                }
            }
            Err(err) => warn!("free-fall event status read failed: {err:?}"),
        }
    }

    /// Clears the flag, probes the sensor and starts free-fall detection.
    ///
    /// Steps run in order and stop at the first failure: route the free-fall
    /// event, set threshold, set duration, enable the accelerometer.
    pub fn init(&mut self) -> Result<(), DetectionError<S::Error>> {
        self.flag.set(0);

        if let Err(err) = self.probe() {
            warn!("free-fall sensor probe failed: {err:?}");
            return Err(DetectionError::NoDeviceFound(err));
        }

        let FreeFallConfig {
            int_pin,
            threshold,
            duration,
        } = self.config;

        self.run(Stage::EnableDetection, |sensor| {
            sensor.enable_free_fall_detection(int_pin)
        })?;
        self.run(Stage::SetThreshold, |sensor| {
            sensor.set_free_fall_threshold(threshold)
        })?;
        self.run(Stage::SetDuration, |sensor| {
            sensor.set_free_fall_duration(duration)
        })?;
        self.run(Stage::EnableAccelerometer, |sensor| sensor.acc_enable())?;

        debug!("free-fall detection armed on {int_pin:?}, threshold {threshold:?}, duration {duration}");
        Ok(())
    }

    /// Stops sensing and removes the free-fall routing.
    ///
    /// Both steps are always attempted; the first failure is reported.
    pub fn deinit(&mut self) -> Result<(), DetectionError<S::Error>> {
        let accelerometer = self.sensor.acc_disable();
        let detection = self.sensor.disable_free_fall_detection();

        let (stage, source) = match (accelerometer, detection) {
            (Ok(()), Ok(())) => {
                debug!("free-fall detection stopped");
                return Ok(());
            }
            (Err(source), _) => (Stage::DisableAccelerometer, source),
            (Ok(()), Err(source)) => (Stage::DisableDetection, source),
        };

        warn!("free-fall {stage:?} failed: {source:?}");
        Err(DetectionError::DeviceOpFailed { stage, source })
    }

    fn probe(&mut self) -> Result<(), ProbeError<S::Error>> {
        let id = self.sensor.read_id().map_err(ProbeError::Bus)?;
        if id != ISM330DHCX_ID {
            return Err(ProbeError::WrongDevice(id));
        }
        Ok(())
    }

    fn run<F>(&mut self, stage: Stage, op: F) -> Result<(), DetectionError<S::Error>>
    where
        F: FnOnce(&mut S) -> Result<(), S::Error>,
    {
        op(&mut self.sensor).map_err(|source| {
            warn!("free-fall {stage:?} failed: {source:?}");
            DetectionError::DeviceOpFailed { stage, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::IntPin;
    use crate::error::ErrorCode;
    use crate::prelude::FfThs;
    use crate::testing::{Call, MockError, MockSensor};

    #[test]
    fn state_is_clear_before_init() {
        let flag = DetectionFlag::new();
        let detection = FreeFallDetection::new(MockSensor::default(), &flag);
        assert_eq!(detection.get_state(), 0);
    }

    #[test]
    fn nonzero_state_normalizes_to_one() {
        let flag = DetectionFlag::new();
        let detection = FreeFallDetection::new(MockSensor::default(), &flag);

        for value in [1, 2, 0x8000_0000, u32::MAX] {
            detection.set_state(value);
            assert_eq!(detection.get_state(), 1);
            detection.set_state(0);
            assert_eq!(detection.get_state(), 0);
        }
    }

    #[test]
    fn init_runs_every_stage_in_order() {
        let flag = DetectionFlag::new();
        let mut detection = FreeFallDetection::new(MockSensor::default(), &flag);

        assert_eq!(detection.init(), Ok(()));
        assert_eq!(
            detection.sensor_mut().calls(),
            &[
                Call::ReadId,
                Call::EnableFreeFall(IntPin::Int1),
                Call::SetThreshold(FfThs::_156mg),
                Call::SetDuration(0x0F),
                Call::AccEnable,
            ]
        );
    }

    #[test]
    fn init_clears_a_latched_event() {
        let flag = DetectionFlag::new();
        flag.set(1);
        let mut detection = FreeFallDetection::new(MockSensor::default(), &flag);

        detection.init().unwrap();
        assert_eq!(flag.get(), 0);
    }

    #[test]
    fn init_uses_the_given_config() {
        let flag = DetectionFlag::new();
        let config = FreeFallConfig::new()
            .with_int_pin(IntPin::Int2)
            .with_threshold(FfThs::_250mg)
            .with_duration(0x2A);
        let mut detection = FreeFallDetection::with_config(MockSensor::default(), &flag, config);

        detection.init().unwrap();
        let sensor = detection.release();
        assert_eq!(sensor.count(Call::EnableFreeFall(IntPin::Int2)), 1);
        assert_eq!(sensor.count(Call::SetThreshold(FfThs::_250mg)), 1);
        assert_eq!(sensor.count(Call::SetDuration(0x2A)), 1);
    }

    #[test]
    fn wrong_id_means_no_device() {
        let flag = DetectionFlag::new();
        let mut detection = FreeFallDetection::new(MockSensor::default().with_id(0x6A), &flag);

        let result = detection.init();
        assert_eq!(
            result,
            Err(DetectionError::NoDeviceFound(ProbeError::WrongDevice(0x6A)))
        );
        assert_eq!(ErrorCode::from_result(&result), ErrorCode::NoDeviceFound);
        assert_eq!(detection.get_state(), 0);
        assert_eq!(detection.sensor_mut().calls(), &[Call::ReadId]);
    }

    #[test]
    fn unreadable_id_means_no_device() {
        let flag = DetectionFlag::new();
        let sensor = MockSensor::default().failing(Call::ReadId);
        let mut detection = FreeFallDetection::new(sensor, &flag);

        assert_eq!(
            detection.init(),
            Err(DetectionError::NoDeviceFound(ProbeError::Bus(MockError)))
        );
    }

    #[test]
    fn threshold_failure_skips_the_remaining_stages() {
        let flag = DetectionFlag::new();
        let sensor = MockSensor::default().failing(Call::SetThreshold(FfThs::_156mg));
        let mut detection = FreeFallDetection::new(sensor, &flag);

        let result = detection.init();
        assert_eq!(
            result,
            Err(DetectionError::DeviceOpFailed {
                stage: Stage::SetThreshold,
                source: MockError,
            })
        );
        assert_eq!(ErrorCode::from_result(&result), ErrorCode::DeviceOpFailed);

        let sensor = detection.release();
        assert_eq!(sensor.count(Call::SetDuration(0x0F)), 0);
        assert_eq!(sensor.count(Call::AccEnable), 0);
    }

    #[test]
    fn every_configuration_failure_is_a_device_op_failure() {
        let stages = [
            (Call::EnableFreeFall(IntPin::Int1), Stage::EnableDetection),
            (Call::SetThreshold(FfThs::_156mg), Stage::SetThreshold),
            (Call::SetDuration(0x0F), Stage::SetDuration),
            (Call::AccEnable, Stage::EnableAccelerometer),
        ];

        for (call, stage) in stages {
            let flag = DetectionFlag::new();
            let mut detection = FreeFallDetection::new(MockSensor::default().failing(call), &flag);

            let err = detection.init().unwrap_err();
            assert_eq!(err.code(), ErrorCode::DeviceOpFailed);
            assert_eq!(err.stage(), Some(stage));
        }
    }

    #[test]
    fn handler_latches_free_fall_once() {
        let flag = DetectionFlag::new();
        let mut detection = FreeFallDetection::new(MockSensor::default(), &flag);
        detection.init().unwrap();

        detection.sensor_mut().set_free_fall(true);
        detection.handler();
        assert_eq!(flag.get(), 1);

        detection.handler();
        assert_eq!(flag.get(), 1);
        assert_eq!(detection.sensor_mut().count(Call::EventStatus), 2);
    }

    #[test]
    fn handler_ignores_other_events() {
        let flag = DetectionFlag::new();
        let mut detection = FreeFallDetection::new(MockSensor::default(), &flag);

        detection.handler();
        assert_eq!(flag.get(), 0);
    }

    #[test]
    fn handler_never_clears_the_flag() {
        let flag = DetectionFlag::new();
        flag.set(1);
        let mut detection = FreeFallDetection::new(MockSensor::default(), &flag);

        detection.handler();
        assert_eq!(flag.get(), 1);
    }

    #[test]
    fn handler_drops_events_on_status_failure() {
        let flag = DetectionFlag::new();
        let mut sensor = MockSensor::default().failing(Call::EventStatus);
        sensor.set_free_fall(true);
        let mut detection = FreeFallDetection::new(sensor, &flag);

        detection.handler();
        assert_eq!(flag.get(), 0);
    }

    #[test]
    fn rearm_after_clear() {
        let flag = DetectionFlag::new();
        let mut detection = FreeFallDetection::new(MockSensor::default(), &flag);
        detection.init().unwrap();

        detection.sensor_mut().set_free_fall(true);
        detection.handler();
        assert_eq!(detection.get_state(), 1);

        detection.set_state(0);
        detection.sensor_mut().set_free_fall(false);
        detection.handler();
        assert_eq!(detection.get_state(), 0);
    }

    #[test]
    fn deinit_disables_both() {
        let flag = DetectionFlag::new();
        let mut detection = FreeFallDetection::new(MockSensor::default(), &flag);

        assert_eq!(detection.deinit(), Ok(()));
        assert_eq!(
            detection.sensor_mut().calls(),
            &[Call::AccDisable, Call::DisableFreeFall]
        );
    }

    #[test]
    fn deinit_attempts_both_even_after_a_failure() {
        let flag = DetectionFlag::new();
        let sensor = MockSensor::default().failing(Call::AccDisable);
        let mut detection = FreeFallDetection::new(sensor, &flag);

        let err = detection.deinit().unwrap_err();
        assert_eq!(err.code(), ErrorCode::DeviceOpFailed);
        assert_eq!(err.stage(), Some(Stage::DisableAccelerometer));
        assert_eq!(detection.sensor_mut().count(Call::DisableFreeFall), 1);
    }

    #[test]
    fn deinit_reports_detection_failure() {
        let flag = DetectionFlag::new();
        let sensor = MockSensor::default().failing(Call::DisableFreeFall);
        let mut detection = FreeFallDetection::new(sensor, &flag);

        assert_eq!(
            detection.deinit(),
            Err(DetectionError::DeviceOpFailed {
                stage: Stage::DisableDetection,
                source: MockError,
            })
        );
    }
}
