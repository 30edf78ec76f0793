extern crate std;

use std::vec::Vec;

use crate::component::{EventStatus, FreeFallSensor, IntPin};
use crate::prelude::FfThs;
use crate::ISM330DHCX_ID;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    ReadId,
    AccEnable,
    AccDisable,
    EnableFreeFall(IntPin),
    DisableFreeFall,
    SetThreshold(FfThs),
    SetDuration(u8),
    EventStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MockError;

/// Scripted sensor: records every call, fails the operations it is told to.
#[derive(Clone, Debug)]
pub(crate) struct MockSensor {
    id: u8,
    free_fall: bool,
    failing: Vec<Call>,
    calls: Vec<Call>,
}

impl Default for MockSensor {
    fn default() -> Self {
        Self {
            id: ISM330DHCX_ID,
            free_fall: false,
            failing: Vec::new(),
            calls: Vec::new(),
        }
    }
}

impl MockSensor {
    pub(crate) fn with_id(mut self, id: u8) -> Self {
        self.id = id;
        self
    }

    pub(crate) fn failing(mut self, call: Call) -> Self {
        self.failing.push(call);
        self
    }

    pub(crate) fn set_free_fall(&mut self, free_fall: bool) {
        self.free_fall = free_fall;
    }

    pub(crate) fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub(crate) fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn record(&mut self, call: Call) -> Result<(), MockError> {
        self.calls.push(call);
        if self.failing.contains(&call) {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

impl FreeFallSensor for MockSensor {
    type Error = MockError;

    fn read_id(&mut self) -> Result<u8, Self::Error> {
        self.record(Call::ReadId)?;
        Ok(self.id)
    }

    fn acc_enable(&mut self) -> Result<(), Self::Error> {
        self.record(Call::AccEnable)
    }

    fn acc_disable(&mut self) -> Result<(), Self::Error> {
        self.record(Call::AccDisable)
    }

    fn enable_free_fall_detection(&mut self, pin: IntPin) -> Result<(), Self::Error> {
        self.record(Call::EnableFreeFall(pin))
    }

    fn disable_free_fall_detection(&mut self) -> Result<(), Self::Error> {
        self.record(Call::DisableFreeFall)
    }

    fn set_free_fall_threshold(&mut self, threshold: FfThs) -> Result<(), Self::Error> {
        self.record(Call::SetThreshold(threshold))
    }

    fn set_free_fall_duration(&mut self, duration: u8) -> Result<(), Self::Error> {
        self.record(Call::SetDuration(duration))
    }

    fn event_status(&mut self) -> Result<EventStatus, Self::Error> {
        self.record(Call::EventStatus)?;
        Ok(EventStatus {
            free_fall: self.free_fall,
            ..Default::default()
        })
    }
}
