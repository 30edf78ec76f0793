//! Testing infrastructure (scripted sensor).

pub(crate) mod mock;

pub(crate) use mock::{Call, MockError, MockSensor};
