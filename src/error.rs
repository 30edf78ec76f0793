//! Error types for free-fall detection.

use core::fmt;

/// Why the device probe failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError<E> {
    /// Reading the device ID failed at the bus level.
    Bus(E),
    /// A device answered with an unexpected WHO_AM_I value.
    WrongDevice(u8),
}

/// Configuration step that failed after a successful probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Routing the free-fall event and its base configuration.
    EnableDetection,
    /// Writing the free-fall threshold.
    SetThreshold,
    /// Writing the free-fall duration.
    SetDuration,
    /// Powering the accelerometer up.
    EnableAccelerometer,
    /// Powering the accelerometer down.
    DisableAccelerometer,
    /// Removing the free-fall routing.
    DisableDetection,
}

/// Error returned by [`crate::FreeFallDetection::init`] and
/// [`crate::FreeFallDetection::deinit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DetectionError<E> {
    /// The probe did not find an ISM330DHCX.
    NoDeviceFound(ProbeError<E>),
    /// A driver operation failed on a probed device.
    DeviceOpFailed {
        /// Step that failed.
        stage: Stage,
        /// Driver error.
        source: E,
    },
}

impl<E> DetectionError<E> {
    /// Collapses the error to its numeric code.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NoDeviceFound(_) => ErrorCode::NoDeviceFound,
            Self::DeviceOpFailed { .. } => ErrorCode::DeviceOpFailed,
        }
    }

    /// Returns the failed stage, if the probe succeeded.
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::NoDeviceFound(_) => None,
            Self::DeviceOpFailed { stage, .. } => Some(*stage),
        }
    }
}

impl<E> From<ProbeError<E>> for DetectionError<E> {
    fn from(err: ProbeError<E>) -> Self {
        Self::NoDeviceFound(err)
    }
}

impl<E: fmt::Debug> fmt::Display for DetectionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDeviceFound(ProbeError::Bus(err)) => {
                write!(f, "no device found: bus error {err:?}")
            }
            Self::NoDeviceFound(ProbeError::WrongDevice(id)) => {
                write!(f, "no device found: unexpected id {id:#04x}")
            }
            Self::DeviceOpFailed { stage, source } => {
                write!(f, "device operation failed at {stage:?}: {source:?}")
            }
        }
    }
}

/// Coarse status code: `0` none, `1` no device found, `2` device operation failed.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    None = 0,
    NoDeviceFound = 1,
    DeviceOpFailed = 2,
}

impl ErrorCode {
    /// Collapses a detection result to its status code.
    pub fn from_result<T, E>(result: &Result<T, DetectionError<E>>) -> Self {
        match result {
            Ok(_) => Self::None,
            Err(err) => err.code(),
        }
    }

    /// The numeric value of the code.
    pub const fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use super::*;

    #[test]
    fn codes_match_the_coarse_taxonomy() {
        let ok: Result<(), DetectionError<()>> = Ok(());
        assert_eq!(ErrorCode::from_result(&ok).as_i32(), 0);

        let probe: Result<(), DetectionError<()>> =
            Err(DetectionError::NoDeviceFound(ProbeError::WrongDevice(0x6A)));
        assert_eq!(ErrorCode::from_result(&probe).as_i32(), 1);

        let op: Result<(), DetectionError<()>> = Err(DetectionError::DeviceOpFailed {
            stage: Stage::SetDuration,
            source: (),
        });
        assert_eq!(ErrorCode::from_result(&op).as_i32(), 2);
    }

    #[test]
    fn stage_is_only_known_after_probe() {
        let probe: DetectionError<()> = ProbeError::Bus(()).into();
        assert_eq!(probe.stage(), None);

        let op: DetectionError<()> = DetectionError::DeviceOpFailed {
            stage: Stage::EnableAccelerometer,
            source: (),
        };
        assert_eq!(op.stage(), Some(Stage::EnableAccelerometer));
    }

    #[test]
    fn display_names_the_device_id() {
        let err: DetectionError<()> = ProbeError::WrongDevice(0x6A).into();
        assert_eq!(format!("{err}"), "no device found: unexpected id 0x6a");
    }
}
