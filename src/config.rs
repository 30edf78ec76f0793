//! Build-time free-fall detection settings.

use crate::component::IntPin;
use crate::prelude::FfThs;
use crate::I2CAddress;

/// Interrupt pin the free-fall event is routed to.
pub const FREEFALL_DETECTION_INT_PIN: IntPin = IntPin::Int1;

/// Free-fall threshold, 3 bits: `_156mg` (code 0) up to `_500mg` (code 7).
pub const FREEFALL_DETECTION_THRESHOLD: FfThs = FfThs::_156mg;

/// Minimum free-fall duration, 6 bits, 1 LSB = 1 / ODR.
pub const FREEFALL_DETECTION_DURATION: u8 = 0x0F;

/// I2C address of the sensor on the board.
pub const FREEFALL_DETECTION_ADDRESS: I2CAddress = I2CAddress::I2cAddH;

const DURATION_MASK: u8 = 0x3F;

/// Free-fall detection configuration.
///
/// Defaults come from the `FREEFALL_DETECTION_*` constants. All builders are
/// `const`, so a firmware keeps its configuration in a `const` item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FreeFallConfig {
    pub(crate) int_pin: IntPin,
    pub(crate) threshold: FfThs,
    pub(crate) duration: u8,
}

impl FreeFallConfig {
    /// Creates the default configuration.
    pub const fn new() -> Self {
        Self {
            int_pin: FREEFALL_DETECTION_INT_PIN,
            threshold: FREEFALL_DETECTION_THRESHOLD,
            duration: FREEFALL_DETECTION_DURATION,
        }
    }

    /// Routes the free-fall event to `pin`.
    #[must_use]
    pub const fn with_int_pin(mut self, pin: IntPin) -> Self {
        self.int_pin = pin;
        self
    }

    /// Sets the free-fall threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: FfThs) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the minimum duration in ODR ticks. Only the low 6 bits are kept.
    #[must_use]
    pub const fn with_duration(mut self, duration: u8) -> Self {
        self.duration = duration & DURATION_MASK;
        self
    }

    pub const fn int_pin(&self) -> IntPin {
        self.int_pin
    }

    pub const fn threshold(&self) -> FfThs {
        self.threshold
    }

    pub const fn duration(&self) -> u8 {
        self.duration
    }
}

impl Default for FreeFallConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_build_constants() {
        let config = FreeFallConfig::default();
        assert_eq!(config.int_pin(), IntPin::Int1);
        assert_eq!(config.threshold(), FfThs::_156mg);
        assert_eq!(config.duration(), 0x0F);
    }

    #[test]
    fn duration_is_masked_to_six_bits() {
        let config = FreeFallConfig::new().with_duration(0xFF);
        assert_eq!(config.duration(), 0x3F);
    }

    #[test]
    fn builders_are_const() {
        const CONFIG: FreeFallConfig = FreeFallConfig::new()
            .with_int_pin(IntPin::Int2)
            .with_threshold(FfThs::_500mg)
            .with_duration(6);
        assert_eq!(CONFIG.int_pin(), IntPin::Int2);
        assert_eq!(CONFIG.threshold(), FfThs::_500mg);
        assert_eq!(CONFIG.duration(), 6);
    }
}
