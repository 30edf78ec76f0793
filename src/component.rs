//! Component driver: the operations free-fall detection needs from a sensor.

use core::fmt::Debug;

use embedded_hal::{
    delay::DelayNs,
    i2c::I2c,
    spi::SpiDevice,
};
use st_mems_bus::BusOperation;

use crate::prelude::*;
use crate::{Error, I2CAddress, Ism330dhcx, PROPERTY_DISABLE, PROPERTY_ENABLE};

/// Output data rate used while free-fall detection is enabled.
const FREE_FALL_ODR: OdrXl = OdrXl::_416hz;
/// Duration programmed when detection is enabled, before any user value.
const FREE_FALL_DEFAULT_DURATION: u8 = 0x06;
/// Threshold programmed when detection is enabled, before any user value.
const FREE_FALL_DEFAULT_THRESHOLD: FfThs = FfThs::_312mg;
/// ODR the accelerometer starts at when enabled without prior configuration.
const DEFAULT_ODR: OdrXl = OdrXl::_104hz;

/// Sensor interrupt pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntPin {
    Int1,
    Int2,
}

/// Basic events reported by [`FreeFallSensor::event_status`].
///
/// An event is only reported while it is routed to INT1 or INT2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventStatus {
    pub free_fall: bool,
    pub wake_up: bool,
    pub single_tap: bool,
    pub double_tap: bool,
    pub d6d_orientation: bool,
    pub sleep_change: bool,
}

/// Sensor operations used by [`crate::FreeFallDetection`].
///
/// Implementations own their bus; binding a bus to a sensor happens when the
/// implementor is constructed.
pub trait FreeFallSensor {
    type Error: Debug;

    /// Reads the device identification register.
    fn read_id(&mut self) -> Result<u8, Self::Error>;

    /// Powers the accelerometer up at its configured output data rate.
    fn acc_enable(&mut self) -> Result<(), Self::Error>;

    /// Powers the accelerometer down, keeping its output data rate for the
    /// next [`acc_enable`](Self::acc_enable).
    fn acc_disable(&mut self) -> Result<(), Self::Error>;

    /// Configures the free-fall engine and routes its event to `pin`.
    fn enable_free_fall_detection(&mut self, pin: IntPin) -> Result<(), Self::Error>;

    /// Removes the free-fall routing from both pins and restores defaults.
    fn disable_free_fall_detection(&mut self) -> Result<(), Self::Error>;

    fn set_free_fall_threshold(&mut self, threshold: FfThs) -> Result<(), Self::Error>;

    /// Sets the minimum free-fall duration, 6 bits, in ODR ticks.
    fn set_free_fall_duration(&mut self, duration: u8) -> Result<(), Self::Error>;

    /// Reads which routed events are pending.
    fn event_status(&mut self) -> Result<EventStatus, Self::Error>;
}

/// ISM330DHCX accelerometer component.
///
/// Remembers the output data rate while the accelerometer is powered down,
/// so the data rate can be prepared before [`FreeFallSensor::acc_enable`].
pub struct Accelerometer<B, T> {
    driver: Ism330dhcx<B, T>,
    enabled: bool,
    odr: OdrXl,
}

impl<P, T> Accelerometer<st_mems_bus::i2c::I2cBus<P>, T>
where
    P: I2c,
    T: DelayNs,
{
    /// Binds the sensor to an I2C bus at `address`.
    pub fn new_i2c(i2c: P, address: I2CAddress, tim: T) -> Self {
        Self::new(Ism330dhcx::new_i2c(i2c, address, tim))
    }
}

impl<P, T> Accelerometer<st_mems_bus::spi::SpiBus<P>, T>
where
    P: SpiDevice,
    T: DelayNs,
{
    /// Binds the sensor to a 4-wire SPI device.
    pub fn new_spi(spi: P, tim: T) -> Self {
        Self::new(Ism330dhcx::new_spi(spi, tim))
    }
}

impl<B: BusOperation, T: DelayNs> Accelerometer<B, T> {
    /// Wraps a register driver. The accelerometer is assumed powered down.
    pub fn new(driver: Ism330dhcx<B, T>) -> Self {
        Self {
            driver,
            enabled: false,
            odr: DEFAULT_ODR,
        }
    }

    /// Register-level access to the sensor.
    pub fn driver_mut(&mut self) -> &mut Ism330dhcx<B, T> {
        &mut self.driver
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Output data rate applied on the next enable, or the current one while enabled.
    pub fn odr(&self) -> OdrXl {
        self.odr
    }

    pub fn release(self) -> Ism330dhcx<B, T> {
        self.driver
    }

    /// Writes `odr` when enabled, only remembers it otherwise.
    fn set_output_data_rate(&mut self, odr: OdrXl) -> Result<(), Error<B::Error>> {
        if self.enabled {
            self.driver.xl_data_rate_set(odr)?;
        }
        self.odr = odr;
        Ok(())
    }
}

impl<B: BusOperation, T: DelayNs> FreeFallSensor for Accelerometer<B, T>
where
    B::Error: Debug,
{
    type Error = Error<B::Error>;

    fn read_id(&mut self) -> Result<u8, Self::Error> {
        self.driver.device_id_get()
    }

    fn acc_enable(&mut self) -> Result<(), Self::Error> {
        if self.enabled {
            return Ok(());
        }
        self.driver.xl_data_rate_set(self.odr)?;
        self.enabled = true;
        Ok(())
    }

    fn acc_disable(&mut self) -> Result<(), Self::Error> {
        if !self.enabled {
            return Ok(());
        }
        // reserved or power-down codes keep the last known rate
        let ctrl1_xl = Ctrl1Xl::read(&mut self.driver)?;
        match OdrXl::try_from(ctrl1_xl.odr_xl()) {
            Ok(OdrXl::Off) | Err(_) => {}
            Ok(odr) => self.odr = odr,
        }
        self.driver.xl_data_rate_set(OdrXl::Off)?;
        self.enabled = false;
        Ok(())
    }

    fn enable_free_fall_detection(&mut self, pin: IntPin) -> Result<(), Self::Error> {
        self.set_output_data_rate(FREE_FALL_ODR)?;
        self.driver.xl_full_scale_set(FsXl::_2g)?;
        self.driver.ff_dur_set(FREE_FALL_DEFAULT_DURATION)?;
        self.driver.wkup_dur_set(0x00)?;
        self.driver.act_sleep_dur_set(0x00)?;
        self.driver.ff_threshold_set(FREE_FALL_DEFAULT_THRESHOLD)?;

        match pin {
            IntPin::Int1 => {
                let mut route = self.driver.pin_int1_route_get()?;
                route.md1_cfg.set_int1_ff(PROPERTY_ENABLE);
                self.driver.pin_int1_route_set(&mut route)
            }
            IntPin::Int2 => {
                let mut route = self.driver.pin_int2_route_get()?;
                route.md2_cfg.set_int2_ff(PROPERTY_ENABLE);
                self.driver.pin_int2_route_set(&mut route)
            }
        }
    }

    fn disable_free_fall_detection(&mut self) -> Result<(), Self::Error> {
        let mut int1 = self.driver.pin_int1_route_get()?;
        int1.md1_cfg.set_int1_ff(PROPERTY_DISABLE);
        self.driver.pin_int1_route_set(&mut int1)?;

        let mut int2 = self.driver.pin_int2_route_get()?;
        int2.md2_cfg.set_int2_ff(PROPERTY_DISABLE);
        self.driver.pin_int2_route_set(&mut int2)?;

        self.driver.ff_dur_set(0x00)?;
        self.driver.ff_threshold_set(FfThs::_156mg)
    }

    fn set_free_fall_threshold(&mut self, threshold: FfThs) -> Result<(), Self::Error> {
        self.driver.ff_threshold_set(threshold)
    }

    fn set_free_fall_duration(&mut self, duration: u8) -> Result<(), Self::Error> {
        self.driver.ff_dur_set(duration)
    }

    fn event_status(&mut self) -> Result<EventStatus, Self::Error> {
        let sources = self.driver.event_sources_get()?;
        let md1_cfg = Md1Cfg::read(&mut self.driver)?;
        let md2_cfg = Md2Cfg::read(&mut self.driver)?;

        let routed = |int1: u8, int2: u8| int1 == PROPERTY_ENABLE || int2 == PROPERTY_ENABLE;

        Ok(EventStatus {
            free_fall: routed(md1_cfg.int1_ff(), md2_cfg.int2_ff())
                && sources.wake_up_src.ff_ia() == PROPERTY_ENABLE,
            wake_up: routed(md1_cfg.int1_wu(), md2_cfg.int2_wu())
                && sources.wake_up_src.wu_ia() == PROPERTY_ENABLE,
            single_tap: routed(md1_cfg.int1_single_tap(), md2_cfg.int2_single_tap())
                && sources.tap_src.single_tap() == PROPERTY_ENABLE,
            double_tap: routed(md1_cfg.int1_double_tap(), md2_cfg.int2_double_tap())
                && sources.tap_src.double_tap() == PROPERTY_ENABLE,
            d6d_orientation: routed(md1_cfg.int1_6d(), md2_cfg.int2_6d())
                && sources.d6d_src.d6d_ia() == PROPERTY_ENABLE,
            sleep_change: routed(md1_cfg.int1_sleep_change(), md2_cfg.int2_sleep_change())
                && sources.wake_up_src.sleep_change_ia() == PROPERTY_ENABLE,
        })
    }
}
