//! Free-fall detection for the ISM330DHCX 6-axis IMU from STMicroelectronics.
//!
//! The crate is layered:
//!
//! * [`Ism330dhcx`]: register-level access to the registers the free-fall
//!   engine uses, over any `st-mems-bus` bus (I2C or SPI).
//! * [`Accelerometer`]: the component driver. It implements
//!   [`FreeFallSensor`], the small set of operations the detection logic needs.
//! * [`FreeFallDetection`]: device bring-up and the detection state exposed to
//!   the firmware. The state lives in a [`DetectionFlag`] that can be shared
//!   between the interrupt handler and the main loop.
//!
//! ```rust,no_run
//! use ism330dhcx_freefall::{Accelerometer, DetectionFlag, FreeFallDetection, I2CAddress};
//! # fn example<I2C: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs>(i2c: I2C, delay: D) {
//! static FREE_FALL: DetectionFlag = DetectionFlag::new();
//!
//! let sensor = Accelerometer::new_i2c(i2c, I2CAddress::I2cAddH, delay);
//! let mut detection = FreeFallDetection::new(sensor, &FREE_FALL);
//! if detection.init().is_ok() {
//!     // On every INT1 edge:
//!     detection.handler();
//!     if FREE_FALL.is_set() {
//!         FREE_FALL.set(0);
//!     }
//! }
//! # }
//! ```

#![no_std]
use embedded_hal::{
    delay::DelayNs,
    i2c::{I2c, SevenBitAddress},
    spi::SpiDevice,
};
use st_mems_bus::BusOperation;

mod component;
mod config;
mod detection;
mod error;
pub mod prelude;
pub mod register;

#[cfg(test)]
mod testing;

pub use component::{Accelerometer, EventStatus, FreeFallSensor, IntPin};
pub use config::{
    FreeFallConfig, FREEFALL_DETECTION_ADDRESS, FREEFALL_DETECTION_DURATION,
    FREEFALL_DETECTION_INT_PIN, FREEFALL_DETECTION_THRESHOLD,
};
pub use detection::{DetectionFlag, FreeFallDetection};
pub use error::{DetectionError, ErrorCode, ProbeError, Stage};

use prelude::*;

/// The Ism330dhcx generic driver struct.
pub struct Ism330dhcx<B, T> {
    /// The bus driver.
    pub bus: B,
    pub tim: T,
}

/// Driver errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error<B> {
    Bus(B), // Error at the bus level
}

impl<P, T> Ism330dhcx<st_mems_bus::i2c::I2cBus<P>, T>
where
    P: I2c,
    T: DelayNs,
{
    /// Constructor method for using the I2C bus.
    ///
    /// # Arguments
    ///
    /// * `i2c`: The I2C peripheral.
    /// * `address`: The I2C address of the Ism330dhcx sensor.
    /// * `tim`: Delay provider.
    ///
    /// # Returns
    ///
    /// * `Self`: Returns an instance of `Ism330dhcx`.
    pub fn new_i2c(i2c: P, address: I2CAddress, tim: T) -> Self {
        // Initialize the I2C bus with the Ism330dhcx address
        let bus = st_mems_bus::i2c::I2cBus::new(i2c, address as SevenBitAddress);
        Self { bus, tim }
    }
}

impl<P, T> Ism330dhcx<st_mems_bus::spi::SpiBus<P>, T>
where
    P: SpiDevice,
    T: DelayNs,
{
    /// Constructor method for using the SPI bus.
    ///
    /// # Arguments
    ///
    /// * `spi`: The SPI peripheral.
    /// * `tim`: Delay provider.
    ///
    /// # Returns
    ///
    /// * `Self`: Returns an instance of `Ism330dhcx`.
    pub fn new_spi(spi: P, tim: T) -> Self {
        // Initialize the SPI bus
        let bus = st_mems_bus::spi::SpiBus::new(spi);
        Self { bus, tim }
    }
}

impl<B: BusOperation, T: DelayNs> Ism330dhcx<B, T> {
    #[inline]
    pub fn read_from_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<B::Error>> {
        self.bus.read_from_register(reg, buf).map_err(Error::Bus)
    }

    #[inline]
    pub fn write_to_register(&mut self, reg: u8, buf: &[u8]) -> Result<(), Error<B::Error>> {
        self.bus.write_to_register(reg, buf).map_err(Error::Bus)
    }

    #[inline]
    pub fn from_bus(bus: B, tim: T) -> Self {
        Self { bus, tim }
    }

    /// Gives back the bus and the delay provider.
    pub fn release(self) -> (B, T) {
        (self.bus, self.tim)
    }

    /// Accelerometer full-scale selection.
    ///
    /// # Arguments
    ///
    /// * `val`: Change the values of fs_xl in reg CTRL1_XL.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`
    ///     * `Err`: Returns an error if the operation fails.
    pub fn xl_full_scale_set(&mut self, val: FsXl) -> Result<(), Error<B::Error>> {
        let mut ctrl1_xl = Ctrl1Xl::read(self)?;
        ctrl1_xl.set_fs_xl(val as u8);
        ctrl1_xl.write(self)
    }

    /// Accelerometer full-scale selection.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `FsXl`: Get the values of fs_xl in reg CTRL1_XL.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn xl_full_scale_get(&mut self) -> Result<FsXl, Error<B::Error>> {
        let ctrl1_xl = Ctrl1Xl::read(self)?;
        Ok(FsXl::try_from(ctrl1_xl.fs_xl()).unwrap_or_default())
    }

    /// Accelerometer UI data rate selection.
    ///
    /// # Arguments
    ///
    /// * `val`: Change the values of odr_xl in reg CTRL1_XL.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`
    ///     * `Err`: Returns an error if the operation fails.
    pub fn xl_data_rate_set(&mut self, val: OdrXl) -> Result<(), Error<B::Error>> {
        let mut ctrl1xl = Ctrl1Xl::read(self)?;
        ctrl1xl.set_odr_xl(val as u8);
        ctrl1xl.write(self)
    }

    /// Accelerometer UI data rate selection.
    ///
    /// Reserved codes read as [`OdrXl::Off`].
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `OdrXl`: Get the values of odr_xl in reg CTRL1_XL.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn xl_data_rate_get(&mut self) -> Result<OdrXl, Error<B::Error>> {
        let ctrl1xl = Ctrl1Xl::read(self)?;
        Ok(OdrXl::try_from(ctrl1xl.odr_xl()).unwrap_or_default())
    }

    /// Device Who am I.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `u8`: Buffer that stores data read.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn device_id_get(&mut self) -> Result<u8, Error<B::Error>> {
        WhoAmI::read(self).map(|reg| reg.id())
    }

    /// Select the signal that need to route on int1 pad.
    ///
    /// TAP_CFG2.INTERRUPTS_ENABLE follows the union of both pads' routing:
    /// INT1_CTRL, MD1_CFG, INT2_CTRL and MD2_CFG.
    ///
    /// # Arguments
    ///
    /// * `val`: Structure of registers: INT1_CTRL, MD1_CFG.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`
    ///     * `Err`: Returns an error if the operation fails.
    pub fn pin_int1_route_set(&mut self, val: &mut PinInt1Route) -> Result<(), Error<B::Error>> {
        val.int1_ctrl.write(self)?;
        val.md1_cfg.write(self)?;

        let int2 = self.pin_int2_route_get()?;
        let routed = val.int1_ctrl.into_bits()
            | val.md1_cfg.into_bits()
            | int2.int2_ctrl.into_bits()
            | int2.md2_cfg.into_bits();

        self.basic_interrupts_update(routed)
    }

    /// Select the signal that need to route on int1 pad.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `PinInt1Route`: Structure of registers INT1_CTRL, MD1_CFG.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn pin_int1_route_get(&mut self) -> Result<PinInt1Route, Error<B::Error>> {
        Ok(PinInt1Route {
            int1_ctrl: Int1Ctrl::read(self)?,
            md1_cfg: Md1Cfg::read(self)?,
        })
    }

    /// Select the signal that need to route on int2 pad.
    ///
    /// TAP_CFG2.INTERRUPTS_ENABLE follows the union of both pads' routing:
    /// INT2_CTRL, MD2_CFG, INT1_CTRL and MD1_CFG.
    ///
    /// # Arguments
    ///
    /// * `val`: Structure of registers INT2_CTRL, MD2_CFG.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn pin_int2_route_set(&mut self, val: &mut PinInt2Route) -> Result<(), Error<B::Error>> {
        val.int2_ctrl.write(self)?;
        val.md2_cfg.write(self)?;

        let int1 = self.pin_int1_route_get()?;
        let routed = val.int2_ctrl.into_bits()
            | val.md2_cfg.into_bits()
            | int1.int1_ctrl.into_bits()
            | int1.md1_cfg.into_bits();

        self.basic_interrupts_update(routed)
    }

    /// Select the signal that need to route on int2 pad.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `PinInt2Route`: Structure of registers INT2_CTRL, MD2_CFG.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn pin_int2_route_get(&mut self) -> Result<PinInt2Route, Error<B::Error>> {
        Ok(PinInt2Route {
            int2_ctrl: Int2Ctrl::read(self)?,
            md2_cfg: Md2Cfg::read(self)?,
        })
    }

    /// TAP_CFG2.INTERRUPTS_ENABLE on while any signal is routed to a pad.
    fn basic_interrupts_update(&mut self, routed: u8) -> Result<(), Error<B::Error>> {
        let mut tap_cfg2 = TapCfg2::read(self)?;

        if routed != PROPERTY_DISABLE {
            tap_cfg2.set_interrupts_enable(PROPERTY_ENABLE);
        } else {
            tap_cfg2.set_interrupts_enable(PROPERTY_DISABLE);
        }

        tap_cfg2.write(self)
    }

    /// Wake up duration event (1LSb = 1 / ODR).
    ///
    /// # Arguments
    ///
    /// * `val`: Change the values of wake_dur in reg WAKE_UP_DUR.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`
    ///     * `Err`: Returns an error if the operation fails.
    pub fn wkup_dur_set(&mut self, val: u8) -> Result<(), Error<B::Error>> {
        let mut wake_up_dur = WakeUpDur::read(self)?;
        wake_up_dur.set_wake_dur(val);
        wake_up_dur.write(self)
    }

    /// Wake up duration event (1LSb = 1 / ODR).
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `u8`: Get the values of wake_dur in reg WAKE_UP_DUR.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn wkup_dur_get(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(WakeUpDur::read(self)?.wake_dur())
    }

    /// Duration to go in sleep mode (1 LSb = 512 / ODR).
    ///
    /// # Arguments
    ///
    /// * `val`: Change the values of sleep_dur in reg WAKE_UP_DUR.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn act_sleep_dur_set(&mut self, val: u8) -> Result<(), Error<B::Error>> {
        let mut wake_up_dur = WakeUpDur::read(self)?;
        wake_up_dur.set_sleep_dur(val);
        wake_up_dur.write(self)
    }

    /// Duration to go in sleep mode (1 LSb = 512 / ODR).
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `u8`: Get the values of sleep_dur in reg WAKE_UP_DUR.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn act_sleep_dur_get(&mut self) -> Result<u8, Error<B::Error>> {
        Ok(WakeUpDur::read(self)?.sleep_dur())
    }

    /// Free fall threshold setting.
    ///
    /// # Arguments
    ///
    /// * `val`: Change the values of ff_ths in reg FREE_FALL.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`
    ///     * `Err`: Returns an error if the operation fails.
    pub fn ff_threshold_set(&mut self, val: FfThs) -> Result<(), Error<B::Error>> {
        let mut free_fall = FreeFall::read(self)?;
        free_fall.set_ff_ths(val as u8);
        free_fall.write(self)
    }

    /// Free fall threshold setting.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `FfThs`: Get the values of ff_ths in reg FREE_FALL.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn ff_threshold_get(&mut self) -> Result<FfThs, Error<B::Error>> {
        let free_fall = FreeFall::read(self)?;
        Ok(FfThs::try_from(free_fall.ff_ths()).unwrap_or_default())
    }

    /// Free-fall duration event (1LSb = 1 / ODR).
    ///
    /// Bit 5 goes to WAKE_UP_DUR.FF_DUR5, bits 4..0 to FREE_FALL.FF_DUR.
    ///
    /// # Arguments
    ///
    /// * `val`: Change the values of ff_dur in reg FREE_FALL.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `()`
    ///     * `Err`: Returns an error if the operation fails.
    pub fn ff_dur_set(&mut self, val: u8) -> Result<(), Error<B::Error>> {
        let mut wake_up_dur = WakeUpDur::read(self)?;
        wake_up_dur.set_ff_dur((val & 0x20) >> 5);
        wake_up_dur.write(self)?;

        let mut free_fall = FreeFall::read(self)?;
        free_fall.set_ff_dur(val & 0x1F);
        free_fall.write(self)
    }

    /// Free-fall duration event (1LSb = 1 / ODR).
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `u8`: Get the values of ff_dur in reg FREE_FALL.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn ff_dur_get(&mut self) -> Result<u8, Error<B::Error>> {
        let wake_up_dur = WakeUpDur::read(self)?;
        let free_fall = FreeFall::read(self)?;

        let val = (wake_up_dur.ff_dur() << 5) + free_fall.ff_dur();
        Ok(val)
    }

    /// Read the basic event source registers.
    ///
    /// # Returns
    ///
    /// * `Result`
    ///     * `EventSources`: registers WAKE_UP_SRC, TAP_SRC, D6D_SRC.
    ///     * `Err`: Returns an error if the operation fails.
    pub fn event_sources_get(&mut self) -> Result<EventSources, Error<B::Error>> {
        Ok(EventSources {
            wake_up_src: WakeUpSrc::read(self)?,
            tap_src: TapSrc::read(self)?,
            d6d_src: D6dSrc::read(self)?,
        })
    }
}

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2CAddress {
    /// I²C address when the SA0 pin is low.
    I2cAddL = 0x6A,

    /// I²C address when the SA0 pin is high.
    I2cAddH = 0x6B,
}

///
/// ISM330DHCX Device ID.
///
pub const ISM330DHCX_ID: u8 = 0x6B;

pub const PROPERTY_ENABLE: u8 = 1;
pub const PROPERTY_DISABLE: u8 = 0;
