use crate::BusOperation;
use crate::DelayNs;
use crate::Error;
use crate::Ism330dhcx;
use bitfield_struct::bitfield;
use derive_more::TryFrom;

use st_mem_bank_macro::register;

#[repr(u8)]
#[derive(Clone, Copy, PartialEq)]
pub enum Reg {
    /// Interrupt 1 control register.
    ///
    /// Configures the data events routed to the INT1 pin.
    Int1Ctrl = 0x0D,

    /// Interrupt 2 control register.
    ///
    /// Configures the data events routed to the INT2 pin.
    Int2Ctrl = 0x0E,

    /// Who Am I register.
    ///
    /// Read-only register containing the device ID. Default value: `0x6B`.
    WhoAmI = 0x0F,

    /// Accelerometer control register 1.
    ///
    /// Configures the accelerometer's output data rate and full-scale range.
    Ctrl1Xl = 0x10,

    /// Wake-up source register.
    ///
    /// Indicates the source of wake-up, free-fall and sleep change events.
    WakeUpSrc = 0x1B,

    /// Tap source register.
    TapSrc = 0x1C,

    /// 6D orientation source register.
    D6dSrc = 0x1D,

    /// Tap configuration register 2.
    ///
    /// Holds the basic interrupts enable bit.
    TapCfg2 = 0x58,

    /// Wake-up duration register.
    ///
    /// Holds the most significant bit of the free-fall duration.
    WakeUpDur = 0x5C,

    /// Free-fall register.
    ///
    /// Configures the free-fall threshold and the low bits of its duration.
    FreeFall = 0x5D,

    /// MD1 configuration register.
    ///
    /// Routes basic interrupts (free-fall, wake-up, tap, 6D) to INT1.
    Md1Cfg = 0x5E,

    /// MD2 configuration register.
    ///
    /// Routes basic interrupts (free-fall, wake-up, tap, 6D) to INT2.
    Md2Cfg = 0x5F,
}

/// Interrupt 1 Control Register (R/W).
///
/// The `INT1_CTRL` register is used to configure interrupt generation for data events on the INT1 pin.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::Int1Ctrl, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct Int1Ctrl {
    #[bits(1, default = 0)]
    pub int1_drdy_xl: u8,

    #[bits(1, default = 0)]
    pub int1_drdy_g: u8,

    #[bits(1, default = 0)]
    pub int1_boot: u8,

    #[bits(1, default = 0)]
    pub int1_fifo_th: u8,

    #[bits(1, default = 0)]
    pub int1_fifo_ovr: u8,

    #[bits(1, default = 0)]
    pub int1_fifo_full: u8,

    #[bits(1, default = 0)]
    pub int1_cnt_bdr: u8,

    #[bits(1, default = 0)]
    pub den_drdy_flag: u8,
}

/// Interrupt 2 Control Register (R/W).
///
/// The `INT2_CTRL` register is used to configure interrupt generation for data events on the INT2 pin.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::Int2Ctrl, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct Int2Ctrl {
    #[bits(1, default = 0)]
    pub int2_drdy_xl: u8,

    #[bits(1, default = 0)]
    pub int2_drdy_g: u8,

    #[bits(1, default = 0)]
    pub int2_drdy_temp: u8,

    #[bits(1, default = 0)]
    pub int2_fifo_th: u8,

    #[bits(1, default = 0)]
    pub int2_fifo_ovr: u8,

    #[bits(1, default = 0)]
    pub int2_fifo_full: u8,

    #[bits(1, default = 0)]
    pub int2_cnt_bdr: u8,

    #[bits(1, access = RO, default = 0)]
    not_used_01: u8,
}

/// Who Am I (R).
///
/// It's value is fixed at 0x6B. Contains the device id.
#[register(address = Reg::WhoAmI, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct WhoAmI {
    #[bits(8, default = 0x6B)]
    pub id: u8,
}

/// Control Register 1 for Accelerometer (R/W).
///
/// Output data rate and full scale of the accelerometer. Writing `odr_xl = 0`
/// powers the accelerometer down.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::Ctrl1Xl, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct Ctrl1Xl {
    #[bits(1, access = RO, default = 0)]
    not_used_01: u8,

    #[bits(1, default = 0)]
    pub lpf2_xl_en: u8,

    #[bits(2, default = 0)]
    pub fs_xl: u8,

    #[bits(4, default = 0)]
    pub odr_xl: u8,
}

/// Wake-up source register (R).
///
/// The `WAKE_UP_SRC` register provides information about wake-up events, free-fall detection, and sleep state changes.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::WakeUpSrc, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct WakeUpSrc {
    #[bits(1, access = RO)]
    pub z_wu: u8,
    #[bits(1, access = RO)]
    pub y_wu: u8,
    #[bits(1, access = RO)]
    pub x_wu: u8,
    #[bits(1, access = RO)]
    pub wu_ia: u8,
    #[bits(1, access = RO)]
    pub sleep_state: u8,
    #[bits(1, access = RO)]
    pub ff_ia: u8,
    #[bits(1, access = RO)]
    pub sleep_change_ia: u8,
    #[bits(1, access = RO, default = 0)]
    not_used_01: u8,
}

/// Tap source register (R).
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::TapSrc, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct TapSrc {
    #[bits(1, access = RO)]
    pub z_tap: u8,
    #[bits(1, access = RO)]
    pub y_tap: u8,
    #[bits(1, access = RO)]
    pub x_tap: u8,
    #[bits(1, access = RO)]
    pub tap_sign: u8,
    #[bits(1, access = RO)]
    pub double_tap: u8,
    #[bits(1, access = RO)]
    pub single_tap: u8,
    #[bits(1, access = RO)]
    pub tap_ia: u8,
    #[bits(1, access = RO, default = 0)]
    not_used_01: u8,
}

/// 6D orientation source register (R).
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::D6dSrc, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct D6dSrc {
    #[bits(1, access = RO)]
    pub xl: u8,
    #[bits(1, access = RO)]
    pub xh: u8,
    #[bits(1, access = RO)]
    pub yl: u8,
    #[bits(1, access = RO)]
    pub yh: u8,
    #[bits(1, access = RO)]
    pub zl: u8,
    #[bits(1, access = RO)]
    pub zh: u8,
    #[bits(1, access = RO)]
    pub d6d_ia: u8,
    #[bits(1, access = RO)]
    pub den_drdy: u8,
}

/// Tap configuration register 2 (R/W).
///
/// Only `interrupts_enable` matters for free-fall: basic interrupts (free-fall,
/// wake-up, tap, 6D) are not generated unless it is set.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::TapCfg2, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct TapCfg2 {
    #[bits(5, default = 0)]
    pub tap_ths_y: u8,
    #[bits(2, default = 0)]
    pub inact_en: u8,
    #[bits(1, default = 0)]
    pub interrupts_enable: u8,
}

/// Wake-up duration register (R/W).
///
/// The `WAKE_UP_DUR` register is used to configure the sleep duration, wake-up duration, and the
/// most significant bit of the free-fall duration.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::WakeUpDur, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct WakeUpDur {
    #[bits(4, default = 0)]
    pub sleep_dur: u8,
    #[bits(1, default = 0)]
    pub wake_ths_w: u8,
    #[bits(2, default = 0)]
    pub wake_dur: u8,
    #[bits(1, default = 0)]
    pub ff_dur: u8,
}

/// Free-fall configuration register (R/W).
///
/// The `FREE_FALL` register is used to configure the free-fall threshold and the five low bits of
/// the free-fall duration.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::FreeFall, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct FreeFall {
    #[bits(3, default = 0)]
    pub ff_ths: u8,
    #[bits(5, default = 0)]
    pub ff_dur: u8,
}

/// MD1 configuration register (R/W).
///
/// The `MD1_CFG` register is used to configure interrupt routing to the INT1 pin for various events, such as wake-up, free-fall, and tap detection.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::Md1Cfg, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct Md1Cfg {
    #[bits(1, default = 0)]
    pub int1_shub: u8,
    #[bits(1, default = 0)]
    pub int1_emb_func: u8,
    #[bits(1, default = 0)]
    pub int1_6d: u8,
    #[bits(1, default = 0)]
    pub int1_double_tap: u8,
    #[bits(1, default = 0)]
    pub int1_ff: u8,
    #[bits(1, default = 0)]
    pub int1_wu: u8,
    #[bits(1, default = 0)]
    pub int1_single_tap: u8,
    #[bits(1, default = 0)]
    pub int1_sleep_change: u8,
}

/// MD2 configuration register (R/W).
///
/// The `MD2_CFG` register is used to configure interrupt routing to the INT2 pin for various events, such as wake-up, free-fall, and tap detection.
///
/// The bit order for this struct can be configured using the `bit_order_msb` feature:
/// * `Msb`: Most significant bit first.
/// * `Lsb`: Least significant bit first (default).
#[register(address = Reg::Md2Cfg, access_type = Ism330dhcx, generics = 2)]
#[cfg_attr(feature = "bit_order_msb", bitfield(u8, order = Msb))]
#[cfg_attr(not(feature = "bit_order_msb"), bitfield(u8, order = Lsb))]
pub struct Md2Cfg {
    #[bits(1, default = 0)]
    pub int2_timestamp: u8,
    #[bits(1, default = 0)]
    pub int2_emb_func: u8,
    #[bits(1, default = 0)]
    pub int2_6d: u8,
    #[bits(1, default = 0)]
    pub int2_double_tap: u8,
    #[bits(1, default = 0)]
    pub int2_ff: u8,
    #[bits(1, default = 0)]
    pub int2_wu: u8,
    #[bits(1, default = 0)]
    pub int2_single_tap: u8,
    #[bits(1, default = 0)]
    pub int2_sleep_change: u8,
}

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, TryFrom)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[try_from(repr)]
pub enum FsXl {
    #[default]
    _2g = 0,
    _16g = 1,
    _4g = 2,
    _8g = 3,
}

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, TryFrom)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[try_from(repr)]
pub enum OdrXl {
    #[default]
    Off = 0,
    _12_5hz = 1,
    _26hz = 2,
    _52hz = 3,
    _104hz = 4,
    _208hz = 5,
    _416hz = 6,
    _833hz = 7,
    _1666hz = 8,
    _3332hz = 9,
    _6667hz = 10,
    _1_6hz = 11,
}

/// Free-fall threshold (FREE_FALL.FF_THS), in mg.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, TryFrom)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[try_from(repr)]
pub enum FfThs {
    #[default]
    _156mg = 0,
    _219mg = 1,
    _250mg = 2,
    _312mg = 3,
    _344mg = 4,
    _406mg = 5,
    _469mg = 6,
    _500mg = 7,
}
