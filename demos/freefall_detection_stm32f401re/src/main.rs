#![no_main]
#![no_std]

use core::fmt::Write;

use ism330dhcx_freefall::{
    Accelerometer, DetectionFlag, ErrorCode, FreeFallDetection, FREEFALL_DETECTION_ADDRESS,
};
use panic_itm as _;

use cortex_m_rt::entry;
use stm32f4xx_hal::{
    hal::delay::DelayNs,
    i2c::{DutyCycle, I2c, Mode},
    pac::{self},
    prelude::*,
    serial::Config,
};

static FREE_FALL: DetectionFlag = DetectionFlag::new();

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.MHz()).sysclk(48.MHz()).freeze();

    let mut delay = cp.SYST.delay(&clocks);

    let gpiob = dp.GPIOB.split();
    let gpioa = dp.GPIOA.split();

    let scl = gpiob.pb8;
    let sda = gpiob.pb9;
    // ISM330DHCX INT1 on the expansion board
    let int1 = gpiob.pb5.into_pull_down_input();

    let i2c = I2c::new(
        dp.I2C1,
        (scl, sda),
        Mode::Fast {
            frequency: 400.kHz(),
            duty_cycle: DutyCycle::Ratio2to1,
        },
        &clocks,
    );

    let tx_pin = gpioa.pa2.into_alternate();
    let mut tx = dp
        .USART2
        .tx(
            tx_pin,
            Config::default()
                .baudrate(115200.bps())
                .wordlength_8()
                .parity_none(),
            &clocks,
        )
        .unwrap();

    delay.delay_ms(5);

    let sensor = Accelerometer::new_i2c(i2c, FREEFALL_DETECTION_ADDRESS, delay);
    let mut detection = FreeFallDetection::new(sensor, &FREE_FALL);

    let result = detection.init();
    if let Err(e) = &result {
        writeln!(
            tx,
            "Free-fall init failed (code {}): {e}",
            ErrorCode::from_result(&result).as_i32()
        )
        .unwrap();
        panic!("no free-fall detection");
    }

    loop {
        // Poll the INT1 line, the handler acknowledges the event
        if int1.is_high() {
            detection.handler();
        }

        if FREE_FALL.is_set() {
            writeln!(tx, "Free fall detected").unwrap();
            detection.set_state(0);
        }

        detection.sensor_mut().driver_mut().tim.delay_ms(1);
    }
}
