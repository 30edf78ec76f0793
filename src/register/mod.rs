pub mod main;

use super::prelude::*;

/// Basic-interrupt routing on INT1: data events and the MD1_CFG events.
#[derive(Default, Clone, Copy)]
pub struct PinInt1Route {
    pub int1_ctrl: Int1Ctrl,
    pub md1_cfg: Md1Cfg,
}

/// Basic-interrupt routing on INT2: data events and the MD2_CFG events.
#[derive(Default, Clone, Copy)]
pub struct PinInt2Route {
    pub int2_ctrl: Int2Ctrl,
    pub md2_cfg: Md2Cfg,
}

/// Event source registers read in one go by [`crate::Ism330dhcx::event_sources_get`].
#[derive(Default, Clone, Copy)]
pub struct EventSources {
    pub wake_up_src: WakeUpSrc,
    pub tap_src: TapSrc,
    pub d6d_src: D6dSrc,
}
