pub use crate::register::main::*;
pub use crate::register::{EventSources, PinInt1Route, PinInt2Route};
