mod gamma;
mod order;

pub use gamma::{GammaTable, gamma_correct};
pub use order::ChannelOrder;
use smart_leds::RGB8;

pub type Rgb = RGB8;
