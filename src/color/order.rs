//! Device channel order
//!
//! APA102-style strips differ in which color each of the three data bytes
//! drives. The order is named the way the wire sees it: `"bgr"` means the
//! first color byte after the `0xFF` marker is blue.

use crate::color::Rgb;

const ORDER_NAME_RGB: &str = "rgb";
const ORDER_NAME_RBG: &str = "rbg";
const ORDER_NAME_GRB: &str = "grb";
const ORDER_NAME_GBR: &str = "gbr";
const ORDER_NAME_BRG: &str = "brg";
const ORDER_NAME_BGR: &str = "bgr";

/// Byte order of the three color channels within a pixel group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    #[default]
    Bgr,
}

impl ChannelOrder {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ORDER_NAME_RGB => Some(Self::Rgb),
            ORDER_NAME_RBG => Some(Self::Rbg),
            ORDER_NAME_GRB => Some(Self::Grb),
            ORDER_NAME_GBR => Some(Self::Gbr),
            ORDER_NAME_BRG => Some(Self::Brg),
            ORDER_NAME_BGR => Some(Self::Bgr),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => ORDER_NAME_RGB,
            Self::Rbg => ORDER_NAME_RBG,
            Self::Grb => ORDER_NAME_GRB,
            Self::Gbr => ORDER_NAME_GBR,
            Self::Brg => ORDER_NAME_BRG,
            Self::Bgr => ORDER_NAME_BGR,
        }
    }

    /// Wire positions of the red, green and blue channel
    pub const fn indices(self) -> [usize; 3] {
        match self {
            Self::Rgb => [0, 1, 2],
            Self::Rbg => [0, 2, 1],
            Self::Grb => [1, 0, 2],
            Self::Gbr => [2, 0, 1],
            Self::Brg => [1, 2, 0],
            Self::Bgr => [2, 1, 0],
        }
    }

    /// Arrange a color into wire order
    pub const fn arrange(self, color: Rgb) -> [u8; 3] {
        let [red, green, blue] = self.indices();
        let mut out = [0; 3];
        out[red] = color.r;
        out[green] = color.g;
        out[blue] = color.b;
        out
    }

    /// Inverse of [`ChannelOrder::arrange`]
    pub const fn unpack(self, bytes: [u8; 3]) -> Rgb {
        let [red, green, blue] = self.indices();
        Rgb {
            r: bytes[red],
            g: bytes[green],
            b: bytes[blue],
        }
    }
}
