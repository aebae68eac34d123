//! The color model this decoder understands, and the derived pixel-format
//! tag exposed on the decoder handle.

/// The four PNG color types this decoder supports. Palette images (color
/// type 3) are not handled; see `DecoderOptions`/Non-goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Grey,
    Rgb,
    GreyAlpha,
    Rgba,
}

impl ColorType {
    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(ColorType::Grey),
            2 => Some(ColorType::Rgb),
            4 => Some(ColorType::GreyAlpha),
            6 => Some(ColorType::Rgba),
            _ => None,
        }
    }

    pub fn channels(self) -> u32 {
        match self {
            ColorType::Grey => 1,
            ColorType::GreyAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }
}

/// Color type plus bit depth, collapsed into the handful of concrete pixel
/// layouts this decoder produces. `BadFormat` covers every depth/color-type
/// pairing `get_format` has no better name for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Grey1,
    Grey2,
    Grey4,
    Grey8,
    Rgb8,
    GreyAlpha1,
    GreyAlpha2,
    GreyAlpha4,
    GreyAlpha8,
    Rgba8,
    BadFormat,
}

pub(crate) fn pixel_format(color: ColorType, depth: u8) -> PixelFormat {
    match (color, depth) {
        (ColorType::Grey, 1) => PixelFormat::Grey1,
        (ColorType::Grey, 2) => PixelFormat::Grey2,
        (ColorType::Grey, 4) => PixelFormat::Grey4,
        (ColorType::Grey, 8) => PixelFormat::Grey8,
        (ColorType::Rgb, 8) => PixelFormat::Rgb8,
        (ColorType::GreyAlpha, 1) => PixelFormat::GreyAlpha1,
        (ColorType::GreyAlpha, 2) => PixelFormat::GreyAlpha2,
        (ColorType::GreyAlpha, 4) => PixelFormat::GreyAlpha4,
        (ColorType::GreyAlpha, 8) => PixelFormat::GreyAlpha8,
        (ColorType::Rgba, 8) => PixelFormat::Rgba8,
        _ => PixelFormat::BadFormat,
    }
}
