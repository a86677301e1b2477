use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{LayerpressError, LayerpressResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Already-rasterized overlay pixels, straight (non-premultiplied) RGBA8.
pub type Bitmap = image::RgbaImage;

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channel array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Convert into an `image` pixel.
    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba(self.to_array())
    }
}

/// Where on the canvas, and at what rotation, a bitmap is applied.
///
/// Only rotations strictly inside `(0, 360)` rotate; everything else passes through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    /// Counter-clockwise rotation in whole degrees.
    pub rotation_degrees: i32,
    /// Horizontal offset of the bitmap's top-left corner.
    pub x_offset: i32,
    /// Vertical offset of the bitmap's top-left corner.
    pub y_offset: i32,
}

impl Placement {
    /// Create a placement.
    pub fn new(rotation_degrees: i32, x_offset: i32, y_offset: i32) -> Self {
        Self {
            rotation_degrees,
            x_offset,
            y_offset,
        }
    }

    /// Placement at `(x, y)` without rotation.
    pub fn at(x_offset: i32, y_offset: i32) -> Self {
        Self::new(0, x_offset, y_offset)
    }
}

/// Output image container format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// Lossy baseline JPEG.
    Jpeg,
}

impl OutputFormat {
    /// Canonical lowercase name, also used as the output file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// Whether the format can only carry lossy RGB data.
    pub fn is_lossy_rgb_only(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl FromStr for OutputFormat {
    type Err = LayerpressError;

    fn from_str(s: &str) -> LayerpressResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(LayerpressError::config(format!(
                "{other:?} is not a valid output format (expected png or jpeg)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested color space of the output image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Three-channel RGB.
    Rgb,
    /// RGB with alpha.
    #[default]
    Rgba,
    /// Four-channel CMYK; only the external backend can produce it.
    Cmyk,
}

impl ColorSpace {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Cmyk => "cmyk",
        }
    }

    /// Name understood by ImageMagick's `-colorspace` option.
    pub fn magick_name(self) -> &'static str {
        match self {
            Self::Rgb | Self::Rgba => "rgb",
            Self::Cmyk => "cmyk",
        }
    }
}

impl FromStr for ColorSpace {
    type Err = LayerpressError;

    fn from_str(s: &str) -> LayerpressResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(Self::Rgb),
            "rgba" => Ok(Self::Rgba),
            "cmyk" => Ok(Self::Cmyk),
            other => Err(LayerpressError::config(format!(
                "{other:?} is an invalid colorspace (expected rgb, rgba or cmyk)"
            ))),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
