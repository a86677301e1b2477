//! Input decoding: images, SVG, fonts and color strings.

pub mod color;
pub mod decode;
pub mod fonts;
pub mod svg_raster;
