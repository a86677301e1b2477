//! Compositing: the native canvas, rotation, and the two interchangeable backends.

pub mod backend;
pub mod composite;
pub mod magick;
pub mod native;
pub mod rotate;
