//! Run configuration documents and overlay value templating.

pub mod model;
pub mod template;
