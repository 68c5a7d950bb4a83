//! Shape renderers.

pub(crate) mod common;

pub mod line;

pub use line::LineRenderer;
