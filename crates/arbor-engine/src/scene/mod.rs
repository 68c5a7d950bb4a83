//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands in submission order
//! - keep shape-specific helpers isolated per shape file under `scene::shapes`

mod cmd;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::DrawList;
