use std::path::PathBuf;

use winit::dpi::LogicalSize;

use arbor_engine::device::GpuInit;
use arbor_engine::window::RuntimeConfig;
use arbor_tree::TreeShape;

use crate::controls::Controls;

/// Compile-time root of the studio's runtime assets.
pub const ASSET_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// Studio configuration. Defaults reproduce the stock demo.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub target_fps: u32,

    pub zoom: f32,
    /// Initial branch angle, degrees.
    pub angle: f32,
    /// Trunk length, pixels.
    pub length: f32,
    pub shape: TreeShape,
    pub show_axes: bool,

    pub controls: Controls,
    pub bloom_shader: PathBuf,
    pub gpu: GpuInit,
}

impl StudioConfig {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
            resizable: false,
            target_fps: self.target_fps,
        }
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            title: "Fractal Tree".to_string(),
            width: 1280.0,
            height: 720.0,
            target_fps: 60,
            zoom: 0.5,
            angle: 30.0,
            length: 350.0,
            shape: TreeShape::default(),
            show_axes: false,
            controls: Controls::default(),
            bloom_shader: PathBuf::from(ASSET_ROOT).join("shaders").join("bloom.wgsl"),
            gpu: GpuInit {
                // Colors are authored as sRGB bytes and written as-is.
                prefer_srgb: false,
                ..GpuInit::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_fixed_size() {
        let rc = StudioConfig::default().runtime_config();
        assert!(!rc.resizable);
        assert_eq!(rc.initial_size, LogicalSize::new(1280.0, 720.0));
        assert_eq!(rc.target_fps, 60);
    }

    #[test]
    fn bloom_shader_ships_with_the_crate() {
        let path = StudioConfig::default().bloom_shader;
        assert!(path.ends_with("assets/shaders/bloom.wgsl"));
        assert!(path.is_file(), "missing {}", path.display());
    }
}
