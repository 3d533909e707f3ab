/// Render target configuration
///
/// Formats and defaults applied when a render target builds its GPU
/// resources. A `TargetManager` carries one config and hands it to every
/// target it creates.

use glam::Vec4;
use crate::graphics_device::{CompareFunction, RenderbufferFormat, TextureFormat};

/// Formats and defaults for render target creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetConfig {
    /// Initial clear color of new targets
    pub clear_color: Vec4,
    /// Format of color renderbuffers (renderbuffer targets and the
    /// placeholder color buffer of depth targets)
    pub color_format: RenderbufferFormat,
    /// Format of the combined depth/stencil renderbuffer
    pub depth_stencil_format: RenderbufferFormat,
    /// Format of depth textures (shadow maps)
    pub depth_texture_format: TextureFormat,
    /// Comparison used when sampling depth textures
    pub shadow_compare: CompareFunction,
    /// Stencil mask with every bit set (8-bit stencil)
    pub full_stencil_mask: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            color_format: RenderbufferFormat::Rgba8,
            depth_stencil_format: RenderbufferFormat::Depth24Stencil8,
            depth_texture_format: TextureFormat::Depth16,
            shadow_compare: CompareFunction::LessEqual,
            full_stencil_mask: 0xFF,
        }
    }
}
