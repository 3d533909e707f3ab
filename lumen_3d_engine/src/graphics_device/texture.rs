/// Texture trait, texture descriptor, and texture info
///
/// A `Texture` is the shared, sampleable attachment a render target hands
/// to later passes. It is held as `Arc<dyn Texture>`: the render target may
/// drop or replace its reference while a pass keeps sampling an older one,
/// and the GPU object is released by whichever holder goes last.

use crate::error::{Error, Result};
use crate::graphics_device::{CompareFunction, TextureHandle};

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// 8-bit RGBA color
    Rgba8,
    /// 16-bit normalized depth
    Depth16,
}

impl TextureFormat {
    /// Returns true for depth formats
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth16)
    }
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    /// Single 2D image
    Tex2D,
    /// Layered 2D image array
    Array2D,
}

/// Minification / magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Addressing mode outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    ClampToEdge,
    Repeat,
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture with no initial data
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// 2D or layered
    pub target: TextureTarget,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of layers (1 for `Tex2D`)
    pub array_layers: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Filter used for both minification and magnification
    pub filter: TextureFilter,
    /// Wrap mode for both S and T
    pub wrap: TextureWrap,
    /// When set, sampling returns a filtered comparison against the stored
    /// depth instead of the raw depth value
    pub compare: Option<CompareFunction>,
    /// Highest mip level the sampler may read (base level is always 0)
    pub max_level: Option<u32>,
}

impl TextureDesc {
    /// Linear-filtered, edge-clamped color texture with no mipmaps
    pub fn color(width: u32, height: u32) -> Self {
        Self {
            target: TextureTarget::Tex2D,
            width,
            height,
            array_layers: 1,
            format: TextureFormat::Rgba8,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::ClampToEdge,
            compare: None,
            max_level: None,
        }
    }

    /// Depth texture sampled through hardware comparison (shadow maps)
    pub fn shadow_depth(
        width: u32,
        height: u32,
        format: TextureFormat,
        compare: CompareFunction,
    ) -> Self {
        Self {
            target: TextureTarget::Tex2D,
            width,
            height,
            array_layers: 1,
            format,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::ClampToEdge,
            compare: Some(compare),
            max_level: None,
        }
    }

    /// Layered variant of `shadow_depth` (cascaded shadow maps)
    pub fn shadow_depth_array(
        width: u32,
        height: u32,
        array_layers: u32,
        format: TextureFormat,
        compare: CompareFunction,
    ) -> Self {
        Self {
            target: TextureTarget::Array2D,
            array_layers,
            max_level: Some(1),
            ..Self::shadow_depth(width, height, format, compare)
        }
    }

    /// The info a texture created from this descriptor reports
    pub fn info(&self) -> TextureInfo {
        TextureInfo {
            target: self.target,
            width: self.width,
            height: self.height,
            array_layers: self.array_layers,
            format: self.format,
        }
    }
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// 2D or layered
    pub target: TextureTarget,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of layers (1 = simple 2D texture)
    pub array_layers: u32,
    /// Pixel format
    pub format: TextureFormat,
}

impl TextureInfo {
    /// Returns true if this texture is a texture array
    pub fn is_array(&self) -> bool {
        self.target == TextureTarget::Array2D
    }
}

// ===== TEXTURE SUBSTRATE =====

/// Backend-resident storage behind a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSubstrate {
    /// Name of the backend that owns the GPU object
    pub backend: &'static str,
    /// 2D or layered
    pub target: TextureTarget,
    /// Backend object name
    pub handle: TextureHandle,
}

impl TextureSubstrate {
    /// Get the backend handle if the substrate belongs to `backend`
    ///
    /// # Errors
    ///
    /// Returns `Error::WrongBackend` if the texture was created by another
    /// backend and cannot be attached to this device's framebuffers.
    pub fn handle_for(&self, backend: &'static str) -> Result<TextureHandle> {
        if self.backend != backend {
            return Err(Error::WrongBackend {
                expected: backend,
                found: self.backend,
            });
        }
        Ok(self.handle)
    }
}

// ===== TEXTURE TRAIT =====

/// Texture attachment trait
///
/// Implemented by backend-specific texture wrappers. The GPU texture is
/// released when the last reference is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Get the backend storage of this texture
    fn substrate(&self) -> TextureSubstrate;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
