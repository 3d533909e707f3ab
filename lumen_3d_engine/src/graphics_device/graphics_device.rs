/// GraphicsDevice and Driver traits - the backend capability interface
///
/// The core never talks to a graphics API directly. Render targets issue
/// their work through a `Driver`, which owns the graphics context and
/// exposes the GL-like `GraphicsDevice` command surface.

use std::sync::{Arc, Mutex, Weak};
use glam::Vec4;
use crate::error::Result;
use crate::graphics_device::{
    AttachmentPoint, ClearMask, CompareFunction, FramebufferHandle, FramebufferStatus,
    RenderbufferFormat, RenderbufferHandle, StencilFace, StencilOps, Texture, TextureDesc,
    TextureHandle, TextureInfo,
};
use crate::target::Viewport;

/// Shared driver reference owned by the application
pub type DriverHandle = Arc<Mutex<dyn Driver>>;

/// Non-owning driver reference held by render targets
///
/// Upgrading fails once the application has dropped the driver (context
/// teardown, app suspension); every user must treat that as "no context".
pub type WeakDriverHandle = Weak<Mutex<dyn Driver>>;

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// GL-like command interface of a graphics backend
///
/// Commands act on the currently bound framebuffer, mirroring the
/// bind-then-modify model of OpenGL. All calls happen on the render thread.
pub trait GraphicsDevice: Send {
    /// Short backend identifier (e.g. "opengl"), stamped on every texture
    /// substrate this device creates
    fn backend_name(&self) -> &'static str;

    // ===== FRAMEBUFFERS =====

    /// Create an empty framebuffer object
    fn create_framebuffer(&mut self) -> Result<FramebufferHandle>;

    /// Delete a framebuffer object
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle);

    /// Bind a framebuffer as draw and read destination (`None` = default)
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>);

    /// Query completeness of the bound framebuffer
    fn check_framebuffer_status(&mut self) -> FramebufferStatus;

    // ===== RENDERBUFFERS =====

    /// Create a renderbuffer with allocated storage
    fn create_renderbuffer(
        &mut self,
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    ) -> Result<RenderbufferHandle>;

    /// Delete a renderbuffer
    fn destroy_renderbuffer(&mut self, renderbuffer: RenderbufferHandle);

    /// Attach a renderbuffer to a slot of the bound framebuffer (`None` detaches)
    fn attach_renderbuffer(&mut self, point: AttachmentPoint, renderbuffer: Option<RenderbufferHandle>);

    // ===== TEXTURES =====

    /// Create a texture with allocated storage and no initial data
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle>;

    /// Wrap a raw texture name into a shared texture attachment
    ///
    /// The returned texture takes ownership of the GPU object and releases
    /// it when the last reference is dropped.
    fn wrap_texture(&mut self, handle: TextureHandle, info: TextureInfo) -> Arc<dyn Texture>;

    /// Attach a 2D texture (mip 0) to a slot of the bound framebuffer
    fn attach_texture_2d(&mut self, point: AttachmentPoint, texture: Option<TextureHandle>);

    /// Attach one layer of an array texture (mip 0) to a slot of the bound
    /// framebuffer
    fn attach_texture_layer(&mut self, point: AttachmentPoint, texture: Option<TextureHandle>, layer: u32);

    // ===== RASTER STATE =====

    /// Set the drawable rectangle
    fn set_viewport(&mut self, viewport: Viewport);

    /// Set the scissor (clip) rectangle
    fn set_scissor(&mut self, rect: Viewport);

    /// Enable/disable writes to the depth buffer
    fn set_depth_write_mask(&mut self, enabled: bool);

    /// Enable/disable writes to all color channels
    fn set_color_write_mask(&mut self, enabled: bool);

    // ===== CLEARS =====

    /// Value written by a color clear
    fn set_clear_color(&mut self, color: Vec4);

    /// Value written by a stencil clear
    fn set_clear_stencil(&mut self, value: i32);

    /// Clear the selected buffers of the bound framebuffer (masked by the
    /// current write masks)
    fn clear(&mut self, mask: ClearMask);

    // ===== STENCIL =====

    /// Set the stencil actions for a face
    fn set_stencil_op(&mut self, face: StencilFace, ops: StencilOps);

    /// Set which stencil bits may be written for a face
    fn set_stencil_write_mask(&mut self, face: StencilFace, mask: u32);

    /// Set the stencil test for a face
    fn set_stencil_func(&mut self, face: StencilFace, func: CompareFunction, reference: i32, read_mask: u32);
}

// ============================================================================
// Driver trait
// ============================================================================

/// Graphics driver capability
///
/// Owns the graphics context. Caches the depth/color write state so
/// redundant toggles never reach the backend.
pub trait Driver: Send {
    /// Enable/disable depth writes (forwarded only on change)
    fn set_depth_writing_enabled(&mut self, enabled: bool);

    /// Enable/disable color writes (forwarded only on change)
    fn set_color_writing_enabled(&mut self, enabled: bool);

    /// Access the command interface of this driver's context
    fn graphics_device(&mut self) -> &mut dyn GraphicsDevice;
}
