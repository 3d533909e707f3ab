/// GraphicsDevice - OpenGL implementation of the GraphicsDevice trait
///
/// Thin translation layer over `glow`. Every command acts on the context's
/// current framebuffer binding, exactly like the GL calls it issues.

use std::ops::Deref;
use std::sync::Arc;
use glow::HasContext;
use lumen_3d_engine::glam::Vec4;
use lumen_3d_engine::lumen3d::{Error, Result};
use lumen_3d_engine::lumen3d::render::{
    AttachmentPoint, ClearMask, CompareFunction, FramebufferHandle, FramebufferStatus,
    GraphicsDevice, RenderbufferFormat, RenderbufferHandle, StencilFace, StencilOps, Texture,
    TextureDesc, TextureHandle, TextureInfo, TextureTarget,
};
use lumen_3d_engine::lumen3d::target::Viewport;
use lumen_3d_engine::{engine_debug, engine_err, engine_error, engine_trace};
use crate::gl_format::{
    attachment_to_gl, clear_mask_to_gl, compare_function_to_gl, framebuffer_status_from_gl,
    renderbuffer_format_to_gl, stencil_face_to_gl, stencil_op_to_gl, texture_filter_to_gl,
    texture_format_to_gl, texture_target_to_gl, texture_wrap_to_gl,
};
use crate::gl_texture::{GlTexture, TextureDeleteQueue};

/// Backend name stamped on every texture this device creates
pub const GL_BACKEND_NAME: &str = "opengl";

/// GL keeps at most one pending flag per error kind
const MAX_PENDING_ERRORS: usize = 8;

/// glow context shared by the device and the textures it creates
///
/// The thread that builds the device is the render thread. Textures
/// released anywhere else are queued and deleted there.
pub struct GlContext {
    gl: glow::Context,
    deletes: TextureDeleteQueue,
}

// SAFETY: GL calls are only issued on the render thread; other threads can
// only push onto the delete queue, which is behind a Mutex
unsafe impl Send for GlContext {}
unsafe impl Sync for GlContext {}

impl GlContext {
    pub(crate) fn delete_queue(&self) -> &TextureDeleteQueue {
        &self.deletes
    }
}

impl Deref for GlContext {
    type Target = glow::Context;

    fn deref(&self) -> &glow::Context {
        &self.gl
    }
}

/// OpenGL graphics device
pub struct GlGraphicsDevice {
    gl: Arc<GlContext>,
}

impl GlGraphicsDevice {
    /// Wrap a current GL context (ES 3.0 / GL 3.3 core or later)
    pub fn new(context: glow::Context) -> Self {
        #[cfg(feature = "gl-debug")]
        let context = {
            let mut context = context;
            crate::gl_debug::install_debug_callback(&mut context);
            context
        };

        Self {
            gl: Arc::new(GlContext {
                gl: context,
                deletes: TextureDeleteQueue::new(),
            }),
        }
    }

    /// Raw glow context, for draw code living outside the engine
    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    /// Reset the GL error flags before an allocation
    ///
    /// Flags left pending by unrelated calls (application draw code) would
    /// otherwise be blamed on the allocation.
    fn drain_stale_errors(&self) {
        let stale = drain_error_queue(|| unsafe { self.gl.get_error() });
        if !stale.is_empty() {
            engine_debug!("lumen3d::gl", "Discarded {} stale GL error flag(s): {:04X?}", stale.len(), stale);
        }
    }

    /// Detect GL_OUT_OF_MEMORY after an allocation
    fn check_allocation(&self, what: &str) -> Result<()> {
        allocation_result(unsafe { self.gl.get_error() }, what)
    }

    /// Delete the textures whose last reference was dropped off the render
    /// thread
    fn flush_deferred_deletes(&self) {
        for handle in self.gl.delete_queue().take_pending() {
            unsafe { self.gl.delete_texture(native_texture(handle)) }
        }
    }
}

/// Read error flags until GL reports none, bounded in case the context is
/// lost and keeps returning the same flag
pub(crate) fn drain_error_queue(mut next_error: impl FnMut() -> u32) -> Vec<u32> {
    let mut drained = Vec::new();
    while drained.len() < MAX_PENDING_ERRORS {
        match next_error() {
            glow::NO_ERROR => break,
            error => drained.push(error),
        }
    }
    drained
}

/// Map the error flag read right after an allocation
pub(crate) fn allocation_result(error: u32, what: &str) -> Result<()> {
    match error {
        glow::NO_ERROR => Ok(()),
        glow::OUT_OF_MEMORY => {
            engine_error!("lumen3d::gl", "Out of memory allocating {}", what);
            Err(Error::OutOfMemory)
        }
        other => Err(engine_err!("lumen3d::gl", "GL error 0x{:04X} allocating {}", other, what)),
    }
}

fn native_framebuffer(handle: FramebufferHandle) -> glow::NativeFramebuffer {
    glow::NativeFramebuffer(handle.0)
}

fn native_renderbuffer(handle: RenderbufferHandle) -> glow::NativeRenderbuffer {
    glow::NativeRenderbuffer(handle.0)
}

fn native_texture(handle: TextureHandle) -> glow::NativeTexture {
    glow::NativeTexture(handle.0)
}

impl GraphicsDevice for GlGraphicsDevice {
    fn backend_name(&self) -> &'static str {
        GL_BACKEND_NAME
    }

    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&mut self) -> Result<FramebufferHandle> {
        let framebuffer = unsafe { self.gl.create_framebuffer() }
            .map_err(|e| engine_err!("lumen3d::gl", "Failed to create framebuffer: {}", e))?;
        engine_trace!("lumen3d::gl", "glGenFramebuffers -> {}", framebuffer.0);
        Ok(FramebufferHandle(framebuffer.0))
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        unsafe { self.gl.delete_framebuffer(native_framebuffer(framebuffer)) }
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.flush_deferred_deletes();
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer.map(native_framebuffer)) }
    }

    fn check_framebuffer_status(&mut self) -> FramebufferStatus {
        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        framebuffer_status_from_gl(status)
    }

    // ===== RENDERBUFFERS =====

    fn create_renderbuffer(&mut self, format: RenderbufferFormat, width: u32, height: u32) -> Result<RenderbufferHandle> {
        let renderbuffer = unsafe { self.gl.create_renderbuffer() }
            .map_err(|e| engine_err!("lumen3d::gl", "Failed to create renderbuffer: {}", e))?;

        self.drain_stale_errors();
        unsafe {
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
            self.gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                renderbuffer_format_to_gl(format),
                width as i32,
                height as i32,
            );
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        }

        if let Err(e) = self.check_allocation("renderbuffer") {
            unsafe { self.gl.delete_renderbuffer(renderbuffer) };
            return Err(e);
        }
        Ok(RenderbufferHandle(renderbuffer.0))
    }

    fn destroy_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        unsafe { self.gl.delete_renderbuffer(native_renderbuffer(renderbuffer)) }
    }

    fn attach_renderbuffer(&mut self, point: AttachmentPoint, renderbuffer: Option<RenderbufferHandle>) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                attachment_to_gl(point),
                glow::RENDERBUFFER,
                renderbuffer.map(native_renderbuffer),
            );
        }
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        self.flush_deferred_deletes();
        let texture = unsafe { self.gl.create_texture() }
            .map_err(|e| engine_err!("lumen3d::gl", "Failed to create texture: {}", e))?;

        let target = texture_target_to_gl(desc.target);
        let format = texture_format_to_gl(desc.format);
        let filter = texture_filter_to_gl(desc.filter);
        let wrap = texture_wrap_to_gl(desc.wrap);

        self.drain_stale_errors();
        unsafe {
            self.gl.bind_texture(target, Some(texture));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, filter);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, filter);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, wrap);
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, wrap);

            if let Some(compare) = desc.compare {
                self.gl.tex_parameter_i32(target, glow::TEXTURE_COMPARE_MODE, glow::COMPARE_REF_TO_TEXTURE as i32);
                self.gl.tex_parameter_i32(target, glow::TEXTURE_COMPARE_FUNC, compare_function_to_gl(compare) as i32);
            }
            if let Some(max_level) = desc.max_level {
                self.gl.tex_parameter_i32(target, glow::TEXTURE_BASE_LEVEL, 0);
                self.gl.tex_parameter_i32(target, glow::TEXTURE_MAX_LEVEL, max_level as i32);
            }

            match desc.target {
                TextureTarget::Tex2D => self.gl.tex_image_2d(
                    target,
                    0,
                    format.internal_format as i32,
                    desc.width as i32,
                    desc.height as i32,
                    0,
                    format.format,
                    format.ty,
                    None,
                ),
                TextureTarget::Array2D => self.gl.tex_image_3d(
                    target,
                    0,
                    format.internal_format as i32,
                    desc.width as i32,
                    desc.height as i32,
                    desc.array_layers as i32,
                    0,
                    format.format,
                    format.ty,
                    None,
                ),
            }
            self.gl.bind_texture(target, None);
        }

        if let Err(e) = self.check_allocation("texture") {
            unsafe { self.gl.delete_texture(texture) };
            return Err(e);
        }
        Ok(TextureHandle(texture.0))
    }

    fn wrap_texture(&mut self, handle: TextureHandle, info: TextureInfo) -> Arc<dyn Texture> {
        Arc::new(GlTexture {
            handle,
            gl: Arc::downgrade(&self.gl),
            info,
        })
    }

    fn attach_texture_2d(&mut self, point: AttachmentPoint, texture: Option<TextureHandle>) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment_to_gl(point),
                glow::TEXTURE_2D,
                texture.map(native_texture),
                0,
            );
        }
    }

    fn attach_texture_layer(&mut self, point: AttachmentPoint, texture: Option<TextureHandle>, layer: u32) {
        unsafe {
            self.gl.framebuffer_texture_layer(
                glow::FRAMEBUFFER,
                attachment_to_gl(point),
                texture.map(native_texture),
                0,
                layer as i32,
            );
        }
    }

    // ===== RASTER STATE =====

    fn set_viewport(&mut self, viewport: Viewport) {
        unsafe { self.gl.viewport(viewport.x, viewport.y, viewport.width, viewport.height) }
    }

    fn set_scissor(&mut self, rect: Viewport) {
        unsafe {
            self.gl.enable(glow::SCISSOR_TEST);
            self.gl.scissor(rect.x, rect.y, rect.width, rect.height);
        }
    }

    fn set_depth_write_mask(&mut self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) }
    }

    fn set_color_write_mask(&mut self, enabled: bool) {
        unsafe { self.gl.color_mask(enabled, enabled, enabled, enabled) }
    }

    // ===== CLEARS =====

    fn set_clear_color(&mut self, color: Vec4) {
        unsafe { self.gl.clear_color(color.x, color.y, color.z, color.w) }
    }

    fn set_clear_stencil(&mut self, value: i32) {
        unsafe { self.gl.clear_stencil(value) }
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_mask_to_gl(mask)) }
    }

    // ===== STENCIL =====

    fn set_stencil_op(&mut self, face: StencilFace, ops: StencilOps) {
        unsafe {
            self.gl.stencil_op_separate(
                stencil_face_to_gl(face),
                stencil_op_to_gl(ops.stencil_fail),
                stencil_op_to_gl(ops.depth_fail),
                stencil_op_to_gl(ops.depth_pass),
            );
        }
    }

    fn set_stencil_write_mask(&mut self, face: StencilFace, mask: u32) {
        unsafe { self.gl.stencil_mask_separate(stencil_face_to_gl(face), mask) }
    }

    fn set_stencil_func(&mut self, face: StencilFace, func: CompareFunction, reference: i32, read_mask: u32) {
        unsafe {
            self.gl.stencil_func_separate(
                stencil_face_to_gl(face),
                compare_function_to_gl(func),
                reference,
                read_mask,
            );
        }
    }
}

#[cfg(test)]
#[path = "gl_graphics_device_tests.rs"]
mod tests;
