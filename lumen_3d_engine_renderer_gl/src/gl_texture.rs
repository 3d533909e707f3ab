/// Texture - OpenGL implementation of the Texture trait

use std::sync::{Mutex, PoisonError, Weak};
use std::thread::{self, ThreadId};
use glow::HasContext;
use lumen_3d_engine::lumen3d::render::{Texture, TextureHandle, TextureInfo, TextureSubstrate};
use crate::gl_graphics_device::{GlContext, GL_BACKEND_NAME};

/// OpenGL texture attachment
///
/// Deletes the GL texture when the last reference is dropped. If the
/// context is already gone the name died with it and nothing is deleted.
/// A drop on any thread other than the render thread only queues the
/// name; the device deletes it on its next framebuffer bind or texture
/// creation.
pub struct GlTexture {
    /// GL texture name
    pub(crate) handle: TextureHandle,
    /// Owning context (for cleanup)
    pub(crate) gl: Weak<GlContext>,
    /// Read-only texture properties
    pub(crate) info: TextureInfo,
}

impl Texture for GlTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn substrate(&self) -> TextureSubstrate {
        TextureSubstrate {
            backend: GL_BACKEND_NAME,
            target: self.info.target,
            handle: self.handle,
        }
    }
}

impl Drop for GlTexture {
    fn drop(&mut self) {
        let Some(gl) = self.gl.upgrade() else {
            return;
        };
        if gl.delete_queue().defer_off_render_thread(self.handle) {
            return;
        }
        unsafe {
            gl.delete_texture(glow::NativeTexture(self.handle.0));
        }
    }
}

// ============================================================================
// TextureDeleteQueue
// ============================================================================

/// Texture names released away from the render thread
pub(crate) struct TextureDeleteQueue {
    render_thread: ThreadId,
    pending: Mutex<Vec<TextureHandle>>,
}

impl TextureDeleteQueue {
    /// Queue owned by the calling thread
    pub(crate) fn new() -> Self {
        Self {
            render_thread: thread::current().id(),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Queue `handle` unless called on the render thread
    ///
    /// Returns true if the handle was queued, false if the caller must
    /// delete it now.
    pub(crate) fn defer_off_render_thread(&self, handle: TextureHandle) -> bool {
        if thread::current().id() == self.render_thread {
            return false;
        }
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).push(handle);
        true
    }

    /// Take every queued handle
    pub(crate) fn take_pending(&self) -> Vec<TextureHandle> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
#[path = "gl_texture_tests.rs"]
mod tests;
