/// Mock graphics device for unit tests (no GPU required)
///
/// Records every call, tracks the objects it hands out, computes framebuffer
/// completeness from the attachments, and emulates the stencil buffer so the
/// portal protocol can be checked pixel by pixel.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, Weak};
use glam::Vec4;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::graphics_device::{
    AttachmentPoint, ClearMask, CompareFunction, Driver, DriverHandle, FramebufferHandle,
    FramebufferStatus, GraphicsDevice, RenderbufferFormat, RenderbufferHandle, StencilFace,
    StencilOp, StencilOps, Texture, TextureDesc, TextureHandle, TextureInfo, TextureSubstrate,
};
use crate::target::Viewport;

pub const MOCK_BACKEND: &str = "mock";

// ============================================================================
// GPU state
// ============================================================================

/// Image bound to a framebuffer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAttachment {
    Renderbuffer(RenderbufferHandle),
    Texture { handle: TextureHandle, layer: Option<u32> },
}

#[derive(Debug, Clone, Default)]
pub struct MockFramebuffer {
    pub color: Option<MockAttachment>,
    pub depth: Option<MockAttachment>,
    pub stencil: Option<MockAttachment>,
    /// Last color actually written by a clear
    pub cleared_color: Option<Vec4>,
    /// Number of depth clears that reached the buffer
    pub depth_clears: usize,
}

#[derive(Debug, Clone)]
pub struct MockRenderbuffer {
    pub format: RenderbufferFormat,
    pub width: u32,
    pub height: u32,
    /// One stencil byte per pixel, row-major from the bottom-left
    pub stencil: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockStencilState {
    pub ops: StencilOps,
    pub write_mask: u32,
    pub func: CompareFunction,
    pub reference: i32,
    pub read_mask: u32,
}

impl Default for MockStencilState {
    fn default() -> Self {
        Self {
            ops: StencilOps::keep(),
            write_mask: 0xFF,
            func: CompareFunction::Always,
            reference: 0,
            read_mask: 0xFF,
        }
    }
}

/// Everything the mock device knows, shared with the test through an
/// `Arc<Mutex<_>>`
#[derive(Debug)]
pub struct MockGpu {
    next_name: u32,
    pub calls: Vec<&'static str>,
    pub framebuffers: FxHashMap<FramebufferHandle, MockFramebuffer>,
    pub renderbuffers: FxHashMap<RenderbufferHandle, MockRenderbuffer>,
    pub textures: FxHashMap<TextureHandle, TextureDesc>,
    pub bound_framebuffer: Option<FramebufferHandle>,
    pub viewport: Viewport,
    pub scissor: Viewport,
    pub depth_write: bool,
    pub color_write: bool,
    pub clear_color: Vec4,
    pub clear_stencil: i32,
    pub front: MockStencilState,
    pub back: MockStencilState,
    /// Status reported instead of the computed one
    pub force_status: Option<FramebufferStatus>,
    /// Report `MissingAttachment` for framebuffers without a color image
    pub require_color_attachment: bool,
    /// Make `create_renderbuffer` fail with `OutOfMemory`
    pub fail_renderbuffer_creation: bool,
}

impl Default for MockGpu {
    fn default() -> Self {
        Self {
            next_name: 1,
            calls: Vec::new(),
            framebuffers: FxHashMap::default(),
            renderbuffers: FxHashMap::default(),
            textures: FxHashMap::default(),
            bound_framebuffer: None,
            viewport: Viewport::default(),
            scissor: Viewport::default(),
            depth_write: true,
            color_write: true,
            clear_color: Vec4::ZERO,
            clear_stencil: 0,
            front: MockStencilState::default(),
            back: MockStencilState::default(),
            force_status: None,
            require_color_attachment: false,
            fail_renderbuffer_creation: false,
        }
    }
}

impl MockGpu {
    fn next_name(&mut self) -> NonZeroU32 {
        let name = NonZeroU32::new(self.next_name).expect("mock name counter overflow");
        self.next_name += 1;
        name
    }

    /// Number of times `call` was issued
    pub fn call_count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// Framebuffers, renderbuffers, and textures currently alive
    pub fn live_object_count(&self) -> usize {
        self.framebuffers.len() + self.renderbuffers.len() + self.textures.len()
    }

    fn stencil_state(&self, face: StencilFace) -> &MockStencilState {
        if face.includes_front() { &self.front } else { &self.back }
    }

    fn bound_stencil_buffer(&mut self) -> Option<&mut MockRenderbuffer> {
        let framebuffer = self.framebuffers.get(self.bound_framebuffer.as_ref()?)?;
        match framebuffer.stencil? {
            MockAttachment::Renderbuffer(handle) => self.renderbuffers.get_mut(&handle),
            MockAttachment::Texture { .. } => None,
        }
    }

    /// Stored stencil value at (x, y) of the bound framebuffer
    pub fn stencil_at(&mut self, x: u32, y: u32) -> Option<u8> {
        let buffer = self.bound_stencil_buffer()?;
        if x >= buffer.width || y >= buffer.height {
            return None;
        }
        Some(buffer.stencil[(y * buffer.width + x) as usize])
    }

    /// Would a fragment of `face` at (x, y) pass the current stencil test?
    pub fn stencil_test_passes(&mut self, face: StencilFace, x: u32, y: u32) -> bool {
        let state = *self.stencil_state(face);
        let Some(stored) = self.stencil_at(x, y) else {
            return true;
        };
        let reference = state.reference.clamp(0, 0xFF) as u32;
        state.func.compare(reference & state.read_mask, stored as u32 & state.read_mask)
    }

    /// Rasterize a rectangle of `face` fragments into the bound framebuffer,
    /// applying the current stencil test and actions
    ///
    /// `depth_pass` selects between the depth-pass and depth-fail actions for
    /// fragments that pass the stencil test. Returns the number of fragments
    /// that passed both tests.
    pub fn rasterize(&mut self, face: StencilFace, region: Viewport, depth_pass: bool) -> usize {
        let state = *self.stencil_state(face);
        let scissor = self.scissor;
        let Some(buffer) = self.bound_stencil_buffer() else {
            return 0;
        };
        let reference = state.reference.clamp(0, 0xFF) as u32;

        let mut passed = 0;
        for y in 0..buffer.height as i32 {
            for x in 0..buffer.width as i32 {
                if !region.contains(x, y) || !scissor.contains(x, y) {
                    continue;
                }
                let index = (y as u32 * buffer.width + x as u32) as usize;
                let stored = buffer.stencil[index] as u32;
                let stencil_pass = state.func.compare(reference & state.read_mask, stored & state.read_mask);
                let op = match (stencil_pass, depth_pass) {
                    (false, _) => state.ops.stencil_fail,
                    (true, false) => state.ops.depth_fail,
                    (true, true) => {
                        passed += 1;
                        state.ops.depth_pass
                    }
                };
                let updated = match op {
                    StencilOp::Keep => stored,
                    StencilOp::Zero => 0,
                    StencilOp::Replace => reference,
                    StencilOp::Increment => (stored + 1).min(0xFF),
                    StencilOp::Decrement => stored.saturating_sub(1),
                };
                let written = (stored & !state.write_mask) | (updated & state.write_mask);
                buffer.stencil[index] = written as u8;
            }
        }
        passed
    }

    fn attachment_size(&self, attachment: MockAttachment, point: AttachmentPoint) -> std::result::Result<(u32, u32), FramebufferStatus> {
        match attachment {
            MockAttachment::Renderbuffer(handle) => {
                let buffer = self.renderbuffers.get(&handle).ok_or(FramebufferStatus::IncompleteAttachment)?;
                let format_ok = match point {
                    AttachmentPoint::Color0 => !buffer.format.has_depth(),
                    AttachmentPoint::Depth => buffer.format.has_depth(),
                    AttachmentPoint::Stencil => buffer.format.has_stencil(),
                };
                if !format_ok {
                    return Err(FramebufferStatus::IncompleteAttachment);
                }
                Ok((buffer.width, buffer.height))
            }
            MockAttachment::Texture { handle, layer } => {
                let desc = self.textures.get(&handle).ok_or(FramebufferStatus::IncompleteAttachment)?;
                let format_ok = match point {
                    AttachmentPoint::Color0 => !desc.format.is_depth(),
                    AttachmentPoint::Depth => desc.format.is_depth(),
                    AttachmentPoint::Stencil => false,
                };
                if !format_ok || layer.unwrap_or(0) >= desc.array_layers {
                    return Err(FramebufferStatus::IncompleteAttachment);
                }
                Ok((desc.width, desc.height))
            }
        }
    }

    /// Completeness of the bound framebuffer
    pub fn compute_status(&self) -> FramebufferStatus {
        if let Some(status) = self.force_status {
            return status;
        }
        let Some(framebuffer) = self.bound_framebuffer.and_then(|fb| self.framebuffers.get(&fb)) else {
            return FramebufferStatus::Complete;
        };

        let slots = [
            (AttachmentPoint::Color0, framebuffer.color),
            (AttachmentPoint::Depth, framebuffer.depth),
            (AttachmentPoint::Stencil, framebuffer.stencil),
        ];
        if slots.iter().all(|(_, attachment)| attachment.is_none()) {
            return FramebufferStatus::MissingAttachment;
        }
        if self.require_color_attachment && framebuffer.color.is_none() {
            return FramebufferStatus::MissingAttachment;
        }

        let mut size = None;
        for (point, attachment) in slots {
            let Some(attachment) = attachment else { continue };
            let current = match self.attachment_size(attachment, point) {
                Ok(current) => current,
                Err(status) => return status,
            };
            match size {
                None => size = Some(current),
                Some(expected) if expected != current => return FramebufferStatus::IncompleteDimensions,
                Some(_) => {}
            }
        }
        FramebufferStatus::Complete
    }
}

// ============================================================================
// MockTexture
// ============================================================================

/// Texture attachment that removes itself from the mock GPU when dropped
pub struct MockTexture {
    info: TextureInfo,
    handle: TextureHandle,
    gpu: Weak<Mutex<MockGpu>>,
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn substrate(&self) -> TextureSubstrate {
        TextureSubstrate {
            backend: MOCK_BACKEND,
            target: self.info.target,
            handle: self.handle,
        }
    }
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        if let Some(gpu) = self.gpu.upgrade() {
            if let Ok(mut gpu) = gpu.lock() {
                gpu.textures.remove(&self.handle);
            }
        }
    }
}

// ============================================================================
// MockGraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    gpu: Arc<Mutex<MockGpu>>,
}

impl MockGraphicsDevice {
    pub fn new(gpu: Arc<Mutex<MockGpu>>) -> Self {
        Self { gpu }
    }

    fn state(&self, call: &'static str) -> std::sync::MutexGuard<'_, MockGpu> {
        let mut gpu = self.gpu.lock().expect("mock gpu poisoned");
        gpu.calls.push(call);
        gpu
    }

    fn attach(&mut self, call: &'static str, point: AttachmentPoint, attachment: Option<MockAttachment>) {
        let mut gpu = self.state(call);
        let Some(bound) = gpu.bound_framebuffer else { return };
        if let Some(framebuffer) = gpu.framebuffers.get_mut(&bound) {
            match point {
                AttachmentPoint::Color0 => framebuffer.color = attachment,
                AttachmentPoint::Depth => framebuffer.depth = attachment,
                AttachmentPoint::Stencil => framebuffer.stencil = attachment,
            }
        }
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn backend_name(&self) -> &'static str {
        MOCK_BACKEND
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferHandle> {
        let mut gpu = self.state("create_framebuffer");
        let handle = FramebufferHandle(gpu.next_name());
        gpu.framebuffers.insert(handle, MockFramebuffer::default());
        Ok(handle)
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        let mut gpu = self.state("destroy_framebuffer");
        gpu.framebuffers.remove(&framebuffer);
        if gpu.bound_framebuffer == Some(framebuffer) {
            gpu.bound_framebuffer = None;
        }
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) {
        self.state("bind_framebuffer").bound_framebuffer = framebuffer;
    }

    fn check_framebuffer_status(&mut self) -> FramebufferStatus {
        self.state("check_framebuffer_status").compute_status()
    }

    fn create_renderbuffer(&mut self, format: RenderbufferFormat, width: u32, height: u32) -> Result<RenderbufferHandle> {
        let mut gpu = self.state("create_renderbuffer");
        if gpu.fail_renderbuffer_creation {
            return Err(Error::OutOfMemory);
        }
        let handle = RenderbufferHandle(gpu.next_name());
        let stencil = if format.has_stencil() {
            vec![0; (width * height) as usize]
        } else {
            Vec::new()
        };
        gpu.renderbuffers.insert(handle, MockRenderbuffer { format, width, height, stencil });
        Ok(handle)
    }

    fn destroy_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        self.state("destroy_renderbuffer").renderbuffers.remove(&renderbuffer);
    }

    fn attach_renderbuffer(&mut self, point: AttachmentPoint, renderbuffer: Option<RenderbufferHandle>) {
        self.attach("attach_renderbuffer", point, renderbuffer.map(MockAttachment::Renderbuffer));
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        let mut gpu = self.state("create_texture");
        let handle = TextureHandle(gpu.next_name());
        gpu.textures.insert(handle, desc.clone());
        Ok(handle)
    }

    fn wrap_texture(&mut self, handle: TextureHandle, info: TextureInfo) -> Arc<dyn Texture> {
        self.state("wrap_texture");
        Arc::new(MockTexture {
            info,
            handle,
            gpu: Arc::downgrade(&self.gpu),
        })
    }

    fn attach_texture_2d(&mut self, point: AttachmentPoint, texture: Option<TextureHandle>) {
        let attachment = texture.map(|handle| MockAttachment::Texture { handle, layer: None });
        self.attach("attach_texture_2d", point, attachment);
    }

    fn attach_texture_layer(&mut self, point: AttachmentPoint, texture: Option<TextureHandle>, layer: u32) {
        let attachment = texture.map(|handle| MockAttachment::Texture { handle, layer: Some(layer) });
        self.attach("attach_texture_layer", point, attachment);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.state("set_viewport").viewport = viewport;
    }

    fn set_scissor(&mut self, rect: Viewport) {
        self.state("set_scissor").scissor = rect;
    }

    fn set_depth_write_mask(&mut self, enabled: bool) {
        self.state("set_depth_write_mask").depth_write = enabled;
    }

    fn set_color_write_mask(&mut self, enabled: bool) {
        self.state("set_color_write_mask").color_write = enabled;
    }

    fn set_clear_color(&mut self, color: Vec4) {
        self.state("set_clear_color").clear_color = color;
    }

    fn set_clear_stencil(&mut self, value: i32) {
        self.state("set_clear_stencil").clear_stencil = value;
    }

    fn clear(&mut self, mask: ClearMask) {
        let mut gpu = self.state("clear");
        let (color_write, depth_write, clear_color) = (gpu.color_write, gpu.depth_write, gpu.clear_color);
        let (stencil_value, stencil_write_mask, scissor) =
            (gpu.clear_stencil.clamp(0, 0xFF) as u32, gpu.front.write_mask, gpu.scissor);

        let bound = gpu.bound_framebuffer;
        if let Some(framebuffer) = bound.and_then(|fb| gpu.framebuffers.get_mut(&fb)) {
            if mask.contains(ClearMask::COLOR) && color_write {
                framebuffer.cleared_color = Some(clear_color);
            }
            if mask.contains(ClearMask::DEPTH) && depth_write {
                framebuffer.depth_clears += 1;
            }
        }

        if mask.contains(ClearMask::STENCIL) {
            if let Some(buffer) = gpu.bound_stencil_buffer() {
                for y in 0..buffer.height as i32 {
                    for x in 0..buffer.width as i32 {
                        if !scissor.contains(x, y) {
                            continue;
                        }
                        let index = (y as u32 * buffer.width + x as u32) as usize;
                        let stored = buffer.stencil[index] as u32;
                        let written = (stored & !stencil_write_mask) | (stencil_value & stencil_write_mask);
                        buffer.stencil[index] = written as u8;
                    }
                }
            }
        }
    }

    fn set_stencil_op(&mut self, face: StencilFace, ops: StencilOps) {
        let mut gpu = self.state("set_stencil_op");
        if face.includes_front() { gpu.front.ops = ops; }
        if face.includes_back() { gpu.back.ops = ops; }
    }

    fn set_stencil_write_mask(&mut self, face: StencilFace, mask: u32) {
        let mut gpu = self.state("set_stencil_write_mask");
        if face.includes_front() { gpu.front.write_mask = mask; }
        if face.includes_back() { gpu.back.write_mask = mask; }
    }

    fn set_stencil_func(&mut self, face: StencilFace, func: CompareFunction, reference: i32, read_mask: u32) {
        let mut gpu = self.state("set_stencil_func");
        let apply = |state: &mut MockStencilState| {
            state.func = func;
            state.reference = reference;
            state.read_mask = read_mask;
        };
        if face.includes_front() { apply(&mut gpu.front); }
        if face.includes_back() { apply(&mut gpu.back); }
    }
}

// ============================================================================
// MockDriver
// ============================================================================

/// Driver over a `MockGraphicsDevice`, forwarding write-mask changes only
pub struct MockDriver {
    device: MockGraphicsDevice,
    depth_writing: bool,
    color_writing: bool,
}

impl MockDriver {
    pub fn new(gpu: Arc<Mutex<MockGpu>>) -> Self {
        Self {
            device: MockGraphicsDevice::new(gpu),
            depth_writing: true,
            color_writing: true,
        }
    }
}

impl Driver for MockDriver {
    fn set_depth_writing_enabled(&mut self, enabled: bool) {
        if self.depth_writing != enabled {
            self.depth_writing = enabled;
            self.device.set_depth_write_mask(enabled);
        }
    }

    fn set_color_writing_enabled(&mut self, enabled: bool) {
        if self.color_writing != enabled {
            self.color_writing = enabled;
            self.device.set_color_write_mask(enabled);
        }
    }

    fn graphics_device(&mut self) -> &mut dyn GraphicsDevice {
        &mut self.device
    }
}

/// Create a mock driver and the GPU state behind it
pub fn create_mock_driver() -> (DriverHandle, Arc<Mutex<MockGpu>>) {
    let gpu = Arc::new(Mutex::new(MockGpu::default()));
    let driver: DriverHandle = Arc::new(Mutex::new(MockDriver::new(Arc::clone(&gpu))));
    (driver, gpu)
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
