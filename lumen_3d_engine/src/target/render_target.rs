/// Render target: an offscreen destination for draw output.
///
/// A render target owns its GPU backing store (framebuffer, optional color
/// renderbuffer, optional depth/stencil renderbuffer) and, for texture-backed
/// kinds, a shared texture attachment that later passes sample.
///
/// Resources are created lazily: the first `set_viewport()` with a positive
/// size builds them, a size change rebuilds them, and `discard_framebuffers()`
/// / `restore_framebuffers()` tear them down and rebuild them around a
/// graphics context loss.

use std::sync::{Arc, MutexGuard};
use glam::Vec4;
use crate::error::{Error, Result};
use crate::{engine_bail_err, engine_debug, engine_err, engine_error, engine_trace, engine_warn};
use crate::graphics_device::{
    AttachmentPoint, ClearMask, Driver, DriverHandle, FramebufferHandle, GraphicsDevice,
    RenderbufferHandle, StencilFace, Texture, TextureDesc, TextureHandle, WeakDriverHandle,
};
use super::target_config::TargetConfig;
use super::viewport::Viewport;

// ============================================================================
// RenderTargetKind
// ============================================================================

/// Kind of backing store a render target builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTargetKind {
    /// Color + depth/stencil renderbuffers, nothing to sample
    RenderbufferPair,
    /// Sampleable color texture + depth/stencil renderbuffer
    ColorTexture,
    /// Sampleable depth texture read through comparison sampling
    DepthTexture,
    /// Layered depth texture, one layer bound at a time (shadow cascades)
    DepthTextureArray,
}

impl RenderTargetKind {
    /// Framebuffer slot the texture attachment is bound to, if any
    pub fn texture_attachment_point(&self) -> Option<AttachmentPoint> {
        match self {
            RenderTargetKind::RenderbufferPair => None,
            RenderTargetKind::ColorTexture => Some(AttachmentPoint::Color0),
            RenderTargetKind::DepthTexture | RenderTargetKind::DepthTextureArray => {
                Some(AttachmentPoint::Depth)
            }
        }
    }

    /// Returns true if targets of this kind expose a texture
    pub fn has_texture_attachment(&self) -> bool {
        self.texture_attachment_point().is_some()
    }

    /// Returns true for layered kinds
    pub fn is_layered(&self) -> bool {
        matches!(self, RenderTargetKind::DepthTextureArray)
    }
}

// ============================================================================
// RenderTargetDesc
// ============================================================================

/// Descriptor for creating a render target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTargetDesc {
    /// Backing store kind (fixed for the target's lifetime)
    pub kind: RenderTargetKind,
    /// Number of layers; must be 1 unless `kind` is `DepthTextureArray`
    pub layer_count: u32,
    /// Formats and defaults
    pub config: TargetConfig,
}

impl RenderTargetDesc {
    /// Single-layer target with the default config
    pub fn new(kind: RenderTargetKind) -> Self {
        Self {
            kind,
            layer_count: 1,
            config: TargetConfig::default(),
        }
    }

    /// Layered depth target with `layer_count` layers
    pub fn depth_array(layer_count: u32) -> Self {
        Self {
            layer_count,
            ..Self::new(RenderTargetKind::DepthTextureArray)
        }
    }
}

// ============================================================================
// RenderTarget
// ============================================================================

/// Offscreen render target
///
/// Single-threaded: every method must be called on the thread that owns
/// the graphics context.
pub struct RenderTarget {
    kind: RenderTargetKind,
    layer_count: u32,
    config: TargetConfig,
    /// Drawable area; zero-size until the first `set_viewport()`
    viewport: Viewport,
    driver: WeakDriverHandle,
    framebuffer: Option<FramebufferHandle>,
    /// Color renderbuffer (renderbuffer pair) or placeholder color buffer
    /// (depth kinds)
    color_buffer: Option<RenderbufferHandle>,
    depth_stencil_buffer: Option<RenderbufferHandle>,
    texture: Option<Arc<dyn Texture>>,
    /// Array layer currently bound to the depth slot (layered kind only)
    texture_layer: Option<u32>,
    clear_color: Vec4,
}

impl RenderTarget {
    /// Create a render target with no GPU resources
    ///
    /// The target keeps a non-owning reference to `driver`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResource` if `layer_count` is 0, or is not 1
    /// for a non-layered kind.
    pub fn new(desc: RenderTargetDesc, driver: &DriverHandle) -> Result<Self> {
        if desc.layer_count == 0 {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidResource("Render target layer count must be positive".to_string()));
        }
        if !desc.kind.is_layered() && desc.layer_count != 1 {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidResource(format!(
                    "{:?} targets have exactly one layer (got {})", desc.kind, desc.layer_count)));
        }

        Ok(Self {
            kind: desc.kind,
            layer_count: desc.layer_count,
            config: desc.config,
            viewport: Viewport::default(),
            driver: Arc::downgrade(driver),
            framebuffer: None,
            color_buffer: None,
            depth_stencil_buffer: None,
            texture: None,
            texture_layer: None,
            clear_color: desc.config.clear_color,
        })
    }

    // ===== ACCESSORS =====

    /// Backing store kind
    pub fn kind(&self) -> RenderTargetKind {
        self.kind
    }

    /// Number of layers (1 unless layered)
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Viewport width in pixels
    pub fn width(&self) -> i32 {
        self.viewport.width
    }

    /// Viewport height in pixels
    pub fn height(&self) -> i32 {
        self.viewport.height
    }

    /// Color written by `clear_color()` / `clear_depth_and_color()`
    pub fn clear_color_value(&self) -> Vec4 {
        self.clear_color
    }

    /// Set the color written by subsequent color clears
    pub fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    /// Returns true once the GPU resources exist
    pub fn is_created(&self) -> bool {
        self.framebuffer.is_some()
    }

    /// Framebuffer handle, if created
    pub fn framebuffer_handle(&self) -> Option<FramebufferHandle> {
        self.framebuffer
    }

    /// Color renderbuffer handle, if this kind uses one
    pub fn color_buffer_handle(&self) -> Option<RenderbufferHandle> {
        self.color_buffer
    }

    /// Depth/stencil renderbuffer handle, if this kind uses one
    pub fn depth_stencil_buffer_handle(&self) -> Option<RenderbufferHandle> {
        self.depth_stencil_buffer
    }

    /// Returns true if a texture is attached
    pub fn has_texture_attached(&self) -> bool {
        self.texture.is_some()
    }

    /// Shared reference to the attached texture
    pub fn texture(&self) -> Option<Arc<dyn Texture>> {
        self.texture.clone()
    }

    /// Array layer bound to the depth slot (layered kind only)
    pub fn texture_image_index(&self) -> Option<u32> {
        self.texture_layer
    }

    // ===== BINDING =====

    /// Make this target the active draw/read destination
    ///
    /// Binds the framebuffer and sets both the viewport and the scissor
    /// rectangle to this target's viewport, so clears stay inside it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidState` if the resources were never created.
    pub fn bind(&self) -> Result<()> {
        if self.driver.strong_count() == 0 {
            engine_trace!("lumen3d::RenderTarget", "bind: driver is gone, skipping");
            return Ok(());
        }
        let framebuffer = self.require_framebuffer("bind")?;
        let viewport = self.viewport;
        self.with_graphics_device("bind", |device| {
            device.bind_framebuffer(Some(framebuffer));
            device.set_viewport(viewport);
            device.set_scissor(viewport);
            Ok(())
        })?;
        Ok(())
    }

    /// Set the drawable area
    ///
    /// Same-size changes only move the origin and never touch GPU
    /// resources. Any size change tears every resource down and rebuilds
    /// it at the new size.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidViewport` for a negative origin, or when a size
    /// change lands on a non-positive size; `Error::IncompleteFramebuffer` if
    /// the rebuilt framebuffer fails its completeness check.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        if !viewport.has_valid_origin() {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidViewport(format!(
                    "viewport origin must be non-negative (got {}, {})", viewport.x, viewport.y)));
        }

        if self.viewport.same_size(&viewport) {
            self.viewport = viewport;
            return Ok(());
        }

        engine_debug!("lumen3d::RenderTarget", "{:?} target resized {}x{} -> {}x{}",
            self.kind, self.viewport.width, self.viewport.height, viewport.width, viewport.height);

        self.discard_framebuffers()?;
        self.viewport = viewport;
        self.create_framebuffers()
    }

    // ===== LIFECYCLE =====

    /// Rebuild the GPU resources at the current viewport (after a context
    /// loss). Does nothing if they already exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidViewport` if no positive-size viewport was set.
    pub fn restore_framebuffers(&mut self) -> Result<()> {
        if self.framebuffer.is_some() {
            engine_trace!("lumen3d::RenderTarget", "restore_framebuffers: {:?} target already live", self.kind);
            return Ok(());
        }
        self.create_framebuffers()
    }

    /// Release every GPU resource and the texture reference, keeping the
    /// viewport. Calling it again is a no-op.
    pub fn discard_framebuffers(&mut self) -> Result<()> {
        if !self.holds_resources() {
            return Ok(());
        }

        let Some(driver) = self.driver.upgrade() else {
            // The context went away and took its objects with it
            engine_warn!("lumen3d::RenderTarget",
                "discard_framebuffers: driver is gone, dropping {:?} handles", self.kind);
            self.forget_resources();
            return Ok(());
        };
        let mut driver = Self::lock_driver(&driver)?;
        self.release_resources(driver.graphics_device());
        Ok(())
    }

    // ===== TEXTURE ATTACHMENT =====

    /// Attach an externally owned texture in place of this target's own
    ///
    /// Used when one texture is shared by several targets. Binds the
    /// texture's mip 0 (layer 0 for layered targets) to the kind's slot,
    /// then re-checks completeness. On failure the previous texture is
    /// bound back.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedOperation` if this kind has no texture slot
    /// - `Error::InvalidViewport` before a positive-size viewport was set
    /// - `Error::InvalidResource` if the texture's layout or format does not
    ///   match the kind
    /// - `Error::WrongBackend` if the texture belongs to another backend
    /// - `Error::IncompleteFramebuffer` if the framebuffer is incomplete with
    ///   the new texture (e.g. a size the backend cannot combine)
    pub fn attach_texture(&mut self, texture: Arc<dyn Texture>) -> Result<()> {
        let point = self.texture_attachment_point("attach_texture")?;
        let Some(driver) = self.driver.upgrade() else {
            engine_warn!("lumen3d::RenderTarget", "attach_texture: driver is gone, ignoring");
            return Ok(());
        };
        if !self.viewport.has_positive_size() {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidViewport("must set a positive-size viewport before attaching a texture".to_string()));
        }
        let framebuffer = self.require_framebuffer("attach_texture")?;
        let info = texture.info();
        if info.is_array() != self.kind.is_layered() {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidResource(format!(
                    "{:?} target cannot attach a {:?} texture", self.kind, info.target)));
        }
        if info.format.is_depth() != (point == AttachmentPoint::Depth) {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidResource(format!(
                    "{:?} target cannot attach a {:?} texture to its {:?} slot", self.kind, info.format, point)));
        }

        let mut driver = Self::lock_driver(&driver)?;
        let device = driver.graphics_device();
        let handle = texture.substrate().handle_for(device.backend_name())
            .inspect_err(|e| engine_error!("lumen3d::RenderTarget", "attach_texture: {}", e))?;

        let layered = self.kind.is_layered();
        device.bind_framebuffer(Some(framebuffer));
        Self::attach_texture_image(device, point, layered, Some(handle), 0);

        if let Err(e) = self.verify_complete(device) {
            let previous = self.texture.as_ref().map(|previous| previous.substrate().handle);
            let previous_layer = self.texture_layer.unwrap_or(0);
            Self::attach_texture_image(device, point, layered, previous, previous_layer);
            return Err(e);
        }

        self.texture = Some(texture);
        self.texture_layer = layered.then_some(0);
        Ok(())
    }

    /// Detach the texture and drop this target's reference to it
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedOperation` if this kind has no texture slot.
    pub fn clear_texture(&mut self) -> Result<()> {
        let point = self.texture_attachment_point("clear_texture")?;
        self.texture = None;
        self.texture_layer = None;

        let Some(framebuffer) = self.framebuffer else {
            return Ok(());
        };
        let layered = self.kind.is_layered();
        self.with_graphics_device("clear_texture", |device| {
            device.bind_framebuffer(Some(framebuffer));
            Self::attach_texture_image(device, point, layered, None, 0);
            Ok(())
        })?;
        Ok(())
    }

    /// Bind layer `index` of the depth texture array to the depth slot
    ///
    /// No reallocation happens; the framebuffer attachment is rebound.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedOperation` on a non-layered kind
    /// - `Error::LayerOutOfRange` if `index >= layer_count`
    /// - `Error::InvalidState` before the resources were created
    pub fn set_texture_image_index(&mut self, index: u32) -> Result<()> {
        if !self.kind.is_layered() {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::UnsupportedOperation(format!(
                    "set_texture_image_index on a {:?} target", self.kind)));
        }
        if index >= self.layer_count {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::LayerOutOfRange { index, layer_count: self.layer_count });
        }
        let Some(texture) = self.texture.clone() else {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidState("set_texture_image_index called before the texture was created".to_string()));
        };
        let texture_layers = texture.info().array_layers;
        if index >= texture_layers {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::LayerOutOfRange { index, layer_count: texture_layers });
        }
        let framebuffer = self.require_framebuffer("set_texture_image_index")?;

        let applied = self.with_graphics_device("set_texture_image_index", |device| {
            let handle = texture.substrate().handle_for(device.backend_name())?;
            device.bind_framebuffer(Some(framebuffer));
            device.attach_texture_layer(AttachmentPoint::Depth, Some(handle), index);
            Ok(())
        })?;
        if applied.is_some() {
            self.texture_layer = Some(index);
        }
        Ok(())
    }

    // ===== CLEARS =====

    /// Clear the color buffer to the clear color
    pub fn clear_color(&self) -> Result<()> {
        self.clear_buffers("clear_color", ClearMask::COLOR, 0)
    }

    /// Clear the depth buffer
    pub fn clear_depth(&self) -> Result<()> {
        self.clear_buffers("clear_depth", ClearMask::DEPTH, 0)
    }

    /// Clear the stencil buffer to `bits`
    pub fn clear_stencil(&self, bits: i32) -> Result<()> {
        self.clear_buffers("clear_stencil", ClearMask::STENCIL, bits)
    }

    /// Clear depth and color in one call
    pub fn clear_depth_and_color(&self) -> Result<()> {
        self.clear_buffers("clear_depth_and_color", ClearMask::DEPTH | ClearMask::COLOR, 0)
    }

    /// Shared clear path
    ///
    /// Clears are masked by the write masks, and a previous draw may have
    /// disabled them: the relevant mask is re-enabled on the driver (so its
    /// cache reads enabled) and forced on the device before clearing.
    fn clear_buffers(&self, operation: &str, mask: ClearMask, stencil_bits: i32) -> Result<()> {
        if self.driver.strong_count() == 0 {
            engine_trace!("lumen3d::RenderTarget", "{}: driver is gone, skipping", operation);
            return Ok(());
        }
        self.require_framebuffer(operation)?;

        let clear_color = self.clear_color;
        let full_stencil_mask = self.config.full_stencil_mask;
        self.with_driver(operation, |driver| {
            if mask.contains(ClearMask::DEPTH) {
                driver.set_depth_writing_enabled(true);
            }
            if mask.contains(ClearMask::COLOR) {
                driver.set_color_writing_enabled(true);
            }

            // Draw code can change the masks on the device directly, so
            // the driver's cache is not trusted here
            let device = driver.graphics_device();
            if mask.contains(ClearMask::DEPTH) {
                device.set_depth_write_mask(true);
            }
            if mask.contains(ClearMask::COLOR) {
                device.set_color_write_mask(true);
                device.set_clear_color(clear_color);
            }
            if mask.contains(ClearMask::STENCIL) {
                device.set_stencil_write_mask(StencilFace::FrontAndBack, full_stencil_mask);
                device.set_clear_stencil(stencil_bits);
            }
            device.clear(mask);
            Ok(())
        })?;
        Ok(())
    }

    // ===== DRIVER ACCESS =====

    fn lock_driver(driver: &DriverHandle) -> Result<MutexGuard<'_, dyn Driver + 'static>> {
        driver.lock()
            .map_err(|_| engine_err!("lumen3d::RenderTarget", "Driver lock poisoned"))
    }

    /// Run `f` against the driver, or return `Ok(None)` if the driver is gone
    pub(super) fn with_driver<R>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut dyn Driver) -> Result<R>,
    ) -> Result<Option<R>> {
        let Some(driver) = self.driver.upgrade() else {
            engine_trace!("lumen3d::RenderTarget", "{}: driver is gone, skipping", operation);
            return Ok(None);
        };
        let mut driver = Self::lock_driver(&driver)?;
        f(&mut *driver).map(Some)
    }

    /// Run `f` against the graphics device, or return `Ok(None)` if the
    /// driver is gone
    pub(super) fn with_graphics_device<R>(
        &self,
        operation: &str,
        f: impl FnOnce(&mut dyn GraphicsDevice) -> Result<R>,
    ) -> Result<Option<R>> {
        self.with_driver(operation, |driver| f(driver.graphics_device()))
    }

    pub(super) fn config(&self) -> &TargetConfig {
        &self.config
    }

    // ===== CREATION =====

    fn require_framebuffer(&self, operation: &str) -> Result<FramebufferHandle> {
        match self.framebuffer {
            Some(framebuffer) => Ok(framebuffer),
            None => engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidState(format!(
                    "{} on a {:?} target with no framebuffer; must set a positive-size viewport before use",
                    operation, self.kind))),
        }
    }

    fn texture_attachment_point(&self, operation: &str) -> Result<AttachmentPoint> {
        match self.kind.texture_attachment_point() {
            Some(point) => Ok(point),
            None => engine_bail_err!("lumen3d::RenderTarget",
                Error::UnsupportedOperation(format!(
                    "{} on a {:?} target, which has no texture attachment", operation, self.kind))),
        }
    }

    fn holds_resources(&self) -> bool {
        self.framebuffer.is_some()
            || self.color_buffer.is_some()
            || self.depth_stencil_buffer.is_some()
            || self.texture.is_some()
    }

    /// Run the kind-specific creation at the current viewport
    fn create_framebuffers(&mut self) -> Result<()> {
        if !self.viewport.has_positive_size() {
            engine_bail_err!("lumen3d::RenderTarget",
                Error::InvalidViewport(format!(
                    "must set a positive-size viewport before use (got {}x{})",
                    self.viewport.width, self.viewport.height)));
        }

        let Some(driver) = self.driver.upgrade() else {
            engine_warn!("lumen3d::RenderTarget",
                "Driver is gone, {:?} target left without resources", self.kind);
            return Ok(());
        };
        let mut driver = Self::lock_driver(&driver)?;
        let device = driver.graphics_device();

        let created = match self.kind {
            RenderTargetKind::RenderbufferPair => self.create_renderbuffer_pair(device),
            RenderTargetKind::ColorTexture => self.create_color_texture_target(device),
            RenderTargetKind::DepthTexture => self.create_depth_texture_target(device),
            RenderTargetKind::DepthTextureArray => self.create_depth_texture_array_target(device),
        };

        match created {
            Ok(()) => {
                engine_debug!("lumen3d::RenderTarget", "Created {:?} target {}x{}",
                    self.kind, self.viewport.width, self.viewport.height);
                Ok(())
            }
            Err(e) => {
                self.release_resources(device);
                Err(e)
            }
        }
    }

    fn create_renderbuffer_pair(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.create_bound_framebuffer(device)?;
        self.create_color_buffer(device)?;
        self.create_depth_stencil_buffer(device)?;
        self.verify_complete(device)
    }

    fn create_color_texture_target(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.create_bound_framebuffer(device)?;

        let desc = TextureDesc::color(self.viewport.width_px(), self.viewport.height_px());
        let texture = Self::create_texture(device, &desc)?;
        device.attach_texture_2d(AttachmentPoint::Color0, Some(texture.substrate().handle));
        self.texture = Some(texture);

        if self.depth_stencil_buffer.is_none() {
            self.create_depth_stencil_buffer(device)?;
        }
        self.verify_complete(device)
    }

    fn create_depth_texture_target(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.create_bound_framebuffer(device)?;

        let desc = TextureDesc::shadow_depth(
            self.viewport.width_px(),
            self.viewport.height_px(),
            self.config.depth_texture_format,
            self.config.shadow_compare,
        );
        let texture = Self::create_texture(device, &desc)?;
        device.attach_texture_2d(AttachmentPoint::Depth, Some(texture.substrate().handle));
        self.texture = Some(texture);

        // Some backends reject a framebuffer without a color image even
        // when color writes are off
        self.create_color_buffer(device)?;
        self.verify_complete(device)
    }

    fn create_depth_texture_array_target(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.create_bound_framebuffer(device)?;

        let desc = TextureDesc::shadow_depth_array(
            self.viewport.width_px(),
            self.viewport.height_px(),
            self.layer_count,
            self.config.depth_texture_format,
            self.config.shadow_compare,
        );
        let texture = Self::create_texture(device, &desc)?;
        device.attach_texture_layer(AttachmentPoint::Depth, Some(texture.substrate().handle), 0);
        self.texture = Some(texture);
        self.texture_layer = Some(0);

        self.create_color_buffer(device)?;
        self.verify_complete(device)
    }

    fn create_bound_framebuffer(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let framebuffer = device.create_framebuffer()?;
        self.framebuffer = Some(framebuffer);
        device.bind_framebuffer(Some(framebuffer));
        Ok(())
    }

    fn create_color_buffer(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let color = device.create_renderbuffer(
            self.config.color_format,
            self.viewport.width_px(),
            self.viewport.height_px(),
        )?;
        self.color_buffer = Some(color);
        device.attach_renderbuffer(AttachmentPoint::Color0, Some(color));
        Ok(())
    }

    fn create_depth_stencil_buffer(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let depth_stencil = device.create_renderbuffer(
            self.config.depth_stencil_format,
            self.viewport.width_px(),
            self.viewport.height_px(),
        )?;
        self.depth_stencil_buffer = Some(depth_stencil);
        device.attach_renderbuffer(AttachmentPoint::Depth, Some(depth_stencil));
        device.attach_renderbuffer(AttachmentPoint::Stencil, Some(depth_stencil));
        Ok(())
    }

    fn attach_texture_image(
        device: &mut dyn GraphicsDevice,
        point: AttachmentPoint,
        layered: bool,
        texture: Option<TextureHandle>,
        layer: u32,
    ) {
        if layered {
            device.attach_texture_layer(point, texture, layer);
        } else {
            device.attach_texture_2d(point, texture);
        }
    }

    fn create_texture(device: &mut dyn GraphicsDevice, desc: &TextureDesc) -> Result<Arc<dyn Texture>> {
        let handle = device.create_texture(desc)?;
        Ok(device.wrap_texture(handle, desc.info()))
    }

    fn verify_complete(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let status = device.check_framebuffer_status();
        if status.is_complete() {
            return Ok(());
        }
        engine_error!("lumen3d::RenderTarget", "Failed to make complete {:?} framebuffer {}x{}: {}",
            self.kind, self.viewport.width, self.viewport.height, status);
        Err(Error::IncompleteFramebuffer(status))
    }

    // ===== TEARDOWN =====

    fn release_resources(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(framebuffer) = self.framebuffer.take() {
            device.destroy_framebuffer(framebuffer);
        }
        if let Some(color) = self.color_buffer.take() {
            device.destroy_renderbuffer(color);
        }
        if let Some(depth_stencil) = self.depth_stencil_buffer.take() {
            device.destroy_renderbuffer(depth_stencil);
        }
        self.texture = None;
        self.texture_layer = None;
    }

    fn forget_resources(&mut self) {
        self.framebuffer = None;
        self.color_buffer = None;
        self.depth_stencil_buffer = None;
        self.texture = None;
        self.texture_layer = None;
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        if self.discard_framebuffers().is_err() {
            self.forget_resources();
        }
    }
}

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
