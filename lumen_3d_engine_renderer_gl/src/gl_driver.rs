/// Driver - OpenGL implementation of the Driver trait

use std::sync::{Arc, Mutex};
use lumen_3d_engine::lumen3d::render::{Driver, DriverHandle, GraphicsDevice};
use lumen_3d_engine::engine_info;
use crate::gl_graphics_device::GlGraphicsDevice;

/// OpenGL driver
///
/// Owns the GL device and caches the depth/color write masks so that
/// redundant toggles never reach GL. A fresh context starts with both
/// masks enabled.
pub struct GlDriver {
    device: GlGraphicsDevice,
    depth_writing: bool,
    color_writing: bool,
}

impl GlDriver {
    /// Create a driver over a context that is current on this thread
    pub fn new(context: glow::Context) -> Self {
        let device = GlGraphicsDevice::new(context);
        engine_info!("lumen3d::gl", "OpenGL driver created");
        Self {
            device,
            depth_writing: true,
            color_writing: true,
        }
    }

    /// Move the driver into a shared handle for the target manager
    ///
    /// Render targets only keep a weak reference: dropping every clone of
    /// the returned handle tears the context down for them too.
    pub fn into_handle(self) -> DriverHandle {
        Arc::new(Mutex::new(self))
    }

    /// Underlying GL device
    pub fn device(&self) -> &GlGraphicsDevice {
        &self.device
    }
}

impl Driver for GlDriver {
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
