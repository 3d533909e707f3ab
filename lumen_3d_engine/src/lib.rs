/*!
# Lumen 3D Engine

Render-target resource management for the Lumen 3D rendering engine.

This crate owns the lifecycle of GPU offscreen surfaces (color buffers,
shadow depth textures, cascaded shadow depth arrays) and the stencil
counting protocol used to composite nested portals. It never calls a
graphics API directly: backends (OpenGL via `lumen_3d_engine_renderer_gl`)
implement the `GraphicsDevice` and `Driver` traits.

## Architecture

- **RenderTarget**: one offscreen surface; creates, resizes and tears down
  its framebuffer, renderbuffers and texture attachment
- **TargetManager**: named registry of render targets, drives context-loss
  recovery for all of them
- **GraphicsDevice**: GL-like command trait implemented by backends
- **Driver**: owner of the graphics context, caches write-mask state
- **Texture**: shared, sampleable attachment handed to later passes
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod target;

// Main lumen3d namespace module
pub mod lumen3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with the backend capability types
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Target sub-module
    pub mod target {
        pub use crate::target::*;
    }
}

// Re-export math library at crate root
pub use glam;
