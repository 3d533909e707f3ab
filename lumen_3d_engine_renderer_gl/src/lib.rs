/*!
# Lumen 3D Engine - OpenGL Renderer Backend

OpenGL / OpenGL ES 3 implementation of the lumen_3d_engine driver traits,
using `glow` for the GL bindings.

The application creates the context (and makes it current), hands it to
[`lumen3d::GlDriver`], and passes the resulting handle to the engine's
target manager:

```no_run
use lumen_3d_engine::lumen3d::{Engine, target::TargetConfig};
use lumen_3d_engine_renderer_gl::lumen3d::GlDriver;

# fn make_context() -> glow::Context { unimplemented!() }
let driver = GlDriver::new(make_context()).into_handle();
Engine::initialize()?;
Engine::create_target_manager(driver, TargetConfig::default())?;
# Ok::<(), lumen_3d_engine::lumen3d::Error>(())
```
*/

mod gl_format;
mod gl_graphics_device;
mod gl_texture;
mod gl_driver;
#[cfg(feature = "gl-debug")]
mod gl_debug;

/// Public namespace of the OpenGL backend
pub mod lumen3d {
    pub use crate::gl_driver::GlDriver;
    pub use crate::gl_graphics_device::{GlContext, GlGraphicsDevice, GL_BACKEND_NAME};
    pub use crate::gl_texture::GlTexture;

    #[cfg(feature = "gl-debug")]
    pub use crate::gl_debug::{get_debug_stats, print_debug_stats_report, DebugStats};
}
