/// Target module - offscreen render targets and their manager

// Module declarations
pub mod viewport;
pub mod target_config;
pub mod render_target;
pub mod portal_stencil;
pub mod target_manager;

// Re-exports
pub use viewport::Viewport;
pub use target_config::TargetConfig;
pub use render_target::{RenderTarget, RenderTargetDesc, RenderTargetKind};
pub use target_manager::TargetManager;
