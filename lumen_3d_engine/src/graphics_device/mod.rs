/// Graphics device module - backend capability traits and GPU value types

// Module declarations
pub mod graphics_device;
pub mod frame_buffer;
pub mod stencil;
pub mod texture;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use frame_buffer::*;
pub use stencil::*;
pub use texture::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
