/// Framebuffer-level types shared by the core and the backends
///
/// Handles are backend object names (GL "names"). Zero is never a valid
/// name, so each handle wraps a `NonZeroU32` and "absent" is `None`.

use std::fmt;
use std::num::NonZeroU32;
use bitflags::bitflags;

/// Backend name of a framebuffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(pub NonZeroU32);

/// Backend name of a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderbufferHandle(pub NonZeroU32);

/// Backend name of a texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub NonZeroU32);

/// Framebuffer attachment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentPoint {
    /// First color attachment
    Color0,
    /// Depth attachment
    Depth,
    /// Stencil attachment
    Stencil,
}

/// Storage format of a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderbufferFormat {
    /// 8-bit RGBA color
    Rgba8,
    /// Packed 24-bit depth + 8-bit stencil
    Depth24Stencil8,
}

impl RenderbufferFormat {
    /// Returns true if this format can back a depth attachment
    pub fn has_depth(&self) -> bool {
        matches!(self, RenderbufferFormat::Depth24Stencil8)
    }

    /// Returns true if this format can back a stencil attachment
    pub fn has_stencil(&self) -> bool {
        matches!(self, RenderbufferFormat::Depth24Stencil8)
    }
}

/// Result of a framebuffer completeness query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    /// The framebuffer can be rendered to
    Complete,
    /// An attachment is not renderable or has the wrong format for its slot
    IncompleteAttachment,
    /// Attachments do not share the same dimensions
    IncompleteDimensions,
    /// No image is attached
    MissingAttachment,
    /// The combination of formats is not supported by the implementation
    Unsupported,
    /// Backend status code with no portable category
    Unknown(u32),
}

impl FramebufferStatus {
    /// Returns true for `Complete`
    pub fn is_complete(&self) -> bool {
        matches!(self, FramebufferStatus::Complete)
    }
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferStatus::Complete => write!(f, "complete"),
            FramebufferStatus::IncompleteAttachment => write!(f, "incomplete attachment"),
            FramebufferStatus::IncompleteDimensions => write!(f, "incomplete dimensions"),
            FramebufferStatus::MissingAttachment => write!(f, "missing attachment"),
            FramebufferStatus::Unsupported => write!(f, "unsupported attachment combination"),
            FramebufferStatus::Unknown(code) => write!(f, "unknown status 0x{:04X}", code),
        }
    }
}

bitflags! {
    /// Buffers affected by a clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}
