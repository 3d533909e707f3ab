/// Conversions between engine enums and OpenGL enums

use lumen_3d_engine::lumen3d::render::{
    AttachmentPoint, ClearMask, CompareFunction, FramebufferStatus, RenderbufferFormat,
    StencilFace, StencilOp, TextureFilter, TextureFormat, TextureTarget, TextureWrap,
};

/// GL_FRAMEBUFFER_INCOMPLETE_DIMENSIONS (ES 2.0 only, not in desktop core)
pub(crate) const FRAMEBUFFER_INCOMPLETE_DIMENSIONS: u32 = 0x8CD9;

/// Pixel transfer description of a texture format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GlTextureFormat {
    pub internal_format: u32,
    pub format: u32,
    pub ty: u32,
}

pub(crate) fn renderbuffer_format_to_gl(format: RenderbufferFormat) -> u32 {
    match format {
        RenderbufferFormat::Rgba8 => glow::RGBA8,
        RenderbufferFormat::Depth24Stencil8 => glow::DEPTH24_STENCIL8,
    }
}

pub(crate) fn texture_format_to_gl(format: TextureFormat) -> GlTextureFormat {
    match format {
        TextureFormat::Rgba8 => GlTextureFormat {
            internal_format: glow::RGBA8,
            format: glow::RGBA,
            ty: glow::UNSIGNED_BYTE,
        },
        TextureFormat::Depth16 => GlTextureFormat {
            internal_format: glow::DEPTH_COMPONENT16,
            format: glow::DEPTH_COMPONENT,
            ty: glow::UNSIGNED_SHORT,
        },
    }
}

pub(crate) fn texture_target_to_gl(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Tex2D => glow::TEXTURE_2D,
        TextureTarget::Array2D => glow::TEXTURE_2D_ARRAY,
    }
}

pub(crate) fn texture_filter_to_gl(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST as i32,
        TextureFilter::Linear => glow::LINEAR as i32,
    }
}

pub(crate) fn texture_wrap_to_gl(wrap: TextureWrap) -> i32 {
    match wrap {
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
        TextureWrap::Repeat => glow::REPEAT as i32,
    }
}

pub(crate) fn attachment_to_gl(point: AttachmentPoint) -> u32 {
    match point {
        AttachmentPoint::Color0 => glow::COLOR_ATTACHMENT0,
        AttachmentPoint::Depth => glow::DEPTH_ATTACHMENT,
        AttachmentPoint::Stencil => glow::STENCIL_ATTACHMENT,
    }
}

pub(crate) fn compare_function_to_gl(func: CompareFunction) -> u32 {
    match func {
        CompareFunction::Never => glow::NEVER,
        CompareFunction::Less => glow::LESS,
        CompareFunction::LessEqual => glow::LEQUAL,
        CompareFunction::Equal => glow::EQUAL,
        CompareFunction::GreaterEqual => glow::GEQUAL,
        CompareFunction::Greater => glow::GREATER,
        CompareFunction::NotEqual => glow::NOTEQUAL,
        CompareFunction::Always => glow::ALWAYS,
    }
}

pub(crate) fn stencil_face_to_gl(face: StencilFace) -> u32 {
    match face {
        StencilFace::Front => glow::FRONT,
        StencilFace::Back => glow::BACK,
        StencilFace::FrontAndBack => glow::FRONT_AND_BACK,
    }
}

pub(crate) fn stencil_op_to_gl(op: StencilOp) -> u32 {
    match op {
        StencilOp::Keep => glow::KEEP,
        StencilOp::Zero => glow::ZERO,
        StencilOp::Replace => glow::REPLACE,
        StencilOp::Increment => glow::INCR,
        StencilOp::Decrement => glow::DECR,
    }
}

pub(crate) fn clear_mask_to_gl(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

pub(crate) fn framebuffer_status_from_gl(status: u32) -> FramebufferStatus {
    match status {
        glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        FRAMEBUFFER_INCOMPLETE_DIMENSIONS => FramebufferStatus::IncompleteDimensions,
        glow::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        other => FramebufferStatus::Unknown(other),
    }
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
