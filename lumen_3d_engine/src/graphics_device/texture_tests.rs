/// Unit tests for texture descriptors and substrate checks

use super::*;
use std::num::NonZeroU32;

fn handle(name: u32) -> TextureHandle {
    TextureHandle(NonZeroU32::new(name).unwrap())
}

// ============================================================================
// Tests: TextureDesc presets
// ============================================================================

#[test]
fn test_color_desc_is_linear_clamped_without_comparison() {
    let desc = TextureDesc::color(256, 128);
    assert_eq!(desc.target, TextureTarget::Tex2D);
    assert_eq!((desc.width, desc.height), (256, 128));
    assert_eq!(desc.array_layers, 1);
    assert_eq!(desc.format, TextureFormat::Rgba8);
    assert_eq!(desc.filter, TextureFilter::Linear);
    assert_eq!(desc.wrap, TextureWrap::ClampToEdge);
    assert!(desc.compare.is_none());
    assert!(desc.max_level.is_none());
}

#[test]
fn test_shadow_depth_desc_enables_comparison() {
    let desc = TextureDesc::shadow_depth(1024, 1024, TextureFormat::Depth16, CompareFunction::LessEqual);
    assert_eq!(desc.compare, Some(CompareFunction::LessEqual));
    assert!(desc.format.is_depth());
    assert_eq!(desc.filter, TextureFilter::Linear);
}

#[test]
fn test_shadow_depth_array_desc_is_layered() {
    let desc = TextureDesc::shadow_depth_array(512, 512, 4, TextureFormat::Depth16, CompareFunction::LessEqual);
    assert_eq!(desc.target, TextureTarget::Array2D);
    assert_eq!(desc.array_layers, 4);
    assert_eq!(desc.max_level, Some(1));
    assert_eq!(desc.compare, Some(CompareFunction::LessEqual));

    let info = desc.info();
    assert!(info.is_array());
    assert_eq!(info.array_layers, 4);
}

// ============================================================================
// Tests: TextureSubstrate
// ============================================================================

#[test]
fn test_substrate_handle_for_matching_backend() {
    let substrate = TextureSubstrate {
        backend: "opengl",
        target: TextureTarget::Tex2D,
        handle: handle(7),
    };
    assert_eq!(substrate.handle_for("opengl"), Ok(handle(7)));
}

#[test]
fn test_substrate_handle_for_other_backend_fails() {
    let substrate = TextureSubstrate {
        backend: "metal",
        target: TextureTarget::Tex2D,
        handle: handle(7),
    };
    assert_eq!(
        substrate.handle_for("opengl"),
        Err(Error::WrongBackend { expected: "opengl", found: "metal" })
    );
}
