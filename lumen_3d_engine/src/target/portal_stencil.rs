/// Portal stencil protocol
///
/// Nested portals share one stencil buffer as a counter: drawing a portal's
/// boundary while entering it increments the count under the boundary,
/// drawing it again while leaving decrements it back. Content is then
/// clipped to a nesting depth through the stencil test.
///
/// These operations only configure GPU stencil state. The counts live in
/// the stencil buffer, never in the `RenderTarget`.

use crate::error::Result;
use crate::graphics_device::{CompareFunction, StencilFace, StencilOp, StencilOps};
use super::render_target::RenderTarget;

impl RenderTarget {
    /// Increment the stencil count under every fragment of `face` that
    /// passes the depth and stencil tests
    ///
    /// Pair each call with `enable_portal_stencil_removal()` over the same
    /// boundary geometry.
    pub fn enable_portal_stencil_writing(&self, face: StencilFace) -> Result<()> {
        self.set_portal_stencil_op(
            "enable_portal_stencil_writing",
            face,
            StencilOp::Increment,
            self.config().full_stencil_mask,
        )
    }

    /// Decrement the stencil count under every passing fragment of `face`
    pub fn enable_portal_stencil_removal(&self, face: StencilFace) -> Result<()> {
        self.set_portal_stencil_op(
            "enable_portal_stencil_removal",
            face,
            StencilOp::Decrement,
            self.config().full_stencil_mask,
        )
    }

    /// Stop modifying the stencil buffer for `face` (keep on every outcome,
    /// write mask 0)
    pub fn disable_portal_stencil_writing(&self, face: StencilFace) -> Result<()> {
        self.set_portal_stencil_op("disable_portal_stencil_writing", face, StencilOp::Keep, 0)
    }

    /// Configure the stencil test for subsequent draws of `face`
    ///
    /// With `pass_if_less`, a fragment passes where the stored count is at
    /// most `bits` (content visible through portals up to that depth).
    /// Otherwise it passes only where the count equals `bits` (content of
    /// exactly one nesting level).
    pub fn set_stencil_pass_bits(&self, face: StencilFace, bits: i32, pass_if_less: bool) -> Result<()> {
        // The test reads `reference F stored`, so "stored <= bits" is
        // "bits >= stored"
        let func = if pass_if_less {
            CompareFunction::GreaterEqual
        } else {
            CompareFunction::Equal
        };
        let read_mask = self.config().full_stencil_mask;
        self.with_graphics_device("set_stencil_pass_bits", |device| {
            device.set_stencil_func(face, func, bits, read_mask);
            Ok(())
        })?;
        Ok(())
    }

    fn set_portal_stencil_op(&self, operation: &str, face: StencilFace, op: StencilOp, write_mask: u32) -> Result<()> {
        self.with_graphics_device(operation, |device| {
            device.set_stencil_op(face, StencilOps::on_pass(op));
            device.set_stencil_write_mask(face, write_mask);
            Ok(())
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "portal_stencil_tests.rs"]
mod tests;
