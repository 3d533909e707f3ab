/// Central render target manager for the engine.
///
/// Manages named render targets (shadow maps, offscreen color buffers,
/// portal stencil buffers) and drives them together through a graphics
/// context loss.

use std::collections::hash_map::Entry;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::graphics_device::DriverHandle;
use crate::{engine_bail, engine_debug, engine_info};
use super::render_target::{RenderTarget, RenderTargetDesc, RenderTargetKind};
use super::target_config::TargetConfig;

/// Target manager singleton (managed by Engine)
///
/// Every target it creates shares the manager's driver and config.
pub struct TargetManager {
    // Dropped before `driver` so targets can still delete their GPU objects
    render_targets: FxHashMap<String, RenderTarget>,
    driver: DriverHandle,
    config: TargetConfig,
}

impl TargetManager {
    /// Create a new empty target manager
    pub fn new(driver: DriverHandle, config: TargetConfig) -> Self {
        Self {
            render_targets: FxHashMap::default(),
            driver,
            config,
        }
    }

    /// Config handed to every created target
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Create a new named render target with no GPU resources
    ///
    /// The target builds its resources on its first `set_viewport()`.
    ///
    /// # Errors
    ///
    /// Returns an error if a render target with the same name already exists,
    /// or if `layer_count` is invalid for `kind`.
    pub fn create_render_target(
        &mut self,
        name: &str,
        kind: RenderTargetKind,
        layer_count: u32,
    ) -> Result<&mut RenderTarget> {
        match self.render_targets.entry(name.to_string()) {
            Entry::Occupied(_) => engine_bail!("lumen3d::TargetManager",
                "RenderTarget '{}' already exists", name),
            Entry::Vacant(slot) => {
                let desc = RenderTargetDesc {
                    kind,
                    layer_count,
                    config: self.config,
                };
                let target = RenderTarget::new(desc, &self.driver)?;
                Ok(slot.insert(target))
            }
        }
    }

    /// Get a render target by name
    pub fn render_target(&self, name: &str) -> Option<&RenderTarget> {
        self.render_targets.get(name)
    }

    /// Get a mutable render target by name
    pub fn render_target_mut(&mut self, name: &str) -> Option<&mut RenderTarget> {
        self.render_targets.get_mut(name)
    }

    /// Remove a render target by name
    ///
    /// Returns the removed render target, or None if not found. Its GPU
    /// resources are released when the returned value is dropped.
    pub fn remove_render_target(&mut self, name: &str) -> Option<RenderTarget> {
        self.render_targets.remove(name)
    }

    /// Get the number of render targets
    pub fn render_target_count(&self) -> usize {
        self.render_targets.len()
    }

    /// Get all render target names
    pub fn render_target_names(&self) -> Vec<&str> {
        self.render_targets.keys().map(|k| k.as_str()).collect()
    }

    /// Remove all render targets
    pub fn clear(&mut self) {
        self.render_targets.clear();
    }

    /// Release the GPU resources of every target (context about to be lost)
    ///
    /// Every target is processed; the first error is returned.
    pub fn discard_all_framebuffers(&mut self) -> Result<()> {
        let mut first_error = None;
        for target in self.render_targets.values_mut() {
            if let Err(e) = target.discard_framebuffers() {
                first_error.get_or_insert(e);
            }
        }
        engine_info!("lumen3d::TargetManager", "Discarded framebuffers of {} render targets",
            self.render_targets.len());
        first_error.map_or(Ok(()), Err)
    }

    /// Rebuild the GPU resources of every target (new context available)
    ///
    /// Targets that never received a positive-size viewport are skipped.
    /// Every other target is processed; the first error is returned.
    pub fn restore_all_framebuffers(&mut self) -> Result<()> {
        let mut first_error = None;
        let mut restored = 0;
        for (name, target) in self.render_targets.iter_mut() {
            if !target.viewport().has_positive_size() {
                engine_debug!("lumen3d::TargetManager",
                    "Skipping restore of '{}': no viewport set yet", name);
                continue;
            }
            match target.restore_framebuffers() {
                Ok(()) => restored += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        engine_info!("lumen3d::TargetManager", "Restored framebuffers of {} render targets", restored);
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
#[path = "target_manager_tests.rs"]
mod tests;
