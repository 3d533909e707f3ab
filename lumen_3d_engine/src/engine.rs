/// Lumen3D Engine - Singleton manager for engine subsystems
///
/// This module provides global singleton management for the target manager
/// and the logger. It uses thread-safe static storage with RwLock for safe
/// concurrent access.

use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::SystemTime;
use crate::error::{Error, Result};
use crate::graphics_device::DriverHandle;
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::target::{TargetConfig, TargetManager};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Target manager singleton
    target_manager: RwLock<Option<Arc<Mutex<TargetManager>>>>,
}

impl EngineState {
    /// Create a new empty engine state
    fn new() -> Self {
        Self {
            target_manager: RwLock::new(None),
        }
    }
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```no_run
/// use lumen_3d_engine::lumen3d::{Engine, target::{RenderTargetKind, TargetConfig, Viewport}};
/// # fn driver() -> lumen_3d_engine::lumen3d::render::DriverHandle { unimplemented!() }
///
/// Engine::initialize()?;
/// Engine::create_target_manager(driver(), TargetConfig::default())?;
///
/// let manager = Engine::target_manager()?;
/// let mut manager = manager.lock().unwrap();
/// let shadow = manager.create_render_target("shadow", RenderTargetKind::DepthTexture, 1)?;
/// shadow.set_viewport(Viewport::from_size(1024, 1024))?;
///
/// Engine::shutdown();
/// # Ok::<(), lumen_3d_engine::lumen3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("lumen3d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("lumen3d::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("lumen3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    /// Initialize the engine
    ///
    /// Must be called once at application startup before creating any
    /// subsystem. Calling it again is harmless.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shutdown the engine and destroy all singletons
    ///
    /// Render targets release their GPU resources here, so the driver must
    /// still be alive if they are to be deleted rather than abandoned.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut tm) = state.target_manager.write() {
                *tm = None;
            }
        }
    }

    // ===== TARGET MANAGER API =====

    /// Create and register the target manager singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A target manager already exists
    pub fn create_target_manager(driver: DriverHandle, config: TargetConfig) -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.target_manager.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TargetManager lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("TargetManager already exists. Call Engine::destroy_target_manager() first.".to_string())
            ));
        }

        *lock = Some(Arc::new(Mutex::new(TargetManager::new(driver, config))));

        crate::engine_info!("lumen3d::Engine", "TargetManager singleton created successfully");

        Ok(())
    }

    /// Get the target manager singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - The target manager has not been created
    pub fn target_manager() -> Result<Arc<Mutex<TargetManager>>> {
        let state = Self::state()?;

        let lock = state.target_manager.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TargetManager lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("TargetManager not created. Call Engine::create_target_manager() first.".to_string())
            ))
    }

    /// Destroy the target manager singleton
    ///
    /// Existing references stay valid until dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized
    pub fn destroy_target_manager() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.target_manager.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("TargetManager lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("lumen3d::Engine", "TargetManager singleton destroyed");

        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut tm) = state.target_manager.write() {
                *tm = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger,
    /// platform log, etc.)
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger::default());
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
