/// GL Debug Output - routes KHR_debug messages into the engine log
///
/// Only compiled with the `gl-debug` feature. High severity messages are
/// logged as errors, medium as warnings, the rest at debug/trace level.

use std::sync::atomic::{AtomicU32, Ordering};
use colored::*;
use glow::HasContext;
use lumen_3d_engine::{engine_debug, engine_error, engine_trace, engine_warn};

/// Global debug message statistics
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Snapshot of the debug message counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub notifications: u32,
}

impl DebugStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.notifications
    }
}

struct DebugStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    notifications: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            notifications: AtomicU32::new(0),
        }
    }

    fn record(&self, severity: u32) {
        let counter = match severity {
            glow::DEBUG_SEVERITY_HIGH => &self.errors,
            glow::DEBUG_SEVERITY_MEDIUM => &self.warnings,
            glow::DEBUG_SEVERITY_LOW => &self.info,
            _ => &self.notifications,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> DebugStats {
        DebugStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.notifications.store(0, Ordering::Relaxed);
    }
}

/// Install the debug callback on a context, if the context supports it
pub(crate) fn install_debug_callback(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        engine_warn!("lumen3d::gl", "GL debug output requested but not supported by this context");
        return;
    }

    DEBUG_STATS.reset();
    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|source, kind, id, severity, message| {
            log_debug_message(source, kind, id, severity, message);
        });
    }
    engine_debug!("lumen3d::gl", "GL debug output enabled");
}

fn log_debug_message(source: u32, kind: u32, id: u32, severity: u32, message: &str) {
    DEBUG_STATS.record(severity);
    match severity {
        glow::DEBUG_SEVERITY_HIGH => engine_error!("lumen3d::gl",
            "[0x{:X}/0x{:X} #{}] {}", source, kind, id, message),
        glow::DEBUG_SEVERITY_MEDIUM => engine_warn!("lumen3d::gl",
            "[0x{:X}/0x{:X} #{}] {}", source, kind, id, message),
        glow::DEBUG_SEVERITY_LOW => engine_debug!("lumen3d::gl",
            "[0x{:X}/0x{:X} #{}] {}", source, kind, id, message),
        _ => engine_trace!("lumen3d::gl", "{}", message),
    }
}

/// Get current debug message statistics
pub fn get_debug_stats() -> DebugStats {
    DEBUG_STATS.get_stats()
}

/// Print a debug message statistics report
pub fn print_debug_stats_report() {
    let stats = get_debug_stats();

    if stats.total() == 0 {
        println!("\n{}", "✓ No GL debug messages".green().bold());
        return;
    }

    println!("\n{}", "=== GL Debug Report ===".bright_blue().bold());
    if stats.errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), stats.errors);
    }
    if stats.warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), stats.warnings);
    }
    if stats.info > 0 {
        println!("  {} {}", "Info:".cyan(), stats.info);
    }
    if stats.notifications > 0 {
        println!("  {} {}", "Notifications:".bright_black(), stats.notifications);
    }
    println!("  {} {}", "Total:".white().bold(), stats.total());
    println!("{}\n", "=======================".bright_blue().bold());
}
