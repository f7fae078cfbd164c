#![deny(missing_docs)]
//! Shared logging utilities for the scroller workspace.
//!
//! Provides the `engine_*` macros used by the overlay crates, a per-thread
//! animation frame counter that prefixes frame-loop logs, and a test
//! initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Animation frame currently being processed on this thread.
    static FRAME: Cell<u64> = const { Cell::new(0) };
}

/// Records the animation frame the current thread is processing.
/// The overlay runtime calls this once per delivered frame.
pub fn set_frame(frame: u64) {
    FRAME.with(|v| v.set(frame));
}

/// Returns the frame recorded by [`set_frame`], or 0 before the first frame.
pub fn current_frame() -> u64 {
    FRAME.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Logs a trace-level message tagged with the current animation frame.
#[macro_export]
macro_rules! frame_trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        log::trace!(concat!("[frame {}] ", $fmt), $crate::current_frame() $(, $arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
