//! Debug logging module for development-time diagnostics
//!
//! This module provides conditional compilation macros that enable detailed logging
//! during development while ensuring zero runtime overhead in production builds.
//! All macros are controlled by the `dev-log` feature flag.
//!
//! # Usage
//!
//! Enable the feature in your Cargo.toml or via command line:
//! ```bash
//! cargo run --features "dev-log"
//! ```
//!
//! Then import and use the macros:
//! ```rust
//! use kagari_core::{debug_log, debug_error};
//!
//! debug_log!("Registered codec for {}", "application/hal+json");
//! ```

/// General-purpose debug logging macro
///
/// Outputs informational messages prefixed with `[DEBUG]`.
/// Use for general application state and flow information.
#[macro_export]
#[cfg(feature = "dev-log")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        println!("[DEBUG] {}", format!($($arg)*));
    };
}

#[macro_export]
#[cfg(not(feature = "dev-log"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

/// Error logging macro for recoverable errors
///
/// Outputs to stderr with `[ERROR]` prefix.
/// Use for errors that don't terminate the application.
#[macro_export]
#[cfg(feature = "dev-log")]
macro_rules! debug_error {
    ($($arg:tt)*) => {
        eprintln!("[ERROR] {}", format!($($arg)*));
    };
}

#[macro_export]
#[cfg(not(feature = "dev-log"))]
macro_rules! debug_error {
    ($($arg:tt)*) => {};
}

/// Warning logging macro for potentially problematic conditions
///
/// Outputs to stderr with `[WARN]` prefix.
/// Use for deprecations or recoverable problems.
#[macro_export]
#[cfg(feature = "dev-log")]
macro_rules! debug_warn {
    ($($arg:tt)*) => {
        eprintln!("[WARN] {}", format!($($arg)*));
    };
}

#[macro_export]
#[cfg(not(feature = "dev-log"))]
macro_rules! debug_warn {
    ($($arg:tt)*) => {};
}

/// Detailed trace logging for verbose debugging
///
/// Outputs with `[TRACE]` prefix.
/// Use for detailed execution flow and state transitions.
#[macro_export]
#[cfg(feature = "dev-log")]
macro_rules! debug_trace {
    ($($arg:tt)*) => {
        println!("[TRACE] {}", format!($($arg)*));
    };
}

#[macro_export]
#[cfg(not(feature = "dev-log"))]
macro_rules! debug_trace {
    ($($arg:tt)*) => {};
}
