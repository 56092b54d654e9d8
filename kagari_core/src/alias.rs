//! Type aliases for Kagari core.
//!
//! This module provides centralized type aliases used throughout the Kagari crates.
//! All internal code MUST import from this module to ensure consistency.
//!
//! ## Concurrency Primitives
//!
//! We use `parking_lot` for all synchronization primitives due to:
//! - **No lock poisoning**: Panics don't poison the lock (safer under panic)
//! - **Better performance**: 2-10x faster than std::sync
//! - **Smaller memory footprint**: 1 byte vs 16-24 bytes for std::sync::RwLock

// ============ Concurrency Primitives ============

/// Priority-aware RwLock (parking_lot implementation).
///
/// Use this instead of `std::sync::RwLock` in all Kagari core code.
///
/// # Example
///
/// ```rust
/// use kagari_core::alias::PRwLock;
///
/// let data = PRwLock::new(42);
///
/// // Read access (no unwrap needed!)
/// let r = data.read();
/// assert_eq!(*r, 42);
/// ```
pub use parking_lot::RwLock as PRwLock;

/// Read guard for [`PRwLock`].
pub use parking_lot::RwLockReadGuard as PRwLockReadGuard;

/// Write guard for [`PRwLock`].
pub use parking_lot::RwLockWriteGuard as PRwLockWriteGuard;

/// Priority-aware Mutex (parking_lot implementation).
///
/// Similar to [`PRwLock`], this never poisons and performs better
/// than `std::sync::Mutex`.
pub use parking_lot::Mutex as PMutex;

/// Mutex guard for [`PMutex`].
pub use parking_lot::MutexGuard as PMutexGuard;
