// Type aliases (must be declared before other modules that use it)
pub mod alias;

pub mod media;
pub mod document;
pub mod provider;
pub mod serializer;
pub mod format;
pub mod codec;
pub mod server;
pub mod client;
pub mod debug;

// Re-export commonly used type aliases
pub use alias::{PRwLock, PRwLockReadGuard, PRwLockWriteGuard};
