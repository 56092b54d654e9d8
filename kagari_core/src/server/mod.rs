//! Server-side codec configuration.
//!
//! Two transport variants share the registration logic in
//! [`crate::codec::register_hypermedia_codecs`]: the blocking
//! [`ConverterRegistry`] for request/response bodies held fully in memory,
//! and the [`StreamingCodecConfigurer`] for connections whose bodies arrive
//! over async readers.

pub mod converters;
pub mod streaming;

pub use converters::ConverterRegistry;
pub use streaming::{StreamingCodec, StreamingCodecConfigurer};
