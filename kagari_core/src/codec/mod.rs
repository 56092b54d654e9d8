//! Codec pipeline primitives.
//!
//! A codec is a paired reader (deserializer) and writer (serializer) bound
//! to one or more media types. The [`CodecPipeline`] is the ordered sequence
//! the owning transport consults to pick a converter: the first entry whose
//! media types match wins, so front-of-sequence entries take precedence.

pub mod registrar;

pub mod test; // Behavioral tests for codec registration

use std::fmt;
use std::io;
use std::sync::Arc;

use bytes::Bytes;

use crate::document::Representation;
use crate::media::{hypermedia_universe, MediaType};
use crate::serializer::SerializerConfig;

pub use registrar::{register_hypermedia_codecs, CodecSink, RegistrarError};

/// Errors raised while encoding or decoding a body
#[derive(Debug)]
pub enum CodecError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    DecodingFailed(String),
    EncodingFailed(String),
    UnsupportedMediaType(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(err) => write!(f, "I/O error: {}", err),
            Self::JsonError(err) => write!(f, "JSON error: {}", err),
            Self::DecodingFailed(err) => write!(f, "Body decoding failed: {}", err),
            Self::EncodingFailed(err) => write!(f, "Body encoding failed: {}", err),
            Self::UnsupportedMediaType(media_type) => {
                write!(f, "No codec registered for media type: {}", media_type)
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        Self::IoError(err)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err)
    }
}

/// Deserializes a representation from raw body bytes
pub trait BodyReader: Send + Sync {
    /// The media types this reader accepts
    fn readable_types(&self) -> Vec<MediaType>;

    /// Decode a representation from a complete body
    fn read(&self, body: &[u8]) -> Result<Representation, CodecError>;
}

/// Serializes a representation into body bytes
pub trait BodyWriter: Send + Sync {
    /// The media types this writer produces
    fn writable_types(&self) -> Vec<MediaType>;

    /// Encode a representation into a complete body
    fn write(&self, representation: &Representation) -> Result<Bytes, CodecError>;
}

/// One pipeline triple: media types, reader, writer. The serializer config
/// is retained so the already-registered scan can inspect its module marker.
#[derive(Clone)]
pub struct CodecEntry {
    media_types: Vec<MediaType>,
    reader: Arc<dyn BodyReader>,
    writer: Arc<dyn BodyWriter>,
    serializer: SerializerConfig,
}

impl CodecEntry {
    pub fn new(
        media_types: Vec<MediaType>,
        reader: Arc<dyn BodyReader>,
        writer: Arc<dyn BodyWriter>,
        serializer: SerializerConfig,
    ) -> Self {
        Self {
            media_types,
            reader,
            writer,
            serializer,
        }
    }

    pub fn media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    pub fn reader(&self) -> &Arc<dyn BodyReader> {
        &self.reader
    }

    pub fn writer(&self) -> &Arc<dyn BodyWriter> {
        &self.writer
    }

    pub fn serializer(&self) -> &SerializerConfig {
        &self.serializer
    }

    /// Whether this entry serves the given media type (essence match)
    pub fn supports(&self, media_type: &MediaType) -> bool {
        self.media_types
            .iter()
            .any(|candidate| candidate.compatible_with(media_type))
    }

    /// Whether this entry declares any of the given media types verbatim
    pub fn declares_any_of(&self, media_types: &[MediaType]) -> bool {
        self.media_types
            .iter()
            .any(|candidate| media_types.contains(candidate))
    }
}

impl fmt::Debug for CodecEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecEntry")
            .field("media_types", &self.media_types)
            .field("serializer", &self.serializer)
            .finish()
    }
}

/// Ordered codec sequence consulted front to back. Mutated once during
/// registration and read-only afterwards; readers may share it freely.
#[derive(Debug, Clone, Default)]
pub struct CodecPipeline {
    entries: Vec<CodecEntry>,
}

impl CodecPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry at position 0 so it outranks everything registered
    /// before it
    pub fn insert_front(&mut self, entry: CodecEntry) {
        crate::debug_log!(
            "Inserting codec for {:?} at the front of the pipeline",
            entry.media_types()
        );
        self.entries.insert(0, entry);
    }

    /// Append an entry behind everything already present (generic codecs)
    pub fn push_back(&mut self, entry: CodecEntry) {
        self.entries.push(entry);
    }

    /// First entry serving the media type, per pipeline precedence
    pub fn select(&self, media_type: &MediaType) -> Option<&CodecEntry> {
        self.entries.iter().find(|entry| entry.supports(media_type))
    }

    /// Every declared media type, in pipeline order
    pub fn supported_types(&self) -> Vec<MediaType> {
        self.entries
            .iter()
            .flat_map(|entry| entry.media_types().iter().cloned())
            .collect()
    }

    pub fn entries(&self) -> &[CodecEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CodecSink for CodecPipeline {
    fn has_hypermedia_entry(&self) -> bool {
        let universe = hypermedia_universe();
        self.entries.iter().any(|entry| {
            entry.serializer().is_hypermedia_registered() && entry.declares_any_of(&universe)
        })
    }

    fn insert_front(&mut self, entry: CodecEntry) {
        CodecPipeline::insert_front(self, entry);
    }
}
