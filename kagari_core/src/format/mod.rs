//! Hypermedia format modules.
//!
//! One encode/decode module per flavor, all operating on
//! [`Representation`](crate::document::Representation) through `serde_json`
//! trees. [`GenericJsonCodec`] is the plain-JSON converter a transport
//! usually carries before hypermedia support is registered.

pub mod hal;
pub mod hal_forms;
pub mod collection_json;
pub mod uber;

pub use hal::HalCodec;
pub use hal_forms::HalFormsCodec;
pub use collection_json::CollectionJsonCodec;
pub use uber::UberCodec;

use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::codec::{BodyReader, BodyWriter, CodecError};
use crate::document::{EmbeddedGroup, EmbeddedRel, Representation};
use crate::media::{application_json, MediaType};
use crate::provider::{DefaultRelationProvider, RelationProvider};
use crate::serializer::SerializerConfig;

/// Resolve the relation name an embedded group is rendered under.
/// Typed groups go through the relation provider; without one the default
/// derivation applies.
pub(crate) fn resolve_embedded_rel(
    group: &EmbeddedGroup,
    relation: Option<&Arc<dyn RelationProvider>>,
) -> String {
    match &group.rel {
        EmbeddedRel::Named(rel) => rel.clone(),
        EmbeddedRel::Typed(type_name) => {
            let fallback = DefaultRelationProvider;
            let provider: &dyn RelationProvider = match relation {
                Some(provider) => provider.as_ref(),
                None => &fallback,
            };
            if group.resources.len() == 1 {
                provider.item_relation(type_name)
            } else {
                provider.collection_relation(type_name)
            }
        }
    }
}

/// Plain JSON converter: properties only, no links, no embedded resources.
/// Its serializer never carries a hypermedia module, so it is invisible to
/// the already-registered scan.
#[derive(Debug, Clone)]
pub struct GenericJsonCodec {
    serializer: SerializerConfig,
    media_types: Vec<MediaType>,
}

impl GenericJsonCodec {
    pub fn new(serializer: SerializerConfig) -> Self {
        Self {
            serializer,
            media_types: vec![application_json()],
        }
    }

    /// Declare this converter for additional media types (chainable).
    /// A foreign JSON converter may well claim a hypermedia media type
    /// without understanding hypermedia documents.
    pub fn also_for(mut self, media_type: MediaType) -> Self {
        self.media_types.push(media_type);
        self
    }

    pub fn serializer(&self) -> &SerializerConfig {
        &self.serializer
    }
}

impl BodyReader for GenericJsonCodec {
    fn readable_types(&self) -> Vec<MediaType> {
        self.media_types.clone()
    }

    fn read(&self, body: &[u8]) -> Result<Representation, CodecError> {
        let value: Value = serde_json::from_slice(body)?;
        let object = value
            .as_object()
            .ok_or_else(|| CodecError::DecodingFailed("Expected a JSON object".to_string()))?;
        let mut representation = Representation::new();
        representation.properties = object.clone();
        Ok(representation)
    }
}

impl BodyWriter for GenericJsonCodec {
    fn writable_types(&self) -> Vec<MediaType> {
        self.media_types.clone()
    }

    fn write(&self, representation: &Representation) -> Result<Bytes, CodecError> {
        self.serializer
            .to_bytes(&Value::Object(representation.properties.clone()))
    }
}
