//! Blocking server converter registry.

use crate::codec::{
    register_hypermedia_codecs, CodecEntry, CodecError, CodecPipeline, RegistrarError,
};
use crate::document::Representation;
use crate::media::{EnabledTypeSet, MediaType};
use crate::provider::HypermediaProviders;
use crate::serializer::SerializerConfig;

use bytes::Bytes;

/// Ordered converter collection for servers that buffer whole bodies.
/// Wraps a [`CodecPipeline`] and exposes the registration hook the server
/// calls while assembling its converter chain.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    pipeline: CodecPipeline,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a non-hypermedia converter behind everything registered so far
    pub fn add_converter(&mut self, entry: CodecEntry) {
        self.pipeline.push_back(entry);
    }

    /// Prepend hypermedia converters for every enabled flavor.
    ///
    /// Runs during converter-chain assembly and again on any later
    /// reconfiguration; repeat calls are no-ops once hypermedia converters
    /// are present.
    pub fn extend_converters(
        &mut self,
        enabled: &EnabledTypeSet,
        base: Option<&SerializerConfig>,
        providers: &HypermediaProviders,
    ) -> Result<(), RegistrarError> {
        register_hypermedia_codecs(&mut self.pipeline, enabled, base, providers)
    }

    /// Decode a body with the first converter serving the media type
    pub fn read(
        &self,
        media_type: &MediaType,
        body: &[u8],
    ) -> Result<Representation, CodecError> {
        let entry = self
            .pipeline
            .select(media_type)
            .ok_or_else(|| CodecError::UnsupportedMediaType(media_type.to_string()))?;
        entry.reader().read(body)
    }

    /// Encode a representation with the first converter serving the media
    /// type
    pub fn write(
        &self,
        media_type: &MediaType,
        representation: &Representation,
    ) -> Result<Bytes, CodecError> {
        let entry = self
            .pipeline
            .select(media_type)
            .ok_or_else(|| CodecError::UnsupportedMediaType(media_type.to_string()))?;
        entry.writer().write(representation)
    }

    pub fn supported_types(&self) -> Vec<MediaType> {
        self.pipeline.supported_types()
    }

    pub fn pipeline(&self) -> &CodecPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::document::Link;
    use crate::media::{hal_json, HypermediaType};
    use crate::provider::{DefaultRelationProvider, MessageBundle};

    fn providers() -> HypermediaProviders {
        HypermediaProviders::new()
            .relation(Arc::new(DefaultRelationProvider::new()))
            .messages(Arc::new(MessageBundle::new()))
    }

    #[test]
    fn test_extend_converters_registers_hal() {
        let mut registry = ConverterRegistry::new();
        registry
            .extend_converters(
                &EnabledTypeSet::of(&[HypermediaType::Hal]),
                None,
                &providers(),
            )
            .unwrap();
        assert_eq!(registry.supported_types(), HypermediaType::Hal.media_types());
    }

    #[test]
    fn test_round_trip_through_the_registry() {
        let mut registry = ConverterRegistry::new();
        registry
            .extend_converters(
                &EnabledTypeSet::of(&[HypermediaType::Hal]),
                None,
                &providers(),
            )
            .unwrap();

        let representation = Representation::new()
            .property("name", json!("kagari"))
            .link(Link::self_link("/things/1"));
        let body = registry.write(&hal_json(), &representation).unwrap();
        let decoded = registry.read(&hal_json(), &body).unwrap();
        assert_eq!(decoded, representation);
    }

    #[test]
    fn test_unknown_media_type_is_rejected() {
        let registry = ConverterRegistry::new();
        let result = registry.read(&MediaType::new("text", "plain"), b"hello");
        assert!(matches!(result, Err(CodecError::UnsupportedMediaType(_))));
    }
}
