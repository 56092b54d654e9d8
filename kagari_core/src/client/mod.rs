//! Client-side hypermedia support.
//!
//! Clients bundle their codecs into [`ExchangeStrategies`], built once and
//! shared by every request the client sends. [`HttpClient`] shows the
//! intended wiring: construct strategies with the hypermedia flavors the
//! service speaks, then encode request bodies and decode response bodies
//! through them.

use std::sync::Arc;

use bytes::Bytes;

use crate::codec::{
    register_hypermedia_codecs, BodyReader, BodyWriter, CodecError, CodecPipeline, RegistrarError,
};
use crate::document::Representation;
use crate::media::{EnabledTypeSet, MediaType};
use crate::provider::HypermediaProviders;
use crate::serializer::SerializerConfig;

/// Immutable codec bundle a client carries for the lifetime of its
/// connections
#[derive(Debug, Clone, Default)]
pub struct ExchangeStrategies {
    pipeline: CodecPipeline,
}

impl ExchangeStrategies {
    /// Strategies with no codecs at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build strategies around a pre-populated pipeline
    pub fn with_pipeline(pipeline: CodecPipeline) -> Self {
        Self { pipeline }
    }

    /// Build strategies carrying one codec per enabled hypermedia flavor
    pub fn hypermedia(
        enabled: &EnabledTypeSet,
        base: Option<&SerializerConfig>,
        providers: &HypermediaProviders,
    ) -> Result<Self, RegistrarError> {
        let mut pipeline = CodecPipeline::new();
        register_hypermedia_codecs(&mut pipeline, enabled, base, providers)?;
        Ok(Self { pipeline })
    }

    /// Every media type these strategies can exchange
    pub fn supported_types(&self) -> Vec<MediaType> {
        self.pipeline.supported_types()
    }

    pub fn reader_for(&self, media_type: &MediaType) -> Option<&Arc<dyn BodyReader>> {
        self.pipeline.select(media_type).map(|entry| entry.reader())
    }

    pub fn writer_for(&self, media_type: &MediaType) -> Option<&Arc<dyn BodyWriter>> {
        self.pipeline.select(media_type).map(|entry| entry.writer())
    }

    pub fn pipeline(&self) -> &CodecPipeline {
        &self.pipeline
    }
}

/// Hypermedia-aware HTTP client front. Holds the negotiated strategies and
/// the connection coordinates; the transport itself lives with the caller.
#[derive(Debug, Clone)]
pub struct HttpClient {
    name: String,
    base_url: String,
    strategies: ExchangeStrategies,
}

impl HttpClient {
    pub fn builder(name: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn strategies(&self) -> &ExchangeStrategies {
        &self.strategies
    }

    /// Media types to advertise in an Accept header, in precedence order
    pub fn accepted_types(&self) -> Vec<MediaType> {
        self.strategies.supported_types()
    }

    /// Encode a request body for the given media type
    pub fn encode_body(
        &self,
        media_type: &MediaType,
        representation: &Representation,
    ) -> Result<Bytes, CodecError> {
        let writer = self
            .strategies
            .writer_for(media_type)
            .ok_or_else(|| CodecError::UnsupportedMediaType(media_type.to_string()))?;
        writer.write(representation)
    }

    /// Decode a response body of the given media type
    pub fn decode_body(
        &self,
        media_type: &MediaType,
        body: &[u8],
    ) -> Result<Representation, CodecError> {
        let reader = self
            .strategies
            .reader_for(media_type)
            .ok_or_else(|| CodecError::UnsupportedMediaType(media_type.to_string()))?;
        reader.read(body)
    }
}

/// Builder for [`HttpClient`]. Strategies default to empty until
/// [`HttpClientBuilder::with_hypermedia`] installs the hypermedia codecs.
#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    name: String,
    base_url: Option<String>,
    strategies: ExchangeStrategies,
}

impl HttpClientBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: None,
            strategies: ExchangeStrategies::empty(),
        }
    }

    /// Set the base URL requests are resolved against (chainable)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Replace the strategies wholesale (chainable)
    pub fn strategies(mut self, strategies: ExchangeStrategies) -> Self {
        self.strategies = strategies;
        self
    }

    /// Rebuild the strategies with hypermedia codecs for the enabled
    /// flavors (chainable)
    pub fn with_hypermedia(
        mut self,
        enabled: &EnabledTypeSet,
        base: Option<&SerializerConfig>,
        providers: &HypermediaProviders,
    ) -> Result<Self, RegistrarError> {
        self.strategies = ExchangeStrategies::hypermedia(enabled, base, providers)?;
        Ok(self)
    }

    pub fn build(self) -> HttpClient {
        HttpClient {
            name: self.name,
            base_url: self.base_url.unwrap_or_else(|| "http://localhost".to_string()),
            strategies: self.strategies,
        }
    }
}
