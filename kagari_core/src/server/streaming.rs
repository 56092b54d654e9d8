//! Async server codec configurer.
//!
//! Streaming transports keep separate reader and writer registries and own
//! a default-codec switch: once hypermedia codecs are registered, framework
//! defaults are turned off so the hypermedia entries are the only JSON
//! codecs in play.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::codec::{
    register_hypermedia_codecs, CodecEntry, CodecError, CodecPipeline, CodecSink, RegistrarError,
};
use crate::document::Representation;
use crate::media::{EnabledTypeSet, MediaType};
use crate::provider::HypermediaProviders;
use crate::serializer::SerializerConfig;

/// Codec that works against async byte streams. Bodies are buffered in
/// full before decoding; representations are encoded in full before the
/// first write.
#[async_trait]
pub trait StreamingCodec: Send + Sync {
    async fn decode_stream(
        &self,
        media_type: &MediaType,
        input: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<Representation, CodecError>;

    async fn encode_stream(
        &self,
        media_type: &MediaType,
        representation: &Representation,
        output: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<(), CodecError>;
}

/// Codec configuration for streaming servers. Readers and writers are
/// tracked separately because a transport may decode and encode over
/// different connections.
#[derive(Debug, Clone)]
pub struct StreamingCodecConfigurer {
    decoders: CodecPipeline,
    encoders: CodecPipeline,
    register_defaults: bool,
}

impl Default for StreamingCodecConfigurer {
    fn default() -> Self {
        Self {
            decoders: CodecPipeline::new(),
            encoders: CodecPipeline::new(),
            register_defaults: true,
        }
    }
}

impl StreamingCodecConfigurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a non-hypermedia codec to both registries
    pub fn add_codec(&mut self, entry: CodecEntry) {
        self.decoders.push_back(entry.clone());
        self.encoders.push_back(entry);
    }

    /// Prepend hypermedia codecs for every enabled flavor and switch the
    /// framework defaults off once any flavor is in place
    pub fn configure_hypermedia(
        &mut self,
        enabled: &EnabledTypeSet,
        base: Option<&SerializerConfig>,
        providers: &HypermediaProviders,
    ) -> Result<(), RegistrarError> {
        register_hypermedia_codecs(self, enabled, base, providers)?;
        if !enabled.is_empty() {
            self.register_defaults = false;
        }
        Ok(())
    }

    /// Whether the transport should still install its default codecs
    pub fn register_defaults(&self) -> bool {
        self.register_defaults
    }

    pub fn decoders(&self) -> &CodecPipeline {
        &self.decoders
    }

    pub fn encoders(&self) -> &CodecPipeline {
        &self.encoders
    }
}

impl CodecSink for StreamingCodecConfigurer {
    /// The decoder side is scanned; entries always land in both registries
    /// together
    fn has_hypermedia_entry(&self) -> bool {
        self.decoders.has_hypermedia_entry()
    }

    fn insert_front(&mut self, entry: CodecEntry) {
        self.decoders.insert_front(entry.clone());
        self.encoders.insert_front(entry);
    }
}

#[async_trait]
impl StreamingCodec for StreamingCodecConfigurer {
    async fn decode_stream(
        &self,
        media_type: &MediaType,
        input: &mut (dyn AsyncRead + Unpin + Send),
    ) -> Result<Representation, CodecError> {
        let entry = self
            .decoders
            .select(media_type)
            .ok_or_else(|| CodecError::UnsupportedMediaType(media_type.to_string()))?;
        let mut body = Vec::new();
        input.read_to_end(&mut body).await?;
        entry.reader().read(&body)
    }

    async fn encode_stream(
        &self,
        media_type: &MediaType,
        representation: &Representation,
        output: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> Result<(), CodecError> {
        let entry = self
            .encoders
            .select(media_type)
            .ok_or_else(|| CodecError::UnsupportedMediaType(media_type.to_string()))?;
        let body = entry.writer().write(representation)?;
        output.write_all(&body).await?;
        output.flush().await?;
        Ok(())
    }
}
