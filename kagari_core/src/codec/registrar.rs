//! Hypermedia codec registration.
//!
//! [`register_hypermedia_codecs`] is the single entry point every transport
//! variant (blocking server converters, streaming configurer, client
//! exchange strategies) delegates to. It validates the providers, builds
//! one codec entry per enabled flavor and inserts each at the front of the
//! sink, HAL family first, then Collection+JSON, then UBER. Because every
//! insertion lands at position 0, the last flavor registered ends up first
//! in the pipeline.

use std::fmt;
use std::sync::Arc;

use crate::codec::{BodyReader, BodyWriter, CodecEntry};
use crate::format::{CollectionJsonCodec, HalCodec, HalFormsCodec, UberCodec};
use crate::media::{EnabledTypeSet, HypermediaType};
use crate::provider::HypermediaProviders;
use crate::serializer::{serializer_for, HalConfiguration, HalFormsConfiguration, SerializerConfig};

/// Destination for hypermedia codec entries. Each transport variant adapts
/// its native converter collection behind this pair of operations.
pub trait CodecSink {
    /// Whether a hypermedia-marked entry declaring one of the hypermedia
    /// media types is already present. When true, registration is a no-op.
    fn has_hypermedia_entry(&self) -> bool;

    /// Insert an entry at the front so it outranks existing converters
    fn insert_front(&mut self, entry: CodecEntry);
}

/// Fatal registration failures. Both are raised before any entry is
/// inserted, so a failed registration leaves the sink untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    /// No message resolver was supplied. One is required regardless of
    /// which flavors are enabled.
    MissingMessageResolver,
    /// A HAL-family flavor is enabled but no relation provider was supplied
    MissingRelationProvider,
}

impl fmt::Display for RegistrarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMessageResolver => {
                write!(f, "Hypermedia registration requires a message resolver")
            }
            Self::MissingRelationProvider => write!(
                f,
                "HAL-based media types require a link relation provider"
            ),
        }
    }
}

impl std::error::Error for RegistrarError {}

/// Register codec entries for every enabled hypermedia flavor.
///
/// Calling this twice on the same sink is safe: the second call sees the
/// entries of the first and returns without touching the sink. An empty
/// enabled set is also a no-op, but still passes provider validation.
pub fn register_hypermedia_codecs(
    sink: &mut dyn CodecSink,
    enabled: &EnabledTypeSet,
    base: Option<&SerializerConfig>,
    providers: &HypermediaProviders,
) -> Result<(), RegistrarError> {
    if sink.has_hypermedia_entry() {
        crate::debug_log!("Hypermedia codecs already registered, skipping");
        return Ok(());
    }

    let messages = providers
        .messages
        .clone()
        .ok_or(RegistrarError::MissingMessageResolver)?;

    if enabled.any_hal_based() {
        // Validated before the first insertion, so a missing provider
        // leaves the sink untouched
        let relation = providers
            .relation
            .clone()
            .ok_or(RegistrarError::MissingRelationProvider)?;

        if enabled.contains(HypermediaType::Hal) {
            let serializer = serializer_for(base, HypermediaType::Hal);
            let codec = Arc::new(HalCodec::new(
                serializer.clone(),
                HalConfiguration::new(),
                providers.curie.clone(),
                relation.clone(),
                messages.clone(),
            ));
            sink.insert_front(CodecEntry::new(
                HypermediaType::Hal.media_types(),
                codec.clone() as Arc<dyn BodyReader>,
                codec as Arc<dyn BodyWriter>,
                serializer,
            ));
        }

        if enabled.contains(HypermediaType::HalForms) {
            let serializer = serializer_for(base, HypermediaType::HalForms);
            let codec = Arc::new(HalFormsCodec::new(
                serializer.clone(),
                HalFormsConfiguration::new(),
                providers.curie.clone(),
                relation,
                messages.clone(),
            ));
            sink.insert_front(CodecEntry::new(
                HypermediaType::HalForms.media_types(),
                codec.clone() as Arc<dyn BodyReader>,
                codec as Arc<dyn BodyWriter>,
                serializer,
            ));
        }
    }

    if enabled.contains(HypermediaType::CollectionJson) {
        let serializer = serializer_for(base, HypermediaType::CollectionJson);
        let codec = Arc::new(CollectionJsonCodec::new(
            serializer.clone(),
            messages.clone(),
        ));
        sink.insert_front(CodecEntry::new(
            HypermediaType::CollectionJson.media_types(),
            codec.clone() as Arc<dyn BodyReader>,
            codec as Arc<dyn BodyWriter>,
            serializer,
        ));
    }

    if enabled.contains(HypermediaType::Uber) {
        let serializer = serializer_for(base, HypermediaType::Uber);
        let codec = Arc::new(UberCodec::new(serializer.clone()));
        sink.insert_front(CodecEntry::new(
            HypermediaType::Uber.media_types(),
            codec.clone() as Arc<dyn BodyReader>,
            codec as Arc<dyn BodyWriter>,
            serializer,
        ));
    }

    Ok(())
}
