pub mod prelude;

pub use kagari_core::media::{
    application_json, collection_json, hal_forms_json, hal_json, hal_json_utf8,
    hypermedia_universe, uber_json,
};
pub use kagari_core::media::{EnabledTypeSet, HypermediaType, MediaType, MediaTypeRegistry};

pub use kagari_core::document::{
    EmbeddedGroup, EmbeddedRel, Link, Representation, Template, TemplateProperty,
};

pub use kagari_core::provider::{
    CurieProvider, DefaultCurieProvider, DefaultRelationProvider, HypermediaProviders,
    MessageBundle, MessageResolver, RelationProvider,
};

pub use kagari_core::serializer::{
    serializer_for, HalConfiguration, HalFormsConfiguration, SerializerConfig,
};

pub use kagari_core::codec::{
    register_hypermedia_codecs, BodyReader, BodyWriter, CodecEntry, CodecError, CodecPipeline,
    CodecSink, RegistrarError,
};

pub use kagari_core::format::{
    CollectionJsonCodec, GenericJsonCodec, HalCodec, HalFormsCodec, UberCodec,
};

pub use kagari_core::server::{ConverterRegistry, StreamingCodec, StreamingCodecConfigurer};
pub use kagari_core::client::{ExchangeStrategies, HttpClient, HttpClientBuilder};

pub use kagari_core;
pub use serde_json;
