pub use once_cell::sync::Lazy;
pub use crate::{EnabledTypeSet, HypermediaType, MediaType};
pub use crate::{hal_forms_json, hal_json, hal_json_utf8, collection_json, uber_json};
pub use crate::{Link, Representation, Template, TemplateProperty};
pub use crate::{DefaultCurieProvider, DefaultRelationProvider, HypermediaProviders, MessageBundle};
pub use crate::{CurieProvider, MessageResolver, RelationProvider};
pub use crate::{HalConfiguration, HalFormsConfiguration, SerializerConfig};
pub use crate::{register_hypermedia_codecs, CodecEntry, CodecPipeline, CodecSink};
pub use crate::{ConverterRegistry, StreamingCodec, StreamingCodecConfigurer};
pub use crate::{ExchangeStrategies, HttpClient};

pub use std::sync::Arc;
pub use tokio;

pub type SStrategies = Lazy<Arc<ExchangeStrategies>>;
pub type SRegistry = Lazy<Arc<ConverterRegistry>>;
