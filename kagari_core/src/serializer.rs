//! Serializer configuration shared by every hypermedia codec.
//!
//! A [`SerializerConfig`] is the base serializer the caller may supply at
//! registration time (absent means default). Each codec derives its own
//! variant from the shared base by registering a format module tag. Any
//! registered hypermedia module doubles as the sentinel the registrar scans
//! for to detect an already-configured pipeline.

use bytes::Bytes;
use serde_json::Value;

use crate::codec::CodecError;
use crate::media::HypermediaType;

/// Module tag for the HAL format module
pub const MODULE_HAL: &str = "hal";
/// Module tag for the HAL-FORMS format module
pub const MODULE_HAL_FORMS: &str = "hal-forms";
/// Module tag for the Collection+JSON format module
pub const MODULE_COLLECTION_JSON: &str = "collection-json";
/// Module tag for the UBER format module
pub const MODULE_UBER: &str = "uber";

const HYPERMEDIA_MODULES: [&str; 4] = [
    MODULE_HAL,
    MODULE_HAL_FORMS,
    MODULE_COLLECTION_JSON,
    MODULE_UBER,
];

/// Base serializer settings plus the ordered list of registered module tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializerConfig {
    pretty: bool,
    modules: Vec<String>,
}

impl SerializerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printed output (chainable)
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Register a module tag, returning the modified config (chainable).
    /// Registering the same tag twice is a no-op.
    pub fn with_module(mut self, tag: &str) -> Self {
        if !self.has_module(tag) {
            self.modules.push(tag.to_string());
        }
        self
    }

    pub fn has_module(&self, tag: &str) -> bool {
        self.modules.iter().any(|module| module == tag)
    }

    /// The idempotency sentinel: true once any hypermedia format module has
    /// been registered on this config
    pub fn is_hypermedia_registered(&self) -> bool {
        HYPERMEDIA_MODULES.iter().any(|tag| self.has_module(tag))
    }

    /// Serialize a JSON tree according to this config
    pub fn to_bytes(&self, value: &Value) -> Result<Bytes, CodecError> {
        let rendered = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(Bytes::from(rendered))
    }
}

/// HAL rendering options, a separate object from the HAL-FORMS one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HalConfiguration {
    render_single_links_as_arrays: bool,
}

impl HalConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always render link groups as arrays, even for a single link
    /// (chainable)
    pub fn single_links_as_arrays(mut self) -> Self {
        self.render_single_links_as_arrays = true;
        self
    }

    pub fn renders_single_links_as_arrays(&self) -> bool {
        self.render_single_links_as_arrays
    }
}

/// HAL-FORMS rendering options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalFormsConfiguration {
    hal: HalConfiguration,
    default_template_key: String,
}

impl Default for HalFormsConfiguration {
    fn default() -> Self {
        Self {
            hal: HalConfiguration::default(),
            default_template_key: "default".to_string(),
        }
    }
}

impl HalFormsConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the embedded HAL rendering options (chainable)
    pub fn hal(mut self, hal: HalConfiguration) -> Self {
        self.hal = hal;
        self
    }

    pub fn hal_configuration(&self) -> &HalConfiguration {
        &self.hal
    }

    pub fn default_template_key(&self) -> &str {
        &self.default_template_key
    }
}

/// Derive the serializer variant for one hypermedia flavor from a shared
/// base (absent base means a fresh default)
pub fn serializer_for(base: Option<&SerializerConfig>, hypermedia_type: HypermediaType) -> SerializerConfig {
    let base = base.cloned().unwrap_or_default();
    let tag = match hypermedia_type {
        HypermediaType::Hal => MODULE_HAL,
        HypermediaType::HalForms => MODULE_HAL_FORMS,
        HypermediaType::CollectionJson => MODULE_COLLECTION_JSON,
        HypermediaType::Uber => MODULE_UBER,
    };
    base.with_module(tag)
}
