//! Media type values and the hypermedia type registry.
//!
//! Every hypermedia flavor Kagari knows about is registered here together
//! with its exact media type identifiers. Codec registration resolves media
//! types through [`MediaTypeRegistry::global()`] rather than re-spelling the
//! string literals at each call site.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;

use crate::alias::PRwLock;

/// A parsed `type/subtype;key=value` media type value.
///
/// Parameters are significant for equality, so the legacy
/// `application/hal+json;charset=UTF-8` variant is a distinct value from
/// `application/hal+json`. Use [`MediaType::compatible_with`] when only the
/// essence matters (converter selection).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    main_type: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl MediaType {
    pub fn new(main_type: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            subtype: subtype.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter, returning the modified value (chainable)
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Parse a media type from a header-style value, e.g.
    /// `application/hal+json;charset=UTF-8`
    pub fn parse(value: &str) -> Result<Self, String> {
        let mut sections = value.split(';');
        let essence = sections.next().unwrap_or("").trim();
        let (main_type, subtype) = essence
            .split_once('/')
            .ok_or_else(|| format!("Malformed media type: {}", value))?;
        if main_type.is_empty() || subtype.is_empty() {
            return Err(format!("Malformed media type: {}", value));
        }
        let mut media_type = MediaType::new(main_type.trim(), subtype.trim());
        for section in sections {
            let section = section.trim();
            if section.is_empty() {
                continue;
            }
            match section.split_once('=') {
                Some((key, val)) => {
                    media_type = media_type.with_parameter(key.trim(), val.trim());
                }
                None => return Err(format!("Malformed media type parameter: {}", section)),
            }
        }
        Ok(media_type)
    }

    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Compatibility ignores parameters: `application/hal+json;charset=UTF-8`
    /// is compatible with `application/hal+json`
    pub fn compatible_with(&self, other: &MediaType) -> bool {
        self.main_type == other.main_type && self.subtype == other.subtype
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)?;
        for (key, value) in &self.parameters {
            write!(f, ";{}={}", key, value)?;
        }
        Ok(())
    }
}

/// The hypermedia flavors Kagari can register codecs for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HypermediaType {
    Hal,
    HalForms,
    CollectionJson,
    Uber,
}

impl HypermediaType {
    /// All flavors, in the registrar's fixed processing order
    pub const ALL: [HypermediaType; 4] = [
        HypermediaType::Hal,
        HypermediaType::HalForms,
        HypermediaType::CollectionJson,
        HypermediaType::Uber,
    ];

    /// Stable tag used for registry lookups and serializer module markers
    pub fn tag(&self) -> &'static str {
        match self {
            HypermediaType::Hal => "hal",
            HypermediaType::HalForms => "hal-forms",
            HypermediaType::CollectionJson => "collection-json",
            HypermediaType::Uber => "uber",
        }
    }

    /// HAL and HAL-FORMS share provider dependencies (curie + relation)
    pub fn is_hal_based(&self) -> bool {
        matches!(self, HypermediaType::Hal | HypermediaType::HalForms)
    }

    /// The media types this flavor covers, sourced from the global registry
    pub fn media_types(&self) -> Vec<MediaType> {
        MediaTypeRegistry::global().media_types_for(*self)
    }
}

impl fmt::Display for HypermediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Process-wide registry mapping hypermedia flavors to their exact media
/// type identifiers. Seeded once with the registered values; lookups clone.
pub struct MediaTypeRegistry {
    entries: PRwLock<HashMap<HypermediaType, Vec<MediaType>>>,
}

impl MediaTypeRegistry {
    pub fn global() -> &'static MediaTypeRegistry {
        static REGISTRY: Lazy<MediaTypeRegistry> = Lazy::new(MediaTypeRegistry::seeded);
        &REGISTRY
    }

    fn seeded() -> Self {
        let registry = MediaTypeRegistry {
            entries: PRwLock::new(HashMap::new()),
        };
        registry.register(
            HypermediaType::Hal,
            vec![
                MediaType::new("application", "hal+json"),
                MediaType::new("application", "hal+json").with_parameter("charset", "UTF-8"),
            ],
        );
        registry.register(
            HypermediaType::HalForms,
            vec![MediaType::new("application", "prs.hal-forms+json")],
        );
        registry.register(
            HypermediaType::CollectionJson,
            vec![MediaType::new("application", "vnd.collection+json")],
        );
        registry.register(
            HypermediaType::Uber,
            vec![MediaType::new("application", "vnd.amundsen-uber+json")],
        );
        registry
    }

    pub fn register(&self, hypermedia_type: HypermediaType, media_types: Vec<MediaType>) {
        let mut guard = self.entries.write();
        guard.insert(hypermedia_type, media_types);
    }

    pub fn media_types_for(&self, hypermedia_type: HypermediaType) -> Vec<MediaType> {
        let guard = self.entries.read();
        guard.get(&hypermedia_type).cloned().unwrap_or_default()
    }
}

/// Primary HAL media type: `application/hal+json`
pub fn hal_json() -> MediaType {
    MediaType::new("application", "hal+json")
}

/// Legacy HAL variant: `application/hal+json;charset=UTF-8`
pub fn hal_json_utf8() -> MediaType {
    MediaType::new("application", "hal+json").with_parameter("charset", "UTF-8")
}

/// HAL-FORMS media type: `application/prs.hal-forms+json`
pub fn hal_forms_json() -> MediaType {
    MediaType::new("application", "prs.hal-forms+json")
}

/// Collection+JSON media type: `application/vnd.collection+json`
pub fn collection_json() -> MediaType {
    MediaType::new("application", "vnd.collection+json")
}

/// UBER media type: `application/vnd.amundsen-uber+json`
pub fn uber_json() -> MediaType {
    MediaType::new("application", "vnd.amundsen-uber+json")
}

/// Plain JSON, the media type generic converters usually declare
pub fn application_json() -> MediaType {
    MediaType::new("application", "json")
}

/// Every media type any hypermedia flavor covers. Used by the
/// already-registered scan before codec registration.
pub fn hypermedia_universe() -> Vec<MediaType> {
    HypermediaType::ALL
        .iter()
        .flat_map(|hypermedia_type| hypermedia_type.media_types())
        .collect()
}

/// Set of enabled hypermedia flavors supplied at configuration time.
/// Order is irrelevant and duplicates are impossible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledTypeSet {
    types: HashSet<HypermediaType>,
}

impl EnabledTypeSet {
    pub fn new() -> Self {
        Self {
            types: HashSet::new(),
        }
    }

    pub fn of(types: &[HypermediaType]) -> Self {
        Self {
            types: types.iter().copied().collect(),
        }
    }

    /// Enable a flavor, returning the modified set (chainable)
    pub fn enable(mut self, hypermedia_type: HypermediaType) -> Self {
        self.types.insert(hypermedia_type);
        self
    }

    pub fn contains(&self, hypermedia_type: HypermediaType) -> bool {
        self.types.contains(&hypermedia_type)
    }

    pub fn any_hal_based(&self) -> bool {
        self.types.iter().any(HypermediaType::is_hal_based)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}

impl FromIterator<HypermediaType> for EnabledTypeSet {
    fn from_iter<I: IntoIterator<Item = HypermediaType>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_display_exact_identifiers() {
        assert_eq!(hal_json().to_string(), "application/hal+json");
        assert_eq!(
            hal_json_utf8().to_string(),
            "application/hal+json;charset=UTF-8"
        );
        assert_eq!(
            hal_forms_json().to_string(),
            "application/prs.hal-forms+json"
        );
        assert_eq!(
            collection_json().to_string(),
            "application/vnd.collection+json"
        );
        assert_eq!(
            uber_json().to_string(),
            "application/vnd.amundsen-uber+json"
        );
    }

    #[test]
    fn test_media_type_parse_round_trip() {
        let parsed = MediaType::parse("application/hal+json;charset=UTF-8").unwrap();
        assert_eq!(parsed, hal_json_utf8());
        assert_eq!(parsed.parameter("charset"), Some("UTF-8"));
    }

    #[test]
    fn test_media_type_parse_rejects_malformed() {
        assert!(MediaType::parse("not-a-media-type").is_err());
        assert!(MediaType::parse("/json").is_err());
        assert!(MediaType::parse("application/json;charset").is_err());
    }

    #[test]
    fn test_parameters_significant_for_equality() {
        assert_ne!(hal_json(), hal_json_utf8());
        assert!(hal_json().compatible_with(&hal_json_utf8()));
        assert!(!hal_json().compatible_with(&application_json()));
    }

    #[test]
    fn test_registry_sources_hal_variants() {
        let types = HypermediaType::Hal.media_types();
        assert_eq!(types, vec![hal_json(), hal_json_utf8()]);
        assert_eq!(
            HypermediaType::Uber.media_types(),
            vec![uber_json()],
            "UBER value must come from the registry"
        );
    }

    #[test]
    fn test_hypermedia_universe_has_five_entries() {
        let universe = hypermedia_universe();
        assert_eq!(universe.len(), 5);
        assert!(universe.contains(&hal_json_utf8()));
    }

    #[test]
    fn test_hal_family_grouping() {
        assert!(HypermediaType::Hal.is_hal_based());
        assert!(HypermediaType::HalForms.is_hal_based());
        assert!(!HypermediaType::CollectionJson.is_hal_based());
        assert!(!HypermediaType::Uber.is_hal_based());
    }

    #[test]
    fn test_enabled_set_semantics() {
        let set = EnabledTypeSet::of(&[
            HypermediaType::Hal,
            HypermediaType::Hal,
            HypermediaType::Uber,
        ]);
        assert_eq!(set.len(), 2, "Duplicates collapse");
        assert!(set.any_hal_based());
        assert!(EnabledTypeSet::new().is_empty());
        assert!(!EnabledTypeSet::of(&[HypermediaType::Uber]).any_hal_based());
    }
}
