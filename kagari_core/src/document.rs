//! In-memory hypermedia document model.
//!
//! A [`Representation`] is the transport-neutral resource graph the format
//! codecs encode and decode: a bag of JSON properties, an ordered list of
//! [`Link`]s and embedded child representations grouped by relation.
//!
//! Decoders never produce "absent" link collections, only empty ones, so
//! equality between a freshly built representation and a decoded one holds
//! without extra normalization.

use serde_json::{Map, Value};

/// Link relations registered with IANA. These are never curie-prefixed.
const IANA_RELS: &[&str] = &[
    "about",
    "alternate",
    "appendix",
    "archives",
    "author",
    "canonical",
    "chapter",
    "collection",
    "contents",
    "copyright",
    "current",
    "describedby",
    "edit",
    "edit-form",
    "first",
    "glossary",
    "help",
    "hub",
    "icon",
    "index",
    "item",
    "last",
    "latest-version",
    "license",
    "next",
    "next-archive",
    "payment",
    "prev",
    "prev-archive",
    "preview",
    "previous",
    "related",
    "replies",
    "search",
    "section",
    "self",
    "service",
    "start",
    "stylesheet",
    "subsection",
    "successor-version",
    "tag",
    "up",
    "version-history",
    "via",
    "working-copy",
    "working-copy-of",
];

/// Whether a relation name is IANA-registered
pub fn is_iana_rel(rel: &str) -> bool {
    IANA_RELS.contains(&rel)
}

/// A navigable link attached to a representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub rel: String,
    pub href: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub templated: bool,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            title: None,
            name: None,
            templated: false,
        }
    }

    /// Convenience constructor for the `self` relation
    pub fn self_link(href: impl Into<String>) -> Self {
        Self::new("self", href)
    }

    /// Set the human-readable title (chainable)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the secondary name key (chainable)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the href as a URI template (chainable)
    pub fn templated(mut self) -> Self {
        self.templated = true;
        self
    }
}

/// How an embedded group names its relation.
///
/// `Named` carries an explicit relation. `Typed` carries a resource type
/// name and is resolved through the relation provider at encode time;
/// decoding always yields `Named`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedRel {
    Named(String),
    Typed(String),
}

impl EmbeddedRel {
    pub fn named(rel: impl Into<String>) -> Self {
        EmbeddedRel::Named(rel.into())
    }

    pub fn typed(type_name: impl Into<String>) -> Self {
        EmbeddedRel::Typed(type_name.into())
    }
}

/// A group of embedded child representations under one relation
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedGroup {
    pub rel: EmbeddedRel,
    pub resources: Vec<Representation>,
}

/// A prompt-able input of a HAL-FORMS template
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateProperty {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl TemplateProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            prompt: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// A HAL-FORMS affordance template. Ignored by every other format.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    #[serde(skip)]
    pub key: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<TemplateProperty>,
}

impl Template {
    pub fn new(key: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            method: method.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, property: TemplateProperty) -> Self {
        self.properties.push(property);
        self
    }
}

/// The resource graph the hypermedia codecs operate on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Representation {
    pub properties: Map<String, Value>,
    pub links: Vec<Link>,
    pub embedded: Vec<EmbeddedGroup>,
    pub templates: Vec<Template>,
}

impl Representation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, returning the modified representation (chainable)
    pub fn property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Attach a link (chainable)
    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Embed children under an explicit relation (chainable)
    pub fn embed(mut self, rel: impl Into<String>, resources: Vec<Representation>) -> Self {
        self.embedded.push(EmbeddedGroup {
            rel: EmbeddedRel::named(rel),
            resources,
        });
        self
    }

    /// Embed children whose relation is derived from a resource type name
    /// through the relation provider at encode time (chainable)
    pub fn embed_typed(mut self, type_name: impl Into<String>, resources: Vec<Representation>) -> Self {
        self.embedded.push(EmbeddedGroup {
            rel: EmbeddedRel::typed(type_name),
            resources,
        });
        self
    }

    /// Attach a HAL-FORMS template (chainable)
    pub fn template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    /// All links carrying the given relation, in insertion order
    pub fn links_for(&self, rel: &str) -> Vec<&Link> {
        self.links.iter().filter(|link| link.rel == rel).collect()
    }

    /// The href of the `self` link, if present
    pub fn self_href(&self) -> Option<&str> {
        self.links_for("self").first().map(|link| link.href.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_empty_links_compare_equal() {
        let built = Representation::new().property("name", json!("kagari"));
        let mut decoded = Representation::new().property("name", json!("kagari"));
        decoded.links = Vec::new();
        assert_eq!(built, decoded, "Absent and empty link collections normalize identically");
    }

    #[test]
    fn test_links_for_preserves_order() {
        let representation = Representation::new()
            .link(Link::new("item", "/a"))
            .link(Link::self_link("/root"))
            .link(Link::new("item", "/b"));
        let items = representation.links_for("item");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].href, "/a");
        assert_eq!(items[1].href, "/b");
        assert_eq!(representation.self_href(), Some("/root"));
    }

    #[test]
    fn test_iana_rels() {
        assert!(is_iana_rel("self"));
        assert!(is_iana_rel("next"));
        assert!(!is_iana_rel("orders"));
    }

    #[test]
    fn test_link_builder() {
        let link = Link::new("search", "/search{?q}").templated().with_name("q");
        assert!(link.templated);
        assert_eq!(link.name.as_deref(), Some("q"));
        assert!(link.title.is_none());
    }
}
