//! Relation, curie and message providers consumed by the HAL-family codecs.
//!
//! The original container-resolved collaborators become explicit parameters
//! here: callers hand the registrar a [`HypermediaProviders`] value and the
//! registrar fails fast on whatever is mandatory for the enabled flavors.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;

use crate::document::{is_iana_rel, Link};

/// Derives a link-relation name for a resource type when none is given
/// explicitly. Mandatory whenever a HAL-family flavor is enabled.
pub trait RelationProvider: Send + Sync {
    /// Relation for a single embedded resource of the given type
    fn item_relation(&self, type_name: &str) -> String;

    /// Relation for a collection of embedded resources of the given type
    fn collection_relation(&self, type_name: &str) -> String;
}

/// Default derivation: decapitalized short type name, with a `List` suffix
/// for collections
#[derive(Debug, Clone, Default)]
pub struct DefaultRelationProvider;

impl DefaultRelationProvider {
    pub fn new() -> Self {
        Self
    }

    fn short_name(type_name: &str) -> &str {
        type_name.rsplit("::").next().unwrap_or(type_name)
    }

    fn decapitalize(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl RelationProvider for DefaultRelationProvider {
    fn item_relation(&self, type_name: &str) -> String {
        Self::decapitalize(Self::short_name(type_name))
    }

    fn collection_relation(&self, type_name: &str) -> String {
        format!("{}List", self.item_relation(type_name))
    }
}

/// Supplies compact, prefixed abbreviations for link-relation namespaces.
/// Optional: when absent, curie compaction is disabled.
pub trait CurieProvider: Send + Sync {
    /// Compact a relation name. IANA-registered and already-prefixed
    /// relations pass through unchanged.
    fn namespaced(&self, rel: &str) -> String;

    /// The templated `curies` registration link
    fn curie_link(&self) -> Link;
}

/// Prefix-based curie provider with a `{rel}` href template
#[derive(Debug, Clone)]
pub struct DefaultCurieProvider {
    prefix: String,
    template: String,
}

impl DefaultCurieProvider {
    pub fn new(prefix: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            template: template.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl CurieProvider for DefaultCurieProvider {
    fn namespaced(&self, rel: &str) -> String {
        if is_iana_rel(rel) || rel.contains(':') {
            rel.to_string()
        } else {
            format!("{}:{}", self.prefix, rel)
        }
    }

    fn curie_link(&self) -> Link {
        Link::new("curies", self.template.clone())
            .with_name(self.prefix.clone())
            .templated()
    }
}

/// Localized message lookup used to attach human-readable titles and
/// prompts. The registrar resolves it before building any serializer,
/// no matter which flavors are enabled.
pub trait MessageResolver: Send + Sync {
    fn resolve(&self, key: &str) -> Option<String>;
}

/// Message bundle backed by `key=value` lines (`#` starts a comment),
/// the same shape as the original's relation message source.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bundle from properties-style text. Malformed lines are
    /// skipped rather than rejected, matching resource bundle behavior.
    pub fn from_text(text: &str) -> Self {
        let mut bundle = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                bundle
                    .messages
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        bundle
    }

    /// Load a bundle from any reader, e.g. a messages file
    pub fn from_reader<R: Read>(reader: R) -> std::io::Result<Self> {
        let mut text = String::new();
        let mut buffered = BufReader::new(reader);
        buffered.read_to_string(&mut text)?;
        Ok(Self::from_text(&text))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.messages.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageResolver for MessageBundle {
    fn resolve(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}

/// Message key carrying a link title: `_links.<rel>.title`
pub fn link_title_key(rel: &str) -> String {
    format!("_links.{}.title", rel)
}

/// Message key carrying a template property prompt:
/// `_templates.<key>.<property>.prompt`
pub fn template_prompt_key(template_key: &str, property: &str) -> String {
    format!("_templates.{}.{}.prompt", template_key, property)
}

/// Provider references handed to codec registration. Optionality is
/// validated by the registrar, not the type: `messages` is always
/// mandatory, `relation` is mandatory once a HAL-family flavor is enabled,
/// `curie` is always optional.
#[derive(Clone, Default)]
pub struct HypermediaProviders {
    pub relation: Option<Arc<dyn RelationProvider>>,
    pub curie: Option<Arc<dyn CurieProvider>>,
    pub messages: Option<Arc<dyn MessageResolver>>,
}

impl HypermediaProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relation provider (chainable)
    pub fn relation(mut self, provider: Arc<dyn RelationProvider>) -> Self {
        self.relation = Some(provider);
        self
    }

    /// Set the curie provider (chainable)
    pub fn curie(mut self, provider: Arc<dyn CurieProvider>) -> Self {
        self.curie = Some(provider);
        self
    }

    /// Set the message resolver (chainable)
    pub fn messages(mut self, resolver: Arc<dyn MessageResolver>) -> Self {
        self.messages = Some(resolver);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_relation_provider() {
        let provider = DefaultRelationProvider;
        assert_eq!(provider.item_relation("Order"), "order");
        assert_eq!(provider.item_relation("shop::catalog::Order"), "order");
        assert_eq!(provider.collection_relation("Order"), "orderList");
        assert_eq!(provider.item_relation(""), "");
    }

    #[test]
    fn test_curie_provider_compaction() {
        let provider = DefaultCurieProvider::new("ks", "https://docs.kagari.rs/rels/{rel}");
        assert_eq!(provider.namespaced("orders"), "ks:orders");
        assert_eq!(provider.namespaced("self"), "self", "IANA rels pass through");
        assert_eq!(provider.namespaced("ex:other"), "ex:other", "Prefixed rels pass through");

        let curie = provider.curie_link();
        assert_eq!(curie.rel, "curies");
        assert_eq!(curie.name.as_deref(), Some("ks"));
        assert!(curie.templated);
    }

    #[test]
    fn test_message_bundle_parsing() {
        let bundle = MessageBundle::from_text(
            "# relation titles\n_links.orders.title=Orders\n  _links.self.title = Current \n\nmalformed-line\n",
        );
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.resolve("_links.orders.title").as_deref(), Some("Orders"));
        assert_eq!(bundle.resolve("_links.self.title").as_deref(), Some("Current"));
        assert!(bundle.resolve("missing").is_none());
    }

    #[test]
    fn test_message_keys() {
        assert_eq!(link_title_key("orders"), "_links.orders.title");
        assert_eq!(
            template_prompt_key("default", "name"),
            "_templates.default.name.prompt"
        );
    }
}
