//! HAL (`application/hal+json`) encoding and decoding.
//!
//! Properties stay at the root, links render under `_links` grouped by
//! relation, embedded resources under `_embedded`. When a curie provider is
//! present, non-IANA relations are compacted to `prefix:rel` and a
//! templated `curies` link is emitted alongside them. Link titles missing
//! from the document are resolved through the message resolver using the
//! `_links.<rel>.title` key.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::codec::{BodyReader, BodyWriter, CodecError};
use crate::document::{Link, Representation};
use crate::media::{HypermediaType, MediaType};
use crate::provider::{link_title_key, CurieProvider, MessageResolver, RelationProvider};
use crate::serializer::{HalConfiguration, SerializerConfig};

use super::resolve_embedded_rel;

/// Reader/writer pair for HAL documents
#[derive(Clone)]
pub struct HalCodec {
    serializer: SerializerConfig,
    config: HalConfiguration,
    curie: Option<Arc<dyn CurieProvider>>,
    relation: Arc<dyn RelationProvider>,
    messages: Arc<dyn MessageResolver>,
}

impl HalCodec {
    pub fn new(
        serializer: SerializerConfig,
        config: HalConfiguration,
        curie: Option<Arc<dyn CurieProvider>>,
        relation: Arc<dyn RelationProvider>,
        messages: Arc<dyn MessageResolver>,
    ) -> Self {
        Self {
            serializer,
            config,
            curie,
            relation,
            messages,
        }
    }

    pub fn serializer(&self) -> &SerializerConfig {
        &self.serializer
    }

    pub(crate) fn render(&self, representation: &Representation) -> Result<Value, CodecError> {
        let root = render_hal(
            representation,
            &self.config,
            self.curie.as_ref(),
            Some(&self.relation),
            self.messages.as_ref(),
        )?;
        Ok(Value::Object(root))
    }
}

impl BodyReader for HalCodec {
    fn readable_types(&self) -> Vec<MediaType> {
        HypermediaType::Hal.media_types()
    }

    fn read(&self, body: &[u8]) -> Result<Representation, CodecError> {
        let value: Value = serde_json::from_slice(body)?;
        parse_hal(&value)
    }
}

impl BodyWriter for HalCodec {
    fn writable_types(&self) -> Vec<MediaType> {
        HypermediaType::Hal.media_types()
    }

    fn write(&self, representation: &Representation) -> Result<Bytes, CodecError> {
        self.serializer.to_bytes(&self.render(representation)?)
    }
}

fn compact_rel(rel: &str, curie: Option<&Arc<dyn CurieProvider>>) -> String {
    match curie {
        Some(provider) => provider.namespaced(rel),
        None => rel.to_string(),
    }
}

fn render_link(link: &Link, rel: &str, messages: &dyn MessageResolver) -> Value {
    let mut object = Map::new();
    object.insert("href".to_string(), Value::String(link.href.clone()));
    let title = link
        .title
        .clone()
        .or_else(|| messages.resolve(&link_title_key(rel)));
    if let Some(title) = title {
        object.insert("title".to_string(), Value::String(title));
    }
    if let Some(name) = &link.name {
        object.insert("name".to_string(), Value::String(name.clone()));
    }
    if link.templated {
        object.insert("templated".to_string(), Value::Bool(true));
    }
    Value::Object(object)
}

/// Render the shared HAL shape (properties, `_links`, `_embedded`) into a
/// root object. HAL-FORMS reuses this and adds `_templates` on top.
pub(crate) fn render_hal(
    representation: &Representation,
    config: &HalConfiguration,
    curie: Option<&Arc<dyn CurieProvider>>,
    relation: Option<&Arc<dyn RelationProvider>>,
    messages: &dyn MessageResolver,
) -> Result<Map<String, Value>, CodecError> {
    let mut root = representation.properties.clone();

    // Group links by their (possibly compacted) relation, preserving first
    // occurrence order within each group
    let mut groups: Vec<(String, Vec<&Link>)> = Vec::new();
    let mut curie_used = false;
    for link in &representation.links {
        let rel = compact_rel(&link.rel, curie);
        if rel != link.rel {
            curie_used = true;
        }
        match groups.iter_mut().find(|(existing, _)| *existing == rel) {
            Some((_, members)) => members.push(link),
            None => groups.push((rel, vec![link])),
        }
    }

    let mut links_object = Map::new();
    for (rel, members) in &groups {
        let rendered: Vec<Value> = members
            .iter()
            .map(|link| render_link(link, &link.rel, messages))
            .collect::<Vec<_>>();
        let value = if rendered.len() == 1 && !config.renders_single_links_as_arrays() {
            rendered.into_iter().next().ok_or_else(|| {
                CodecError::EncodingFailed("Empty link group".to_string())
            })?
        } else {
            Value::Array(rendered)
        };
        links_object.insert(rel.clone(), value);
    }

    let mut embedded_object = Map::new();
    for group in &representation.embedded {
        let raw_rel = resolve_embedded_rel(group, relation);
        let rel = compact_rel(&raw_rel, curie);
        if rel != raw_rel {
            curie_used = true;
        }
        let mut rendered = Vec::with_capacity(group.resources.len());
        for resource in &group.resources {
            rendered.push(Value::Object(render_hal(
                resource, config, curie, relation, messages,
            )?));
        }
        let value = if rendered.len() == 1 {
            rendered.into_iter().next().ok_or_else(|| {
                CodecError::EncodingFailed("Empty embedded group".to_string())
            })?
        } else {
            Value::Array(rendered)
        };
        embedded_object.insert(rel, value);
    }

    // The curies registration link rides along once any relation was
    // compacted. HAL requires it to be an array.
    if curie_used {
        if let Some(provider) = curie {
            let curie_link = provider.curie_link();
            let rendered = render_link(&curie_link, &curie_link.rel, messages);
            links_object.insert("curies".to_string(), Value::Array(vec![rendered]));
        }
    }

    if !links_object.is_empty() {
        root.insert("_links".to_string(), Value::Object(links_object));
    }
    if !embedded_object.is_empty() {
        root.insert("_embedded".to_string(), Value::Object(embedded_object));
    }
    Ok(root)
}

fn parse_link(rel: &str, value: &Value) -> Result<Link, CodecError> {
    let object = value.as_object().ok_or_else(|| {
        CodecError::DecodingFailed(format!("Link for rel {} is not an object", rel))
    })?;
    let href = object
        .get("href")
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::DecodingFailed(format!("Link for rel {} has no href", rel)))?;
    let mut link = Link::new(rel, href);
    if let Some(title) = object.get("title").and_then(Value::as_str) {
        link = link.with_title(title);
    }
    if let Some(name) = object.get("name").and_then(Value::as_str) {
        link = link.with_name(name);
    }
    if object.get("templated").and_then(Value::as_bool) == Some(true) {
        link = link.templated();
    }
    Ok(link)
}

/// Parse the shared HAL shape. Unknown reserved sections (`_templates`)
/// are left for the HAL-FORMS codec to handle.
pub(crate) fn parse_hal(value: &Value) -> Result<Representation, CodecError> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::DecodingFailed("Expected a JSON object".to_string()))?;

    let mut representation = Representation::new();
    for (key, entry) in object {
        match key.as_str() {
            "_links" => {
                let links = entry.as_object().ok_or_else(|| {
                    CodecError::DecodingFailed("_links is not an object".to_string())
                })?;
                for (rel, value) in links {
                    match value {
                        Value::Array(members) => {
                            for member in members {
                                representation.links.push(parse_link(rel, member)?);
                            }
                        }
                        single => representation.links.push(parse_link(rel, single)?),
                    }
                }
            }
            "_embedded" => {
                let embedded = entry.as_object().ok_or_else(|| {
                    CodecError::DecodingFailed("_embedded is not an object".to_string())
                })?;
                for (rel, value) in embedded {
                    let resources = match value {
                        Value::Array(members) => members
                            .iter()
                            .map(parse_hal)
                            .collect::<Result<Vec<_>, _>>()?,
                        single => vec![parse_hal(single)?],
                    };
                    representation = representation.embed(rel.clone(), resources);
                }
            }
            "_templates" => {
                // HAL proper has no templates; tolerated and dropped here
            }
            _ => {
                representation
                    .properties
                    .insert(key.clone(), entry.clone());
            }
        }
    }
    Ok(representation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::EmbeddedRel;
    use crate::provider::{DefaultCurieProvider, DefaultRelationProvider, MessageBundle};
    use serde_json::json;

    fn plain_codec() -> HalCodec {
        HalCodec::new(
            SerializerConfig::new(),
            HalConfiguration::default(),
            None,
            Arc::new(DefaultRelationProvider),
            Arc::new(MessageBundle::new()),
        )
    }

    #[test]
    fn test_round_trip_resource_graph() {
        let child = Representation::new()
            .property("sku", json!("A-1"))
            .link(Link::self_link("/items/1"));
        let original = Representation::new()
            .property("total", json!(42))
            .property("open", json!(true))
            .link(Link::self_link("/orders"))
            .link(Link::new("next", "/orders?page=2"))
            .link(Link::new("item", "/items/1"))
            .link(Link::new("item", "/items/2"))
            .embed("item", vec![child]);

        let codec = plain_codec();
        let body = codec.write(&original).unwrap();
        let decoded = codec.read(&body).unwrap();

        assert_eq!(decoded.properties, original.properties);
        assert_eq!(decoded.links.len(), original.links.len());
        for link in &original.links {
            assert!(decoded.links.contains(link), "Missing link {:?}", link);
        }
        assert_eq!(decoded.embedded, original.embedded);
    }

    #[test]
    fn test_rendered_shape() {
        let representation = Representation::new()
            .property("name", json!("kagari"))
            .link(Link::self_link("/root"))
            .link(Link::new("item", "/a"))
            .link(Link::new("item", "/b"));
        let rendered = plain_codec().render(&representation).unwrap();

        assert_eq!(rendered["name"], json!("kagari"));
        assert_eq!(rendered["_links"]["self"]["href"], json!("/root"));
        let items = rendered["_links"]["item"]
            .as_array()
            .expect("Two same-rel links render as an array");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_single_links_as_arrays_config() {
        let codec = HalCodec::new(
            SerializerConfig::new(),
            HalConfiguration::new().single_links_as_arrays(),
            None,
            Arc::new(DefaultRelationProvider),
            Arc::new(MessageBundle::new()),
        );
        let representation = Representation::new().link(Link::self_link("/root"));
        let rendered = codec.render(&representation).unwrap();
        assert!(
            rendered["_links"]["self"].is_array(),
            "Single link renders as array when configured"
        );
    }

    #[test]
    fn test_curie_compaction_and_curies_link() {
        let codec = HalCodec::new(
            SerializerConfig::new(),
            HalConfiguration::default(),
            Some(Arc::new(DefaultCurieProvider::new(
                "ks",
                "https://docs.kagari.rs/rels/{rel}",
            ))),
            Arc::new(DefaultRelationProvider),
            Arc::new(MessageBundle::new()),
        );
        let representation = Representation::new()
            .link(Link::self_link("/root"))
            .link(Link::new("orders", "/orders"));
        let rendered = codec.render(&representation).unwrap();
        let links = rendered["_links"].as_object().unwrap();

        assert!(links.contains_key("self"), "IANA rel stays uncompacted");
        assert!(links.contains_key("ks:orders"), "Custom rel is compacted");
        assert!(!links.contains_key("orders"));
        let curies = links["curies"].as_array().expect("curies is an array");
        assert_eq!(curies[0]["name"], json!("ks"));
        assert_eq!(curies[0]["templated"], json!(true));
    }

    #[test]
    fn test_title_injected_from_messages() {
        let mut bundle = MessageBundle::new();
        bundle.insert("_links.orders.title", "Your orders");
        let codec = HalCodec::new(
            SerializerConfig::new(),
            HalConfiguration::default(),
            None,
            Arc::new(DefaultRelationProvider),
            Arc::new(bundle),
        );
        let representation = Representation::new()
            .link(Link::new("orders", "/orders"))
            .link(Link::new("archive", "/archive").with_title("Archive"));
        let rendered = codec.render(&representation).unwrap();

        assert_eq!(rendered["_links"]["orders"]["title"], json!("Your orders"));
        assert_eq!(
            rendered["_links"]["archive"]["title"],
            json!("Archive"),
            "Explicit titles win over the bundle"
        );
    }

    #[test]
    fn test_typed_embedded_rel_goes_through_provider() {
        let representation = Representation::new().embed_typed(
            "Order",
            vec![Representation::new().property("id", json!(1))],
        );
        assert_eq!(
            representation.embedded[0].rel,
            EmbeddedRel::typed("Order")
        );
        let rendered = plain_codec().render(&representation).unwrap();
        assert!(
            rendered["_embedded"].as_object().unwrap().contains_key("order"),
            "Typed rel resolved through the relation provider"
        );
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        let codec = plain_codec();
        assert!(codec.read(b"[1,2,3]").is_err());
        assert!(codec.read(b"not json").is_err());
        assert!(codec.read(br#"{"_links": {"self": {}}}"#).is_err(), "Link without href");
    }
}
