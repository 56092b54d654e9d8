//! Collection+JSON (`application/vnd.collection+json`) encoding and
//! decoding.
//!
//! The representation's `self` link becomes the collection `href`, other
//! links become collection `links`, and embedded resources under the
//! `item` relation become `items`. A representation without embedded items
//! renders as a collection with itself as the only item; decoding folds
//! that single item back to the root when its href matches the collection
//! href. Link titles travel as Collection+JSON `prompt` fields.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::codec::{BodyReader, BodyWriter, CodecError};
use crate::document::{Link, Representation};
use crate::media::{HypermediaType, MediaType};
use crate::provider::{link_title_key, MessageResolver};
use crate::serializer::SerializerConfig;

const VERSION: &str = "1.0";

/// One `data` array element of a Collection+JSON item
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DataEntry {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
}

/// Reader/writer pair for Collection+JSON documents
#[derive(Clone)]
pub struct CollectionJsonCodec {
    serializer: SerializerConfig,
    messages: Arc<dyn MessageResolver>,
}

impl CollectionJsonCodec {
    pub fn new(serializer: SerializerConfig, messages: Arc<dyn MessageResolver>) -> Self {
        Self {
            serializer,
            messages,
        }
    }

    pub fn serializer(&self) -> &SerializerConfig {
        &self.serializer
    }

    fn render_link(&self, link: &Link) -> Value {
        let mut object = Map::new();
        object.insert("rel".to_string(), json!(link.rel));
        object.insert("href".to_string(), json!(link.href));
        if let Some(name) = &link.name {
            object.insert("name".to_string(), json!(name));
        }
        let prompt = link
            .title
            .clone()
            .or_else(|| self.messages.resolve(&link_title_key(&link.rel)));
        if let Some(prompt) = prompt {
            object.insert("prompt".to_string(), json!(prompt));
        }
        Value::Object(object)
    }

    fn render_data(&self, representation: &Representation) -> Result<Vec<Value>, CodecError> {
        let mut data = Vec::with_capacity(representation.properties.len());
        for (name, value) in &representation.properties {
            let entry = DataEntry {
                name: name.clone(),
                value: Some(value.clone()),
                prompt: None,
            };
            data.push(serde_json::to_value(&entry)?);
        }
        Ok(data)
    }

    fn render_item(&self, representation: &Representation) -> Result<Value, CodecError> {
        let mut item = Map::new();
        if let Some(href) = representation.self_href() {
            item.insert("href".to_string(), json!(href));
        }
        item.insert(
            "data".to_string(),
            Value::Array(self.render_data(representation)?),
        );
        let links: Vec<Value> = representation
            .links
            .iter()
            .filter(|link| link.rel != "self")
            .map(|link| self.render_link(link))
            .collect();
        if !links.is_empty() {
            item.insert("links".to_string(), Value::Array(links));
        }
        Ok(Value::Object(item))
    }

    fn render(&self, representation: &Representation) -> Result<Value, CodecError> {
        let mut collection = Map::new();
        collection.insert("version".to_string(), json!(VERSION));
        if let Some(href) = representation.self_href() {
            collection.insert("href".to_string(), json!(href));
        }

        let links: Vec<Value> = representation
            .links
            .iter()
            .filter(|link| link.rel != "self")
            .map(|link| self.render_link(link))
            .collect();
        if !links.is_empty() {
            collection.insert("links".to_string(), Value::Array(links));
        }

        let item_resources: Vec<&Representation> = representation
            .embedded
            .iter()
            .filter(|group| matches!(&group.rel, crate::document::EmbeddedRel::Named(rel) if rel == "item"))
            .flat_map(|group| group.resources.iter())
            .collect();

        let items = if item_resources.is_empty() {
            // A single resource is its own only item; the shared href lets
            // the decoder fold it back
            vec![self.render_item(&Representation {
                properties: representation.properties.clone(),
                links: representation.links.clone(),
                embedded: Vec::new(),
                templates: Vec::new(),
            })?]
        } else {
            item_resources
                .into_iter()
                .map(|resource| self.render_item(resource))
                .collect::<Result<Vec<_>, _>>()?
        };
        collection.insert("items".to_string(), Value::Array(items));

        let mut root = Map::new();
        root.insert("collection".to_string(), Value::Object(collection));
        Ok(Value::Object(root))
    }
}

fn parse_link(value: &Value) -> Result<Link, CodecError> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::DecodingFailed("Collection link is not an object".to_string()))?;
    let rel = object
        .get("rel")
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::DecodingFailed("Collection link has no rel".to_string()))?;
    let href = object
        .get("href")
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::DecodingFailed("Collection link has no href".to_string()))?;
    let mut link = Link::new(rel, href);
    if let Some(name) = object.get("name").and_then(Value::as_str) {
        link = link.with_name(name);
    }
    if let Some(prompt) = object.get("prompt").and_then(Value::as_str) {
        link = link.with_title(prompt);
    }
    Ok(link)
}

fn parse_item(value: &Value) -> Result<Representation, CodecError> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::DecodingFailed("Collection item is not an object".to_string()))?;
    let mut representation = Representation::new();
    if let Some(href) = object.get("href").and_then(Value::as_str) {
        representation.links.push(Link::self_link(href));
    }
    if let Some(data) = object.get("data").and_then(Value::as_array) {
        for entry in data {
            let entry: DataEntry = serde_json::from_value(entry.clone())?;
            representation
                .properties
                .insert(entry.name, entry.value.unwrap_or(Value::Null));
        }
    }
    if let Some(links) = object.get("links").and_then(Value::as_array) {
        for link in links {
            representation.links.push(parse_link(link)?);
        }
    }
    Ok(representation)
}

impl BodyReader for CollectionJsonCodec {
    fn readable_types(&self) -> Vec<MediaType> {
        HypermediaType::CollectionJson.media_types()
    }

    fn read(&self, body: &[u8]) -> Result<Representation, CodecError> {
        let value: Value = serde_json::from_slice(body)?;
        let collection = value
            .get("collection")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                CodecError::DecodingFailed("Document has no collection object".to_string())
            })?;

        let mut representation = Representation::new();
        let collection_href = collection.get("href").and_then(Value::as_str);
        if let Some(href) = collection_href {
            representation.links.push(Link::self_link(href));
        }
        if let Some(links) = collection.get("links").and_then(Value::as_array) {
            for link in links {
                representation.links.push(parse_link(link)?);
            }
        }

        let items = collection
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let parsed: Vec<Representation> = items
            .iter()
            .map(parse_item)
            .collect::<Result<Vec<_>, _>>()?;

        let folds_to_root = parsed.len() == 1
            && parsed[0].self_href() == collection_href;
        if folds_to_root {
            let mut item = parsed.into_iter().next().ok_or_else(|| {
                CodecError::DecodingFailed("Collection item vanished".to_string())
            })?;
            representation.properties = std::mem::take(&mut item.properties);
        } else if !parsed.is_empty() {
            representation = representation.embed("item", parsed);
        }
        Ok(representation)
    }
}

impl BodyWriter for CollectionJsonCodec {
    fn writable_types(&self) -> Vec<MediaType> {
        HypermediaType::CollectionJson.media_types()
    }

    fn write(&self, representation: &Representation) -> Result<Bytes, CodecError> {
        self.serializer.to_bytes(&self.render(representation)?)
    }
}
