//! UBER (`application/vnd.amundsen-uber+json`) encoding and decoding.
//!
//! Everything in an UBER document is a `data` element. Links become
//! elements with a `url`, properties become name/value elements, and
//! embedded resources become a named element whose own `data` array holds
//! one wrapper element per child resource.

use bytes::Bytes;
use serde_json::{json, Map, Value};

use crate::codec::{BodyReader, BodyWriter, CodecError};
use crate::document::{EmbeddedGroup, Link, Representation};
use crate::format::resolve_embedded_rel;
use crate::media::{HypermediaType, MediaType};
use crate::serializer::SerializerConfig;

const VERSION: &str = "1.0";

/// Reader/writer pair for UBER documents
#[derive(Clone)]
pub struct UberCodec {
    serializer: SerializerConfig,
}

impl UberCodec {
    pub fn new(serializer: SerializerConfig) -> Self {
        Self { serializer }
    }

    pub fn serializer(&self) -> &SerializerConfig {
        &self.serializer
    }

    fn render_link(&self, link: &Link) -> Value {
        let mut element = Map::new();
        element.insert("rel".to_string(), json!([link.rel]));
        element.insert("url".to_string(), json!(link.href));
        if let Some(name) = &link.name {
            element.insert("name".to_string(), json!(name));
        }
        if link.templated {
            element.insert("templated".to_string(), json!(true));
        }
        Value::Object(element)
    }

    fn render_group(&self, group: &EmbeddedGroup) -> Vec<Value> {
        let rel = resolve_embedded_rel(group, None);
        group
            .resources
            .iter()
            .map(|resource| {
                let mut element = Map::new();
                element.insert("name".to_string(), json!(rel));
                element.insert("data".to_string(), Value::Array(self.render_data(resource)));
                Value::Object(element)
            })
            .collect()
    }

    fn render_data(&self, representation: &Representation) -> Vec<Value> {
        let mut data = Vec::new();
        for link in &representation.links {
            data.push(self.render_link(link));
        }
        for (name, value) in &representation.properties {
            data.push(json!({ "name": name, "value": value }));
        }
        for group in &representation.embedded {
            data.extend(self.render_group(group));
        }
        data
    }
}

fn parse_data(data: &[Value]) -> Result<Representation, CodecError> {
    let mut representation = Representation::new();
    for element in data {
        let object = element.as_object().ok_or_else(|| {
            CodecError::DecodingFailed("UBER data element is not an object".to_string())
        })?;
        if let Some(url) = object.get("url").and_then(Value::as_str) {
            let rel = object
                .get("rel")
                .and_then(Value::as_array)
                .and_then(|rels| rels.first())
                .and_then(Value::as_str)
                .unwrap_or("related");
            let mut link = Link::new(rel, url);
            if let Some(name) = object.get("name").and_then(Value::as_str) {
                link = link.with_name(name);
            }
            if object.get("templated").and_then(Value::as_bool) == Some(true) {
                link = link.templated();
            }
            representation.links.push(link);
        } else if let Some(nested) = object.get("data").and_then(Value::as_array) {
            let name = object.get("name").and_then(Value::as_str).ok_or_else(|| {
                CodecError::DecodingFailed("Nested UBER element has no name".to_string())
            })?;
            let child = parse_data(nested)?;
            match representation
                .embedded
                .iter_mut()
                .find(|group| matches!(&group.rel, crate::document::EmbeddedRel::Named(rel) if rel == name))
            {
                Some(group) => group.resources.push(child),
                None => representation = representation.embed(name, vec![child]),
            }
        } else if let Some(name) = object.get("name").and_then(Value::as_str) {
            let value = object.get("value").cloned().unwrap_or(Value::Null);
            representation.properties.insert(name.to_string(), value);
        } else {
            return Err(CodecError::DecodingFailed(
                "UBER data element has neither url nor name".to_string(),
            ));
        }
    }
    Ok(representation)
}

impl BodyReader for UberCodec {
    fn readable_types(&self) -> Vec<MediaType> {
        HypermediaType::Uber.media_types()
    }

    fn read(&self, body: &[u8]) -> Result<Representation, CodecError> {
        let value: Value = serde_json::from_slice(body)?;
        let data = value
            .get("uber")
            .and_then(|uber| uber.get("data"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CodecError::DecodingFailed("Document has no uber data array".to_string())
            })?;
        parse_data(data)
    }
}

impl BodyWriter for UberCodec {
    fn writable_types(&self) -> Vec<MediaType> {
        HypermediaType::Uber.media_types()
    }

    fn write(&self, representation: &Representation) -> Result<Bytes, CodecError> {
        let document = json!({
            "uber": {
                "version": VERSION,
                "data": self.render_data(representation),
            }
        });
        self.serializer.to_bytes(&document)
    }
}
