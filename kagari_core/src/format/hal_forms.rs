//! HAL-FORMS (`application/prs.hal-forms+json`) encoding and decoding.
//!
//! Renders the HAL shape and adds the `_templates` section from the
//! representation's affordance templates. Property prompts missing from
//! the document are resolved through the message resolver using the
//! `_templates.<key>.<property>.prompt` key.

use std::sync::Arc;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::codec::{BodyReader, BodyWriter, CodecError};
use crate::document::{Representation, Template};
use crate::media::{HypermediaType, MediaType};
use crate::provider::{template_prompt_key, CurieProvider, MessageResolver, RelationProvider};
use crate::serializer::{HalFormsConfiguration, SerializerConfig};

use super::hal::{parse_hal, render_hal};

/// Reader/writer pair for HAL-FORMS documents
#[derive(Clone)]
pub struct HalFormsCodec {
    serializer: SerializerConfig,
    config: HalFormsConfiguration,
    curie: Option<Arc<dyn CurieProvider>>,
    relation: Arc<dyn RelationProvider>,
    messages: Arc<dyn MessageResolver>,
}

impl HalFormsCodec {
    pub fn new(
        serializer: SerializerConfig,
        config: HalFormsConfiguration,
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

    fn render(&self, representation: &Representation) -> Result<Value, CodecError> {
        let mut root = render_hal(
            representation,
            self.config.hal_configuration(),
            self.curie.as_ref(),
            Some(&self.relation),
            self.messages.as_ref(),
        )?;

        if !representation.templates.is_empty() {
            let mut templates = Map::new();
            for template in &representation.templates {
                let key = if template.key.is_empty() {
                    self.config.default_template_key().to_string()
                } else {
                    template.key.clone()
                };
                templates.insert(key.clone(), self.render_template(&key, template)?);
            }
            root.insert("_templates".to_string(), Value::Object(templates));
        }
        Ok(Value::Object(root))
    }

    fn render_template(&self, key: &str, template: &Template) -> Result<Value, CodecError> {
        let mut prompted = template.clone();
        for property in &mut prompted.properties {
            if property.prompt.is_none() {
                property.prompt = self
                    .messages
                    .resolve(&template_prompt_key(key, &property.name));
            }
        }
        Ok(serde_json::to_value(&prompted)?)
    }
}

impl BodyReader for HalFormsCodec {
    fn readable_types(&self) -> Vec<MediaType> {
        HypermediaType::HalForms.media_types()
    }

    fn read(&self, body: &[u8]) -> Result<Representation, CodecError> {
        let value: Value = serde_json::from_slice(body)?;
        let mut representation = parse_hal(&value)?;

        if let Some(templates) = value.get("_templates").and_then(Value::as_object) {
            for (key, entry) in templates {
                let mut template: Template = serde_json::from_value(entry.clone())?;
                template.key = key.clone();
                representation.templates.push(template);
            }
        }
        Ok(representation)
    }
}

impl BodyWriter for HalFormsCodec {
    fn writable_types(&self) -> Vec<MediaType> {
        HypermediaType::HalForms.media_types()
    }

    fn write(&self, representation: &Representation) -> Result<Bytes, CodecError> {
        self.serializer.to_bytes(&self.render(representation)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Link, TemplateProperty};
    use crate::provider::{DefaultRelationProvider, MessageBundle};
    use serde_json::json;

    fn codec_with(bundle: MessageBundle) -> HalFormsCodec {
        HalFormsCodec::new(
            SerializerConfig::new(),
            HalFormsConfiguration::default(),
            None,
            Arc::new(DefaultRelationProvider),
            Arc::new(bundle),
        )
    }

    #[test]
    fn test_round_trip_with_templates() {
        let original = Representation::new()
            .property("name", json!("kagari"))
            .link(Link::self_link("/root"))
            .template(
                Template::new("default", "post")
                    .property(TemplateProperty::new("name").required())
                    .property(TemplateProperty::new("note")),
            );

        let codec = codec_with(MessageBundle::new());
        let body = codec.write(&original).unwrap();
        let decoded = codec.read(&body).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_templates_section_shape() {
        let representation = Representation::new().template(
            Template::new("default", "put").property(TemplateProperty::new("name").required()),
        );
        let codec = codec_with(MessageBundle::new());
        let body = codec.write(&representation).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["_templates"]["default"]["method"], json!("put"));
        assert_eq!(
            value["_templates"]["default"]["properties"][0]["name"],
            json!("name")
        );
        assert_eq!(
            value["_templates"]["default"]["properties"][0]["required"],
            json!(true)
        );
    }

    #[test]
    fn test_prompt_injected_from_messages() {
        let mut bundle = MessageBundle::new();
        bundle.insert("_templates.default.name.prompt", "Full name");
        let codec = codec_with(bundle);
        let representation = Representation::new()
            .template(Template::new("default", "post").property(TemplateProperty::new("name")));

        let body = codec.write(&representation).unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value["_templates"]["default"]["properties"][0]["prompt"],
            json!("Full name")
        );
    }

    #[test]
    fn test_no_templates_section_without_templates() {
        let codec = codec_with(MessageBundle::new());
        let body = codec
            .write(&Representation::new().property("a", json!(1)))
            .unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert!(value.get("_templates").is_none());
    }
}
