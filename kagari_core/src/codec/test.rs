//! Behavioral tests for hypermedia codec registration
//!
//! This module covers:
//! - Provider validation and fail-before-mutation
//! - Exact registered media types per enabled subset
//! - Idempotent registration and the already-registered sentinel
//! - Pipeline precedence after front insertion

#[cfg(test)]
mod registration_tests {
    use std::sync::Arc;

    use crate::codec::{
        register_hypermedia_codecs, CodecEntry, CodecPipeline, CodecSink, RegistrarError,
    };
    use crate::format::GenericJsonCodec;
    use crate::media::{
        collection_json, hal_forms_json, hal_json, hal_json_utf8, uber_json, EnabledTypeSet,
        HypermediaType, MediaType,
    };
    use crate::provider::{
        DefaultCurieProvider, DefaultRelationProvider, HypermediaProviders, MessageBundle,
    };
    use crate::serializer::SerializerConfig;

    fn full_providers() -> HypermediaProviders {
        HypermediaProviders::new()
            .relation(Arc::new(DefaultRelationProvider::new()))
            .curie(Arc::new(DefaultCurieProvider::new(
                "ex",
                "https://example.org/rels/{rel}",
            )))
            .messages(Arc::new(MessageBundle::new()))
    }

    fn generic_json_entry(media_type: MediaType) -> CodecEntry {
        let serializer = SerializerConfig::new();
        let codec = Arc::new(GenericJsonCodec::new(serializer.clone()).also_for(media_type.clone()));
        CodecEntry::new(vec![media_type], codec.clone(), codec, serializer)
    }

    fn registered_types(enabled: &EnabledTypeSet) -> Vec<MediaType> {
        let mut pipeline = CodecPipeline::new();
        register_hypermedia_codecs(&mut pipeline, enabled, None, &full_providers())
            .expect("Registration with full providers succeeds");
        pipeline.supported_types()
    }

    // ============================================================================
    // Provider Validation
    // ============================================================================

    #[test]
    fn test_missing_message_resolver_is_fatal() {
        let providers = HypermediaProviders::new()
            .relation(Arc::new(DefaultRelationProvider::new()));
        let mut pipeline = CodecPipeline::new();
        let result = register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::of(&[HypermediaType::Hal]),
            None,
            &providers,
        );
        assert_eq!(result, Err(RegistrarError::MissingMessageResolver));
    }

    #[test]
    fn test_message_resolver_required_even_without_hal() {
        // The resolver is mandatory regardless of which flavors are enabled
        let mut pipeline = CodecPipeline::new();
        let result = register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::of(&[HypermediaType::Uber]),
            None,
            &HypermediaProviders::new(),
        );
        assert_eq!(result, Err(RegistrarError::MissingMessageResolver));
    }

    #[test]
    fn test_missing_relation_provider_is_fatal_for_hal_family() {
        for flavor in [HypermediaType::Hal, HypermediaType::HalForms] {
            let providers =
                HypermediaProviders::new().messages(Arc::new(MessageBundle::new()));
            let mut pipeline = CodecPipeline::new();
            let result = register_hypermedia_codecs(
                &mut pipeline,
                &EnabledTypeSet::of(&[flavor]),
                None,
                &providers,
            );
            assert_eq!(result, Err(RegistrarError::MissingRelationProvider));
        }
    }

    #[test]
    fn test_relation_provider_not_required_without_hal_family() {
        let providers = HypermediaProviders::new().messages(Arc::new(MessageBundle::new()));
        let mut pipeline = CodecPipeline::new();
        let result = register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::of(&[HypermediaType::CollectionJson, HypermediaType::Uber]),
            None,
            &providers,
        );
        assert!(result.is_ok(), "Non-HAL flavors need no relation provider");
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_missing_curie_provider_is_fine() {
        let providers = HypermediaProviders::new()
            .relation(Arc::new(DefaultRelationProvider::new()))
            .messages(Arc::new(MessageBundle::new()));
        let mut pipeline = CodecPipeline::new();
        let result = register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::of(&[HypermediaType::Hal]),
            None,
            &providers,
        );
        assert!(result.is_ok(), "Curie provider is optional");
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn test_failed_registration_leaves_pipeline_untouched() {
        let mut pipeline = CodecPipeline::new();
        pipeline.push_back(generic_json_entry(MediaType::new("application", "json")));

        let providers = HypermediaProviders::new().messages(Arc::new(MessageBundle::new()));
        let result = register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::of(&[HypermediaType::Uber, HypermediaType::Hal]),
            None,
            &providers,
        );
        assert_eq!(result, Err(RegistrarError::MissingRelationProvider));
        assert_eq!(pipeline.len(), 1, "No entry may be inserted before validation");
    }

    // ============================================================================
    // Registered Media Types Per Enabled Subset
    // ============================================================================

    #[test]
    fn test_hal_only_registers_both_hal_types() {
        let types = registered_types(&EnabledTypeSet::of(&[HypermediaType::Hal]));
        assert_eq!(types, vec![hal_json(), hal_json_utf8()]);
    }

    #[test]
    fn test_hal_and_collection_json_subset() {
        let types = registered_types(&EnabledTypeSet::of(&[
            HypermediaType::Hal,
            HypermediaType::CollectionJson,
        ]));
        assert_eq!(types, vec![collection_json(), hal_json(), hal_json_utf8()]);
    }

    #[test]
    fn test_every_subset_registers_exactly_its_types() {
        for bits in 1u8..16 {
            let flavors: Vec<HypermediaType> = HypermediaType::ALL
                .iter()
                .enumerate()
                .filter(|(index, _)| bits & (1 << index) != 0)
                .map(|(_, flavor)| *flavor)
                .collect();
            let enabled: EnabledTypeSet = flavors.iter().copied().collect();

            let types = registered_types(&enabled);
            let mut expected: Vec<MediaType> = flavors
                .iter()
                .flat_map(|flavor| flavor.media_types())
                .collect();
            expected.sort_by_key(|media_type| media_type.to_string());
            let mut actual = types.clone();
            actual.sort_by_key(|media_type| media_type.to_string());
            assert_eq!(
                actual, expected,
                "Subset {:?} must register exactly its own media types",
                flavors
            );
        }
    }

    #[test]
    fn test_all_flavors_register_five_types_once_each() {
        let enabled: EnabledTypeSet = HypermediaType::ALL.iter().copied().collect();
        let types = registered_types(&enabled);
        assert_eq!(types.len(), 5);
        for media_type in [
            hal_json(),
            hal_json_utf8(),
            hal_forms_json(),
            collection_json(),
            uber_json(),
        ] {
            assert_eq!(
                types.iter().filter(|candidate| **candidate == media_type).count(),
                1,
                "{} must be registered exactly once",
                media_type
            );
        }
    }

    #[test]
    fn test_empty_set_is_a_no_op() {
        let mut pipeline = CodecPipeline::new();
        register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::new(),
            None,
            &full_providers(),
        )
        .expect("Empty set registers nothing");
        assert!(pipeline.is_empty());
    }

    // ============================================================================
    // Idempotence and the Already-Registered Sentinel
    // ============================================================================

    #[test]
    fn test_registration_is_idempotent() {
        let enabled = EnabledTypeSet::of(&[HypermediaType::Hal, HypermediaType::Uber]);
        let mut pipeline = CodecPipeline::new();
        register_hypermedia_codecs(&mut pipeline, &enabled, None, &full_providers())
            .expect("First registration succeeds");
        let after_first = pipeline.len();

        register_hypermedia_codecs(&mut pipeline, &enabled, None, &full_providers())
            .expect("Second registration succeeds");
        assert_eq!(
            pipeline.len(),
            after_first,
            "Second registration must not add entries"
        );
    }

    #[test]
    fn test_unmarked_hal_entry_does_not_trigger_the_sentinel() {
        // A plain JSON codec declaring a hypermedia media type carries no
        // hypermedia module marker, so registration still runs
        let mut pipeline = CodecPipeline::new();
        pipeline.push_back(generic_json_entry(hal_json()));
        assert!(!pipeline.has_hypermedia_entry());

        register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::of(&[HypermediaType::Hal]),
            None,
            &full_providers(),
        )
        .expect("Registration runs past the unmarked entry");
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_marked_entry_short_circuits_registration() {
        let enabled = EnabledTypeSet::of(&[HypermediaType::Hal]);
        let mut pipeline = CodecPipeline::new();
        register_hypermedia_codecs(&mut pipeline, &enabled, None, &full_providers())
            .expect("First registration succeeds");
        assert!(pipeline.has_hypermedia_entry());

        // Asking for a wider set afterwards is still a no-op
        let wider: EnabledTypeSet = HypermediaType::ALL.iter().copied().collect();
        register_hypermedia_codecs(&mut pipeline, &wider, None, &full_providers())
            .expect("Sentinel short-circuits");
        assert_eq!(pipeline.len(), 1);
    }

    // ============================================================================
    // Pipeline Precedence
    // ============================================================================

    #[test]
    fn test_hypermedia_entry_outranks_preexisting_generic_codec() {
        let mut pipeline = CodecPipeline::new();
        pipeline.push_back(generic_json_entry(hal_json()));

        register_hypermedia_codecs(
            &mut pipeline,
            &EnabledTypeSet::of(&[HypermediaType::Hal]),
            None,
            &full_providers(),
        )
        .expect("Registration succeeds");

        let entry = pipeline.select(&hal_json()).expect("A codec serves hal+json");
        assert!(
            entry.serializer().is_hypermedia_registered(),
            "Front insertion must outrank the generic codec"
        );
    }

    #[test]
    fn test_fixed_processing_order_puts_uber_first() {
        let enabled: EnabledTypeSet = HypermediaType::ALL.iter().copied().collect();
        let mut pipeline = CodecPipeline::new();
        register_hypermedia_codecs(&mut pipeline, &enabled, None, &full_providers())
            .expect("Registration succeeds");

        let first = &pipeline.entries()[0];
        assert_eq!(first.media_types(), &[uber_json()]);
        let last = &pipeline.entries()[pipeline.len() - 1];
        assert_eq!(last.media_types(), &[hal_json(), hal_json_utf8()]);
    }
}
