use kagari::prelude::*;
use serde_json::json;

// Shared strategies for every request the example client sends
pub static STRATEGIES: SStrategies = Lazy::new(|| {
    let providers = HypermediaProviders::new()
        .relation(Arc::new(DefaultRelationProvider::new()))
        .curie(Arc::new(DefaultCurieProvider::new(
            "ex",
            "https://example.org/rels/{rel}",
        )))
        .messages(Arc::new(MessageBundle::from_text(
            "_links.ex:orders.title=Your orders",
        )));

    let enabled = EnabledTypeSet::of(&[
        HypermediaType::Hal,
        HypermediaType::HalForms,
        HypermediaType::Uber,
    ]);
    Arc::new(
        ExchangeStrategies::hypermedia(&enabled, None, &providers)
            .expect("Example providers are complete"),
    )
});

#[tokio::main]
async fn main() {
    println!("Kagari example: encoding one resource in three flavors");

    let order = Representation::new()
        .property("total", json!(42.5))
        .property("currency", json!("USD"))
        .link(Link::self_link("/orders/17"))
        .link(Link::new("https://example.org/rels/orders", "/orders"))
        .template(Template::new("default", "PUT").property(
            TemplateProperty::new("total").required().with_prompt("Order total"),
        ));

    for media_type in STRATEGIES.supported_types() {
        let writer = STRATEGIES
            .writer_for(&media_type)
            .expect("Strategies carry a writer for every supported type");
        match writer.write(&order) {
            Ok(body) => {
                println!("--- {} ---", media_type);
                println!("{}", String::from_utf8_lossy(&body));
            }
            Err(err) => eprintln!("Encoding {} failed: {}", media_type, err),
        }
    }

    // Streaming server side: the same registration, defaults switched off
    let mut configurer = StreamingCodecConfigurer::new();
    configurer
        .configure_hypermedia(
            &EnabledTypeSet::of(&[HypermediaType::Hal]),
            None,
            &HypermediaProviders::new()
                .relation(Arc::new(DefaultRelationProvider::new()))
                .messages(Arc::new(MessageBundle::new())),
        )
        .expect("Streaming configuration succeeds");
    println!(
        "Streaming defaults still on: {}",
        configurer.register_defaults()
    );
}
