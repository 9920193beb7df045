use std::sync::Arc;

use serde_json::json;

use oplog::config::OplogConfig;
use oplog::context::{ContextBuilder, DynObject, ObjectHandle, ServiceRegistry, Value};
use oplog::engine::TemplateEngine;
use oplog::handlers::HandlerCatalog;

fn config(toml: &str) -> OplogConfig {
    toml::from_str(toml).unwrap()
}

#[test]
fn test_date_and_math_enabled_by_name() {
    let config = config(
        r#"
        [handlers]
        custom = ["date_format", "math_expression"]

        [date]
        utc_offset_seconds = 0
        "#,
    );
    let ctx = ContextBuilder::new()
        .param(json!({"price": 9.5, "qty": 2}))
        .extra("created", 0)
        .extra("shipped", 86_400)
        .extra("price", 9.5)
        .extra("qty", 2)
        .build();
    let mut engine = TemplateEngine::from_config(&ctx, &config, &HandlerCatalog::standard());
    engine.enqueue("Shipped {(date)shipped:%Y-%m-%d}, {(math)$price*$qty} due");
    engine.enqueue("Created {(date)created}");
    assert_eq!(
        engine.render_all(),
        ["Shipped 1970-01-02, 19 due", "Created {(date)created}"]
    );
}

#[test]
fn test_disable_default_leaves_only_custom() {
    let config = config(
        r#"
        [handlers]
        disable_default = true
        custom = ["context_variable"]
        "#,
    );
    let ctx = ContextBuilder::new()
        .param(json!({"id": 5}))
        .extra("name", "n")
        .build();
    let engine = TemplateEngine::from_config(&ctx, &config, &HandlerCatalog::standard());
    assert_eq!(engine.registry().names(), ["context_variable"]);
    assert_eq!(engine.render_template("{name} {param.id}"), "n {param.id}");
}

#[test]
fn test_single_default_switched_off() {
    let config = config(
        r#"
        [handlers.default]
        multi_array = false
        "#,
    );
    let ctx = ContextBuilder::new()
        .param(json!({"items": [{"sku": "a"}, {"sku": "b"}]}))
        .build();
    let engine = TemplateEngine::from_config(&ctx, &config, &HandlerCatalog::standard());
    assert_eq!(
        engine.render_template("{param.arr.sku}"),
        "{param.arr.sku}"
    );

    let engine = TemplateEngine::new(&ctx);
    assert_eq!(engine.render_template("{param.items}"), r#"[{"sku":"a"},{"sku":"b"}]"#);
}

#[test]
fn test_service_map_routes_object_keys() {
    let config = config(
        r#"
        [service_map]
        orders = "app.order_service"
        "#,
    );
    let mut services = ServiceRegistry::new();
    services.register_lazy("app.order_service", || {
        let service: Arc<dyn ObjectHandle> = Arc::new(
            DynObject::new("OrderService")
                .with_method("statusLabel", |args| {
                    Ok(Value::from(match args.first().map(String::as_str) {
                        Some("1") => "paid",
                        Some(_) => "other",
                        None => "none",
                    }))
                })
                .with_private_field("region", "eu"),
        );
        Some(service)
    });

    let ctx = ContextBuilder::new().build();
    let engine = TemplateEngine::from_config(&ctx, &config, &HandlerCatalog::standard())
        .with_services(&services);
    assert_eq!(
        engine.render_template("{(obj)orders.statusLabel(1)} in {(obj)orders.region}"),
        "paid in eu"
    );
    assert_eq!(
        engine.render_template("{(obj)app.order_service.region}"),
        "{(obj)app.order_service.region}"
    );
}

#[test]
fn test_context_object_shadows_registry() {
    let mut services = ServiceRegistry::new();
    services.register(
        "user",
        Arc::new(DynObject::new("RegistryUser").with_field("name", "registry")),
    );
    let ctx = ContextBuilder::new()
        .extra("user", DynObject::new("ContextUser").with_field("name", "context").into_value())
        .build();
    let engine = TemplateEngine::new(&ctx).with_services(&services);
    assert_eq!(engine.render_template("{(obj)user.name}"), "context");
    assert_eq!(engine.render_template("{user}"), r#"{"name":"context"}"#);
}
