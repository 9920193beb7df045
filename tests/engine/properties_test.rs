use std::sync::{Arc, Mutex};

use serde_json::json;

use oplog::context::{Context, DynObject, ObjectError, ServiceRegistry, Value};
use oplog::engine::{EngineError, FaultReporter, HandlerError, TemplateEngine};
use oplog::handlers::{ExpressionHandler, MathExpressionHandler, MATH_ERROR_SENTINEL};

fn render(engine: &mut TemplateEngine<'_>, templates: &[&str]) -> Vec<String> {
    for template in templates {
        engine.enqueue(*template);
    }
    engine.render_all()
}

fn math_engine(ctx: &Context) -> TemplateEngine<'_> {
    let mut engine = TemplateEngine::new(ctx);
    engine.register_handler(MathExpressionHandler::default());
    engine
}

/// Answers every expression with a fixed reply.
struct Constant {
    name: &'static str,
    reply: &'static str,
}

impl ExpressionHandler for Constant {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "constant reply"
    }

    fn handle(
        &self,
        _expression: &str,
        _context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        Ok(Some(self.reply.to_string()))
    }
}

/// Fails on `{bad}`, declines everything else.
struct Faulty;

impl ExpressionHandler for Faulty {
    fn name(&self) -> &str {
        "faulty"
    }

    fn description(&self) -> &str {
        "fails on {bad}"
    }

    fn handle(
        &self,
        expression: &str,
        _context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        if expression == "bad" {
            return Err(HandlerError::InvalidExpression {
                expression: expression.to_string(),
                reason: "always fails".to_string(),
            });
        }
        Ok(None)
    }
}

#[test]
fn test_identity_without_placeholders() {
    let ctx = Context::new().with("a", 1);
    let mut engine = TemplateEngine::new(&ctx);
    let templates = ["", "plain text", "braces } alone {", "多字节 text"];
    assert_eq!(render(&mut engine, &templates), templates);
}

#[test]
fn test_unknown_placeholder_kept_verbatim() {
    let ctx = Context::new();
    let engine = TemplateEngine::new(&ctx);
    assert_eq!(engine.render_template("{unknown}"), "{unknown}");
    assert_eq!(engine.render_template("a {} b"), "a {} b");
}

#[test]
fn test_precedence_follows_first_registration() {
    let ctx = Context::new();
    let mut engine = TemplateEngine::bare(&ctx);
    engine.register_handler(Constant { name: "a", reply: "A" });
    engine.register_handler(Constant { name: "b", reply: "B" });
    assert_eq!(engine.render_template("{x}"), "A");

    // overwriting either name leaves the order alone
    engine.register_handler(Constant { name: "b", reply: "B2" });
    engine.register_handler(Constant { name: "a", reply: "A2" });
    assert_eq!(engine.registry().names(), ["a", "b"]);
    assert_eq!(engine.render_template("{x}"), "A2");

    engine.remove_handler("a");
    assert_eq!(engine.render_template("{x}"), "B2");
}

#[test]
fn test_math_with_variables() {
    let ctx = Context::new().with("price", 50).with("quantity", 3);
    let engine = math_engine(&ctx);
    assert_eq!(
        engine.render_template("Total: {(math)$price*$quantity}"),
        "Total: 150"
    );
}

#[test]
fn test_math_literal_float_noise_hidden() {
    let ctx = Context::new();
    let engine = math_engine(&ctx);
    assert_eq!(engine.render_template("Total: {(math)100*1.2}"), "Total: 120");
}

#[test]
fn test_math_rejects_disallowed_characters() {
    let ctx = Context::new().with("cmd", "phpinfo()");
    let engine = math_engine(&ctx);
    for template in [
        "{(math)1+system(1)}",
        "{(math)2^3}",
        "{(math)1;1}",
        "{(math)$price_x % 2}",
        "{(math)`id`}",
    ] {
        assert_eq!(engine.render_template(template), MATH_ERROR_SENTINEL, "{template}");
    }
    // non-numeric variables become 0, so the text never reaches the evaluator
    assert_eq!(engine.render_template("{(math)$cmd+1}"), "1");
}

#[test]
fn test_nested_access() {
    let ctx = Context::from_json(json!({"user": {"name": "Alice"}})).unwrap();
    let engine = TemplateEngine::new(&ctx);
    assert_eq!(engine.render_template("{user.name}"), "Alice");
}

#[test]
fn test_registry_object_dispatch() {
    let ctx = Context::new();
    let mut services = ServiceRegistry::new();
    services.register(
        "svc",
        Arc::new(DynObject::new("Service").with_method("getName", |_| Ok(Value::from("X")))),
    );
    let engine = TemplateEngine::new(&ctx).with_services(&services);
    assert_eq!(engine.render_template("{(obj)svc.getName()}"), "X");
    assert_eq!(engine.render_template("{(obj)svc.name}"), "X");
}

#[test]
fn test_failing_getter_falls_through_to_field() {
    let user = DynObject::new("User")
        .with_method("getName", |_| {
            Err(ObjectError::Failed {
                method: "getName".to_string(),
                message: "session expired".to_string(),
            })
        })
        .with_field("name", "Alice");
    let ctx = Context::new().with("user", user.into_value());
    let engine = TemplateEngine::new(&ctx);
    assert_eq!(engine.render_template("{(obj)user.name}"), "Alice");
}

#[test]
fn test_handler_fault_isolated_to_its_token() {
    let ctx = Context::new().with("a", "1").with("b", "2");
    let mut engine = TemplateEngine::bare(&ctx);
    engine.register_handler(Faulty);
    engine.register_handler(oplog::handlers::ContextVariableHandler);

    let rendered = render(&mut engine, &["{a}", "{bad} and {b}", "{b}{a}"]);
    assert_eq!(rendered, ["1", "{bad} and 2", "21"]);
}

#[derive(Default)]
struct Recording(Mutex<Vec<String>>);

impl FaultReporter for Recording {
    fn report(&self, fault: &EngineError) {
        self.0.lock().unwrap().push(fault.to_string());
    }
}

/// Panics on `{panic}`.
struct Panicking;

impl ExpressionHandler for Panicking {
    fn name(&self) -> &str {
        "panicking"
    }

    fn description(&self) -> &str {
        "panics on {panic}"
    }

    fn handle(
        &self,
        expression: &str,
        _context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        assert_ne!(expression, "panic", "unexpected panic in handler");
        Ok(None)
    }
}

#[test]
fn test_batch_fault_returns_raw_templates() {
    let ctx = Context::new().with("a", "1");
    let reporter = Arc::new(Recording::default());
    let mut engine = TemplateEngine::new(&ctx).with_reporter(reporter.clone());
    engine.register_handler(Panicking);

    let rendered = render(&mut engine, &["{a}", "{panic}", "{a}"]);
    assert_eq!(rendered, ["{a}", "{panic}", "{a}"]);
    assert_eq!(reporter.0.lock().unwrap().len(), 1);
}

/// A reporter that itself panics must not escape `render_all`.
struct BrokenReporter;

impl FaultReporter for BrokenReporter {
    fn report(&self, _fault: &EngineError) {
        panic!("reporter down");
    }
}

#[test]
fn test_broken_reporter_contained() {
    let ctx = Context::new();
    let mut engine = TemplateEngine::bare(&ctx).with_reporter(Arc::new(BrokenReporter));
    engine.register_handler(Panicking);
    assert_eq!(render(&mut engine, &["{panic}"]), ["{panic}"]);
}

#[test]
fn test_substituted_text_not_rescanned() {
    let ctx = Context::new().with("a", "{b}").with("b", "B");
    let engine = TemplateEngine::new(&ctx);
    assert_eq!(engine.render_template("{a}"), "{b}");
}
