use ekklesia_cell::prelude::*;
use ekklesia_cell::{layout_cell_type, DefinitionError};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
struct TestModel {
    id: u64,
    title: String,
    private: String,
}

impl Model for TestModel {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "title" => Some(json!(self.title)),
            "private" => Some(json!(self.private)),
            _ => None,
        }
    }
}

struct User {
    name: String,
}

impl Model for User {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(json!(self.name)),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        json!({ "name": self.name })
    }
}

struct Unregistered;

impl Model for Unregistered {
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Records rendered templates and renders `template:id:title`.
#[derive(Default)]
struct TestRequest {
    rendered: RefCell<Vec<String>>,
    user: Option<User>,
    locale: Option<&'static str>,
    fail: bool,
}

impl Request for TestRequest {
    fn render_template(&self, template: &str, cell: &Cell<'_>) -> Result<String, BoxError> {
        self.rendered.borrow_mut().push(template.to_string());
        if self.fail {
            return Err("template exploded".into());
        }
        let ctx = TemplateContext::new(cell);
        Ok(format!("{}:{}:{}", template, ctx.text("id")?, ctx.text("title")?))
    }

    fn link(&self, model: &dyn Model, view_name: &str) -> Result<String, BoxError> {
        let id = model.attribute("id").unwrap_or(Value::Null);
        let base = format!("/{}/{}", model.model_name().to_lowercase(), id);
        if view_name.is_empty() {
            Ok(base)
        } else {
            Ok(format!("{base}/{view_name}"))
        }
    }

    fn class_link(
        &self,
        model_type: &str,
        variables: &Options,
        view_name: &str,
    ) -> Result<String, BoxError> {
        let mut url = format!("/{}", model_type.to_lowercase());
        if !view_name.is_empty() {
            url = format!("{url}/{view_name}");
        }
        for (i, (name, value)) in variables.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            url = format!("{url}{sep}{name}={value}");
        }
        Ok(url)
    }

    fn current_user(&self) -> Option<&dyn Model> {
        self.user.as_ref().map(|user| user as &dyn Model)
    }

    fn gettext(&self, message: &str) -> String {
        match message {
            "Yes" => "Ja".into(),
            other => other.to_string(),
        }
    }

    fn locale(&self) -> &str {
        self.locale.unwrap_or("de")
    }
}

struct Counters {
    property: Arc<AtomicUsize>,
    fragment: Arc<AtomicUsize>,
}

fn model() -> TestModel {
    TestModel {
        id: 5,
        title: "test".into(),
        private: "secret".into(),
    }
}

fn test_cell_type(counters: &Counters, prefix: Option<&str>) -> CellType {
    let property = counters.property.clone();
    let fragment = counters.fragment.clone();

    let mut builder = CellType::builder("TestCell")
        .model_properties(["id", "title"])
        .property("test_url", move |_| {
            property.fetch_add(1, Ordering::SeqCst);
            Ok(json!("https://example.com/test"))
        })
        .property("failing", |_| Err("boom".into()))
        .fragment("alternate_fragment", |cell| {
            cell.render_template("alternate_template")
        })
        .fragment("fragment_without_params", move |_| {
            fragment.fetch_add(1, Ordering::SeqCst);
            Ok(Markup::default())
        })
        .fragment("echo_option", |cell| {
            Ok(Markup::new(
                cell.option("some_option")
                    .map(Value::to_string)
                    .unwrap_or_default(),
            ))
        })
        .constant("cannot_call_this", Value::Null)
        .template_fragment("name");
    if let Some(prefix) = prefix {
        builder = builder.template_prefix(prefix);
    }
    builder.build().unwrap()
}

fn setup(prefix: Option<&str>) -> (CellApp, Counters) {
    let counters = Counters {
        property: Arc::new(AtomicUsize::new(0)),
        fragment: Arc::new(AtomicUsize::new(0)),
    };
    let mut registry = CellRegistry::new();
    registry.register_default::<TestModel>(test_cell_type(&counters, prefix));
    (CellApp::new(registry, Settings::default()), counters)
}

fn value(attr: Attribute) -> Value {
    attr.into_value().expect("plain value")
}

#[test]
fn test_root_cell_uses_layout() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();
    assert!(cell.layout());
    assert!(cell.parent().is_none());
}

#[test]
fn test_nested_cells() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let parent = app.get_cell(&model, &request, "").unwrap();

    let child = parent.cell(&model, "", None, Options::new()).unwrap();
    assert!(child.parent().is_some());
    assert!(!child.layout());
    assert_eq!(child.type_name(), parent.type_name());

    let with_layout = parent.cell(&model, "", Some(true), Options::new()).unwrap();
    assert!(with_layout.layout());
}

#[test]
fn test_explicit_layout_on_root() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app
        .get_cell(&model, &request, "")
        .unwrap()
        .with_layout(Some(false));
    assert!(!cell.layout());
    assert_eq!(value(cell.get("layout").unwrap()), json!(false));
}

#[test]
fn test_cell_get_model_properties() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(value(cell.get("id").unwrap()), json!(5));
    assert_eq!(value(cell.get("title").unwrap()), json!("test"));
}

#[test]
fn test_undeclared_model_attribute_is_not_exposed() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let err = cell.get("private").unwrap_err();
    assert!(err.is_not_found());
    insta::assert_snapshot!(
        err.to_string(),
        @"TestCell has no attribute 'private'. Is it from the model? Did you forget to add it to 'model_properties'?"
    );
}

#[test]
fn test_automatic_property_is_memoized() {
    let (app, counters) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(
        value(cell.get("test_url").unwrap()),
        json!("https://example.com/test")
    );
    assert_eq!(
        value(cell.get("test_url").unwrap()),
        json!("https://example.com/test")
    );
    assert_eq!(counters.property.load(Ordering::SeqCst), 1);

    // a fresh cell computes again
    let other = app.get_cell(&model, &request, "").unwrap();
    other.get("test_url").unwrap();
    assert_eq!(counters.property.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fragment_methods_are_not_memoized() {
    let (app, counters) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(
        cell.get("fragment_without_params").unwrap(),
        Attribute::Fragment("fragment_without_params".into())
    );
    cell.call("fragment_without_params").unwrap();
    cell.call("fragment_without_params").unwrap();
    assert_eq!(counters.fragment.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fragment_from_name_with_prefix() {
    let (app, _) = setup(Some("templates"));
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    cell.call("name").unwrap();
    assert_eq!(
        request.rendered.borrow().as_slice(),
        ["templates/name.j2.jade"]
    );
}

#[test]
fn test_fragment_from_name_without_prefix() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    cell.call("name").unwrap();
    assert_eq!(request.rendered.borrow().as_slice(), ["name.j2.jade"]);
}

#[test]
fn test_cell_item() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(value(cell.item("id").unwrap()), json!(5));
    assert_eq!(value(cell.item("title").unwrap()), json!("test"));
    assert_eq!(
        value(cell.item("test_url").unwrap()),
        json!("https://example.com/test")
    );

    let err = cell.item("does_not_exist").unwrap_err();
    assert!(matches!(err, CellError::KeyNotFound { ref key, .. } if key == "does_not_exist"));
}

#[test]
fn test_cell_contains_without_evaluating() {
    let (app, counters) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert!(cell.contains("id"));
    assert!(cell.contains("title"));
    assert!(cell.contains("test_url"));
    assert!(cell.contains("failing"));
    assert!(cell.contains("layout"));
    assert!(cell.contains("show"));
    assert!(!cell.contains("private"));
    assert!(!cell.contains("does_not_exist"));
    assert_eq!(counters.property.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cell_fields_override_model_properties() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let mut cell = app.get_cell(&model, &request, "").unwrap();

    cell.set("id", json!(42));
    assert_eq!(value(cell.item("id").unwrap()), json!(42));
}

#[test]
fn test_failing_property_is_an_access_error() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let err = cell.get("failing").unwrap_err();
    assert!(!err.is_not_found());
    match &err {
        CellError::AttributeAccess {
            cell_type,
            attribute,
            source,
        } => {
            assert_eq!(cell_type, "TestCell");
            assert_eq!(attribute, "failing");
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.to_string(), "TestCell.failing raised: boom");

    // failures are not cached and do not turn into "not found"
    assert!(matches!(
        cell.item("failing"),
        Err(CellError::AttributeAccess { .. })
    ));
}

#[test]
fn test_cell_template_path() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();
    assert_eq!(cell.template_path(), "test.j2.jade");

    let custom = app
        .get_cell(&model, &request, "")
        .unwrap()
        .with_template_path("custom.j2.jade");
    assert_eq!(custom.template_path(), "custom.j2.jade");
}

#[test]
fn test_cell_show() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let markup = cell.show().unwrap();
    assert_eq!(markup, "test.j2.jade:5:test");
    assert_eq!(request.rendered.borrow().as_slice(), ["test.j2.jade"]);
}

#[test]
fn test_app_render_is_root_show() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());

    assert_eq!(
        app.render(&model, &request, "").unwrap(),
        "test.j2.jade:5:test"
    );
    assert!(matches!(
        app.render(&Unregistered, &request, ""),
        Err(CellError::CellNotFound { .. })
    ));
}

#[test]
fn test_render_errors_are_wrapped() {
    let (app, _) = setup(None);
    let model = model();
    let request = TestRequest {
        fail: true,
        ..Default::default()
    };
    let cell = app.get_cell(&model, &request, "").unwrap();

    let err = cell.show().unwrap_err();
    assert!(matches!(err, CellError::Render { ref template, .. } if template == "test.j2.jade"));
}

#[test]
fn test_render_cell() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let markup = cell.render_cell(RenderCall::model(&model)).unwrap();
    assert_eq!(markup, "test.j2.jade:5:test");
    assert_eq!(request.rendered.borrow().as_slice(), [cell.template_path()]);
}

#[test]
fn test_render_cell_view_method_not_callable() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let err = cell
        .render_cell(RenderCall::model(&model).view("cannot_call_this"))
        .unwrap_err();
    assert!(matches!(err, CellError::InvalidCall { .. }));
    let message = err.to_string();
    assert!(message.contains("cannot_call_this"));
    assert!(message.contains("TestModel"));
}

#[test]
fn test_render_cell_missing_view_method() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let err = cell
        .render_cell(RenderCall::model(&model).view("nope"))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_render_cell_fragment() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    cell.render_cell(
        RenderCall::model(&model)
            .view("alternate_fragment")
            .option("some_option", json!(42)),
    )
    .unwrap();
    assert_eq!(
        request.rendered.borrow().last().map(String::as_str),
        Some("alternate_template")
    );

    let echoed = cell
        .render_cell(
            RenderCall::model(&model)
                .view("echo_option")
                .option("some_option", json!(42)),
        )
        .unwrap();
    assert_eq!(echoed, "42");
}

#[test]
fn test_render_cell_collection() {
    let (app, _) = setup(None);
    let request = TestRequest::default();
    let model1 = model();
    let model2 = TestModel {
        id: 6,
        title: "test2".into(),
        ..model()
    };
    let models: Vec<&dyn Model> = vec![&model1, &model2];
    let cell = app.get_cell(&model1, &request, "").unwrap();

    let result = cell
        .render_cell(RenderCall::collection(&models).separator("&"))
        .unwrap();
    assert_eq!(result, "test.j2.jade:5:test&test.j2.jade:6:test2");

    let default_separator = cell.render_cell(RenderCall::collection(&models)).unwrap();
    assert_eq!(
        default_separator,
        "test.j2.jade:5:test\ntest.j2.jade:6:test2"
    );
}

#[test]
fn test_render_cell_collection_options_reach_every_item() {
    let (app, _) = setup(None);
    let request = TestRequest::default();
    let (model1, model2) = (model(), model());
    let models: Vec<&dyn Model> = vec![&model1, &model2];
    let cell = app.get_cell(&model1, &request, "").unwrap();

    let result = cell
        .render_cell(
            RenderCall::collection(&models)
                .view("echo_option")
                .separator(",")
                .option("some_option", json!("x")),
        )
        .unwrap();
    assert_eq!(result, "\"x\",\"x\"");
}

#[test]
fn test_render_cell_collection_view_method_not_callable() {
    let (app, _) = setup(None);
    let request = TestRequest::default();
    let model1 = model();
    let models: Vec<&dyn Model> = vec![&model1];
    let cell = app.get_cell(&model1, &request, "").unwrap();

    let err = cell
        .render_cell(RenderCall::collection(&models).view("cannot_call_this"))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("cannot_call_this"));
    assert!(message.contains("TestModel"));
}

#[test]
fn test_render_cell_model_and_collection_not_allowed() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let models: Vec<&dyn Model> = vec![&model];
    let cell = app.get_cell(&model, &request, "").unwrap();

    let call = RenderCall {
        model: Some(&model as &dyn Model),
        collection: Some(models.as_slice()),
        ..Default::default()
    }
    .option("some_option", json!(42));
    assert!(matches!(cell.render_cell(call), Err(CellError::Conflict)));
    assert!(request.rendered.borrow().is_empty());

    assert!(matches!(
        cell.render_cell(RenderCall::default()),
        Err(CellError::MissingTarget)
    ));
}

#[test]
fn test_render_cell_for_unregistered_model() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let err = cell.render_cell(RenderCall::model(&Unregistered)).unwrap_err();
    assert!(matches!(err, CellError::CellNotFound { .. }));
}

#[test]
fn test_builtin_links() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(value(cell.get("self_link").unwrap()), json!("/testmodel/5"));
    assert_eq!(value(cell.get("edit_url").unwrap()), json!("/testmodel/5/+edit"));
    assert_eq!(value(cell.get("new_url").unwrap()), json!("/testmodel/5/+new"));
    assert_eq!(cell.static_url("portal.css"), "/static/portal.css");
}

#[test]
fn test_cell_without_model() {
    let (app, counters) = setup(None);
    let request = TestRequest::default();
    let cell_type = test_cell_type(&counters, None);
    let cell = Cell::new(&app, &cell_type, None, &request);

    assert!(cell.get("id").unwrap_err().is_not_found());
    assert!(matches!(
        cell.get("self_link"),
        Err(CellError::AttributeAccess { .. })
    ));
}

#[test]
fn test_template_context_resolution() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();
    let ctx = TemplateContext::new(&cell)
        .with_local("title", json!("local title"))
        .with_local("page", json!(3));

    // cell attributes win over locals
    assert_eq!(ctx.value("title").unwrap(), json!("test"));
    assert_eq!(ctx.value("page").unwrap(), json!(3));
    assert!(ctx.contains("page"));
    assert!(ctx.contains("id"));

    let missing = ctx.resolve("does_not_exist").unwrap_err();
    assert!(missing.to_string().contains("does_not_exist"));
    let private = ctx.resolve("private").unwrap_err();
    assert!(matches!(private, CellError::AttributeNotFound { .. }));
    assert!(private.to_string().contains("private"));
}

#[test]
fn test_template_context_without_cell() {
    let ctx = TemplateContext::without_cell().with_local("greeting", json!("hi"));
    assert_eq!(ctx.text("greeting").unwrap(), "hi");
    assert_eq!(ctx.resolve("missing").unwrap(), None);
    assert_eq!(ctx.text("missing").unwrap(), "");
    assert!(ctx.call("show").is_err());
}

#[test]
fn test_template_context_renders_fragments_as_values() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();
    let ctx = TemplateContext::new(&cell);

    assert_eq!(ctx.text("name").unwrap(), "name.j2.jade:5:test");
}

#[test]
fn test_layout_cell() {
    let layout = layout_cell_type().unwrap();
    let index = CellType::builder("IndexCell")
        .extends(&layout)
        .property("page_test_url", |cell| {
            Ok(json!(cell.class_link("PageTest", &Options::new(), "")?))
        })
        .build()
        .unwrap();
    assert_eq!(index.template_path(), "ekklesia_common/index.j2.jade");

    let mut registry = CellRegistry::new();
    registry.register_default::<TestModel>(index);
    let mut settings = Settings::default();
    settings.app.title = "Portal".into();
    settings.app.tos_url = Some("https://example.com/tos".into());
    let app = CellApp::new(registry, settings);

    let model = model();
    let request = TestRequest {
        user: Some(User {
            name: "ann".into(),
        }),
        ..Default::default()
    };
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(value(cell.get("brand_title").unwrap()), json!("Portal"));
    assert_eq!(value(cell.get("language").unwrap()), json!("de"));
    assert_eq!(
        value(cell.get("tos_url").unwrap()),
        json!("https://example.com/tos")
    );
    assert_eq!(value(cell.get("faq_url").unwrap()), Value::Null);
    assert_eq!(value(cell.get("profile_url").unwrap()), json!("/user/null"));
    assert_eq!(value(cell.get("current_user").unwrap()), json!({ "name": "ann" }));
    assert_eq!(value(cell.get("page_test_url").unwrap()), json!("/pagetest"));
}

#[test]
fn test_layout_language_drops_region() {
    let mut registry = CellRegistry::new();
    registry.register_default::<TestModel>(
        CellType::builder("IndexCell")
            .extends(&layout_cell_type().unwrap())
            .build()
            .unwrap(),
    );
    let app = CellApp::new(registry, Settings::default());
    let model = model();
    let request = TestRequest {
        locale: Some("de_CH"),
        ..Default::default()
    };
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(value(cell.get("language").unwrap()), json!("de"));
}

#[test]
fn test_own_property_beats_layout_when_defined_first() {
    let index = CellType::builder("IndexCell")
        .property("brand_title", |_| Ok(json!("child")))
        .extends(&layout_cell_type().unwrap())
        .build()
        .unwrap();
    let mut registry = CellRegistry::new();
    registry.register_default::<TestModel>(index);
    let app = CellApp::new(registry, Settings::default());
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(value(cell.get("brand_title").unwrap()), json!("child"));
    assert!(cell.contains("tos_url"));
}

#[test]
fn test_class_link() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    let mut variables = Options::new();
    variables.insert("back_url".into(), json!("/start"));
    assert_eq!(
        cell.class_link("OAuthCallback", &variables, "").unwrap(),
        "/oauthcallback?back_url=\"/start\""
    );
    assert_eq!(
        cell.class_link("Proposition", &Options::new(), "+new").unwrap(),
        "/proposition/+new"
    );
}

#[test]
fn test_template_context_translates_through_request() {
    let (app, _) = setup(None);
    let (model, request) = (model(), TestRequest::default());
    let cell = app.get_cell(&model, &request, "").unwrap();

    assert_eq!(cell.gettext("Yes"), "Ja");
    assert_eq!(TemplateContext::new(&cell).gettext("Yes"), "Ja");
    assert_eq!(TemplateContext::without_cell().gettext("Yes"), "Yes");
}

#[test]
fn test_definition_errors_happen_before_rendering() {
    let err = CellType::builder("Proposition").build().unwrap_err();
    assert!(matches!(err, DefinitionError::MissingCellSuffix { .. }));
}
