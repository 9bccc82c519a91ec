//! Cell instances and the attribute protocol.
//!
//! Attribute lookup on a cell resolves names in a fixed order:
//!
//! 1. stored fields set on the instance,
//! 2. attributes defined by the [`CellType`],
//! 3. built-in cell attributes (`layout`, `template_path`, `self_link`, …),
//! 4. names listed in `model_properties`, read from the bound model.
//!
//! Anything else is an [`CellError::AttributeNotFound`]. Model attributes are
//! never reachable unless declared, and they can never shadow a cell attribute.

use crate::app::CellApp;
use crate::cell_type::{CellAttribute, CellType};
use crate::error::{BoxError, CellError};
use crate::markup::Markup;
use crate::memo::MemoSlots;
use crate::model::Model;
use crate::registry::DEFAULT_VIEW;
use crate::request::Request;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Named options forwarded to cells.
pub type Options = BTreeMap<String, Value>;

/// View method invoked by `render_cell` when no view name is given.
pub const DEFAULT_VIEW_METHOD: &str = "show";

const BUILTINS: &[&str] = &[
    "layout",
    "template_path",
    "current_user",
    "options",
    "self_link",
    "self_url",
    "edit_url",
    "new_url",
    DEFAULT_VIEW_METHOD,
];

/// Result of a successful attribute lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Value(Value),
    /// An invocable fragment; call it through [`Cell::call`].
    Fragment(String),
}

impl Attribute {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Attribute::Value(value) => Some(value),
            Attribute::Fragment(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Attribute::Value(value) => Some(value),
            Attribute::Fragment(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Attribute::Fragment(_))
    }
}

/// A view model bound to a model and a request.
///
/// A cell is created for one render and dropped afterwards. Child cells borrow
/// their parent.
pub struct Cell<'a> {
    app: &'a CellApp,
    cell_type: &'a CellType,
    model: Option<&'a dyn Model>,
    request: &'a dyn Request,
    parent: Option<&'a Cell<'a>>,
    collection: Option<&'a [&'a dyn Model]>,
    layout: Option<bool>,
    template_path: Option<String>,
    options: Options,
    fields: HashMap<String, Value>,
    memo: MemoSlots,
}

impl<'a> Cell<'a> {
    /// Create a root cell. Use [`Cell::cell`] to create children.
    pub fn new(
        app: &'a CellApp,
        cell_type: &'a CellType,
        model: Option<&'a dyn Model>,
        request: &'a dyn Request,
    ) -> Self {
        Cell {
            app,
            cell_type,
            model,
            request,
            parent: None,
            collection: None,
            layout: None,
            template_path: None,
            options: Options::new(),
            fields: HashMap::new(),
            memo: MemoSlots::new(cell_type.property_count()),
        }
    }

    pub fn with_parent(mut self, parent: &'a Cell<'a>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Explicit layout flag, overriding the parent-based default.
    pub fn with_layout(mut self, layout: Option<bool>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_collection(mut self, collection: &'a [&'a dyn Model]) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn with_template_path(mut self, template_path: impl Into<String>) -> Self {
        self.template_path = Some(template_path.into());
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn cell_type(&self) -> &'a CellType {
        self.cell_type
    }

    pub fn type_name(&self) -> &str {
        self.cell_type.name()
    }

    pub fn model(&self) -> Option<&'a dyn Model> {
        self.model
    }

    /// The bound model as its concrete type.
    pub fn model_as<T: Model>(&self) -> Option<&'a T> {
        self.model.and_then(|model| model.downcast_ref::<T>())
    }

    pub fn request(&self) -> &'a dyn Request {
        self.request
    }

    pub fn app(&self) -> &'a CellApp {
        self.app
    }

    pub fn parent(&self) -> Option<&'a Cell<'a>> {
        self.parent
    }

    pub fn collection(&self) -> Option<&'a [&'a dyn Model]> {
        self.collection
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Whether this cell renders the surrounding page chrome. Root cells do by
    /// default, children don't.
    pub fn layout(&self) -> bool {
        self.layout.unwrap_or(self.parent.is_none())
    }

    pub fn template_path(&self) -> &str {
        self.template_path
            .as_deref()
            .unwrap_or_else(|| self.cell_type.template_path())
    }

    pub fn current_user(&self) -> Option<&'a dyn Model> {
        self.request.current_user()
    }

    /// Store a field on this instance. Fields win over every other attribute.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    // attribute protocol

    /// Resolve `name` following the attribute lookup order.
    pub fn get(&self, name: &str) -> Result<Attribute, CellError> {
        if let Some(value) = self.fields.get(name) {
            return Ok(Attribute::Value(value.clone()));
        }

        if let Some(attr) = self.cell_type.attribute(name) {
            return self.evaluate(name, attr);
        }

        if let Some(result) = self.builtin(name) {
            return result;
        }

        if self.cell_type.is_model_property(name) {
            return self
                .model
                .and_then(|model| model.attribute(name))
                .map(Attribute::Value)
                .ok_or_else(|| CellError::not_found(self.type_name(), name));
        }

        Err(CellError::not_found(self.type_name(), name))
    }

    /// Indexed access; a missing attribute is reported as a missing key.
    pub fn item(&self, name: &str) -> Result<Attribute, CellError> {
        self.get(name).map_err(|err| match err {
            CellError::AttributeNotFound {
                cell_type,
                attribute,
            } => CellError::KeyNotFound {
                cell_type,
                key: attribute,
            },
            other => other,
        })
    }

    /// Resolve `name` to a plain value. Fragments are rendered.
    pub fn value(&self, name: &str) -> Result<Value, CellError> {
        match self.get(name)? {
            Attribute::Value(value) => Ok(value),
            Attribute::Fragment(fragment) => {
                self.call(&fragment).map(|markup| Value::String(markup.into_string()))
            }
        }
    }

    /// True exactly when [`Cell::get`] would find `name`. Nothing is evaluated.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
            || self.cell_type.defines(name)
            || BUILTINS.contains(&name)
            || self.cell_type.is_model_property(name)
    }

    /// Invoke the fragment (or `show`) called `name`.
    pub fn call(&self, name: &str) -> Result<Markup, CellError> {
        if !self.fields.contains_key(name) {
            match self.cell_type.attribute(name) {
                Some(CellAttribute::Fragment(render)) => return render(self),
                Some(CellAttribute::TemplateFragment(template)) => {
                    return self.render_template(&self.cell_type.template_for(template));
                }
                Some(_) => {}
                None if name == DEFAULT_VIEW_METHOD => return self.show(),
                None => {}
            }
        }

        // the name exists but is not invocable, or does not exist at all
        self.get(name)?;
        Err(CellError::InvalidCall {
            view_name: name.to_string(),
            model_type: self
                .model
                .map(|model| model.model_name())
                .unwrap_or("None")
                .to_string(),
        })
    }

    fn evaluate(&self, name: &str, attr: &CellAttribute) -> Result<Attribute, CellError> {
        match attr {
            CellAttribute::Property { slot, compute } => self
                .memo
                .get_or_try_init(*slot, || compute(self))
                .map(Attribute::Value)
                .map_err(|source| CellError::access(self.type_name(), name, source)),
            CellAttribute::Fragment(_) | CellAttribute::TemplateFragment(_) => {
                Ok(Attribute::Fragment(name.to_string()))
            }
            CellAttribute::Constant(value) => Ok(Attribute::Value(value.clone())),
        }
    }

    fn builtin(&self, name: &str) -> Option<Result<Attribute, CellError>> {
        let value = match name {
            "layout" => Ok(Value::Bool(self.layout())),
            "template_path" => Ok(Value::String(self.template_path().to_string())),
            "current_user" => Ok(self
                .current_user()
                .map(|user| user.to_value())
                .unwrap_or(Value::Null)),
            "options" => Ok(Value::Object(
                self.options
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )),
            "self_link" | "self_url" => self.self_link().map(Value::String),
            "edit_url" => self.self_view_url("+edit").map(Value::String),
            "new_url" => self.self_view_url("+new").map(Value::String),
            DEFAULT_VIEW_METHOD => return Some(Ok(Attribute::Fragment(name.to_string()))),
            _ => return None,
        };

        Some(value.map(Attribute::Value).map_err(|err| match err {
            CellError::AttributeAccess { .. } => err,
            other => CellError::access(self.type_name(), name, Box::new(other)),
        }))
    }

    // template helpers

    /// URL of `model`, optionally for a named view.
    pub fn link(&self, model: &dyn Model, view_name: &str) -> Result<String, CellError> {
        self.request
            .link(model, view_name)
            .map_err(|source| CellError::access(self.type_name(), "link", source))
    }

    /// URL of the model type `model_type`, for pages not bound to an instance.
    pub fn class_link(
        &self,
        model_type: &str,
        variables: &Options,
        view_name: &str,
    ) -> Result<String, CellError> {
        self.request
            .class_link(model_type, variables, view_name)
            .map_err(|source| CellError::access(self.type_name(), "class_link", source))
    }

    pub fn self_link(&self) -> Result<String, CellError> {
        self.self_view_url("")
    }

    pub fn self_view_url(&self, view_name: &str) -> Result<String, CellError> {
        let model = self.model.ok_or_else(|| {
            let source: BoxError = "cell is not bound to a model".into();
            CellError::access(self.type_name(), "self_link", source)
        })?;
        self.link(model, view_name)
    }

    pub fn static_url(&self, path: &str) -> String {
        self.app.settings().static_url(path)
    }

    /// Translate `message` for the request locale.
    pub fn gettext(&self, message: &str) -> String {
        self.request.gettext(message)
    }

    // rendering

    /// Render `template` with this cell as the view model.
    pub fn render_template(&self, template: &str) -> Result<Markup, CellError> {
        tracing::debug!("{} renders {}", self.type_name(), template);
        self.request
            .render_template(template, self)
            .map(Markup::new)
            .map_err(|source| CellError::Render {
                template: template.to_string(),
                source,
            })
    }

    /// Render the cell's own template.
    pub fn show(&self) -> Result<Markup, CellError> {
        self.render_template(self.template_path())
    }

    /// Look up the cell for `model` and create it as a child of this cell.
    /// Children render without layout unless `layout` says otherwise.
    pub fn cell<'s>(
        &'s self,
        model: &'s dyn Model,
        view_name: &str,
        layout: Option<bool>,
        options: Options,
    ) -> Result<Cell<'s>, CellError> {
        let cell_type = self.app.registry().resolve(model, view_name)?;
        Ok(Cell::new(self.app, cell_type, Some(model), self.request)
            .with_parent(self)
            .with_layout(layout)
            .with_options(options))
    }

    /// Look up cells for a model or a collection of models and render them.
    pub fn render_cell(&self, call: RenderCall<'_>) -> Result<Markup, CellError> {
        let RenderCall {
            model,
            collection,
            view_name,
            separator,
            layout,
            options,
        } = call;
        let view_method = view_name.as_deref().unwrap_or(DEFAULT_VIEW_METHOD);
        let lookup_view = view_name.as_deref().unwrap_or(DEFAULT_VIEW);

        match (model, collection) {
            (Some(_), Some(_)) => Err(CellError::Conflict),
            (None, None) => Err(CellError::MissingTarget),
            (Some(model), None) => self
                .cell(model, lookup_view, layout, options)?
                .call(view_method),
            (None, Some(items)) => {
                let parts = items
                    .iter()
                    .map(|item| {
                        self.cell(*item, lookup_view, layout, options.clone())?
                            .call(view_method)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Markup::join(parts, separator.as_deref().unwrap_or("\n")))
            }
        }
    }
}

impl fmt::Debug for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("type", &self.type_name())
            .field("model", &self.model.map(|m| m.model_name()))
            .field("layout", &self.layout())
            .field("template_path", &self.template_path())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Arguments of [`Cell::render_cell`].
///
/// `model` and `collection` are mutually exclusive.
#[derive(Default)]
pub struct RenderCall<'m> {
    pub model: Option<&'m dyn Model>,
    pub collection: Option<&'m [&'m dyn Model]>,
    /// View method to invoke (default `show`), also used as registry view name.
    pub view_name: Option<String>,
    /// Joins collection items (default newline).
    pub separator: Option<String>,
    pub layout: Option<bool>,
    pub options: Options,
}

impl<'m> RenderCall<'m> {
    pub fn model(model: &'m dyn Model) -> Self {
        RenderCall {
            model: Some(model),
            ..Default::default()
        }
    }

    pub fn collection(items: &'m [&'m dyn Model]) -> Self {
        RenderCall {
            collection: Some(items),
            ..Default::default()
        }
    }

    pub fn view(mut self, view_name: impl Into<String>) -> Self {
        self.view_name = Some(view_name.into());
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn layout(mut self, layout: bool) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }
}
