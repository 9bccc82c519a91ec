//! Template variable resolution backed by a cell.
//!
//! Templates see their own local variables plus everything the cell exposes.
//! When a cell is present its attributes win over locals of the same name,
//! and a name found in neither place is an error rather than an empty value.

use crate::cell::{Attribute, Cell, Options};
use crate::error::CellError;
use crate::markup::Markup;
use crate::request::Request;
use serde_json::Value;

/// Variables visible to one template render.
#[derive(Debug)]
pub struct TemplateContext<'c> {
    cell: Option<&'c Cell<'c>>,
    locals: Options,
}

impl<'c> TemplateContext<'c> {
    pub fn new(cell: &'c Cell<'c>) -> Self {
        TemplateContext {
            cell: Some(cell),
            locals: Options::new(),
        }
    }

    /// A context with template locals only.
    pub fn without_cell() -> Self {
        TemplateContext {
            cell: None,
            locals: Options::new(),
        }
    }

    pub fn with_local(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.locals.insert(name.into(), value);
    }

    pub fn cell(&self) -> Option<&'c Cell<'c>> {
        self.cell
    }

    pub fn request(&self) -> Option<&'c dyn Request> {
        self.cell.map(|cell| cell.request())
    }

    /// Translate `message` through the request. Untranslated without a cell.
    pub fn gettext(&self, message: &str) -> String {
        match self.cell {
            Some(cell) => cell.gettext(message),
            None => message.to_string(),
        }
    }

    /// Look up `key`. `Ok(None)` means undefined, which only happens without
    /// a cell.
    pub fn resolve(&self, key: &str) -> Result<Option<Attribute>, CellError> {
        let local = self.locals.get(key);

        match self.cell {
            Some(cell) if cell.contains(key) => cell.item(key).map(Some),
            Some(cell) => local
                .map(|value| Some(Attribute::Value(value.clone())))
                .ok_or_else(|| CellError::AttributeNotFound {
                    cell_type: cell.type_name().to_string(),
                    attribute: key.to_string(),
                }),
            None => Ok(local.map(|value| Attribute::Value(value.clone()))),
        }
    }

    /// Resolve `key` to a value. Fragments are rendered, undefined names are null.
    pub fn value(&self, key: &str) -> Result<Value, CellError> {
        match self.resolve(key)? {
            Some(Attribute::Value(value)) => Ok(value),
            Some(Attribute::Fragment(name)) => self
                .call(&name)
                .map(|markup| Value::String(markup.into_string())),
            None => Ok(Value::Null),
        }
    }

    /// Resolve `key` for output: strings as-is, null as empty text.
    pub fn text(&self, key: &str) -> Result<String, CellError> {
        Ok(match self.value(key)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// Invoke a cell fragment.
    pub fn call(&self, key: &str) -> Result<Markup, CellError> {
        match self.cell {
            Some(cell) => cell.call(key),
            None => Err(CellError::InvalidCall {
                view_name: key.to_string(),
                model_type: "None".to_string(),
            }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cell.is_some_and(|cell| cell.contains(key)) || self.locals.contains_key(key)
    }
}
