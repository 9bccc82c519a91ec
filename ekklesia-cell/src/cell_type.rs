//! Cell type definitions.
//!
//! A [`CellType`] describes one kind of view model: which model properties it
//! proxies, where its template lives and which attributes it defines on top of
//! the built-in ones. Types are built once while the application is configured
//! and are immutable afterwards.
//!
//! ```
//! use ekklesia_cell::CellType;
//! use serde_json::json;
//!
//! let cell_type = CellType::builder("PropositionCell")
//!     .module_path("ekklesia_portal::concepts::proposition::cell")
//!     .model_properties(["id", "title"])
//!     .property("status_label", |_cell| Ok(json!("draft")))
//!     .template_fragment("card")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(cell_type.template_path(), "proposition/proposition.j2.jade");
//! assert_eq!(cell_type.template_for("card"), "proposition/card.j2.jade");
//! ```

use crate::cell::Cell;
use crate::error::{BoxError, CellError, DefinitionError};
use crate::markup::Markup;
use heck::ToSnakeCase;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Extension of every template path derived by convention.
pub const TEMPLATE_EXTENSION: &str = ".j2.jade";

/// Required suffix of cell type names without an explicit template path.
pub const CELL_SUFFIX: &str = "Cell";

/// A memoized property computation.
pub type PropertyFn = Arc<dyn Fn(&Cell<'_>) -> Result<Value, BoxError> + Send + Sync>;

/// A fragment renderer, evaluated on every call.
pub type FragmentFn = Arc<dyn Fn(&Cell<'_>) -> Result<Markup, CellError> + Send + Sync>;

/// An attribute defined by a cell type.
#[derive(Clone)]
pub enum CellAttribute {
    /// Zero-argument computation cached per cell instance.
    Property { slot: usize, compute: PropertyFn },
    /// Explicitly invoked renderer, never cached.
    Fragment(FragmentFn),
    /// Convention fragment rendering `{template_prefix}/{name}.j2.jade`.
    TemplateFragment(String),
    /// Plain class-level value.
    Constant(Value),
}

impl CellAttribute {
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            CellAttribute::Fragment(_) | CellAttribute::TemplateFragment(_)
        )
    }
}

impl fmt::Debug for CellAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellAttribute::Property { slot, .. } => write!(f, "Property(slot {slot})"),
            CellAttribute::Fragment(_) => f.write_str("Fragment"),
            CellAttribute::TemplateFragment(name) => write!(f, "TemplateFragment({name})"),
            CellAttribute::Constant(value) => write!(f, "Constant({value})"),
        }
    }
}

/// A view model type.
#[derive(Debug, Clone)]
pub struct CellType {
    name: String,
    model_properties: Vec<String>,
    template_prefix: Option<String>,
    template_path: String,
    attributes: HashMap<String, CellAttribute>,
    property_count: usize,
}

impl CellType {
    pub fn builder(name: impl Into<String>) -> CellTypeBuilder {
        CellTypeBuilder::new(name.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_properties(&self) -> &[String] {
        &self.model_properties
    }

    pub fn is_model_property(&self, name: &str) -> bool {
        self.model_properties.iter().any(|p| p == name)
    }

    pub fn template_prefix(&self) -> Option<&str> {
        self.template_prefix.as_deref()
    }

    /// Template rendered by `show()` unless a cell instance overrides it.
    pub fn template_path(&self) -> &str {
        &self.template_path
    }

    /// Template path for `name` below this type's template prefix.
    pub fn template_for(&self, name: &str) -> String {
        prefixed_template(self.template_prefix.as_deref(), name)
    }

    pub fn attribute(&self, name: &str) -> Option<&CellAttribute> {
        self.attributes.get(name)
    }

    /// True if the type itself defines `name` (built-ins excluded).
    pub fn defines(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub(crate) fn property_count(&self) -> usize {
        self.property_count
    }
}

/// Builder for [`CellType`].
#[derive(Debug, Clone)]
pub struct CellTypeBuilder {
    name: String,
    model_properties: Vec<String>,
    template_prefix: Option<String>,
    module_prefix: Option<String>,
    template_path: Option<String>,
    attributes: Vec<(String, CellAttribute)>,
}

impl CellTypeBuilder {
    fn new(name: String) -> Self {
        CellTypeBuilder {
            name,
            model_properties: Vec::new(),
            template_prefix: None,
            module_prefix: None,
            template_path: None,
            attributes: Vec::new(),
        }
    }

    /// Start from the definitions of `base`. Definitions made on this builder
    /// win over inherited ones, whether they come before or after the call.
    pub fn extends(mut self, base: &CellType) -> Self {
        let own = std::mem::take(&mut self.model_properties);
        self.model_properties = base.model_properties.clone();
        self = self.model_properties(own);
        if self.module_prefix.is_none() {
            self.module_prefix = base.template_prefix.clone();
        }
        let mut inherited: Vec<_> = base
            .attributes
            .iter()
            .map(|(name, attr)| (name.clone(), attr.clone()))
            .collect();
        inherited.sort_by(|a, b| a.0.cmp(&b.0));
        // Inherited entries go first so the last-wins insert in build keeps ours.
        inherited.append(&mut self.attributes);
        self.attributes = inherited;
        self
    }

    /// Names proxied to the bound model.
    pub fn model_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.model_properties.contains(&name) {
                self.model_properties.push(name);
            }
        }
        self
    }

    /// Explicit template prefix. Wins over a prefix derived from the module path.
    pub fn template_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.template_prefix = Some(prefix.into());
        self
    }

    /// Derive the template prefix from the defining module, usually passed as
    /// `module_path!()`.
    pub fn module_path(mut self, path: &str) -> Self {
        self.module_prefix = template_prefix_from_module(path);
        self
    }

    /// Explicit template path; disables the name convention.
    pub fn template_path(mut self, path: impl Into<String>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// A zero-argument computed attribute, evaluated at most once per cell.
    pub fn property<F>(mut self, name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&Cell<'_>) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.attributes.push((
            name.into(),
            CellAttribute::Property {
                slot: 0,
                compute: Arc::new(compute),
            },
        ));
        self
    }

    /// A method rendering an alternative presentation, evaluated on every call.
    pub fn fragment<F>(mut self, name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Cell<'_>) -> Result<Markup, CellError> + Send + Sync + 'static,
    {
        self.attributes
            .push((name.into(), CellAttribute::Fragment(Arc::new(render))));
        self
    }

    /// A fragment rendering the template `name` below the template prefix.
    pub fn template_fragment(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.attributes
            .push((name.clone(), CellAttribute::TemplateFragment(name)));
        self
    }

    /// A plain value attribute.
    pub fn constant(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes
            .push((name.into(), CellAttribute::Constant(value)));
        self
    }

    /// Finish the definition. Fails if the template path cannot be derived.
    pub fn build(self) -> Result<CellType, DefinitionError> {
        let template_prefix = self.template_prefix.or(self.module_prefix);
        let template_path = match self.template_path {
            Some(path) => path,
            None => derive_template_path(&self.name, template_prefix.as_deref())?,
        };

        let mut attributes = HashMap::with_capacity(self.attributes.len());
        for (name, attr) in self.attributes {
            attributes.insert(name, attr);
        }

        let mut property_count = 0;
        let mut names: Vec<&String> = attributes.keys().collect();
        names.sort();
        let names: Vec<String> = names.into_iter().cloned().collect();
        for name in names {
            if let Some(CellAttribute::Property { slot, .. }) = attributes.get_mut(&name) {
                *slot = property_count;
                property_count += 1;
            }
        }

        tracing::debug!(
            "Defined cell type {} (template {}, {} properties)",
            self.name,
            template_path,
            property_count
        );

        Ok(CellType {
            name: self.name,
            model_properties: self.model_properties,
            template_prefix,
            template_path,
            attributes,
            property_count,
        })
    }
}

/// `FooBarCell` becomes `foo_bar.j2.jade`, joined with the prefix if set.
pub fn derive_template_path(
    cell_name: &str,
    template_prefix: Option<&str>,
) -> Result<String, DefinitionError> {
    let stem = cell_name
        .strip_suffix(CELL_SUFFIX)
        .ok_or_else(|| DefinitionError::MissingCellSuffix {
            name: cell_name.to_string(),
        })?;
    if stem.is_empty() {
        return Err(DefinitionError::EmptyTemplateName {
            name: cell_name.to_string(),
        });
    }

    Ok(prefixed_template(template_prefix, &stem.to_snake_case()))
}

/// The concept name for modules laid out as `<crate>::concepts::<concept>::…`.
pub fn template_prefix_from_module(path: &str) -> Option<String> {
    let mut segments = path.split("::");
    segments.next()?;
    if segments.next()? != "concepts" {
        return None;
    }
    segments.next().map(str::to_string)
}

fn prefixed_template(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}/{name}{TEMPLATE_EXTENSION}"),
        None => format!("{name}{TEMPLATE_EXTENSION}"),
    }
}
