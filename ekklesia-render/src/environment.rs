//! Template lookup by identifier.
//!
//! Cells name their templates by path, e.g. `proposition/proposition.j2.jade`.
//! The environment maps those identifiers to renderer functions. Each
//! concept registers its templates under its own prefix.

use crate::error::RenderError;
use ekklesia_cell::TemplateContext;
use std::collections::HashMap;
use std::fmt;

/// Renders one template against the variables of a [`TemplateContext`].
pub type Renderer =
    Box<dyn Fn(&TemplateContext<'_>) -> Result<String, RenderError> + Send + Sync>;

#[derive(Default)]
pub struct TemplateEnvironment {
    templates: HashMap<String, Renderer>,
}

impl TemplateEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `renderer` for the template identifier `path`.
    pub fn register<F>(&mut self, path: impl Into<String>, renderer: F) -> &mut Self
    where
        F: Fn(&TemplateContext<'_>) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        let path = path.into();
        if self.templates.insert(path.clone(), Box::new(renderer)).is_some() {
            tracing::warn!("Template {} registered twice, keeping the last one", path);
        }
        self
    }

    /// Register `renderer` as `{prefix}/{name}`.
    pub fn register_prefixed<F>(&mut self, prefix: &str, name: &str, renderer: F) -> &mut Self
    where
        F: Fn(&TemplateContext<'_>) -> Result<String, RenderError> + Send + Sync + 'static,
    {
        self.register(format!("{prefix}/{name}"), renderer)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.templates.contains_key(path)
    }

    pub fn render(&self, path: &str, ctx: &TemplateContext<'_>) -> Result<String, RenderError> {
        let renderer = self
            .templates
            .get(path)
            .ok_or_else(|| RenderError::TemplateNotFound(path.to_string()))?;
        tracing::debug!("Rendering template {}", path);
        renderer(ctx)
    }

    /// Registered template identifiers, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl fmt::Debug for TemplateEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEnvironment")
            .field("templates", &self.template_names())
            .finish()
    }
}
