//! The [`Request`] implementation used when serving pages.

use crate::catalog::Catalog;
use crate::environment::TemplateEnvironment;
use ekklesia_cell::{BoxError, Cell, Model, Options, Request, TemplateContext};
use heck::ToSnakeCase;
use serde_json::Value;

/// Builds the URL of a model for a view name.
pub type LinkBuilder = Box<dyn Fn(&dyn Model, &str) -> Result<String, BoxError> + Send + Sync>;

/// Builds the URL of a model type from variables and a view name.
pub type ClassLinkBuilder =
    Box<dyn Fn(&str, &Options, &str) -> Result<String, BoxError> + Send + Sync>;

/// Request state for one page render: templates, translations, locale,
/// the logged-in user and URL generation.
pub struct AppRequest<'r> {
    env: &'r TemplateEnvironment,
    catalog: Option<&'r Catalog>,
    locale: String,
    current_user: Option<&'r dyn Model>,
    links: Option<LinkBuilder>,
    class_links: Option<ClassLinkBuilder>,
}

impl<'r> AppRequest<'r> {
    pub fn new(env: &'r TemplateEnvironment) -> Self {
        AppRequest {
            env,
            catalog: None,
            locale: "en".to_string(),
            current_user: None,
            links: None,
            class_links: None,
        }
    }

    /// Translate through `catalog`; also switches to the catalog's locale.
    pub fn with_catalog(mut self, catalog: &'r Catalog) -> Self {
        self.locale = catalog.locale().to_string();
        self.catalog = Some(catalog);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_user(mut self, user: &'r dyn Model) -> Self {
        self.current_user = Some(user);
        self
    }

    /// Replace the default `/{model}/{id}[/{view}]` URL scheme.
    pub fn with_links<F>(mut self, links: F) -> Self
    where
        F: Fn(&dyn Model, &str) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.links = Some(Box::new(links));
        self
    }

    /// Replace the default `/{model_type}[/{view}]?{variables}` URL scheme.
    pub fn with_class_links<F>(mut self, class_links: F) -> Self
    where
        F: Fn(&str, &Options, &str) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.class_links = Some(Box::new(class_links));
        self
    }

    pub fn env(&self) -> &'r TemplateEnvironment {
        self.env
    }

    pub fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
        match self.catalog {
            Some(catalog) => catalog.ngettext(singular, plural, n),
            None if n == 1 => singular.to_string(),
            None => plural.to_string(),
        }
    }
}

impl Request for AppRequest<'_> {
    fn render_template(&self, template: &str, cell: &Cell<'_>) -> Result<String, BoxError> {
        let ctx = TemplateContext::new(cell);
        Ok(self.env.render(template, &ctx)?)
    }

    fn link(&self, model: &dyn Model, view_name: &str) -> Result<String, BoxError> {
        match &self.links {
            Some(links) => links(model, view_name),
            None => default_link(model, view_name),
        }
    }

    fn class_link(
        &self,
        model_type: &str,
        variables: &Options,
        view_name: &str,
    ) -> Result<String, BoxError> {
        match &self.class_links {
            Some(class_links) => class_links(model_type, variables, view_name),
            None => default_class_link(model_type, variables, view_name),
        }
    }

    fn current_user(&self) -> Option<&dyn Model> {
        self.current_user
    }

    fn gettext(&self, message: &str) -> String {
        match self.catalog {
            Some(catalog) => catalog.gettext(message),
            None => message.to_string(),
        }
    }

    fn locale(&self) -> &str {
        &self.locale
    }
}

/// `/{snake_case model name}/{id}`, followed by `/{view_name}` if given.
pub fn default_link(model: &dyn Model, view_name: &str) -> Result<String, BoxError> {
    let id = match model.attribute("id") {
        Some(Value::String(id)) => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(format!("{} has no id to link to", model.model_name()).into()),
    };
    let path = format!("/{}/{}", model.model_name().to_snake_case(), id);
    if view_name.is_empty() {
        Ok(path)
    } else {
        Ok(format!("{path}/{view_name}"))
    }
}

/// `/{snake_case model type}`, then `/{view_name}` if given, then the
/// variables as an encoded query string.
pub fn default_class_link(
    model_type: &str,
    variables: &Options,
    view_name: &str,
) -> Result<String, BoxError> {
    if model_type.is_empty() {
        return Err("cannot link to an unnamed model type".into());
    }
    let mut url = format!("/{}", model_type.to_snake_case());
    if !view_name.is_empty() {
        url.push('/');
        url.push_str(view_name);
    }

    let query: Vec<String> = variables
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", urlencoding::encode(name), urlencoding::encode(&value))
        })
        .collect();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query.join("&"));
    }
    Ok(url)
}
