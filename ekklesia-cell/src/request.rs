//! The request collaborator cells render through.

use crate::cell::{Cell, Options};
use crate::error::BoxError;
use crate::model::Model;

/// Per-request capabilities a cell needs from the web layer.
///
/// Implementations render templates, know the current user and locale,
/// translate messages and build links to models.
pub trait Request {
    /// Render `template` with `cell` as the view model of the template context.
    fn render_template(&self, template: &str, cell: &Cell<'_>) -> Result<String, BoxError>;

    /// Build the URL of `model`, optionally for a named view (e.g. `+edit`).
    fn link(&self, model: &dyn Model, view_name: &str) -> Result<String, BoxError>;

    /// Build the URL of a model type that has no instance, such as a
    /// collection or a standalone page. `variables` fill the path or query.
    fn class_link(
        &self,
        model_type: &str,
        variables: &Options,
        view_name: &str,
    ) -> Result<String, BoxError>;

    fn current_user(&self) -> Option<&dyn Model> {
        None
    }

    /// Translate a message for the request locale.
    fn gettext(&self, message: &str) -> String {
        message.to_string()
    }

    fn locale(&self) -> &str {
        "en"
    }
}
