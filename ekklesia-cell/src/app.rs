//! The composition root owning cell registrations and settings.

use crate::cell::Cell;
use crate::config::Settings;
use crate::error::CellError;
use crate::markup::Markup;
use crate::model::Model;
use crate::registry::CellRegistry;
use crate::request::Request;

/// Application-wide cell configuration, built at startup and shared read-only
/// by all requests.
#[derive(Debug, Default)]
pub struct CellApp {
    registry: CellRegistry,
    settings: Settings,
}

impl CellApp {
    pub fn new(registry: CellRegistry, settings: Settings) -> Self {
        CellApp { registry, settings }
    }

    pub fn registry(&self) -> &CellRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Create the root cell for `model` under `view_name`.
    pub fn get_cell<'a>(
        &'a self,
        model: &'a dyn Model,
        request: &'a dyn Request,
        view_name: &str,
    ) -> Result<Cell<'a>, CellError> {
        let cell_type = self.registry.resolve(model, view_name)?;
        Ok(Cell::new(self, cell_type, Some(model), request))
    }

    /// Render `model` as a full page: the root cell's `show()`.
    pub fn render(
        &self,
        model: &dyn Model,
        request: &dyn Request,
        view_name: &str,
    ) -> Result<Markup, CellError> {
        tracing::debug!("Rendering {} (view '{}')", model.model_name(), view_name);
        self.get_cell(model, request, view_name)?.show()
    }
}
