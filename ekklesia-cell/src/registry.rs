//! Mapping from model types to cell types.
//!
//! The registry is filled while the application is configured and only read
//! while requests are handled. Lookups use the exact runtime type of the model;
//! there is no fallback along any type hierarchy.

use crate::cell_type::CellType;
use crate::error::CellError;
use crate::model::{short_type_name, Model};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// View name of the registration used when no named view matches.
pub const DEFAULT_VIEW: &str = "";

#[derive(Debug, Clone)]
struct Registration {
    model_name: &'static str,
    cell_type: Arc<CellType>,
}

/// Cell types keyed by `(model type, view name)`.
#[derive(Debug, Default, Clone)]
pub struct CellRegistry {
    cells: HashMap<(TypeId, String), Registration>,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render models of type `M` under `view_name` with `cell_type`.
    ///
    /// Registering the same `(M, view_name)` key twice replaces the earlier
    /// cell type.
    pub fn register<M: Model>(
        &mut self,
        view_name: &str,
        cell_type: impl Into<Arc<CellType>>,
    ) -> Arc<CellType> {
        let cell_type = cell_type.into();
        let model_name = short_type_name(std::any::type_name::<M>());
        let key = (TypeId::of::<M>(), view_name.to_string());

        let registration = Registration {
            model_name,
            cell_type: cell_type.clone(),
        };
        if let Some(previous) = self.cells.insert(key, registration) {
            tracing::warn!(
                "Cell registration for {} (view '{}') replaced: {} -> {}",
                model_name,
                view_name,
                previous.cell_type.name(),
                cell_type.name()
            );
        } else {
            tracing::debug!(
                "Registered {} for {} (view '{}')",
                cell_type.name(),
                model_name,
                view_name
            );
        }

        cell_type
    }

    /// Register `cell_type` as the default cell of `M`.
    pub fn register_default<M: Model>(
        &mut self,
        cell_type: impl Into<Arc<CellType>>,
    ) -> Arc<CellType> {
        self.register::<M>(DEFAULT_VIEW, cell_type)
    }

    /// Find the cell type for `model` and `view_name`.
    ///
    /// Falls back to the default registration of the model type when the
    /// named view has no cell of its own.
    pub fn resolve(&self, model: &dyn Model, view_name: &str) -> Result<&CellType, CellError> {
        let type_id = model.model_type_id();
        self.lookup(type_id, view_name)
            .or_else(|| {
                if view_name == DEFAULT_VIEW {
                    None
                } else {
                    self.lookup(type_id, DEFAULT_VIEW)
                }
            })
            .ok_or_else(|| CellError::CellNotFound {
                model_type: model.model_name().to_string(),
                view_name: view_name.to_string(),
            })
    }

    fn lookup(&self, type_id: TypeId, view_name: &str) -> Option<&CellType> {
        self.cells
            .get(&(type_id, view_name.to_string()))
            .map(|registration| registration.cell_type.as_ref())
    }

    pub fn contains<M: Model>(&self, view_name: &str) -> bool {
        self.cells
            .contains_key(&(TypeId::of::<M>(), view_name.to_string()))
    }

    /// All registrations as `(model name, view name, cell type name)`,
    /// sorted for stable output.
    pub fn entries(&self) -> Vec<(&'static str, &str, &str)> {
        let mut entries: Vec<_> = self
            .cells
            .iter()
            .map(|((_, view), reg)| (reg.model_name, view.as_str(), reg.cell_type.name()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
