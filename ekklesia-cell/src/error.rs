//! Errors raised by cell lookup, attribute access and rendering.

use thiserror::Error;

/// Cause type carried by failing attribute computations and renderers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving or rendering cells.
#[derive(Debug, Error)]
pub enum CellError {
    #[error(
        "{cell_type} has no attribute '{attribute}'. Is it from the model? \
         Did you forget to add it to 'model_properties'?"
    )]
    AttributeNotFound {
        cell_type: String,
        attribute: String,
    },

    #[error("{cell_type}.{attribute} raised: {source}")]
    AttributeAccess {
        cell_type: String,
        attribute: String,
        #[source]
        source: BoxError,
    },

    /// Indexed access (`cell[name]`) to a missing attribute.
    #[error("'{key}' not found in {cell_type}")]
    KeyNotFound { cell_type: String, key: String },

    #[error("No cell registered for model {model_type} (view '{view_name}')")]
    CellNotFound {
        model_type: String,
        view_name: String,
    },

    #[error("view method '{view_name}' of {model_type} is not callable")]
    InvalidCall {
        view_name: String,
        model_type: String,
    },

    #[error("model and collection arguments cannot be used together!")]
    Conflict,

    #[error("render_cell needs either a model or a collection")]
    MissingTarget,

    #[error("Failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: BoxError,
    },
}

impl CellError {
    pub(crate) fn not_found(cell_type: &str, attribute: &str) -> Self {
        CellError::AttributeNotFound {
            cell_type: cell_type.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn access(cell_type: &str, attribute: &str, source: BoxError) -> Self {
        CellError::AttributeAccess {
            cell_type: cell_type.to_string(),
            attribute: attribute.to_string(),
            source,
        }
    }

    /// True if the attribute does not exist at all.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CellError::AttributeNotFound { .. } | CellError::KeyNotFound { .. }
        )
    }
}

/// Errors in cell type definitions. These surface while the application is
/// configured, never while a request is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("Cell name '{name}' does not end with Cell, you must override template_path!")]
    MissingCellSuffix { name: String },

    #[error("Cell name '{name}' leaves an empty template name, you must override template_path!")]
    EmptyTemplateName { name: String },
}
