//! Rendering errors.

use ekklesia_cell::CellError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error(transparent)]
    Cell(#[from] CellError),

    #[error("Template error: {0}")]
    Askama(#[from] askama::Error),

    #[error("Failed to read message catalog: {0}")]
    CatalogRead(#[from] std::io::Error),

    #[error("Failed to parse message catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),
}
