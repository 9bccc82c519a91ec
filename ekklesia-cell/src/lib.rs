//! # ekklesia-cell
//!
//! View models ("cells") for server-rendered pages.
//!
//! A cell binds a domain model and a request together and is the only thing a
//! template sees. Templates may read the cell's own attributes and the model
//! properties the cell type explicitly declares; nothing else of the model
//! leaks through.
//!
//! # Overview
//!
//! - [`CellType`] describes a kind of cell: memoized properties, fragments,
//!   constants, `model_properties` and the template path.
//! - [`CellRegistry`] maps model types (and view names) to cell types. It is
//!   filled at startup and owned by the [`CellApp`].
//! - [`Cell`] is a per-render instance implementing the attribute protocol
//!   and rendering through the [`Request`] collaborator.
//! - [`TemplateContext`] resolves template variables against a cell.
//!
//! ```
//! use ekklesia_cell::prelude::*;
//! use serde_json::{json, Value};
//!
//! struct Page { title: String }
//!
//! impl Model for Page {
//!     fn attribute(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "title" => Some(json!(self.title)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut registry = CellRegistry::new();
//! registry.register_default::<Page>(
//!     CellType::builder("PageCell")
//!         .model_properties(["title"])
//!         .build()
//!         .unwrap(),
//! );
//! let app = CellApp::new(registry, Settings::default());
//! assert_eq!(app.registry().len(), 1);
//! ```

pub mod app;
pub mod cell;
pub mod cell_type;
pub mod config;
pub mod context;
pub mod error;
pub mod layout;
pub mod markup;
pub mod memo;
pub mod model;
pub mod registry;
pub mod request;

pub use app::CellApp;
pub use cell::{Attribute, Cell, Options, RenderCall, DEFAULT_VIEW_METHOD};
pub use cell_type::{
    derive_template_path, template_prefix_from_module, CellAttribute, CellType, CellTypeBuilder,
    TEMPLATE_EXTENSION,
};
pub use config::{ConfigError, Settings};
pub use context::TemplateContext;
pub use error::{BoxError, CellError, DefinitionError};
pub use layout::layout_cell_type;
pub use markup::Markup;
pub use model::Model;
pub use registry::{CellRegistry, DEFAULT_VIEW};
pub use request::Request;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::CellApp;
    pub use crate::cell::{Attribute, Cell, Options, RenderCall};
    pub use crate::cell_type::CellType;
    pub use crate::config::Settings;
    pub use crate::context::TemplateContext;
    pub use crate::error::{BoxError, CellError};
    pub use crate::markup::Markup;
    pub use crate::model::Model;
    pub use crate::registry::CellRegistry;
    pub use crate::request::Request;
}
