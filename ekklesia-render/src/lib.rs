//! # ekklesia-render
//!
//! Rendering backend for ekklesia cells.
//!
//! This crate provides the [`Request`](ekklesia_cell::Request) implementation
//! cells render through: a [`TemplateEnvironment`] mapping template paths to
//! renderers, message catalogs, template filters and the askama page layout.

pub mod catalog;
pub mod environment;
pub mod error;
pub mod filters;
pub mod request;
pub mod templates;

pub use catalog::Catalog;
pub use environment::{Renderer, TemplateEnvironment};
pub use error::RenderError;
pub use request::{default_class_link, default_link, AppRequest, ClassLinkBuilder, LinkBuilder};
pub use templates::{render_page, LayoutTemplate};
