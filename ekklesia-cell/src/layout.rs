//! The stock layout cell rendering page chrome.

use crate::cell_type::CellType;
use crate::error::DefinitionError;
use serde_json::{json, Value};

/// Template prefix of the cells shipped with this crate.
pub const COMMON_TEMPLATE_PREFIX: &str = "ekklesia_common";

/// `LayoutCell`: site-wide values used by the page layout template.
///
/// Page cells extend it with [`CellTypeBuilder::extends`](crate::CellTypeBuilder::extends).
pub fn layout_cell_type() -> Result<CellType, DefinitionError> {
    CellType::builder("LayoutCell")
        .template_prefix(COMMON_TEMPLATE_PREFIX)
        .property("language", |cell| Ok(json!(language(cell.request().locale()))))
        .property("brand_title", |cell| {
            Ok(json!(cell.app().settings().app.title))
        })
        .property("profile_url", |cell| match cell.current_user() {
            Some(user) => Ok(json!(cell.link(user, "")?)),
            None => Ok(Value::Null),
        })
        .property("custom_footer_url", |cell| {
            Ok(json!(cell.app().settings().app.custom_footer_url))
        })
        .property("tos_url", |cell| Ok(json!(cell.app().settings().app.tos_url)))
        .property("faq_url", |cell| Ok(json!(cell.app().settings().app.faq_url)))
        .property("imprint_url", |cell| {
            Ok(json!(cell.app().settings().app.imprint_url))
        })
        .property("source_code_url", |cell| {
            Ok(json!(cell.app().settings().app.source_code_url))
        })
        .build()
}

/// Language part of a locale: `de` for `de_CH` or `de-CH`.
fn language(locale: &str) -> &str {
    locale.split(['_', '-']).next().unwrap_or(locale)
}
