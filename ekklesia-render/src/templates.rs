//! Askama template definitions.

use crate::error::RenderError;
use askama::Template;
use ekklesia_cell::TemplateContext;
use serde_json::Value;

/// Page chrome around the content of a root cell.
///
/// Values come from the cell, which extends the stock layout cell.
#[derive(Template)]
#[template(path = "layout.html")]
pub struct LayoutTemplate {
    pub language: String,
    pub brand_title: String,
    pub stylesheet_url: String,
    pub profile_url: Option<String>,
    pub custom_footer_url: Option<String>,
    pub tos_url: Option<String>,
    pub faq_url: Option<String>,
    pub imprint_url: Option<String>,
    pub source_code_url: String,

    // Labels, translated
    pub profile_label: String,
    pub footer_label: String,
    pub tos_label: String,
    pub faq_label: String,
    pub imprint_label: String,
    pub source_code_label: String,

    /// Already rendered cell content, inserted unescaped.
    pub content: String,
}

impl LayoutTemplate {
    /// Collect layout values from the cell behind `ctx`.
    pub fn from_context(ctx: &TemplateContext<'_>, content: String) -> Result<Self, RenderError> {
        let gettext = |message: &str| ctx.gettext(message);
        let stylesheet_url = ctx
            .cell()
            .map(|cell| cell.static_url("css/portal.css"))
            .unwrap_or_default();

        Ok(LayoutTemplate {
            language: ctx.text("language")?,
            brand_title: ctx.text("brand_title")?,
            stylesheet_url,
            profile_url: optional_text(ctx, "profile_url")?,
            custom_footer_url: optional_text(ctx, "custom_footer_url")?,
            tos_url: optional_text(ctx, "tos_url")?,
            faq_url: optional_text(ctx, "faq_url")?,
            imprint_url: optional_text(ctx, "imprint_url")?,
            source_code_url: ctx.text("source_code_url")?,
            profile_label: gettext("Profile"),
            footer_label: gettext("Contact"),
            tos_label: gettext("Terms of Service"),
            faq_label: gettext("FAQ"),
            imprint_label: gettext("Imprint"),
            source_code_label: gettext("Source Code"),
            content,
        })
    }
}

/// Wrap `content` in the page layout if the cell asks for it.
pub fn render_page(ctx: &TemplateContext<'_>, content: String) -> Result<String, RenderError> {
    match ctx.cell() {
        Some(cell) if cell.layout() => {
            Ok(LayoutTemplate::from_context(ctx, content)?.render()?)
        }
        _ => Ok(content),
    }
}

fn optional_text(ctx: &TemplateContext<'_>, key: &str) -> Result<Option<String>, RenderError> {
    Ok(match ctx.value(key)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
