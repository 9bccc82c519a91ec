//! Template filters.

use chrono::{DateTime, Utc};
use ekklesia_cell::{Markup, Request};
use heck::ToSnakeCase;
use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;
use serde_json::Value;

/// Display format of `format_datetime`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d @ %H:%M";

const AUTOESCAPE_EXTENSIONS: &[&str] = &[".html", ".htm", ".xml", ".xhtml", ".jade", ".pug"];

/// Whether output of the template `filename` must be HTML-escaped.
pub fn select_autoescape(filename: Option<&str>) -> bool {
    filename.is_some_and(|name| AUTOESCAPE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)))
}

pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Translated "Yes" or "No" depending on the truthiness of `value`.
pub fn yesno(request: &dyn Request, value: &Value) -> String {
    if is_truthy(value) {
        request.gettext("Yes")
    } else {
        request.gettext("No")
    }
}

/// Translation of an enum value, keyed `{enum_name}_{value}` in snake case.
/// Empty values stay empty.
pub fn enum_value(request: &dyn Request, enum_name: &str, value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    request.gettext(&format!(
        "{}_{}",
        enum_name.to_snake_case(),
        value.to_snake_case()
    ))
}

/// [`enum_value`] for a serde enum: the type name is the enum name and the
/// serialized variant is the value.
pub fn enum_value_of<E: Serialize>(request: &dyn Request, value: &E) -> String {
    let enum_name = ekklesia_cell::model::short_type_name(std::any::type_name::<E>());
    match serde_json::to_value(value) {
        Ok(Value::String(variant)) => enum_value(request, enum_name, &variant),
        _ => String::new(),
    }
}

pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

/// [`format_datetime`] for a Unix timestamp in seconds (UTC).
pub fn format_timestamp(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|datetime| format_datetime(&datetime))
        .unwrap_or_default()
}

/// Convert markdown to HTML.
pub fn markdown(text: &str) -> Markup {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options);
    let mut output = String::new();
    html::push_html(&mut output, parser);
    Markup::new(output)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
