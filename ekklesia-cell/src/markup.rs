//! Safe markup marker.

use serde::Serialize;
use std::fmt;

/// Rendered HTML that templates must not escape again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    pub fn new(html: impl Into<String>) -> Self {
        Markup(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join rendered parts with `separator`.
    pub fn join<I>(parts: I, separator: &str) -> Self
    where
        I: IntoIterator<Item = Markup>,
    {
        let parts: Vec<String> = parts.into_iter().map(Markup::into_string).collect();
        Markup(parts.join(separator))
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Markup {
    fn from(html: String) -> Self {
        Markup(html)
    }
}

impl From<&str> for Markup {
    fn from(html: &str) -> Self {
        Markup(html.to_string())
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> Self {
        markup.0
    }
}

impl AsRef<str> for Markup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Markup {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
