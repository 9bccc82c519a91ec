//! Message catalogs for gettext-style translation.
//!
//! A catalog is a YAML mapping from message id to translation. Plural
//! messages map to a list of `[singular, plural]` forms:
//!
//! ```yaml
//! Yes: Ja
//! No: Nein
//! "%(num)s argument": ["%(num)s Argument", "%(num)s Argumente"]
//! ```

use crate::error::RenderError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Message {
    Single(String),
    Plural(Vec<String>),
}

/// Translations for one locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: String,
    messages: HashMap<String, Message>,
}

impl Catalog {
    /// An empty catalog: every message translates to itself.
    pub fn new(locale: impl Into<String>) -> Self {
        Catalog {
            locale: locale.into(),
            messages: HashMap::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(locale: &str, path: P) -> Result<Self, RenderError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(locale, &contents)
    }

    pub fn from_yaml_str(locale: &str, contents: &str) -> Result<Self, RenderError> {
        let messages = if contents.trim().is_empty() {
            HashMap::new()
        } else {
            serde_yaml::from_str(contents)?
        };
        Ok(Catalog {
            locale: locale.to_string(),
            messages,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn insert(&mut self, msgid: impl Into<String>, translation: impl Into<String>) {
        self.messages
            .insert(msgid.into(), Message::Single(translation.into()));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn gettext(&self, msgid: &str) -> String {
        match self.messages.get(msgid) {
            Some(Message::Single(translation)) => translation.clone(),
            Some(Message::Plural(forms)) => forms
                .first()
                .cloned()
                .unwrap_or_else(|| msgid.to_string()),
            None => msgid.to_string(),
        }
    }

    /// Singular form for `n == 1`, plural form otherwise.
    pub fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
        let index = usize::from(n != 1);
        match self.messages.get(singular) {
            Some(Message::Plural(forms)) if index < forms.len() => forms[index].clone(),
            Some(Message::Single(translation)) if index == 0 => translation.clone(),
            _ if index == 0 => singular.to_string(),
            _ => plural.to_string(),
        }
    }
}
