//! Checked placeholder rendering
//!
//! A [`Template`] is plain text with literal placeholder markers. Rendering takes an
//! explicit placeholder -> value mapping and fails if a marker is absent from the
//! template or an occurrence of it is not replaced, so an edited template cannot
//! silently drift away from the code that fills it in.
//!
//! Rendering is a single left-to-right pass over the template text. Inserted values
//! are never scanned again, so a value may contain placeholder text verbatim.

pub mod token;

pub use token::{currency_id_word, specialize, SpecializedContract};

use std::cmp::Reverse;

use crate::errors::{Error, Result};

/// One placeholder and its replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Literal text to replace
    pub placeholder: String,
    /// Replacement text
    pub value: String,
}

impl Binding {
    /// Create a binding
    pub fn new(placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        Self { placeholder: placeholder.into(), value: value.into() }
    }
}

/// Template text together with a label used in error reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    label: String,
    text: String,
}

impl Template {
    /// Wrap template text
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self { label: label.into(), text: text.into() }
    }

    /// Label used in error reports
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Raw template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the template, attributing errors to `target`.
    ///
    /// Every placeholder must occur at least once and every occurrence in the template
    /// is replaced. Where two placeholders start at the same position the longer wins.
    pub fn render(&self, target: &str, bindings: &[Binding]) -> Result<String> {
        for binding in bindings {
            if binding.placeholder.is_empty() || !self.text.contains(&binding.placeholder) {
                return Err(mismatch(target, &binding.placeholder, "not found in template"));
            }
        }

        let mut replaced = vec![0usize; bindings.len()];
        let mut rendered = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();
        while let Some((pos, index)) = next_match(rest, bindings) {
            let binding = &bindings[index];
            rendered.push_str(&rest[..pos]);
            rendered.push_str(&binding.value);
            rest = &rest[pos + binding.placeholder.len()..];
            replaced[index] += 1;
        }
        rendered.push_str(rest);

        // An occurrence overlapped by another placeholder was skipped
        for (binding, count) in bindings.iter().zip(replaced) {
            if count < self.text.matches(binding.placeholder.as_str()).count() {
                return Err(mismatch(target, &binding.placeholder, "left unresolved"));
            }
        }

        Ok(rendered)
    }
}

/// Earliest placeholder occurrence in `text` as `(position, binding index)`
fn next_match(text: &str, bindings: &[Binding]) -> Option<(usize, usize)> {
    bindings
        .iter()
        .enumerate()
        .filter_map(|(index, b)| text.find(&b.placeholder).map(|pos| (pos, index)))
        .min_by_key(|&(pos, index)| (pos, Reverse(bindings[index].placeholder.len())))
}

fn mismatch(target: &str, placeholder: &str, problem: &'static str) -> Error {
    Error::TemplateMismatch {
        contract: target.to_string(),
        placeholder: placeholder.to_string(),
        problem,
    }
}
