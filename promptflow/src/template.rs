//! Placeholder template rendering.
//!
//! Templates embed `{name}` tokens that are replaced verbatim by the
//! corresponding binding's value. There is no escaping, no nesting, and no
//! conditional sections. Rendering is pure: identical template and bindings
//! always produce identical output.

use crate::context::Bindings;
use crate::errors::MissingBindingError;
use regex::Regex;
use std::sync::OnceLock;

/// Matches `{name}` tokens where `name` is identifier-shaped.
///
/// Brace text that is not identifier-shaped (`{}`, `{1bad}`, `{a b}`)
/// passes through untouched.
#[allow(clippy::expect_used)]
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern compiles")
    })
}

/// Returns the placeholder names referenced by a template, in order of
/// first appearance, without duplicates.
#[must_use]
pub fn placeholders(template: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in placeholder_re().captures_iter(template) {
        let name = &caps[1];
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Renders a template against a binding set.
///
/// Every `{name}` token is replaced by the value bound to `name`.
///
/// # Errors
///
/// Returns a [`MissingBindingError`] naming the first referenced
/// placeholder that has no binding. No placeholder is ever left as literal
/// text in a successful render.
pub fn render(template: &str, bindings: &Bindings) -> Result<String, MissingBindingError> {
    let mut rendered = String::with_capacity(template.len());
    let mut last_end = 0;

    for caps in placeholder_re().captures_iter(template) {
        let token = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let name = &caps[1];
        let value = bindings
            .get(name)
            .ok_or_else(|| MissingBindingError::new(name))?;

        rendered.push_str(&template[last_end..token.start()]);
        rendered.push_str(value);
        last_end = token.end();
    }

    rendered.push_str(&template[last_end..]);
    Ok(rendered)
}
