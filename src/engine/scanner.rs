//! Placeholder scanning.
//!
//! A placeholder is `{` followed by the shortest run of characters up to the
//! next `}`. Placeholders do not nest and do not span lines.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*?)\}").expect("placeholder pattern is valid"));

/// A placeholder located in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'t> {
    /// Byte range of the whole token, braces included.
    pub span: Range<usize>,
    /// Text between the braces.
    pub expression: &'t str,
}

/// Iterate placeholders left to right.
pub fn placeholders(template: &str) -> impl Iterator<Item = Placeholder<'_>> {
    PLACEHOLDER_RE.captures_iter(template).filter_map(|caps| {
        let whole = caps.get(0)?;
        let inner = caps.get(1)?;
        Some(Placeholder {
            span: whole.range(),
            expression: inner.as_str(),
        })
    })
}

/// Replace each placeholder with `resolve(expression)`, or keep the original
/// token when it returns `None`. Substituted text is never rescanned.
pub fn substitute<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let expression = caps.get(1).map_or("", |m| m.as_str());
            resolve(expression).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
