//! Business identifier decoding.

use serde_json::Value as Json;

/// Split a rendered business identifier into the ids it names.
///
/// A JSON array yields one id per element (strings verbatim, anything else
/// as compact JSON), so an empty array yields none. Any other text is a
/// single id.
#[must_use]
pub fn decode_biz_no(rendered: &str) -> Vec<String> {
    match serde_json::from_str::<Json>(rendered) {
        Ok(Json::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Json::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => vec![rendered.to_string()],
    }
}
