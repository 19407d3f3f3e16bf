use serde_json::{Map, Value};

/// Pull one JSON object out of free-form model output.
///
/// The candidate span runs from the first `{` to the last `}` in the text. It
/// is not bracket-balanced: two sibling objects produce a span covering both,
/// which does not decode, and the result is `None`. Decoding is
/// all-or-nothing; a malformed span never yields a partial object.
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        tracing::debug!("Closing brace precedes opening brace, nothing to extract");
        return None;
    }

    match serde_json::from_str::<Map<String, Value>>(&text[start..=end]) {
        Ok(object) => Some(object),
        Err(e) => {
            tracing::debug!(
                "Brace span of {} bytes did not decode as a JSON object: {}",
                end - start + 1,
                e
            );
            None
        }
    }
}
