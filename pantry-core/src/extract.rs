//! Locate a JSON object inside free-form model output
//!
//! Models wrap their JSON in prose or markdown fences, and sometimes stop
//! mid-object. The extractor tries an incremental parse at every `{` and
//! returns the first candidate that decodes as a complete object.

use crate::{Error, Result};
use serde_json::{Deserializer, Value};

/// Find the first structurally balanced JSON object in `text`.
///
/// - no `{` at all: `NoJsonFound`
/// - candidates exist but none decodes: `InvalidJson`
///
/// A candidate that runs into end of input stops the scan, since every later
/// `{` sits inside that unterminated object.
pub fn extract_json_object(text: &str) -> Result<Value> {
    let mut last_error: Option<serde_json::Error> = None;
    let mut candidates = 0usize;

    for (start, _) in text.match_indices('{') {
        candidates += 1;
        let mut values = Deserializer::from_str(&text[start..]).into_iter::<Value>();

        match values.next() {
            Some(Ok(value)) if value.is_object() => return Ok(value),
            Some(Ok(_)) | None => {}
            Some(Err(e)) => {
                let truncated = e.is_eof();
                last_error = Some(e);
                if truncated {
                    break;
                }
            }
        }
    }

    if candidates == 0 {
        return Err(Error::no_json_found().with_operation("extract::json_object"));
    }

    let message = last_error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no candidate decoded to an object".to_string());
    let mut err = Error::invalid_json(message)
        .with_operation("extract::json_object")
        .with_context("candidates", candidates.to_string());
    if let Some(source) = last_error {
        err = err.set_source(source);
    }
    Err(err)
}
