// ============================================================
// Layer 3 — RawRecord Domain Type
// ============================================================
// One conversational example as it arrives from the dataset
// endpoint: a JSON object mapping field names to values.
//
// serde_json is built with `preserve_order`, so a record keeps its
// fields in the order the server sent them. The Dataset relies on
// this to infer columns in order of first appearance.

use serde_json::{Map, Value};

/// One unprocessed example, e.g. `{"text": "Hello", "intent": "greet"}`
pub type RawRecord = Map<String, Value>;

/// The column every cleaning rule is keyed on
pub const TEXT_COLUMN: &str = "text";

/// Build a record from `(field, value)` pairs.
///
/// Example:
///   let r = record([("text", json!("hi")), ("intent", json!("greet"))]);
pub fn record<'a, I>(fields: I) -> RawRecord
where
    I: IntoIterator<Item = (&'a str, Value)>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_keeps_insertion_order() {
        let r = record([("text", json!("hi")), ("intent", json!("greet")), ("id", json!(1))]);
        let keys: Vec<&str> = r.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["text", "intent", "id"]);
    }
}
