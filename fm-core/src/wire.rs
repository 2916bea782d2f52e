//! Helpers for decoding loosely-typed JSON record arrays.

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;

/// Trimmed text of a JSON string or number. Empty text counts as absent.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Decode every element of a record array through a raw shape `R`.
///
/// Elements that do not deserialize, or that `T::try_from` rejects, are
/// dropped. So is any record whose key was already seen; the first one wins.
pub(crate) fn decode_records<R, T>(items: Vec<Value>, what: &str, key: fn(&T) -> &str) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record = match serde_json::from_value::<R>(item)
            .ok()
            .and_then(|raw| T::try_from(raw).ok())
        {
            Some(record) => record,
            None => {
                debug!("Dropping malformed {} record at index {}", what, index);
                continue;
            }
        };
        if !seen.insert(key(&record).to_string()) {
            debug!("Dropping duplicate {} {}", what, key(&record));
            continue;
        }
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::scalar_text;
    use serde_json::json;

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(" E2043 ")), Some("E2043".to_string()));
        assert_eq!(scalar_text(&json!(531160)), Some("531160".to_string()));
        assert_eq!(scalar_text(&json!("")), None);
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!(["x"])), None);
        assert_eq!(scalar_text(&json!(true)), None);
    }
}
