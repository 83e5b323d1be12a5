//! Event parameter maps.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Key/value parameters attached to a tracking call.
///
/// Vendors receive it as a single JSON object.
pub type Params = serde_json::Map<String, Value>;

/// Converts any serializable struct or map into event parameters.
pub fn params_from<T: Serialize + ?Sized>(value: &T) -> Result<Params> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Err(Error::NotAnObject("null")),
        Value::Bool(_) => Err(Error::NotAnObject("bool")),
        Value::Number(_) => Err(Error::NotAnObject("number")),
        Value::String(_) => Err(Error::NotAnObject("string")),
        Value::Array(_) => Err(Error::NotAnObject("array")),
    }
}

/// Returns `base` overlaid with `extra`; keys in `extra` win.
#[must_use]
pub fn merge_params(base: Option<&Params>, extra: Params) -> Params {
    let mut merged = base.cloned().unwrap_or_default();
    merged.extend(extra);
    merged
}

/// Milliseconds since the Unix epoch, saturating to zero for clocks set
/// before 1970.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_overrides_base_keys() {
        let base = params_from(&json!({"sku": "X", "value": 1})).unwrap();
        let extra = params_from(&json!({"value": 2})).unwrap();

        let merged = merge_params(Some(&base), extra);
        assert_eq!(merged["sku"], json!("X"));
        assert_eq!(merged["value"], json!(2));
    }

    #[test]
    fn merge_without_base() {
        let extra = params_from(&json!({"a": true})).unwrap();
        assert_eq!(merge_params(None, extra).len(), 1);
    }

    #[test]
    fn params_from_rejects_scalars() {
        assert!(matches!(params_from(&5), Err(Error::NotAnObject("number"))));
        assert!(matches!(params_from(&"x"), Err(Error::NotAnObject("string"))));
    }
}
