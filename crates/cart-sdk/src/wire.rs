//! Wire-format decoding.
//!
//! Some deployments nest the payload under a `data` envelope key, others
//! return the entity directly. Both shapes decode here, so call sites never
//! probe the body themselves.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Envelope key used by enveloping deployments.
const ENVELOPE_KEY: &str = "data";

/// Unwrap one level of `data` envelope, if present.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key(ENVELOPE_KEY) => {
            map.remove(ENVELOPE_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode a single entity from a success body.
pub(crate) fn decode_entity<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    serde_json::from_value(unwrap_envelope(value))
}

/// Decode a list of entities from a success body, preserving response order.
pub(crate) fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    serde_json::from_value(unwrap_envelope(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Eq, Deserialize)]
    struct Entity {
        id: i64,
    }

    #[test]
    fn test_decode_bare_entity() {
        let entity: Entity = decode_entity(r#"{"id":1}"#).unwrap();
        assert_eq!(entity, Entity { id: 1 });
    }

    #[test]
    fn test_decode_enveloped_entity() {
        let entity: Entity = decode_entity(r#"{"data":{"id":1}}"#).unwrap();
        assert_eq!(entity, Entity { id: 1 });
    }

    #[test]
    fn test_envelope_unwraps_one_level_only() {
        // A doubly-nested body is the inner deployment's problem, not ours.
        let result: Result<Entity, _> = decode_entity(r#"{"data":{"data":{"id":1}}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_bare_list_preserves_order() {
        let items: Vec<Entity> = decode_list(r#"[{"id":3},{"id":1},{"id":2}]"#).unwrap();
        let ids: Vec<i64> = items.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_decode_enveloped_list() {
        let items: Vec<Entity> = decode_list(r#"{"data":[{"id":1},{"id":2}]}"#).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_decode_empty_list_is_success() {
        let items: Vec<Entity> = decode_list("[]").unwrap();
        assert!(items.is_empty());

        let items: Vec<Entity> = decode_list(r#"{"data":[]}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_decode_malformed_body_is_error() {
        let result: Result<Entity, _> = decode_entity("not json");
        assert!(result.is_err());
    }
}
