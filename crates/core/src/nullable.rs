//! Deserialization helper for clearable nullable fields in update payloads.
//!
//! With `#[serde(default, deserialize_with = "nullable::deserialize")]` on an
//! `Option<Option<T>>` field:
//!
//! - key absent    -> `None` (leave the column unchanged)
//! - `null`        -> `Some(None)` (clear the column)
//! - a value       -> `Some(Some(value))`

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a clearable update to a nullable field.
pub fn apply<T>(slot: &mut Option<T>, update: Option<Option<T>>) {
    if let Some(value) = update {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "deserialize")]
        note: Option<Option<String>>,
    }

    fn parse(json: &str) -> Payload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn absent_key_is_none() {
        assert_eq!(parse("{}").note, None);
    }

    #[test]
    fn explicit_null_clears() {
        assert_eq!(parse(r#"{"note": null}"#).note, Some(None));
    }

    #[test]
    fn value_sets() {
        assert_eq!(
            parse(r#"{"note": "hi"}"#).note,
            Some(Some("hi".to_string()))
        );
    }

    #[test]
    fn apply_leaves_slot_alone_when_absent() {
        let mut slot = Some(1);
        apply(&mut slot, None);
        assert_eq!(slot, Some(1));
        apply(&mut slot, Some(None));
        assert_eq!(slot, None);
        apply(&mut slot, Some(Some(7)));
        assert_eq!(slot, Some(7));
    }
}
