//! Object-shaped fields that the service sends as `[]` when empty.
//!
//! The service serializes an empty associative array as a JSON array, so a
//! field that is normally `{"enabled": "yes", ...}` can arrive as `[]`. Any
//! array in that position means "no data" and its contents are never looked
//! at. `null` means the same thing.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{adapter_error, token_kind, NormalizeError};
use crate::policy;

/// Decode an object into `T`, or return `None` for an array or `null`.
///
/// Object keys match `T`'s fields ignoring ASCII case.
pub fn decode_object_or_empty<T: DeserializeOwned>(
    value: Value,
) -> Result<Option<T>, serde_json::Error> {
    match value {
        Value::Array(_) | Value::Null => Ok(None),
        Value::Object(_) => policy::from_identified(value).map(Some),
        other => Err(adapter_error(NormalizeError::TypeMismatch {
            expected: "object or empty array",
            found: token_kind(&other),
        })),
    }
}

/// serde adapter for `Option<T>` fields; pair with `#[serde(default)]`.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    decode_object_or_empty(value).map_err(D::Error::custom)
}

/// serde adapter for `T: Default` fields; an empty value becomes
/// `T::default()`.
pub fn empty_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    empty_as_none(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Dkim {
        enabled: bool,
        txtrecord: String,
    }

    #[derive(Debug, Deserialize)]
    struct Status {
        #[serde(default, deserialize_with = "empty_as_none")]
        dkim: Option<Dkim>,
    }

    #[derive(Debug, Deserialize)]
    struct Totals {
        #[serde(default, deserialize_with = "empty_as_default")]
        dkim: Dkim,
    }

    #[test]
    fn empty_array_is_absent() {
        let status: Status = serde_json::from_value(json!({"dkim": []})).unwrap();
        assert_eq!(status.dkim, None);
    }

    #[test]
    fn array_contents_are_ignored() {
        let status: Status = serde_json::from_value(json!({"dkim": [1, 2, 3]})).unwrap();
        assert_eq!(status.dkim, None);
        let status: Status =
            serde_json::from_value(json!({"dkim": [{"enabled": "garbage"}]})).unwrap();
        assert_eq!(status.dkim, None);
    }

    #[test]
    fn object_is_decoded_normally() {
        let status: Status =
            serde_json::from_value(json!({"dkim": {"enabled": true, "txtrecord": "x"}})).unwrap();
        assert_eq!(
            status.dkim,
            Some(Dkim {
                enabled: true,
                txtrecord: "x".to_string()
            })
        );
    }

    #[test]
    fn null_and_missing_are_absent() {
        let status: Status = serde_json::from_value(json!({"dkim": null})).unwrap();
        assert_eq!(status.dkim, None);
        let status: Status = serde_json::from_value(json!({})).unwrap();
        assert_eq!(status.dkim, None);
    }

    #[test]
    fn scalars_are_type_mismatches() {
        let err = serde_json::from_value::<Status>(json!({"dkim": "yes"})).unwrap_err();
        assert!(
            err.to_string().contains("expected object or empty array, found string"),
            "{err}"
        );
    }

    #[test]
    fn object_keys_ignore_case() {
        let status: Status =
            serde_json::from_value(json!({"dkim": {"ENABLED": true, "TxtRecord": "x"}}))
                .unwrap();
        assert_eq!(
            status.dkim,
            Some(Dkim {
                enabled: true,
                txtrecord: "x".to_string()
            })
        );
    }

    #[test]
    fn default_variant_yields_default() {
        let totals: Totals = serde_json::from_value(json!({"dkim": []})).unwrap();
        assert_eq!(totals.dkim, Dkim::default());
    }
}
