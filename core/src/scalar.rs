//! Loose scalar decoding and invariant scalar encoding.
//!
//! # Design
//! The service is inconsistent about scalars: a uid may arrive as `42`,
//! `42.0` or `"42"`, and a flag as `true`, `1` or `"yes"`. The `decode_*`
//! functions accept each documented encoding and nothing else. They work on a
//! parsed `serde_json::Value` token. The `loose_int` and `loose_bool` modules
//! wrap them for use as `#[serde(deserialize_with = ...)]` targets, which is
//! how a record field opts into a normalizer.
//!
//! Outbound values go into form parameters, so they are rendered as strings
//! with locale-free formatting.

use serde_json::Value;

use crate::error::{token_kind, NormalizeError};

/// Decode an integer that may be encoded as an integer, a float (rounded to
/// the nearest integer, ties away from zero) or a base-10 string.
pub fn decode_int(value: &Value) -> Result<i64, NormalizeError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(NormalizeError::Format(format!("integer {n} out of range")))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                round_to_int(f)
            }
        }
        Value::String(s) => parse_int(s),
        other => Err(NormalizeError::Format(format!(
            "cannot convert {} to integer",
            token_kind(other)
        ))),
    }
}

/// Like `decode_int`, but `null` decodes to `None`.
pub fn decode_optional_int(value: &Value) -> Result<Option<i64>, NormalizeError> {
    match value {
        Value::Null => Ok(None),
        other => decode_int(other).map(Some),
    }
}

/// Decode a boolean that may be encoded as a boolean, the integers 0/1, or
/// one of the tokens `yes`/`ok` (true) and `no`/`error` (false).
///
/// `null` is rejected; use `decode_optional_bool` for fields that may be
/// absent.
pub fn decode_bool(value: &Value) -> Result<bool, NormalizeError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(NormalizeError::Format(format!(
                "{n} is not a boolean, expected 0 or 1"
            ))),
        },
        Value::String(s) => match s.as_str() {
            "yes" | "ok" => Ok(true),
            "no" | "error" => Ok(false),
            _ => Err(NormalizeError::Format(format!("'{s}' is not a boolean token"))),
        },
        other => Err(NormalizeError::Format(format!(
            "cannot convert {} to boolean",
            token_kind(other)
        ))),
    }
}

/// Like `decode_bool`, but `null` decodes to `None`, never to `false`.
pub fn decode_optional_bool(value: &Value) -> Result<Option<bool>, NormalizeError> {
    match value {
        Value::Null => Ok(None),
        other => decode_bool(other).map(Some),
    }
}

fn parse_int(s: &str) -> Result<i64, NormalizeError> {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
        .parse::<i64>()
        .map_err(|_| NormalizeError::Format(format!("'{s}' is not a base-10 integer")))
}

fn round_to_int(f: f64) -> Result<i64, NormalizeError> {
    let rounded = f.round();
    // i64::MAX as f64 is 2^63, which is itself out of range.
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(NormalizeError::Format(format!("float {f} out of integer range")))
    }
}

/// Locale-free string rendering for values sent as form parameters.
///
/// Rust's `Display` for numbers never groups digits and always uses `.` as
/// the decimal separator, so it is the invariant form.
pub trait Invariant {
    fn to_invariant(&self) -> String;

    /// Lowercased form, for tokens the service expects in lowercase.
    fn to_invariant_lower(&self) -> String {
        self.to_invariant().to_lowercase()
    }
}

macro_rules! impl_invariant {
    ($($t:ty),* $(,)?) => {
        $(
            impl Invariant for $t {
                fn to_invariant(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_invariant!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool);

/// Render an optional value, with `None` as the empty string.
pub fn invariant_or_empty<T: Invariant>(value: Option<T>) -> String {
    value.map(|v| v.to_invariant()).unwrap_or_default()
}

/// Render a list of values as a comma-separated string.
pub fn join_invariant<T: Invariant>(values: &[T]) -> String {
    values
        .iter()
        .map(Invariant::to_invariant)
        .collect::<Vec<_>>()
        .join(",")
}

/// The service's spelling of a boolean parameter.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// serde adapter for loosely encoded integers.
pub mod loose_int {
    use crate::error::adapter_error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        super::decode_int(&value).map_err(adapter_error)
    }

    /// For `Option<i64>` fields; pair with `#[serde(default)]`.
    pub mod option {
        use crate::error::adapter_error;
        use serde::{Deserialize, Deserializer};
        use serde_json::Value;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Value::deserialize(deserializer)?;
            crate::scalar::decode_optional_int(&value).map_err(adapter_error)
        }
    }
}

/// serde adapter for loosely encoded booleans.
pub mod loose_bool {
    use crate::error::adapter_error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        super::decode_bool(&value).map_err(adapter_error)
    }

    /// For `Option<bool>` fields; pair with `#[serde(default)]`.
    pub mod option {
        use crate::error::adapter_error;
        use serde::{Deserialize, Deserializer};
        use serde_json::Value;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Value::deserialize(deserializer)?;
            crate::scalar::decode_optional_bool(&value).map_err(adapter_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use serde_json::json;

    fn is_format_error<T: std::fmt::Debug>(result: Result<T, NormalizeError>) -> bool {
        matches!(result, Err(NormalizeError::Format(_)))
    }

    #[test]
    fn int_from_float_rounds_to_nearest() {
        assert_eq!(decode_int(&json!(3.6)).unwrap(), 4);
        assert_eq!(decode_int(&json!(3.4)).unwrap(), 3);
        assert_eq!(decode_int(&json!(2.5)).unwrap(), 3);
        assert_eq!(decode_int(&json!(-2.5)).unwrap(), -3);
        assert_eq!(decode_int(&json!(7.0)).unwrap(), 7);
    }

    #[test]
    fn int_from_string_is_strict_base_ten() {
        assert_eq!(decode_int(&json!("42")).unwrap(), 42);
        assert_eq!(decode_int(&json!("-17")).unwrap(), -17);
        assert_eq!(decode_int(&json!(" 8 ")).unwrap(), 8);
        assert!(is_format_error(decode_int(&json!("1,000"))));
        assert!(is_format_error(decode_int(&json!("1e3"))));
        assert!(is_format_error(decode_int(&json!("4.2"))));
        assert!(is_format_error(decode_int(&json!("$5"))));
        assert!(is_format_error(decode_int(&json!(""))));
    }

    #[test]
    fn int_rejects_other_token_kinds() {
        assert!(is_format_error(decode_int(&json!(true))));
        assert!(is_format_error(decode_int(&json!(null))));
        assert!(is_format_error(decode_int(&json!([1]))));
        assert!(is_format_error(decode_int(&json!({"n": 1}))));
    }

    #[test]
    fn int_rejects_out_of_range_numbers() {
        assert!(is_format_error(decode_int(&json!(u64::MAX))));
        assert!(is_format_error(decode_int(&json!(1e30))));
        assert!(is_format_error(decode_int(&json!("99999999999999999999"))));
    }

    #[test]
    fn optional_int_maps_null_to_none() {
        assert_eq!(decode_optional_int(&json!(null)).unwrap(), None);
        assert_eq!(decode_optional_int(&json!("5")).unwrap(), Some(5));
    }

    #[test]
    fn bool_accepts_documented_encodings() {
        assert!(decode_bool(&json!(true)).unwrap());
        assert!(!decode_bool(&json!(false)).unwrap());
        assert!(decode_bool(&json!(1)).unwrap());
        assert!(!decode_bool(&json!(0)).unwrap());
        assert!(decode_bool(&json!("yes")).unwrap());
        assert!(decode_bool(&json!("ok")).unwrap());
        assert!(!decode_bool(&json!("no")).unwrap());
        assert!(!decode_bool(&json!("error")).unwrap());
    }

    #[test]
    fn bool_rejects_everything_else() {
        assert!(is_format_error(decode_bool(&json!(2))));
        assert!(is_format_error(decode_bool(&json!(-1))));
        assert!(is_format_error(decode_bool(&json!(1.0))));
        assert!(is_format_error(decode_bool(&json!("Yes"))));
        assert!(is_format_error(decode_bool(&json!("true"))));
        assert!(is_format_error(decode_bool(&json!(""))));
        assert!(is_format_error(decode_bool(&json!(null))));
        assert!(is_format_error(decode_bool(&json!([]))));
    }

    #[test]
    fn optional_bool_maps_null_to_none_not_false() {
        assert_eq!(decode_optional_bool(&json!(null)).unwrap(), None);
        assert_eq!(decode_optional_bool(&json!("no")).unwrap(), Some(false));
        assert!(is_format_error(decode_optional_bool(&json!("maybe"))));
    }

    #[test]
    fn invariant_formatting_has_no_grouping() {
        assert_eq!(1_234_567i64.to_invariant(), "1234567");
        assert_eq!(0.5f64.to_invariant(), "0.5");
        assert_eq!((-3i32).to_invariant(), "-3");
        assert_eq!(f64::NAN.to_invariant_lower(), "nan");
        assert_eq!(invariant_or_empty::<u32>(None), "");
        assert_eq!(invariant_or_empty(Some(10u32)), "10");
        assert_eq!(join_invariant(&[1, 2, 30]), "1,2,30");
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
    }

    #[derive(Debug, Deserialize)]
    struct Flags {
        #[serde(deserialize_with = "loose_int::deserialize")]
        uid: i64,
        #[serde(deserialize_with = "loose_bool::deserialize")]
        enabled: bool,
        #[serde(default, deserialize_with = "loose_bool::option::deserialize")]
        ready: Option<bool>,
        #[serde(default, deserialize_with = "loose_int::option::deserialize")]
        count: Option<i64>,
    }

    #[test]
    fn serde_adapters_apply_loose_rules() {
        let flags: Flags =
            serde_json::from_value(json!({"uid": "12", "enabled": "yes", "ready": null})).unwrap();
        assert_eq!(flags.uid, 12);
        assert!(flags.enabled);
        assert_eq!(flags.ready, None);
        assert_eq!(flags.count, None);
    }

    #[test]
    fn serde_adapters_surface_normalizer_message() {
        let err = serde_json::from_value::<Flags>(json!({"uid": true, "enabled": 1})).unwrap_err();
        assert!(err.to_string().contains("cannot convert boolean to integer"), "{err}");
    }

    proptest! {
        #[test]
        fn int_round_trips_through_integer_token(n in any::<i64>()) {
            prop_assert_eq!(decode_int(&json!(n)).unwrap(), n);
        }

        #[test]
        fn int_round_trips_through_string_token(n in any::<i64>()) {
            prop_assert_eq!(decode_int(&json!(n.to_invariant())).unwrap(), n);
        }
    }
}
