//! snake_case wire tokens mapped onto Rust enums.
//!
//! # Design
//! An enum opts in by implementing `WireEnum`, usually through the
//! `wire_enum!` macro, which also generates serde impls that route through
//! `decode_enum` / `encode_enum`. The variant table is written out by the
//! macro at compile time, so no reflection is involved.
//!
//! Decoding is lenient: the token is transcoded to an identifier and compared
//! case-insensitively, so `disabled_admin`, `DISABLED_ADMIN` and
//! `disabled.admin` all select `DisabledAdmin`. Encoding always produces the
//! canonical snake_case token. Integer tokens are accepted only for enums
//! that set `ALLOW_INTEGER`, and are never produced.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::error::{adapter_error, token_kind, NormalizeError};
use crate::naming::{to_identifier, to_wire_name};

/// An enumeration with a fixed table of identifier names.
pub trait WireEnum: Copy + PartialEq + 'static {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Every constant with its identifier, in declaration order. The position
    /// in this table is the constant's ordinal.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Whether integer tokens decode by ordinal.
    const ALLOW_INTEGER: bool = false;

    fn identifier(self) -> &'static str;
}

/// Decode a wire token into `E`.
pub fn decode_enum<E: WireEnum>(value: &Value) -> Result<E, NormalizeError> {
    match value {
        Value::String(token) => {
            let identifier = to_identifier(token, false);
            E::VARIANTS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&identifier))
                .map(|(_, v)| *v)
                .ok_or_else(|| enum_error::<E>(value))
        }
        Value::Number(n) if !n.is_f64() => {
            if !E::ALLOW_INTEGER {
                return Err(enum_error::<E>(value));
            }
            n.as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| E::VARIANTS.get(i))
                .map(|(_, v)| *v)
                .ok_or_else(|| enum_error::<E>(value))
        }
        Value::Null => Err(enum_error::<E>(value)),
        other => Err(NormalizeError::TypeMismatch {
            expected: "enum token",
            found: token_kind(other),
        }),
    }
}

/// Like `decode_enum`, but `null` decodes to `None`.
pub fn decode_optional_enum<E: WireEnum>(value: &Value) -> Result<Option<E>, NormalizeError> {
    match value {
        Value::Null => Ok(None),
        other => decode_enum(other).map(Some),
    }
}

/// The wire token for `value`.
pub fn encode_enum<E: WireEnum>(value: E) -> String {
    to_wire_name(value.identifier())
}

fn enum_error<E: WireEnum>(value: &Value) -> NormalizeError {
    NormalizeError::EnumDecode {
        token: value.to_string(),
        type_name: E::TYPE_NAME,
    }
}

/// serde `Serialize` body for `WireEnum` types.
pub fn serialize<E, S>(value: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: WireEnum,
    S: Serializer,
{
    serializer.serialize_str(&encode_enum(*value))
}

/// serde `Deserialize` body for `WireEnum` types.
///
/// `Option<E>` fields get `null` handling from serde itself, so only required
/// fields ever see a `null` here.
pub fn deserialize<'de, E, D>(deserializer: D) -> Result<E, D::Error>
where
    E: WireEnum,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decode_enum(&value).map_err(adapter_error)
}

/// Declare an enum whose constants travel as snake_case tokens.
///
/// ```
/// pdd_core::wire_enum! {
///     enum Shade [allow_integer = true] {
///         Light,
///         DarkGrey,
///     }
/// }
/// assert_eq!(pdd_core::enums::encode_enum(Shade::DarkGrey), "dark_grey");
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident $([allow_integer = $allow:literal])? {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::enums::WireEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [(&'static str, Self)] =
                &[ $( (stringify!($variant), $name::$variant) ),+ ];
            $( const ALLOW_INTEGER: bool = $allow; )?

            fn identifier(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                $crate::enums::serialize(self, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::enums::deserialize(deserializer)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    crate::wire_enum! {
        enum AccountState {
            Active,
            DisabledAdmin,
            DisabledUser,
        }
    }

    crate::wire_enum! {
        enum Grade [allow_integer = true] {
            Low,
            Mid,
            High,
        }
    }

    #[test]
    fn decodes_snake_case_token() {
        assert_eq!(
            decode_enum::<AccountState>(&json!("disabled_admin")).unwrap(),
            AccountState::DisabledAdmin
        );
    }

    #[test]
    fn decoding_ignores_case_and_separators() {
        for token in ["DISABLED_ADMIN", "disabled.admin", "DisabledAdmin", "disabledadmin"] {
            assert_eq!(
                decode_enum::<AccountState>(&json!(token)).unwrap(),
                AccountState::DisabledAdmin,
                "{token}"
            );
        }
    }

    #[test]
    fn unknown_token_names_token_and_type() {
        let err = decode_enum::<AccountState>(&json!("frozen")).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::EnumDecode {
                token: "\"frozen\"".to_string(),
                type_name: "AccountState",
            }
        );
    }

    #[test]
    fn integers_need_the_allow_flag() {
        assert!(matches!(
            decode_enum::<AccountState>(&json!(1)),
            Err(NormalizeError::EnumDecode { .. })
        ));
        assert_eq!(decode_enum::<Grade>(&json!(2)).unwrap(), Grade::High);
        assert!(matches!(
            decode_enum::<Grade>(&json!(3)),
            Err(NormalizeError::EnumDecode { .. })
        ));
        assert!(matches!(
            decode_enum::<Grade>(&json!(-1)),
            Err(NormalizeError::EnumDecode { .. })
        ));
    }

    #[test]
    fn other_token_kinds_are_type_mismatches() {
        assert_eq!(
            decode_enum::<Grade>(&json!(1.5)).unwrap_err(),
            NormalizeError::TypeMismatch {
                expected: "enum token",
                found: "float"
            }
        );
        assert!(matches!(
            decode_enum::<Grade>(&json!(true)),
            Err(NormalizeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn null_only_for_optional() {
        assert!(matches!(
            decode_enum::<AccountState>(&json!(null)),
            Err(NormalizeError::EnumDecode { type_name: "AccountState", .. })
        ));
        assert_eq!(decode_optional_enum::<AccountState>(&json!(null)).unwrap(), None);
    }

    #[test]
    fn encoding_is_snake_case_never_integer() {
        assert_eq!(encode_enum(AccountState::DisabledAdmin), "disabled_admin");
        assert_eq!(
            serde_json::to_value(Grade::High).unwrap(),
            json!("high")
        );
    }

    #[test]
    fn every_constant_round_trips() {
        for (_, v) in AccountState::VARIANTS {
            assert_eq!(decode_enum::<AccountState>(&json!(encode_enum(*v))).unwrap(), *v);
        }
        for (_, v) in Grade::VARIANTS {
            assert_eq!(decode_enum::<Grade>(&json!(encode_enum(*v))).unwrap(), *v);
        }
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        state: AccountState,
        #[serde(default)]
        previous: Option<AccountState>,
    }

    #[test]
    fn serde_fields_follow_optionality() {
        let holder: Holder =
            serde_json::from_value(json!({"state": "active", "previous": null})).unwrap();
        assert_eq!(holder.state, AccountState::Active);
        assert_eq!(holder.previous, None);

        let err = serde_json::from_value::<Holder>(json!({"state": null})).unwrap_err();
        assert!(err.to_string().contains("enum 'AccountState'"), "{err}");
    }
}
