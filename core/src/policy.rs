//! Field naming policy between wire JSON and typed records.
//!
//! # Design
//! Records are declared with `#[serde(rename_all = "PascalCase")]`, i.e. they
//! are keyed by identifier (`BirthDate`). The wire is keyed by snake_case
//! (`birth_date`). This module is the only place the two meet: inbound trees
//! have every object key passed through `to_identifier`, outbound trees
//! through `to_wire_name`. The rekeying is recursive, so nested records get the
//! same treatment without opting in.
//!
//! The service is not consistent about key case either (`dkim`, `DKIM`,
//! `NS_READY`), so decoding matches a rekeyed key to a struct field with an
//! ASCII case-insensitive comparison. That happens in `from_identified`,
//! which deserializes through a thin wrapper around `serde_json::Value`.
//!
//! Outbound request parameters are flat name→string pairs, so `to_params`
//! additionally renders each scalar the way the service expects.

use serde::de::value::StringDeserializer;
use serde::de::{
    DeserializeOwned, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, SeqAccess,
    Visitor,
};
use serde::forward_to_deserialize_any;
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::http::Params;
use crate::naming::{to_identifier, to_wire_name};
use crate::scalar::{yes_no, Invariant};

/// Rename every object key from wire style to identifier style.
pub fn to_identifier_keys(value: Value) -> Value {
    rekey(value, &|key: &str| to_identifier(key, false))
}

/// Rename every object key from identifier style to wire style.
pub fn to_wire_keys(value: Value) -> Value {
    rekey(value, &to_wire_name)
}

fn rekey<F>(value: Value, rename: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (rename(&key), rekey(v, rename)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| rekey(v, rename)).collect()),
        other => other,
    }
}

/// Decode a wire tree into a record.
pub fn from_wire<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    from_identified(to_identifier_keys(value))
}

/// Decode an identifier-keyed tree into a record. Object keys are matched to
/// struct fields ignoring ASCII case, at every level.
pub fn from_identified<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    T::deserialize(CaseInsensitive(value))
}

struct CaseInsensitive(Value);

impl<'de> Deserializer<'de> for CaseInsensitive {
    type Error = serde_json::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(Entries::new(map, &[])),
            Value::Array(items) => visitor.visit_seq(Items(items.into_iter())),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Object(map) => visitor.visit_map(Entries::new(map, fields)),
            other => other.deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(CaseInsensitive(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.0.deserialize_enum(name, variants, visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
        ignored_any
    }
}

/// Object entries with keys renamed to the matching struct field, if any.
struct Entries {
    iter: serde_json::map::IntoIter,
    fields: &'static [&'static str],
    value: Option<Value>,
}

impl Entries {
    fn new(map: Map<String, Value>, fields: &'static [&'static str]) -> Self {
        Self {
            iter: map.into_iter(),
            fields,
            value: None,
        }
    }
}

impl<'de> MapAccess<'de> for Entries {
    type Error = serde_json::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.value = Some(value);
        let key = match self.fields.iter().find(|f| f.eq_ignore_ascii_case(&key)) {
            Some(field) => (*field).to_string(),
            None => key,
        };
        let key: StringDeserializer<serde_json::Error> = key.into_deserializer();
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, Self::Error> {
        let value = self
            .value
            .take()
            .ok_or_else(|| {
                <serde_json::Error as serde::de::Error>::custom("value requested before its key")
            })?;
        seed.deserialize(CaseInsensitive(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct Items(std::vec::IntoIter<Value>);

impl<'de> SeqAccess<'de> for Items {
    type Error = serde_json::Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        self.0
            .next()
            .map(|value| seed.deserialize(CaseInsensitive(value)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

/// Encode a record as a wire tree.
pub fn to_wire<T: Serialize>(record: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(record).map(to_wire_keys)
}

/// Flatten a record into wire-named form parameters.
///
/// Strings pass through, numbers use invariant formatting, booleans become
/// `yes`/`no`, arrays of scalars are comma-joined and `null` fields are left
/// out. Nested objects have no flat form and are rejected.
pub fn to_params<T: Serialize>(record: &T) -> Result<Params, serde_json::Error> {
    let Value::Object(map) = to_wire(record)? else {
        return Err(serde_json::Error::custom("parameters must serialize to an object"));
    };

    let mut params = Params::with_capacity(map.len());
    for (name, value) in map {
        if let Some(rendered) = render_param(&name, value)? {
            params.push((name, rendered));
        }
    }
    Ok(params)
}

fn render_param(name: &str, value: Value) -> Result<Option<String>, serde_json::Error> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let rendered = items
                .into_iter()
                .map(|item| render_scalar(name, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(rendered.join(",")))
        }
        other => render_scalar(name, other).map(Some),
    }
}

fn render_scalar(name: &str, value: Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(yes_no(b).to_string()),
        Value::Number(n) => Ok(if let Some(i) = n.as_i64() {
            i.to_invariant()
        } else if let Some(u) = n.as_u64() {
            u.to_invariant()
        } else {
            n.as_f64().unwrap_or_default().to_invariant()
        }),
        _ => Err(serde_json::Error::custom(format!(
            "parameter '{name}' has no flat representation"
        ))),
    }
}
