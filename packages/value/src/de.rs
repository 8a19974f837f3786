//! Deserializing Rust values out of a [`Value`] tree.

use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use std::collections::BTreeMap;

use crate::{instant, Error, Value};

/// Convert a [`Value`] to a Rust type via serde.
///
/// A value whose shape does not match `T` fails with
/// [`Error::TypeMismatch`].
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(value)
}

fn visit_array<'de, V: Visitor<'de>>(items: Vec<Value>, visitor: V) -> Result<V::Value, Error> {
    let mut seq: SeqDeserializer<_, Error> = SeqDeserializer::new(items.into_iter());
    let out = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(out)
}

fn visit_map<'de, V: Visitor<'de>>(
    map: BTreeMap<String, Value>,
    visitor: V,
) -> Result<V::Value, Error> {
    let mut entries: MapDeserializer<'de, _, Error> = MapDeserializer::new(map.into_iter());
    let out = visitor.visit_map(&mut entries)?;
    entries.end()?;
    Ok(out)
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::Instant(t) => visitor.visit_newtype_struct(instant::parts(&t)),
            Value::Array(items) => visit_array(items, visitor),
            Value::Map(map) => visit_map(map, visitor),
        }
    }

    // `Vec<u8>` asks for a sequence.
    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            Value::Bytes(bytes) => visit_array(
                bytes.into_iter().map(|b| Value::Integer(b.into())).collect(),
                visitor,
            ),
            other => other.deserialize_any(visitor),
        }
    }

    // There is no null, so anything present is `Some`.
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        if name == instant::TOKEN {
            return match self {
                Value::Instant(t) => visitor.visit_newtype_struct(instant::parts(&t)),
                other => other.deserialize_any(visitor),
            };
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self {
            Value::String(variant) => {
                let variant: StringDeserializer<Error> = variant.into_deserializer();
                visitor.visit_enum(variant)
            }
            Value::Map(map) => {
                let mut entries = map.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer { variant, value })
                    }
                    _ => Err(Error::mismatch(
                        "expected a map with a single key naming the variant",
                    )),
                }
            }
            other => Err(Error::mismatch(format!(
                "expected an enum variant, found {}",
                other.kind()
            ))),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        drop(self);
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple tuple_struct map struct identifier
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, VariantDeserializer), Error> {
        let variant: StringDeserializer<Error> = self.variant.into_deserializer();
        let tag = seed.deserialize(variant)?;
        Ok((tag, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        Err(Error::mismatch(format!(
            "expected a unit variant, found {}",
            self.value.kind()
        )))
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, Error> {
        seed.deserialize(self.value)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        match self.value {
            Value::Array(items) => visit_array(items, visitor),
            other => Err(Error::mismatch(format!(
                "expected a tuple variant, found {}",
                other.kind()
            ))),
        }
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.value {
            Value::Map(map) => visit_map(map, visitor),
            other => Err(Error::mismatch(format!(
                "expected a struct variant, found {}",
                other.kind()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_value;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        name: String,
        age: u32,
        nickname: Option<String>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    enum Shape {
        Point,
        Circle(f64),
        Segment(i64, i64),
        Rect { w: i64, h: i64 },
    }

    #[test]
    fn structs_round_trip() {
        let person = Person {
            name: "Amir".to_string(),
            age: 30,
            nickname: Some("A".to_string()),
        };
        let value = to_value(&person).unwrap();
        assert_eq!(from_value::<Person>(value).unwrap(), person);
    }

    #[test]
    fn missing_optional_field_is_none() {
        let value: Value = [("name", Value::from("Amir")), ("age", Value::from(30i64))]
            .into_iter()
            .collect();
        let person: Person = from_value(value).unwrap();
        assert_eq!(person.nickname, None);
    }

    #[test]
    fn shape_mismatches_are_type_errors() {
        let map: Value = [("name", Value::from("Amir"))].into_iter().collect();
        assert!(matches!(
            from_value::<String>(map),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            from_value::<bool>(Value::from(1453i64)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            from_value::<u8>(Value::from(1453i64)),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            from_value::<Person>(Value::from(vec![1i64])),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn integers_widen_to_floats() {
        assert_eq!(from_value::<f64>(Value::from(2i64)).unwrap(), 2.0);
    }

    #[test]
    fn enums_round_trip() {
        for shape in [
            Shape::Point,
            Shape::Circle(1.5),
            Shape::Segment(-1, 1),
            Shape::Rect { w: 2, h: 3 },
        ] {
            let value = to_value(&shape).unwrap();
            assert_eq!(from_value::<Shape>(value).unwrap(), shape);
        }
    }

    #[test]
    fn enum_from_wrong_shape_is_a_mismatch() {
        assert!(matches!(
            from_value::<Shape>(Value::from(3i64)),
            Err(Error::TypeMismatch { .. })
        ));
        let two_keys: Value = [("Point", Value::from(1i64)), ("Circle", Value::from(1i64))]
            .into_iter()
            .collect();
        assert!(matches!(
            from_value::<Shape>(two_keys),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn bytes_read_as_byte_vectors() {
        let bytes: Vec<u8> = from_value(Value::Bytes(vec![0xFF, 0x20])).unwrap();
        assert_eq!(bytes, vec![0xFF, 0x20]);
    }

    #[test]
    fn tuples_must_have_the_right_length() {
        let (a, b): (i64, i64) = from_value(Value::from(vec![1i64, 2])).unwrap();
        assert_eq!((a, b), (1, 2));
        assert!(from_value::<(i64, i64)>(Value::from(vec![1i64, 2, 3])).is_err());
    }

    #[test]
    fn instants_read_only_through_the_helper() {
        #[derive(Deserialize)]
        struct Stamped {
            #[serde(with = "crate::instant")]
            at: DateTime<Utc>,
        }

        let at = DateTime::from_timestamp(1_529_000_000, 500).unwrap();
        let value: Value = [("at", Value::Instant(at))].into_iter().collect();

        let stamped: Stamped = from_value(value.clone()).unwrap();
        assert_eq!(stamped.at, at);

        // An instant is not a string, for chrono or for `String`.
        assert!(matches!(
            from_value::<HashMap<String, DateTime<Utc>>>(value.clone()),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            from_value::<HashMap<String, String>>(value),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn value_reads_back_as_itself() {
        let value: Value = [
            ("when", Value::Instant(DateTime::from_timestamp(60, 1).unwrap())),
            ("list", Value::from(vec![1970i64, 622, -323])),
            ("raw", Value::Bytes(vec![0, 1])),
        ]
        .into_iter()
        .collect();
        assert_eq!(from_value::<Value>(value.clone()).unwrap(), value);
    }
}
