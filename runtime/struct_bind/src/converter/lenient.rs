//! A [`Deserializer`] over [`serde_json::Value`] that tolerates the shapes produced
//! by flat, string-typed sources such as query strings.
use serde::de::{
    self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor,
};
use serde_json::{Error, Value};

use super::ConverterConfig;

pub(super) struct Lenient<'c> {
    value: Value,
    config: &'c ConverterConfig,
}

impl<'c> Lenient<'c> {
    pub(super) fn new(value: Value, config: &'c ConverterConfig) -> Self {
        Self { value, config }
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Error>
            where
                V: Visitor<'de>,
            {
                let Lenient { value, config } = self;
                match value {
                    Value::String(s) if config.coerce_strings => match s.trim().parse::<$ty>() {
                        Ok(n) => visitor.$visit(n),
                        Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&s), &visitor)),
                    },
                    value => value.$method(visitor),
                }
            }
        )*
    };
}

impl<'de> Deserializer<'de> for Lenient<'_> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Array(values) => visit_array(values, self.config, visitor),
            Value::Object(map) => visit_object(map, self.config, visitor),
            value => value.deserialize_any(visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let Lenient { value, config } = self;
        match value {
            Value::String(s) if config.coerce_strings => match s.trim() {
                "true" => visitor.visit_bool(true),
                "false" => visitor.visit_bool(false),
                _ => Err(de::Error::invalid_value(Unexpected::Str(&s), &visitor)),
            },
            value => value.deserialize_bool(visitor),
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let Lenient { value, config } = self;
        match value {
            Value::Number(n) if config.coerce_strings => visitor.visit_string(n.to_string()),
            Value::Bool(b) if config.coerce_strings => visitor.visit_string(b.to_string()),
            value => value.deserialize_string(visitor),
        }
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.value.deserialize_bytes(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.value.deserialize_byte_buf(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            // `?page=` means "no page" rather than "a page with an empty name".
            Value::String(s) if self.config.coerce_strings && s.trim().is_empty() => {
                visitor.visit_none()
            }
            value => visitor.visit_some(Lenient::new(value, self.config)),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.value.deserialize_unit(visitor)
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.value.deserialize_unit_struct(name, visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let Lenient { value, config } = self;
        match value {
            Value::Array(values) => visit_array(values, config, visitor),
            Value::String(s) if config.split_comma_lists => {
                visit_array(split_comma_separated(&s), config, visitor)
            }
            value @ (Value::Null | Value::Object(_)) => value.deserialize_seq(visitor),
            // A lone value where a sequence is expected: `?tag=a` for `tags: Vec<String>`.
            scalar => visit_array(vec![scalar], config, visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Object(map) => visit_object(map, self.config, visitor),
            value => value.deserialize_map(visitor),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Object(map) => visit_object(map, self.config, visitor),
            value => value.deserialize_struct(name, fields, visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.value.deserialize_enum(name, variants, visitor)
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.value.deserialize_identifier(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        self.value.deserialize_ignored_any(visitor)
    }
}

/// `"1, 2,3"` becomes `["1", "2", "3"]`; a blank string is an empty sequence.
fn split_comma_separated(s: &str) -> Vec<Value> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',')
        .map(|piece| Value::String(piece.trim().to_owned()))
        .collect()
}

fn visit_array<'de, V>(values: Vec<Value>, config: &ConverterConfig, visitor: V) -> Result<V::Value, Error>
where
    V: Visitor<'de>,
{
    let len = values.len();
    let mut seq = LenientSeq {
        iter: values.into_iter(),
        config,
    };
    let outcome = visitor.visit_seq(&mut seq)?;
    if seq.iter.next().is_none() {
        Ok(outcome)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in array"))
    }
}

fn visit_object<'de, V>(
    map: serde_json::Map<String, Value>,
    config: &ConverterConfig,
    visitor: V,
) -> Result<V::Value, Error>
where
    V: Visitor<'de>,
{
    let len = map.len();
    let mut access = LenientMap {
        iter: map.into_iter(),
        value: None,
        config,
    };
    let outcome = visitor.visit_map(&mut access)?;
    if access.iter.next().is_none() {
        Ok(outcome)
    } else {
        Err(de::Error::invalid_length(len, &"fewer elements in map"))
    }
}

struct LenientSeq<'c> {
    iter: std::vec::IntoIter<Value>,
    config: &'c ConverterConfig,
}

impl<'de> SeqAccess<'de> for LenientSeq<'_> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(Lenient::new(value, self.config)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct LenientMap<'c> {
    iter: serde_json::map::IntoIter,
    value: Option<Value>,
    config: &'c ConverterConfig,
}

impl<'de> MapAccess<'de> for LenientMap<'_> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                // Keys go through the same coercions: `HashMap<u32, _>` works.
                seed.deserialize(Lenient::new(Value::String(key), self.config))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(Lenient::new(value, self.config)),
            None => Err(de::Error::custom("value is missing")),
        }
    }
}
