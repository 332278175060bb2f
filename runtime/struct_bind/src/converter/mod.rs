//! The pluggable structuring engine.
//!
//! A [`Converter`] turns the unstructured value pulled out of a request
//! (a [`serde_json::Value`]) into the type a handler asks for.
//! [`SerdeConverter`] is the default engine; implement [`Converter`] yourself
//! to plug in a different one.
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use errors::StructureError;

pub mod errors;
mod lenient;

/// Structure an unstructured value into a typed one.
pub trait Converter: Send + Sync + 'static {
    /// Structure `unstructured` into a `T`.
    fn structure<T>(&self, unstructured: Value) -> Result<T, StructureError>
    where
        T: DeserializeOwned;
}

impl<C: Converter> Converter for Arc<C> {
    fn structure<T>(&self, unstructured: Value) -> Result<T, StructureError>
    where
        T: DeserializeOwned,
    {
        (**self).structure(unstructured)
    }
}

impl<C: Converter> Converter for &'static C {
    fn structure<T>(&self, unstructured: Value) -> Result<T, StructureError>
    where
        T: DeserializeOwned,
    {
        (**self).structure(unstructured)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
/// Knobs for [`SerdeConverter`].
///
/// Query strings only carry strings: both options are on by default so that
/// `?page=2&tags=a,b` can be structured into `{ page: u32, tags: Vec<String> }`.
pub struct ConverterConfig {
    /// Accept numbers and booleans spelled as strings (`"42"`, `"true"`),
    /// numbers and booleans where a string is expected, and an empty string
    /// as `None` for optional fields.
    pub coerce_strings: bool,
    /// When a sequence is expected and a string is found, split the string on `,`
    /// and structure each trimmed piece as an element.
    pub split_comma_lists: bool,
}

impl ConverterConfig {
    /// Both coercions turned off: structuring is plain `serde_json::from_value`.
    pub fn strict() -> Self {
        Self {
            coerce_strings: false,
            split_comma_lists: false,
        }
    }

    fn is_strict(&self) -> bool {
        !self.coerce_strings && !self.split_comma_lists
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            coerce_strings: true,
            split_comma_lists: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// The default [`Converter`], built on top of `serde`.
///
/// Any `T: DeserializeOwned` can be a structuring target.
pub struct SerdeConverter {
    config: ConverterConfig,
}

impl SerdeConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// A converter that performs no coercion at all.
    pub fn strict() -> Self {
        Self::new(ConverterConfig::strict())
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }
}

impl Converter for SerdeConverter {
    fn structure<T>(&self, unstructured: Value) -> Result<T, StructureError>
    where
        T: DeserializeOwned,
    {
        let outcome = if self.config.is_strict() {
            serde_path_to_error::deserialize(unstructured)
        } else {
            serde_path_to_error::deserialize(lenient::Lenient::new(unstructured, &self.config))
        };
        outcome.map_err(StructureError::new)
    }
}
