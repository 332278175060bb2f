//! Settings for request binding, loadable from YAML files and environment variables.
//!
//! [`BindConfig`] is the key type in this module.
use crate::{
    converter::{ConverterConfig, SerdeConverter},
    request::body::BodySizeLimit,
    source::{JsonBodyConfig, JsonBodySource, QuerySource},
    wrap::{Wrapper, parse_wrap},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
/// Everything that can be tuned about request binding.
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// ```yaml
/// body_size_limit:
///   mode: enabled
///   max_size: 4 MiB
/// converter:
///   coerce_strings: true
///   split_comma_lists: false
/// json:
///   require_content_type: true
/// ```
pub struct BindConfig {
    /// The upper limit on the size of request bodies.
    pub body_size_limit: BodySizeLimit,
    /// The behaviour of the [`SerdeConverter`].
    pub converter: ConverterConfig,
    /// The behaviour of the [`JsonBodySource`].
    pub json: JsonBodyConfig,
}

impl BindConfig {
    /// A [`SerdeConverter`] using these settings.
    pub fn serde_converter(&self) -> SerdeConverter {
        SerdeConverter::new(self.converter)
    }

    /// Like [`query_wrap`](crate::query_wrap), using these settings.
    pub fn query_wrap(&self) -> Wrapper<SerdeConverter, QuerySource> {
        parse_wrap(self.serde_converter(), QuerySource)
    }

    /// Like [`body_wrap`](crate::body_wrap), using these settings.
    pub fn body_wrap(&self) -> Wrapper<SerdeConverter, JsonBodySource> {
        parse_wrap(self.serde_converter(), JsonBodySource::new(self.json))
    }
}

#[cfg(feature = "config")]
mod load {
    use std::path::Path;

    use anyhow::Context;
    use figment::{
        Figment,
        providers::{Env, Format, Yaml},
    };

    use super::BindConfig;

    /// The prefix of the environment variables read by [`BindConfig::load`].
    pub const ENV_PREFIX: &str = "STRUCT_BIND_";

    impl BindConfig {
        /// Load the configuration, merging (from lowest to highest priority):
        ///
        /// - the defaults;
        /// - the YAML file at `path`, if provided and present on disk;
        /// - environment variables prefixed with `STRUCT_BIND_`, using `__` to separate
        ///   nested keys (e.g. `STRUCT_BIND_JSON__REQUIRE_CONTENT_TYPE=true`).
        pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
            let span = tracing::info_span!(
                "Loading binding configuration",
                configuration.path = ?path,
            );
            let _guard = span.enter();

            let mut figment = Figment::new();
            if let Some(path) = path {
                figment = figment.merge(Yaml::file(path));
            }
            let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
            let config: BindConfig = figment
                .extract()
                .context("Failed to extract the binding configuration")
                .map_err(ConfigLoadError)?;
            Ok(config)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Failed to load the binding configuration")]
    /// The error returned by [`BindConfig::load`].
    pub struct ConfigLoadError(#[source] anyhow::Error);
}

#[cfg(feature = "config")]
pub use load::{ConfigLoadError, ENV_PREFIX};
