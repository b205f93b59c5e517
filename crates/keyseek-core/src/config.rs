//! Engine configuration.
//!
//! Every key is optional; missing keys take the defaults below. Example:
//!
//! ```toml
//! default_page_size = 25
//! max_page_size = 500
//! count_mode = "skip"
//!
//! [temporal_formats]
//! date = ["[day]/[month]/[year]"]
//! ```

use crate::{DEFAULT_PAGE_SIZE, error::ConfigurationError};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

///
/// EngineConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Page size used when a request asks for a non-positive size.
    pub default_page_size: u32,
    /// Largest page size a request may ask for; `None` disables the check.
    pub max_page_size: Option<u32>,
    pub count_mode: CountMode,
    /// Append the primary key to every sort that does not already end with it.
    pub primary_key_tie_break: bool,
    pub temporal_formats: TemporalFormats,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: Some(1000),
            count_mode: CountMode::default(),
            primary_key_tie_break: true,
            temporal_formats: TemporalFormats::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        let config: Self = toml::from_str(source).map_err(|err| invalid(err.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|err| invalid(format!("cannot read {}: {err}", path.display())))?;

        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.default_page_size == 0 {
            return Err(invalid("default_page_size must be positive"));
        }

        if let Some(max) = self.max_page_size
            && self.default_page_size > max
        {
            return Err(invalid(format!(
                "default_page_size {} exceeds max_page_size {max}",
                self.default_page_size
            )));
        }

        for format in self
            .temporal_formats
            .date
            .iter()
            .chain(&self.temporal_formats.datetime)
        {
            time::format_description::parse_owned::<2>(format)
                .map_err(|err| invalid(format!("bad temporal format '{format}': {err}")))?;
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidConfig {
        message: message.into(),
    }
}

///
/// CountMode
///
/// Whether paginated searches run the independent total-count query.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    #[default]
    Exact,
    Skip,
}

///
/// TemporalFormats
///
/// Fallback format descriptions (`time` crate syntax, version 2), tried in
/// order after the direct ISO-8601 parse fails.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemporalFormats {
    pub date: Vec<String>,
    pub datetime: Vec<String>,
}

impl Default for TemporalFormats {
    fn default() -> Self {
        Self {
            date: [
                "[day]/[month]/[year]",
                "[day].[month].[year]",
                "[year]/[month]/[day]",
            ]
            .map(String::from)
            .to_vec(),
            datetime: [
                "[year]-[month]-[day] [hour]:[minute]:[second]",
                "[year]-[month]-[day] [hour]:[minute]",
                "[year]-[month]-[day]T[hour]:[minute]",
                "[day]/[month]/[year] [hour]:[minute]:[second]",
                "[day]/[month]/[year] [hour]:[minute]",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn toml_overrides_selected_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_page_size = 5
            count_mode = "skip"

            [temporal_formats]
            date = ["[month]-[day]-[year]"]
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.default_page_size, 5);
        assert_eq!(config.count_mode, CountMode::Skip);
        assert_eq!(config.temporal_formats.date, vec!["[month]-[day]-[year]"]);
        assert!(!config.temporal_formats.datetime.is_empty());
    }

    #[test]
    fn zero_default_size_is_rejected() {
        let err = EngineConfig::from_toml_str("default_page_size = 0").unwrap_err();

        assert!(matches!(err, ConfigurationError::InvalidConfig { .. }));
    }

    #[test]
    fn default_larger_than_max_is_rejected() {
        let err =
            EngineConfig::from_toml_str("default_page_size = 50\nmax_page_size = 10").unwrap_err();

        assert!(err.to_string().contains("exceeds max_page_size"));
    }

    #[test]
    fn malformed_format_is_rejected() {
        let err = EngineConfig::from_toml_str("[temporal_formats]\ndate = [\"[yaer]\"]").unwrap_err();

        assert!(err.to_string().contains("[yaer]"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EngineConfig::from_toml_str("page_size = 3").is_err());
    }
}
