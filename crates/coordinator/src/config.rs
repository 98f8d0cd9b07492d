use std::fs;
use std::path::{Path, PathBuf};

use foundation::{IndicatorName, YearFilter};
use selection::StateDefaults;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CASCADE: usize = 64;

/// Per-session settings. Every field is optional in the JSON form.
///
/// ```json
/// { "color_indicator": "energy", "x_indicator": "expenditure",
///   "y_indicator": "pollution", "start_year": { "specific": 2015 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub start_year: Option<YearFilter>,
    pub color_indicator: Option<IndicatorName>,
    pub x_indicator: Option<IndicatorName>,
    pub y_indicator: Option<IndicatorName>,
    /// Upper bound on view events emitted during the cycles one `pump`
    /// starts. Events queued before the pump are not counted. Must be at
    /// least 1 in config files.
    pub max_cascade: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_year: None,
            color_indicator: None,
            x_indicator: None,
            y_indicator: None,
            max_cascade: DEFAULT_MAX_CASCADE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid session config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_cascade must be at least 1")]
    ZeroCascade,
}

impl SessionConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cascade == 0 {
            return Err(ConfigError::ZeroCascade);
        }
        Ok(())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn state_defaults(&self) -> StateDefaults {
        StateDefaults {
            year: self.start_year,
            color_indicator: self.color_indicator.clone(),
            x_indicator: self.x_indicator.clone(),
            y_indicator: self.y_indicator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DEFAULT_MAX_CASCADE, SessionConfig};
    use foundation::{IndicatorName, Year, YearFilter};

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = SessionConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, SessionConfig::default());
        assert_eq!(cfg.max_cascade, DEFAULT_MAX_CASCADE);
    }

    #[test]
    fn parses_indicators_and_year() {
        let cfg = SessionConfig::from_json_str(
            r#"{"x_indicator": "expenditure", "start_year": {"specific": 2015}}"#,
        )
        .unwrap();
        assert_eq!(cfg.x_indicator, Some(IndicatorName::new("expenditure")));
        assert_eq!(cfg.start_year, Some(YearFilter::Specific(Year(2015))));

        let cfg = SessionConfig::from_json_str(r#"{"start_year": "all_years"}"#).unwrap();
        assert_eq!(cfg.state_defaults().year, Some(YearFilter::AllYears));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SessionConfig::from_json_str(r#"{"colour": "energy"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_cascade_limit_is_rejected() {
        let err = SessionConfig::from_json_str(r#"{"max_cascade": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroCascade));
        assert_eq!(
            SessionConfig::from_json_str(r#"{"max_cascade": 1}"#)
                .unwrap()
                .max_cascade,
            1
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SessionConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
