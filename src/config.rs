use chrono::Duration;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fleet::DEFAULT_MIN_UPDATE_INTERVAL;
use crate::range::{DEFAULT_THRESHOLD_KM, MAX_THRESHOLD_KM};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub satellites: SatellitesConfig,
    #[serde(default)]
    pub ships: Option<ShipsConfig>,
    #[serde(default)]
    pub range: RangeConfig,
    #[serde(default)]
    pub update: UpdateConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatellitesConfig {
    pub tle_folder: PathBuf,
    /// How long the newest element set stays active after its epoch.
    #[serde(default, deserialize_with = "deserialize_optional_duration")]
    pub final_record_validity: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShipsConfig {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeConfig {
    #[serde(default = "default_threshold_km")]
    pub threshold_km: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            threshold_km: default_threshold_km(),
        }
    }
}

fn default_threshold_km() -> f64 {
    DEFAULT_THRESHOLD_KM
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConfig {
    #[serde(
        default = "default_min_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub min_interval: Duration,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            min_interval: default_min_interval(),
        }
    }
}

fn default_min_interval() -> Duration {
    DEFAULT_MIN_UPDATE_INTERVAL
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    /// Read a config file; relative paths in it are resolved against its folder.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let Some(base) = Path::new(path).parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.range.threshold_km;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "range.threshold_km",
                message: format!("must be a positive number, got {}", threshold),
            });
        }
        if threshold > MAX_THRESHOLD_KM {
            return Err(ConfigError::Invalid {
                field: "range.threshold_km",
                message: format!("must not exceed {} km, got {}", MAX_THRESHOLD_KM, threshold),
            });
        }
        if self.update.min_interval < Duration::zero() {
            return Err(ConfigError::Invalid {
                field: "update.min_interval",
                message: "must not be negative".into(),
            });
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.satellites.tle_folder = base.join(&self.satellites.tle_folder);
        if let Some(ships) = self.ships.as_mut() {
            ships.file = base.join(&ships.file);
        }
    }
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

fn deserialize_optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_str("satellites:\n  tle_folder: tle\n").unwrap();
        assert_eq!(config.satellites.tle_folder, PathBuf::from("tle"));
        assert!(config.satellites.final_record_validity.is_none());
        assert!(config.ships.is_none());
        assert_eq!(config.range.threshold_km, 10018.0);
        assert_eq!(config.update.min_interval, Duration::seconds(1));
        assert_eq!(config.web.bind, "0.0.0.0:8080");
    }

    #[test]
    fn full_config_parses_durations() {
        let yaml = r#"
satellites:
  tle_folder: data/tle
  final_record_validity: 1day 12h
ships:
  file: data/ships.yaml
range:
  threshold_km: 2500
update:
  min_interval: 250ms
web:
  bind: 127.0.0.1:9000
"#;
        let config = Config::from_str(yaml).unwrap();
        assert_eq!(
            config.satellites.final_record_validity,
            Some(Duration::hours(36))
        );
        assert_eq!(config.ships.unwrap().file, PathBuf::from("data/ships.yaml"));
        assert_eq!(config.range.threshold_km, 2500.0);
        assert_eq!(config.update.min_interval, Duration::milliseconds(250));
        assert_eq!(config.web.bind, "127.0.0.1:9000");
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let yaml = "satellites:\n  tle_folder: tle\nrange:\n  threshold_km: 0\n";
        assert!(matches!(
            Config::from_str(yaml),
            Err(ConfigError::Invalid { field: "range.threshold_km", .. })
        ));
    }

    #[test]
    fn rejects_threshold_reaching_the_antipodes() {
        let yaml = "satellites:\n  tle_folder: tle\nrange:\n  threshold_km: 20000\n";
        assert!(matches!(
            Config::from_str(yaml),
            Err(ConfigError::Invalid { field: "range.threshold_km", .. })
        ));

        let yaml = "satellites:\n  tle_folder: tle\nrange:\n  threshold_km: 19900\n";
        assert_eq!(Config::from_str(yaml).unwrap().range.threshold_km, MAX_THRESHOLD_KM);
    }

    #[test]
    fn rejects_bad_duration() {
        let yaml = "satellites:\n  tle_folder: tle\nupdate:\n  min_interval: soon\n";
        assert!(matches!(Config::from_str(yaml), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let dir = std::env::temp_dir().join(format!("sat-o-range-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(
            &path,
            "satellites:\n  tle_folder: tle\nships:\n  file: ships.yaml\n",
        )
        .unwrap();

        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.satellites.tle_folder, dir.join("tle"));
        assert_eq!(config.ships.unwrap().file, dir.join("ships.yaml"));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
