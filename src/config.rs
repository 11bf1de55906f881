use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{validate_config, SimConfig};

/// Loads and validates a configuration from a TOML or JSON file,
/// dispatching on the file extension.
pub fn load_config(path: &Path) -> Result<SimConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    let config: SimConfig = match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err)))?,
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err)))?,
        "" => return Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => return Err(Error::UnsupportedConfigFormat(ext.to_string())),
    };
    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueueCapacity;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn write_temp_config(contents: &str, extension: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be available")
            .as_nanos();
        path.push(format!("tandem-config-{}.{}", nanos, extension));
        fs::write(&path, contents).expect("config write should succeed");
        path
    }

    #[test]
    fn toml_config_loads() {
        let path = write_temp_config(
            r#"
horizon = 100.0
arrival_rate = 0.05
seed = 42

[[stations]]
name = "lift"
service_rate = 0.1

[[stations]]
name = "slope"
service_rate = 0.2
servers = 4
queue_capacity = { bounded = 10 }
"#,
            "toml",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.stations.len(), 2);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.stations[1].queue_capacity, QueueCapacity::Bounded(10));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn json_config_loads() {
        let path = write_temp_config(
            r#"{
  "horizon": 50.0,
  "arrival_rate": 0.1,
  "stations": [
    { "name": "lift", "service_rate": 0.2, "servers": 2, "queue_capacity": "unbounded" }
  ]
}"#,
            "json",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.stations[0].servers, 2);
        assert_eq!(config.stations[0].queue_capacity, QueueCapacity::Unbounded);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_values_fail_at_load_time() {
        let path = write_temp_config(
            r#"
horizon = -1.0
arrival_rate = 0.05

[[stations]]
name = "lift"
service_rate = 0.1
"#,
            "toml",
        );
        assert!(matches!(
            load_config(&path),
            Err(Error::InvalidHorizon(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let path = write_temp_config("horizon: 1", "yaml");
        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedConfigFormat(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = load_config(Path::new("/nonexistent/tandem.toml"));
        assert!(matches!(result, Err(Error::ConfigIo(_))));
    }
}
