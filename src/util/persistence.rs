use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::domain::Scenario;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "SlotCostCalculator";
const APP_NAME: &str = "SlotCostCalculator";

/// `scenario.json` in the platform config directory.
pub fn default_scenario_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("scenario.json"))
}

/// Reads a scenario file. Fields the file leaves out keep their defaults.
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioLoadError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Explicit path if given, otherwise the default file if it exists, otherwise defaults.
pub fn resolve_scenario(explicit: Option<&Path>) -> Result<Scenario, ScenarioLoadError> {
    if let Some(path) = explicit {
        return load_scenario(path);
    }
    match default_scenario_file() {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Using scenario from config directory");
            load_scenario(&path)
        }
        _ => Ok(Scenario::default()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioLoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_partial_scenario_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        fs::write(&path, r#"{ "costs": { "agency": 1.0 } }"#).unwrap();

        let scenario = resolve_scenario(Some(&path)).unwrap();
        assert_eq!(scenario.costs.agency, 1.0);
        assert_eq!(scenario.costs.miscellaneous, 107680.0);
        assert_eq!(scenario.vessel.capacity, 2500);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        assert!(matches!(
            resolve_scenario(Some(&path)),
            Err(ScenarioLoadError::Io(_))
        ));
    }

    #[test]
    fn malformed_file_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_scenario(&path), Err(ScenarioLoadError::Serde(_))));
    }
}
