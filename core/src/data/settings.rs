//! Settings persistence — YAML load/save with defaults for missing fields.

use std::path::Path;

use crate::types::config::Settings;

/// Returns the default settings.
pub fn default_settings() -> Settings {
    Settings::default()
}

/// Load `Settings` from a YAML file. Fields absent from the file take their
/// default values; unknown keys are ignored.
pub fn load(path: &Path) -> Result<Settings, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_yaml::from_str(&content).map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

/// Save `Settings` to a YAML file.
pub fn save(path: &Path, settings: &Settings) -> Result<(), String> {
    let content = serde_yaml::to_string(settings)
        .map_err(|e| format!("cannot serialize settings: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("cannot write {}: {}", path.display(), e))
}
