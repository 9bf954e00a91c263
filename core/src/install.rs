//! First-run provisioning — config directory and default settings file.

use std::path::Path;

use crate::types::config::Settings;

/// Ensure the config directory exists and holds a settings file. Existing
/// files are left untouched.
pub fn ensure_installed(config_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(config_dir)
        .map_err(|e| format!("cannot create {}: {}", config_dir.display(), e))?;

    let settings_path = config_dir.join("settings.yaml");
    if !settings_path.exists() {
        crate::data::settings::save(&settings_path, &Settings::default())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_dir_and_defaults() {
        let dir = std::env::temp_dir().join("relpin_test_install");
        let _ = std::fs::remove_dir_all(&dir);

        ensure_installed(&dir).unwrap();
        assert!(dir.join("settings.yaml").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn preserves_existing_settings() {
        let dir = std::env::temp_dir().join("relpin_test_install_existing");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("settings.yaml"), "staleness_days: 10.0\n").unwrap();

        ensure_installed(&dir).unwrap();
        let content = std::fs::read_to_string(dir.join("settings.yaml")).unwrap();
        assert!(content.contains("10.0"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn idempotent() {
        let dir = std::env::temp_dir().join("relpin_test_install_twice");
        let _ = std::fs::remove_dir_all(&dir);
        ensure_installed(&dir).unwrap();
        ensure_installed(&dir).unwrap();
        assert!(dir.join("settings.yaml").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
