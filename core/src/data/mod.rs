pub mod settings;
pub mod state;

use std::path::{Path, PathBuf};

use crate::types::config::Settings;

/// Central data layer — the config directory and the settings loaded from it.
pub struct Data {
    settings: Settings,
    config_dir: PathBuf,
}

impl Data {
    /// Create a new Data instance, loading settings from
    /// `config_dir/settings.yaml`. If the directory or the settings file do
    /// not exist yet, the install module provisions them with defaults first.
    pub fn new(config_dir: &Path) -> Result<Data, String> {
        crate::install::ensure_installed(config_dir)?;

        let settings = settings::load(&config_dir.join("settings.yaml"))?;
        Ok(Data {
            settings,
            config_dir: config_dir.to_path_buf(),
        })
    }

    /// Create a Data from pre-built settings. Useful for testing.
    pub fn from_settings(settings: Settings, config_dir: &Path) -> Data {
        Data {
            settings,
            config_dir: config_dir.to_path_buf(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the convergence stamp file.
    pub fn stamp_path(&self) -> PathBuf {
        self.config_dir.join(&self.settings.stamp_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_new_provisions_missing_dir() {
        let dir = std::env::temp_dir().join("relpin_test_data_new");
        let _ = std::fs::remove_dir_all(&dir);

        let data = Data::new(&dir).unwrap();
        assert_eq!(data.settings().staleness_days, 364.0);
        assert!(dir.join("settings.yaml").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn data_new_honors_existing_settings() {
        let dir = std::env::temp_dir().join("relpin_test_data_existing");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("settings.yaml"), "staleness_days: 30.0\n").unwrap();

        let data = Data::new(&dir).unwrap();
        assert_eq!(data.settings().staleness_days, 30.0);
        // Unspecified fields fall back to defaults.
        assert_eq!(data.settings().reconcile_delay_minutes, 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn stamp_path_uses_settings_filename() {
        let mut settings = Settings::default();
        settings.stamp_file = "converged.txt".into();
        let data = Data::from_settings(settings, Path::new("/tmp/relpin"));
        assert_eq!(data.stamp_path(), Path::new("/tmp/relpin/converged.txt"));
    }
}
