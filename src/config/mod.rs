pub mod job;
pub mod merged;
pub mod settings;

use self::settings::Settings;
use std::path::Path;

/// Auto-discover `settings.yaml` next to the job file.
///
/// If the job file's directory contains `settings.yaml` it is loaded;
/// otherwise defaults apply.
pub fn load_settings_for_job(job_file_path: &Path) -> crate::error::Result<Settings> {
    let dir = job_file_path.parent().ok_or_else(|| {
        crate::error::PageTranslateError::config("Cannot determine job file directory")
    })?;

    let settings_path = dir.join("settings.yaml");

    if settings_path.exists() {
        Settings::from_file(&settings_path)
    } else {
        Ok(Settings::default())
    }
}
