/*
 * Locates the per-user directory where the deck keeps its configuration file and
 * its log. Creation of the directory happens here so callers can write into the
 * returned path straight away.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/*
 * Retrieves the application's local (non-roaming) configuration directory,
 * creating it when it does not exist yet. Returns `None` when the platform offers
 * no home directory or the directory cannot be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving config local dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    ensure_dir(proj_dirs.config_local_dir())
}

// Path of `file_name` inside the application's local configuration directory.
pub fn app_config_file(app_name: &str, file_name: &str) -> Option<PathBuf> {
    get_base_app_config_local_dir(app_name).map(|dir| dir.join(file_name))
}

fn ensure_dir(dir: &Path) -> Option<PathBuf> {
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(dir) {
            log::error!("PathUtils: Failed to create config directory {dir:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created config directory {dir:?}");
    }
    Some(dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_creates_nested_directory() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        assert!(!nested.exists());

        let created = ensure_dir(&nested).expect("directory should be created");
        assert_eq!(created, nested);
        assert!(nested.is_dir());

        // Second call finds the existing directory.
        assert_eq!(ensure_dir(&nested), Some(nested.clone()));
    }

    #[test]
    fn test_app_config_file_lives_in_app_directory() {
        let unique_app_name = format!("TestApp_SwipeDeck_{}", rand::random::<u64>());
        // Environments without a home directory legitimately yield None.
        let Some(dir) = get_base_app_config_local_dir(&unique_app_name) else {
            return;
        };
        let file = app_config_file(&unique_app_name, "deck_config.json").unwrap();
        assert_eq!(file, dir.join("deck_config.json"));
        assert!(
            dir.to_string_lossy()
                .to_lowercase()
                .contains(&unique_app_name.to_lowercase())
        );
        if let Err(e) = fs::remove_dir_all(&dir) {
            eprintln!("Test cleanup failed for {dir:?}: {e}");
        }
    }
}
