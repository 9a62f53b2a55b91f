use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{EngineError, EngineResult};

pub const EMOTE_DB_FILENAME: &str = "emotes.json";
pub const CONFIG_DIR_NAME: &str = "config";
pub const DATA_DIR_NAME: &str = "data";
pub const LOG_FILENAME: &str = "log";

#[derive(Debug, Clone)]
pub struct ContentStore {
    data_dir: PathBuf,
    config_dir: PathBuf,
    log_file: PathBuf,
}

impl Default for ContentStore {
    fn default() -> Self {
        match directories_next::ProjectDirs::from("nodomain", "emotes", "emotes") {
            Some(app_dirs) => Self {
                data_dir: app_dirs.data_dir().to_path_buf(),
                config_dir: app_dirs.config_dir().to_path_buf(),
                log_file: app_dirs.data_dir().join(LOG_FILENAME),
            },
            // Fallback to current working directory if no HOME is present
            None => Self::at("."),
        }
    }
}

impl ContentStore {
    /// A store rooted at `root`, with every directory below it.
    pub fn at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.join(DATA_DIR_NAME),
            config_dir: root.join(CONFIG_DIR_NAME),
            log_file: root.join(LOG_FILENAME),
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn emote_db_path(&self) -> PathBuf {
        self.data_dir.join(EMOTE_DB_FILENAME)
    }

    pub fn config_path(&self, name: &str) -> PathBuf {
        self.config_dir.join(format!("{}.json", name))
    }

    pub fn create_req_dirs(&self) -> EngineResult<()> {
        use std::fs::create_dir_all;

        create_dir_all(self.data_dir())?;
        create_dir_all(self.config_dir())?;
        create_dir_all(self.log_file().parent().unwrap_or_else(|| Path::new(".")))?;

        Ok(())
    }

    /// Reads a config file, returning `None` if it is missing or unreadable.
    pub fn get_local_config<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let raw = std::fs::read(self.config_path(name)).ok()?;
        match serde_json::from_slice(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("ignoring malformed config {}: {}", name, err);
                None
            }
        }
    }

    pub fn set_local_config<T: Serialize>(&self, name: &str, config: &T) -> EngineResult<()> {
        let serialized = serde_json::to_vec_pretty(config)
            .map_err(|err| EngineError::Custom(format!("failed to serialize config: {}", err)))?;
        std::fs::write(self.config_path(name), serialized)?;
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    pub fn config_dir(&self) -> &Path {
        self.config_dir.as_path()
    }

    pub fn log_file(&self) -> &Path {
        self.log_file.as_path()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn paths_live_under_root() {
        let store = ContentStore::at("/tmp/emotes-root");
        assert_eq!(store.emote_db_path(), Path::new("/tmp/emotes-root/data/emotes.json"));
        assert_eq!(store.config_path("config"), Path::new("/tmp/emotes-root/config/config.json"));

        let store = store.with_data_dir("/srv/emotes");
        assert_eq!(store.emote_db_path(), Path::new("/srv/emotes/emotes.json"));
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::at(dir.path());
        store.create_req_dirs().unwrap();

        assert_eq!(store.get_local_config::<BTreeMap<String, u32>>("limits"), None);

        let mut limits = BTreeMap::new();
        limits.insert("search".to_string(), 25);
        store.set_local_config("limits", &limits).unwrap();
        assert_eq!(store.get_local_config("limits"), Some(limits));

        std::fs::write(store.config_path("limits"), b"not json").unwrap();
        assert_eq!(store.get_local_config::<BTreeMap<String, u32>>("limits"), None);
    }
}
