use std::path::PathBuf;

use engine::{autocomplete::DEFAULT_LIMIT, content::ContentStore, EngineResult};
use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "config";

/// Config local to this machine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalConfig {
    /// Whether the emote module turns on at startup.
    #[serde(default = "default_enable")]
    pub enable: bool,
    /// How many suggestions the autocomplete shows.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Directory holding `emotes.json`, if not the default data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_enable() -> bool {
    true
}

fn default_search_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            search_limit: default_search_limit(),
            data_dir: None,
        }
    }
}

impl LocalConfig {
    pub fn load(store: &ContentStore) -> Self {
        store.get_local_config::<Self>(CONFIG_NAME).unwrap_or_default()
    }

    pub fn store(&self, store: &ContentStore) -> EngineResult<()> {
        store.set_local_config(CONFIG_NAME, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: LocalConfig = serde_json::from_str(r#"{"search_limit": 3}"#).unwrap();
        assert!(config.enable);
        assert_eq!(config.search_limit, 3);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn stored_config_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::at(dir.path());
        store.create_req_dirs().unwrap();
        assert_eq!(LocalConfig::load(&store), LocalConfig::default());

        let config = LocalConfig {
            enable: false,
            ..LocalConfig::default()
        };
        config.store(&store).unwrap();
        assert_eq!(LocalConfig::load(&store), config);
    }
}
