use std::{path::PathBuf, sync::Arc};

use engine::{
    autocomplete::{self, AutocompleteAdapter, SearchResults, TRIGGER},
    content::ContentStore,
    markup::{self, Fragment, MarkupNode, MarkupRewriter},
    smol_str::SmolStr,
    DatasetLoader, EmoteIndex, EmoteRecord, EngineResult, Favourites, LoadStats, SharedFavourites, SharedIndex,
};

use crate::{
    config::LocalConfig,
    events::{EmoteEvent, EventBus},
    host::Host,
};

/// Caller id every hook of this module is registered under.
pub const CALLER: &str = "emote_module";

/// Owns the emote index and wires the rewriter and autocomplete into a [`Host`].
pub struct EmoteModule {
    index: SharedIndex,
    favourites: SharedFavourites,
    loader: DatasetLoader,
    db_path: PathBuf,
    config: LocalConfig,
    events: EventBus,
    enabled: bool,
}

impl EmoteModule {
    pub fn new(db_path: impl Into<PathBuf>, config: LocalConfig) -> Self {
        Self {
            index: EmoteIndex::shared(),
            favourites: Favourites::shared(),
            loader: DatasetLoader::default(),
            db_path: db_path.into(),
            config,
            events: EventBus::new(),
            enabled: false,
        }
    }

    pub fn from_store(store: &ContentStore, config: LocalConfig) -> Self {
        let db_path = match &config.data_dir {
            Some(dir) => store.clone().with_data_dir(dir).emote_db_path(),
            None => store.emote_db_path(),
        };
        Self::new(db_path, config)
    }

    pub fn with_loader(mut self, loader: DatasetLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &LocalConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Hooks the module into `host`, loading the emote db first if the index is empty.
    /// Returns `false` if the module is turned off in the config.
    pub async fn enable<H: Host>(&mut self, host: &mut H) -> bool {
        if !self.config.enable {
            tracing::info!("emote module is disabled in config");
            return false;
        }
        if self.enabled {
            return true;
        }

        let adapter = AutocompleteAdapter::new(self.index.clone()).with_limit(self.config.search_limit);
        host.register_autocomplete(CALLER, TRIGGER, Arc::new(adapter));

        let needs_load = self.index.read().size() == 0;
        if needs_load {
            if let Err(err) = self.load_local_db().await {
                tracing::error!("could not load emotes from {}: {}", self.db_path.display(), err);
            }
        }

        let rewriter = MarkupRewriter::new(self.index.clone());
        host.register_markup_hook(
            CALLER,
            Box::new(move |fragments: Vec<Fragment<H::Node>>| rewriter.rewrite(fragments)),
        );
        host.force_update_all();
        host.register_submit_hook(
            CALLER,
            Box::new(|text: &mut String| *text = autocomplete::derive_outgoing(text)),
        );

        self.enabled = true;
        self.events.emit(EmoteEvent::Enabled);
        true
    }

    pub fn disable<H: Host>(&mut self, host: &mut H) {
        host.unregister_all(CALLER);
        if self.enabled {
            self.enabled = false;
            self.events.emit(EmoteEvent::Disabled);
        }
    }

    pub async fn load_local_db(&self) -> EngineResult<LoadStats> {
        match self.loader.load_path(&self.index, &self.db_path).await {
            Ok(stats) => {
                self.events.emit(EmoteEvent::IndexLoaded {
                    entries: stats.entries,
                    yields: stats.yields,
                });
                Ok(stats)
            }
            Err(err) => {
                self.events.emit(EmoteEvent::IndexLoadFailed(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<EmoteRecord> {
        self.index.read().resolve(name)
    }

    pub fn search(&self, query: &str, limit: usize) -> SearchResults {
        autocomplete::search_with(&self.index.read(), query, limit)
    }

    pub fn process_markup<N: MarkupNode>(&self, fragments: Vec<Fragment<N>>) -> Vec<Fragment<N>> {
        markup::rewrite_with(&self.index.read(), fragments)
    }

    pub fn derive_outgoing(&self, text: &str) -> String {
        autocomplete::derive_outgoing(text)
    }

    pub fn add_favourite(&self, name: &str) -> bool {
        let added = self.favourites.write().add(name);
        if added {
            self.events.emit(EmoteEvent::FavouritesChanged);
        }
        added
    }

    pub fn remove_favourite(&self, name: &str) -> bool {
        let removed = self.favourites.write().remove(name);
        if removed {
            self.events.emit(EmoteEvent::FavouritesChanged);
        }
        removed
    }

    pub fn favourites(&self) -> Vec<SmolStr> {
        self.favourites.read().iter().map(SmolStr::new).collect()
    }
}
