#![forbid(unsafe_code)]

pub mod autocomplete;
pub mod content;
pub mod emotes;
pub mod error;
pub mod index;
pub mod loader;
pub mod markup;

pub use ahash::AHashMap;
pub use regex;
pub use smol_str;
pub use tracing;

pub use autocomplete::{AutocompleteAdapter, AutocompleteProvider, Query, SearchResults};
pub use emotes::{EmoteKind, EmoteMeta, EmoteRecord};
pub use error::{EngineError, EngineResult};
pub use index::{EmoteIndex, Favourites, SharedFavourites, SharedIndex};
pub use loader::{DatasetLoader, LoadStats};
pub use markup::{Fragment, MarkupNode, MarkupRewriter};

pub type IndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;
