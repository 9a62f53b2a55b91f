use std::sync::Arc;

use parking_lot::RwLock;
use smol_str::SmolStr;

use crate::{
    emotes::{EmoteMeta, EmoteRecord},
    IndexMap,
};

pub type SharedIndex = Arc<RwLock<EmoteIndex>>;
pub type SharedFavourites = Arc<RwLock<Favourites>>;

/// Name to metadata table. Filled once by the loader, read-only afterwards.
#[derive(Debug, Default)]
pub struct EmoteIndex {
    entries: IndexMap<SmolStr, EmoteMeta>,
}

impl EmoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedIndex {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn get(&self, name: &str) -> Option<&EmoteMeta> {
        self.entries.get(name)
    }

    /// Inserts or overwrites. An overwritten name keeps its original position.
    pub fn set(&mut self, name: impl Into<SmolStr>, meta: EmoteMeta) {
        self.entries.insert(name.into(), meta);
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &EmoteMeta)> + '_ {
        self.entries.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    /// Builds a renderable record for `name`. Misses and entries with an
    /// unknown kind both come back as `None`.
    pub fn resolve(&self, name: &str) -> Option<EmoteRecord> {
        let meta = self.get(name)?;
        match EmoteRecord::from_meta(name, meta) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::trace!("not resolving emote {}: {}", name, err);
                None
            }
        }
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }
}

/// Emote names the user marked, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct Favourites {
    names: Vec<SmolStr>,
}

impl Favourites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedFavourites {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Returns `false` if the name was already a favourite.
    pub fn add(&mut self, name: impl Into<SmolStr>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|fav| fav == name) {
            Some(pos) => {
                self.names.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|fav| fav == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(SmolStr::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotes::EmoteKind;

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let mut index = EmoteIndex::new();
        index.set("Kappa", EmoteMeta::new("25", 0));

        assert_eq!(index.get("Kappa"), Some(&EmoteMeta::new("25", 0)));
        assert_eq!(index.get("kappa"), None);
        assert_eq!(index.get("Kapp"), None);
    }

    #[test]
    fn last_write_wins_but_position_is_kept() {
        let mut index = EmoteIndex::new();
        index.set("a", EmoteMeta::new("1", 0));
        index.set("b", EmoteMeta::new("2", 1));
        index.set("a", EmoteMeta::new("3", 2));

        assert_eq!(index.size(), 2);
        let names: Vec<_> = index.entries().map(|(name, meta)| (name, meta.id.as_str())).collect();
        assert_eq!(names, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn resolve_skips_unknown_kinds() {
        let mut index = EmoteIndex::new();
        index.set("good", EmoteMeta::new("1", 2));
        index.set("bad", EmoteMeta::new("2", 9));

        let good = index.resolve("good").unwrap();
        assert_eq!(good.kind, EmoteKind::BetterTtv);
        assert_eq!(good.name, "good");
        assert!(index.resolve("bad").is_none());
        assert!(index.resolve("missing").is_none());
    }

    #[test]
    fn favourites_keep_order_and_reject_duplicates() {
        let mut favs = Favourites::new();
        assert!(favs.add("monkaS"));
        assert!(favs.add("Kappa"));
        assert!(!favs.add("monkaS"));

        assert_eq!(favs.iter().collect::<Vec<_>>(), vec!["monkaS", "Kappa"]);
        assert!(favs.remove("monkaS"));
        assert!(!favs.remove("monkaS"));
        assert_eq!(favs.len(), 1);
        assert!(favs.contains("Kappa"));
    }
}
