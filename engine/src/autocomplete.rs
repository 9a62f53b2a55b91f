use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use smol_str::SmolStr;

use crate::{
    emotes::{EmoteKind, EmoteMeta},
    index::{EmoteIndex, SharedIndex},
};

pub const DEFAULT_LIMIT: usize = 10;
/// Character that opens the emote shorthand in the composer.
pub const TRIGGER: char = ';';

lazy_static! {
    static ref SHORTHAND: Regex = Regex::new(r"^;([^;\s]+);$").expect("valid regex");
}

pub enum Query<'a> {
    /// Matched literally, ignoring case.
    Text(&'a str),
    /// Used as given.
    Pattern(&'a Regex),
}

impl<'a> From<&'a str> for Query<'a> {
    fn from(text: &'a str) -> Self {
        Query::Text(text)
    }
}

impl<'a> From<&'a Regex> for Query<'a> {
    fn from(pattern: &'a Regex) -> Self {
        Query::Pattern(pattern)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    ImageText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchValue {
    #[serde(flatten)]
    pub meta: EmoteMeta,
    pub src: String,
    #[serde(rename = "replaceWith")]
    pub replace_with: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchItem {
    pub key: SmolStr,
    pub value: SearchValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    #[serde(rename = "actype")]
    pub kind: ResultKind,
    pub items: Vec<SearchItem>,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self {
            kind: ResultKind::ImageText,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.key.as_str())
    }
}

/// Something the host's autocomplete surface can ask for suggestions.
pub trait AutocompleteProvider: Send + Sync {
    fn suggest(&self, query: &str) -> SearchResults;
}

#[derive(Debug, Clone)]
pub struct AutocompleteAdapter {
    index: SharedIndex,
    limit: usize,
}

impl AutocompleteAdapter {
    pub fn new(index: SharedIndex) -> Self {
        Self {
            index,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn search<'a>(&self, query: impl Into<Query<'a>>, limit: usize) -> SearchResults {
        let index = self.index.read();
        search_with(&index, query, limit)
    }

    pub fn derive_outgoing(&self, text: &str) -> String {
        derive_outgoing(text)
    }
}

impl AutocompleteProvider for AutocompleteAdapter {
    fn suggest(&self, query: &str) -> SearchResults {
        self.search(query, self.limit)
    }
}

/// Collects up to `limit` names matching the query, in index order.
/// Scanning stops as soon as the limit is reached.
pub fn search_with<'a>(index: &EmoteIndex, query: impl Into<Query<'a>>, limit: usize) -> SearchResults {
    let compiled;
    let pattern = match query.into() {
        Query::Pattern(pattern) => pattern,
        Query::Text(text) => match RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => {
                compiled = pattern;
                &compiled
            }
            Err(err) => {
                tracing::warn!("can't search emotes for {:?}: {}", text, err);
                return SearchResults::empty();
            }
        },
    };

    let items = index
        .entries()
        .filter(|(name, _)| pattern.is_match(name))
        .filter_map(|(name, meta)| {
            let kind = EmoteKind::try_from(meta.kind).ok()?;
            Some(SearchItem {
                key: SmolStr::new(name),
                value: SearchValue {
                    meta: meta.clone(),
                    src: kind.image_url(&meta.id),
                    replace_with: format!("{}{}{}", TRIGGER, name, TRIGGER),
                },
            })
        })
        .take(limit)
        .collect();

    SearchResults {
        kind: ResultKind::ImageText,
        items,
    }
}

/// Turns `;name;` words into `:name:`. Whitespace runs collapse to single spaces.
pub fn derive_outgoing(text: &str) -> String {
    text.split_whitespace()
        .map(|word| match SHORTHAND.captures(word) {
            Some(caps) => format!(":{}:", &caps[1]),
            None => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
