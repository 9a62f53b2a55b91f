use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    emotes::EmoteRecord,
    index::{EmoteIndex, SharedIndex},
};

lazy_static! {
    /// A word that starts the text or follows whitespace. Its presence means the message has prose.
    static ref PROSE: Regex = Regex::new(r"(?:^|\s)\w+").expect("valid regex");
    static ref EMOTE_CANDIDATE: Regex = Regex::new(r":[^:\s]+:").expect("valid regex");
    static ref EMOTE_TOKEN: Regex = Regex::new(r"^:([^:\s]+):$").expect("valid regex");
}

/// Non-text content of a rendered message that the rewriter passes through.
pub trait MarkupNode {
    /// The sizing flag of this node, if it renders an emoji.
    fn emoji_jumboable(&mut self) -> Option<&mut bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<N> {
    Text(String),
    Node(N),
    Emote(EmoteRecord),
}

impl<N> Fragment<N> {
    pub fn text(text: impl Into<String>) -> Self {
        Fragment::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Fragment::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_emote(&self) -> Option<&EmoteRecord> {
        match self {
            Fragment::Emote(emote) => Some(emote),
            _ => None,
        }
    }
}

/// Replaces `:name:` tokens in message text with emotes from the index.
#[derive(Debug, Clone)]
pub struct MarkupRewriter {
    index: SharedIndex,
}

impl MarkupRewriter {
    pub fn new(index: SharedIndex) -> Self {
        Self { index }
    }

    pub fn rewrite<N: MarkupNode>(&self, fragments: Vec<Fragment<N>>) -> Vec<Fragment<N>> {
        let index = self.index.read();
        rewrite_with(&index, fragments)
    }
}

/// A message renders its emotes large only when none of its text has prose.
pub fn is_jumboable<N>(fragments: &[Fragment<N>]) -> bool {
    !fragments
        .iter()
        .any(|fragment| matches!(fragment, Fragment::Text(text) if PROSE.is_match(text)))
}

pub fn rewrite_with<N: MarkupNode>(index: &EmoteIndex, fragments: Vec<Fragment<N>>) -> Vec<Fragment<N>> {
    let jumboable = is_jumboable(&fragments);
    let mut out = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        match fragment {
            Fragment::Node(mut node) => {
                if let Some(flag) = node.emoji_jumboable() {
                    *flag = jumboable;
                }
                out.push(Fragment::Node(node));
            }
            Fragment::Emote(mut emote) => {
                emote.jumboable = jumboable;
                out.push(Fragment::Emote(emote));
            }
            Fragment::Text(text) if !EMOTE_CANDIDATE.is_match(&text) => out.push(Fragment::Text(text)),
            Fragment::Text(text) => substitute(index, &text, jumboable, &mut out),
        }
    }

    out
}

fn substitute<N>(index: &EmoteIndex, text: &str, jumboable: bool, out: &mut Vec<Fragment<N>>) {
    let mut pending = String::new();

    for word in split_words(text) {
        let resolved = EMOTE_TOKEN
            .captures(word)
            .and_then(|caps| index.resolve(&caps[1]));

        match resolved {
            Some(mut emote) => {
                if !pending.is_empty() {
                    out.push(Fragment::Text(std::mem::take(&mut pending)));
                }
                emote.jumboable = jumboable;
                out.push(Fragment::Emote(emote));
            }
            None => pending.push_str(word),
        }
    }

    if !pending.is_empty() {
        out.push(Fragment::Text(pending));
    }
}

/// Splits text into alternating runs of whitespace and non-whitespace.
/// Concatenating the result gives back the input.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (pos, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if matches!(in_space, Some(prev) if prev != space) {
            words.push(&text[start..pos]);
            start = pos;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        words.push(&text[start..]);
    }

    words
}
