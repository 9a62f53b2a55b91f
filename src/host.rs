use std::sync::Arc;

use engine::{
    autocomplete::{AutocompleteProvider, SearchResults},
    markup::{Fragment, MarkupNode},
    AHashMap,
};

pub type MarkupHook<N> = Box<dyn Fn(Vec<Fragment<N>>) -> Vec<Fragment<N>> + Send + Sync>;
pub type SubmitHook = Box<dyn Fn(&mut String) + Send + Sync>;

/// The points of the surrounding application a module can hook into.
/// Everything is registered under a caller id so it can be removed together.
pub trait Host {
    type Node: MarkupNode;

    /// Runs on message content before it is painted.
    fn register_markup_hook(&mut self, caller: &'static str, hook: MarkupHook<Self::Node>);
    /// Runs on composer text before it is sent.
    fn register_submit_hook(&mut self, caller: &'static str, hook: SubmitHook);
    fn register_autocomplete(&mut self, caller: &'static str, trigger: char, provider: Arc<dyn AutocompleteProvider>);
    fn unregister_all(&mut self, caller: &str);
    /// Re-render every message currently shown.
    fn force_update_all(&mut self);
}

/// Keeps registered hooks in registration order and runs them.
pub struct HookRegistry<N> {
    markup: Vec<(&'static str, MarkupHook<N>)>,
    submit: Vec<(&'static str, SubmitHook)>,
    autocomplete: AHashMap<char, (&'static str, Arc<dyn AutocompleteProvider>)>,
    rerenders: usize,
}

impl<N> Default for HookRegistry<N> {
    fn default() -> Self {
        Self {
            markup: Vec::new(),
            submit: Vec::new(),
            autocomplete: AHashMap::default(),
            rerenders: 0,
        }
    }
}

impl<N: MarkupNode> HookRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, fragments: Vec<Fragment<N>>) -> Vec<Fragment<N>> {
        self.markup.iter().fold(fragments, |fragments, (_, hook)| hook(fragments))
    }

    pub fn submit(&self, text: &str) -> String {
        let mut text = text.to_string();
        for (_, hook) in &self.submit {
            hook(&mut text);
        }
        text
    }

    pub fn suggest(&self, trigger: char, query: &str) -> Option<SearchResults> {
        self.autocomplete
            .get(&trigger)
            .map(|(_, provider)| provider.suggest(query))
    }

    pub fn hook_count(&self) -> usize {
        self.markup.len() + self.submit.len() + self.autocomplete.len()
    }

    pub fn rerenders(&self) -> usize {
        self.rerenders
    }
}

impl<N: MarkupNode> Host for HookRegistry<N> {
    type Node = N;

    fn register_markup_hook(&mut self, caller: &'static str, hook: MarkupHook<N>) {
        self.markup.push((caller, hook));
    }

    fn register_submit_hook(&mut self, caller: &'static str, hook: SubmitHook) {
        self.submit.push((caller, hook));
    }

    fn register_autocomplete(&mut self, caller: &'static str, trigger: char, provider: Arc<dyn AutocompleteProvider>) {
        if let Some((previous, _)) = self.autocomplete.insert(trigger, (caller, provider)) {
            tracing::debug!("{} replaced the {:?} autocomplete of {}", caller, trigger, previous);
        }
    }

    fn unregister_all(&mut self, caller: &str) {
        self.markup.retain(|(owner, _)| *owner != caller);
        self.submit.retain(|(owner, _)| *owner != caller);
        self.autocomplete.retain(|_, (owner, _)| *owner != caller);
    }

    fn force_update_all(&mut self) {
        self.rerenders += 1;
    }
}
