use engine::{
    autocomplete::TRIGGER,
    content::ContentStore,
    markup::{Fragment, MarkupNode},
    regex::Regex,
};
use itertools::Itertools;
use lazy_static::lazy_static;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{config::LocalConfig, host::HookRegistry, module::EmoteModule};

lazy_static! {
    static ref INLINE_NODE: Regex = Regex::new(r"<:(\w+):(\d+)>|@(\w+)").expect("valid regex");
}

/// Non-text message content the terminal knows how to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// A custom emoji, written `<:name:id>`.
    Emoji { name: String, id: String, jumboable: bool },
    Mention(String),
}

impl MarkupNode for InlineNode {
    fn emoji_jumboable(&mut self) -> Option<&mut bool> {
        match self {
            InlineNode::Emoji { jumboable, .. } => Some(jumboable),
            InlineNode::Mention(_) => None,
        }
    }
}

/// Splits message text into plain text and inline nodes, as a chat client would before rendering.
pub fn parse_message(text: &str) -> Vec<Fragment<InlineNode>> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for caps in INLINE_NODE.captures_iter(text) {
        let whole = match caps.get(0) {
            Some(whole) => whole,
            None => continue,
        };
        if whole.start() > last {
            fragments.push(Fragment::text(&text[last..whole.start()]));
        }
        let node = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(name), Some(id), _) => InlineNode::Emoji {
                name: name.as_str().to_string(),
                id: id.as_str().to_string(),
                jumboable: false,
            },
            (_, _, Some(user)) => InlineNode::Mention(user.as_str().to_string()),
            _ => continue,
        };
        fragments.push(Fragment::Node(node));
        last = whole.end();
    }
    if last < text.len() {
        fragments.push(Fragment::text(&text[last..]));
    }

    fragments
}

pub fn display(fragments: &[Fragment<InlineNode>]) -> String {
    fragments
        .iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => text.clone(),
            Fragment::Emote(emote) => {
                let size = if emote.jumboable { "!" } else { "" };
                format!("{}[{}]({})", size, emote.name, emote.src())
            }
            Fragment::Node(InlineNode::Emoji { name, id, jumboable }) => {
                let size = if *jumboable { "!" } else { "" };
                format!("{}<:{}:{}>", size, name, id)
            }
            Fragment::Node(InlineNode::Mention(user)) => format!("@{}", user),
        })
        .collect()
}

pub struct App {
    module: EmoteModule,
    host: HookRegistry<InlineNode>,
}

impl App {
    #[must_use]
    pub fn new(content_store: ContentStore) -> Self {
        let config = LocalConfig::load(&content_store);
        if let Err(err) = config.store(&content_store) {
            tracing::warn!("could not write config: {}", err);
        }
        Self::with_module(EmoteModule::from_store(&content_store, config))
    }

    pub fn with_module(module: EmoteModule) -> Self {
        Self {
            module,
            host: HookRegistry::new(),
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        self.module.enable(&mut self.host).await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let out = self.handle_line(line.trim_end());
            if !out.is_empty() {
                println!("{}", out);
            }
        }

        self.module.disable(&mut self.host);
        Ok(())
    }

    pub fn handle_line(&mut self, line: &str) -> String {
        if let Some(name) = command_arg(line, "/fav") {
            if name.is_empty() {
                "usage: /fav <name>".to_string()
            } else if self.module.add_favourite(name) {
                format!("added {} to favourites", name)
            } else {
                format!("{} is already a favourite", name)
            }
        } else if let Some(name) = command_arg(line, "/unfav") {
            if name.is_empty() {
                "usage: /unfav <name>".to_string()
            } else if self.module.remove_favourite(name) {
                format!("removed {} from favourites", name)
            } else {
                format!("{} is not a favourite", name)
            }
        } else if line == "/favs" {
            self.module.favourites().iter().join(", ")
        } else if let Some(query) = line.strip_prefix("/search ") {
            let results = self.module.search(query.trim(), self.module.config().search_limit);
            serde_json::to_string_pretty(&results).unwrap_or_else(|err| err.to_string())
        } else if let Some(query) = line.strip_prefix(TRIGGER).filter(|rest| !rest.contains(TRIGGER)) {
            match self.host.suggest(TRIGGER, query) {
                Some(results) => results
                    .items
                    .iter()
                    .map(|item| format!("{}  {}", item.value.replace_with, item.value.src))
                    .join("\n"),
                None => String::new(),
            }
        } else {
            let sent = self.host.submit(line);
            display(&self.host.render(parse_message(&sent)))
        }
    }
}

/// The trimmed argument of `command`, which may be empty.
fn command_arg<'a>(line: &'a str, command: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(command)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use engine::EmoteMeta;

    use super::*;

    async fn app() -> App {
        let module = EmoteModule::new("missing/emotes.json", LocalConfig::default());
        module.index().write().set("cat", EmoteMeta::new("11", 2));
        module.index().write().set("catJAM", EmoteMeta::new("12", 2));
        let mut app = App::with_module(module);
        app.module.enable(&mut app.host).await;
        app
    }

    #[test]
    fn parses_inline_nodes() {
        let fragments = parse_message("hi @bob look <:blob:123>!");
        assert_eq!(
            fragments,
            vec![
                Fragment::text("hi "),
                Fragment::Node(InlineNode::Mention("bob".into())),
                Fragment::text(" look "),
                Fragment::Node(InlineNode::Emoji {
                    name: "blob".into(),
                    id: "123".into(),
                    jumboable: false,
                }),
                Fragment::text("!"),
            ]
        );
    }

    #[tokio::test]
    async fn messages_are_submitted_then_rendered() {
        let mut app = app().await;

        assert_eq!(
            app.handle_line("hey   ;cat;"),
            "hey [cat](https://cdn.betterttv.net/emote/11/1x)"
        );
        assert_eq!(
            app.handle_line("<:blob:1> :cat:"),
            "!<:blob:1> ![cat](https://cdn.betterttv.net/emote/11/1x)"
        );
        assert_eq!(app.handle_line(":dog:"), ":dog:");
    }

    #[tokio::test]
    async fn trigger_lists_suggestions() {
        let mut app = app().await;

        let out = app.handle_line(";CAT");
        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                ";cat;  https://cdn.betterttv.net/emote/11/1x",
                ";catJAM;  https://cdn.betterttv.net/emote/12/1x",
            ]
        );
    }

    #[tokio::test]
    async fn favourites_commands() {
        let mut app = app().await;

        assert_eq!(app.handle_line("/fav cat"), "added cat to favourites");
        assert_eq!(app.handle_line("/fav cat"), "cat is already a favourite");
        app.handle_line("/fav catJAM");
        assert_eq!(app.handle_line("/favs"), "cat, catJAM");
        assert_eq!(app.handle_line("/unfav cat"), "removed cat from favourites");
        assert_eq!(app.handle_line("/favs"), "catJAM");
    }

    #[tokio::test]
    async fn blank_favourite_names_are_refused() {
        let mut app = app().await;

        assert_eq!(app.handle_line("/fav   "), "usage: /fav <name>");
        assert_eq!(app.handle_line("/fav"), "usage: /fav <name>");
        assert_eq!(app.handle_line("/unfav "), "usage: /unfav <name>");
        assert_eq!(app.handle_line("/favs"), "");
        assert!(app.module.favourites().is_empty());
    }
}
