use serde::Serialize;
use smol_str::SmolStr;

use crate::error::{EngineError, EngineResult};

/// Image URL templates, indexed by [`EmoteKind`]. `:id` is replaced with the resource id.
pub const EMOTE_SOURCES: [&str; 3] = [
    "https://static-cdn.jtvnw.net/emoticons/v1/:id/1.0",
    "https://cdn.frankerfacez.com/emoticon/:id/1",
    "https://cdn.betterttv.net/emote/:id/1x",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmoteKind {
    Twitch = 0,
    FrankerFaceZ = 1,
    BetterTtv = 2,
}

impl EmoteKind {
    pub fn url_template(self) -> &'static str {
        EMOTE_SOURCES[self as usize]
    }

    pub fn image_url(self, resource_id: &str) -> String {
        self.url_template()
            .replace(":id", urlencoding::encode(resource_id).as_ref())
    }
}

impl TryFrom<i64> for EmoteKind {
    type Error = EngineError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(EmoteKind::Twitch),
            1 => Ok(EmoteKind::FrankerFaceZ),
            2 => Ok(EmoteKind::BetterTtv),
            other => Err(EngineError::InvalidRecordKind(other)),
        }
    }
}

/// What the index stores per name. The kind is kept as the raw dataset code
/// so that bad entries are only rejected when they are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmoteMeta {
    pub id: SmolStr,
    #[serde(rename = "type")]
    pub kind: i64,
}

impl EmoteMeta {
    pub fn new(id: impl Into<SmolStr>, kind: i64) -> Self {
        Self { id: id.into(), kind }
    }
}

/// A resolved emote, ready to be rendered inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoteRecord {
    pub kind: EmoteKind,
    pub resource_id: SmolStr,
    pub name: SmolStr,
    /// Render large. Decided per message, not per emote.
    pub jumboable: bool,
}

impl EmoteRecord {
    pub fn new(kind: EmoteKind, resource_id: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            resource_id: resource_id.into(),
            name: name.into(),
            jumboable: false,
        }
    }

    pub fn from_meta(name: &str, meta: &EmoteMeta) -> EngineResult<Self> {
        let kind = EmoteKind::try_from(meta.kind)?;
        Ok(Self::new(kind, meta.id.clone(), name))
    }

    pub fn src(&self) -> String {
        self.kind.image_url(&self.resource_id)
    }
}
