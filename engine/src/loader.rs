use std::path::Path;

use instant::Instant;
use parking_lot::RwLock;
use serde::Deserialize;
use smol_str::SmolStr;

use crate::{
    emotes::EmoteMeta,
    error::{EngineError, EngineResult},
    index::EmoteIndex,
};

/// How many records are inserted between two yields to the scheduler.
pub const YIELD_EVERY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(SmolStr),
    Number(serde_json::Number),
}

impl RecordId {
    fn to_smol(&self) -> SmolStr {
        match self {
            RecordId::Text(text) => text.clone(),
            RecordId::Number(num) => SmolStr::new(num.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Nested { id: RecordId },
    Plain(RecordId),
}

/// One entry of `emotes.json`. Other fields, such as `src`, are skipped
/// unread; image URLs come from the per-kind templates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "type")]
    pub kind: i64,
    pub id: RecordId,
    pub value: RecordValue,
}

impl RawRecord {
    /// The key the emote is looked up by.
    pub fn name(&self) -> SmolStr {
        self.id.to_smol()
    }

    /// `value.id` when the value is an object, the value itself otherwise.
    pub fn resource_id(&self) -> SmolStr {
        match &self.value {
            RecordValue::Nested { id } => id.to_smol(),
            RecordValue::Plain(id) => id.to_smol(),
        }
    }

    pub fn meta(&self) -> EmoteMeta {
        EmoteMeta::new(self.resource_id(), self.kind)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records read from the dataset.
    pub processed: usize,
    /// Times the loader gave control back to the scheduler.
    pub yields: usize,
    /// Index size once the load finished.
    pub entries: usize,
}

#[derive(Debug, Clone)]
pub struct DatasetLoader {
    yield_every: usize,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            yield_every: YIELD_EVERY,
        }
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_yield_every(yield_every: usize) -> Self {
        Self {
            yield_every: yield_every.max(1),
        }
    }

    pub async fn load_path(&self, index: &RwLock<EmoteIndex>, path: impl AsRef<Path>) -> EngineResult<LoadStats> {
        let path = path.as_ref().to_path_buf();
        tracing::info!("loading emotes from {}", path.display());

        let raw = tokio::task::spawn_blocking(move || std::fs::read(path))
            .await
            .map_err(|err| EngineError::Custom(format!("emote db read task failed: {}", err)))??;

        self.load_slice(index, &raw).await
    }

    /// Parses the whole document up front, so a malformed dataset leaves the index untouched.
    pub async fn load_slice(&self, index: &RwLock<EmoteIndex>, raw: &[u8]) -> EngineResult<LoadStats> {
        let records: Vec<RawRecord> = serde_json::from_slice(raw)?;
        Ok(self.load_records(index, records).await)
    }

    pub async fn load_records(&self, index: &RwLock<EmoteIndex>, records: Vec<RawRecord>) -> LoadStats {
        let started = Instant::now();
        let mut stats = LoadStats::default();

        index.write().reserve(records.len());

        for chunk in records.chunks(self.yield_every) {
            tokio::task::yield_now().await;
            stats.yields += 1;
            tracing::trace!("emote loader resumed after {} records", stats.processed);

            let mut table = index.write();
            for record in chunk {
                table.set(record.name(), record.meta());
                stats.processed += 1;
            }
        }

        stats.entries = index.read().size();
        tracing::info!(
            "loaded {} emote records ({} entries) in {:?}, yielded {} times",
            stats.processed,
            stats.entries,
            started.elapsed(),
            stats.yields
        );

        stats
    }
}
