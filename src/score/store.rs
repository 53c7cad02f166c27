use anyhow::{Context, Result, anyhow};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Durable home of the single high score integer
pub trait ScoreStore: Send {
    /// Read the stored value; `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<u32>>;

    /// Overwrite the stored value
    fn save(&mut self, value: u32) -> Result<()>;
}

/// Stores the score as a decimal number in a text file
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Result<Option<u32>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Some(0));
        }
        let value = trimmed
            .parse::<u32>()
            .with_context(|| format!("Corrupt high score in {:?}: {:?}", self.path, trimmed))?;
        Ok(Some(value))
    }

    fn save(&mut self, value: u32) -> Result<()> {
        // Write beside the target then rename so a crash never leaves a torn file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, value.to_string())
            .with_context(|| format!("Failed to write {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;
        Ok(())
    }
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    slot: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    value: Option<u32>,
    saves: usize,
    fail_writes: bool,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        let store = Self::new();
        if let Ok(mut slot) = store.slot.lock() {
            slot.value = Some(value);
        }
        store
    }

    /// Make every subsequent save fail
    pub fn failing_writes(self) -> Self {
        if let Ok(mut slot) = self.slot.lock() {
            slot.fail_writes = true;
        }
        self
    }

    pub fn value(&self) -> Option<u32> {
        self.slot.lock().ok().and_then(|slot| slot.value)
    }

    /// Number of successful saves so far
    pub fn saves(&self) -> usize {
        self.slot.lock().map(|slot| slot.saves).unwrap_or(0)
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Option<u32>> {
        let slot = self.slot.lock().map_err(|_| anyhow!("score slot poisoned"))?;
        Ok(slot.value)
    }

    fn save(&mut self, value: u32) -> Result<()> {
        let mut slot = self.slot.lock().map_err(|_| anyhow!("score slot poisoned"))?;
        if slot.fail_writes {
            return Err(anyhow!("writes disabled"));
        }
        slot.value = Some(value);
        slot.saves += 1;
        Ok(())
    }
}
