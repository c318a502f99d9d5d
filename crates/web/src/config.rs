use anyhow::{bail, Context};
use deckhand_core::{DocumentStore, MemoryStore, RngState};
use deckhand_store::FileStore;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_DIR: &str = "data/decks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub addr: String,
    pub store: StoreKind,
    pub data_dir: PathBuf,
    /// Fixed shuffle seed; OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            store: StoreKind::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed: None,
        }
    }
}

impl WebConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads `DECKHAND_ADDR`, `DECKHAND_STORE`, `DECKHAND_DATA_DIR` and
    /// `DECKHAND_SEED` through `lookup`, falling back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(addr) = lookup("DECKHAND_ADDR") {
            if addr.trim().is_empty() {
                bail!("DECKHAND_ADDR is empty");
            }
            config.addr = addr.trim().to_string();
        }
        if let Some(store) = lookup("DECKHAND_STORE") {
            config.store = match store.trim().to_ascii_lowercase().as_str() {
                "memory" => StoreKind::Memory,
                "file" => StoreKind::File,
                other => bail!("unknown DECKHAND_STORE {other:?} (expected memory or file)"),
            };
        }
        if let Some(dir) = lookup("DECKHAND_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(seed) = lookup("DECKHAND_SEED") {
            let seed = seed
                .trim()
                .parse::<u64>()
                .with_context(|| format!("parse DECKHAND_SEED {seed:?}"))?;
            config.seed = Some(seed);
        }
        Ok(config)
    }

    pub fn open_store(&self) -> anyhow::Result<Box<dyn DocumentStore>> {
        match self.store {
            StoreKind::Memory => Ok(Box::new(MemoryStore::new())),
            StoreKind::File => {
                let store = FileStore::open(&self.data_dir)
                    .with_context(|| format!("open store {}", self.data_dir.display()))?;
                Ok(Box::new(store))
            }
        }
    }

    pub fn rng(&self) -> RngState {
        match self.seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        }
    }
}
