use deckhand_core::{DeckDocument, DeckId, DeckUpdate, DocumentStore, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const DOCUMENT_EXT: &str = "json";
const TEMP_EXT: &str = "json.tmp";

/// One JSON document per deck under a directory, named `<deck id>.json`.
///
/// Each write goes to a temporary sibling and is renamed into place, so a
/// document on disk is always either the previous or the next version.
/// Writes through one `FileStore` value are serialised by a lock; separate
/// processes sharing a directory get no coordination beyond the rename.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates the directory when it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| io_error(&dir, err))?;
        tracing::debug!(dir = %dir.display(), "file store opened");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of deck documents currently on disk.
    pub fn len(&self) -> Result<usize, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|err| io_error(&self.dir, err))?;
        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|err| io_error(&self.dir, err))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(DOCUMENT_EXT) {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn document_path(&self, id: &DeckId) -> PathBuf {
        self.dir.join(format!("{id}.{DOCUMENT_EXT}"))
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_document(&self, id: &DeckId) -> Result<Option<DeckDocument>, StoreError> {
        let path = self.document_path(id);
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&path, err)),
        };
        let doc: DeckDocument = serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(path = %path.display(), %err, "unreadable deck document");
            StoreError::Corrupt(format!("{}: {err}", path.display()))
        })?;
        if doc.id != *id {
            tracing::warn!(path = %path.display(), found = %doc.id, "deck document id mismatch");
            return Err(StoreError::Corrupt(format!(
                "{}: holds deck {}",
                path.display(),
                doc.id
            )));
        }
        Ok(Some(doc))
    }

    fn write_document(&self, doc: &DeckDocument) -> Result<(), StoreError> {
        let path = self.document_path(&doc.id);
        let temp = path.with_extension(TEMP_EXT);
        let body =
            serde_json::to_string_pretty(doc).map_err(|err| StoreError::Serialize(err.to_string()))?;
        fs::write(&temp, body).map_err(|err| io_error(&temp, err))?;
        fs::rename(&temp, &path).map_err(|err| {
            let _ = fs::remove_file(&temp);
            io_error(&path, err)
        })?;
        tracing::debug!(deck_id = %doc.id, remaining = doc.remaining, "deck document written");
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn insert_one(&self, doc: DeckDocument) -> Result<DeckId, StoreError> {
        let _guard = self.lock();
        if self.document_path(&doc.id).exists() {
            return Err(StoreError::Duplicate(doc.id));
        }
        self.write_document(&doc)?;
        Ok(doc.id)
    }

    fn find_one(&self, id: &DeckId) -> Result<Option<DeckDocument>, StoreError> {
        self.read_document(id)
    }

    fn update_one(&self, id: &DeckId, update: &DeckUpdate) -> Result<bool, StoreError> {
        let _guard = self.lock();
        let Some(mut doc) = self.read_document(id)? else {
            return Ok(false);
        };
        doc.apply(update);
        self.write_document(&doc)?;
        Ok(true)
    }
}

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_core::{Deck, RngState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    #[test]
    fn insert_find_roundtrip() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        let deck = Deck::new(false, &["AS", "QH"], &mut RngState::from_seed(4));
        let id = store
            .insert_one(DeckDocument::from(deck.clone()))
            .expect("insert");
        assert_eq!(id, deck.deck_id);
        let found = store.find_one(&id).expect("find").expect("present");
        assert_eq!(Deck::from(found), deck);
        assert_eq!(store.len().expect("len"), 1);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn find_missing_is_none() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        assert_eq!(store.find_one(&DeckId::new()).expect("find"), None);
        assert!(store.is_empty().expect("empty"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        let doc = DeckDocument::from(Deck::new(false, &["AS"], &mut RngState::from_seed(4)));
        store.insert_one(doc.clone()).expect("insert");
        assert_eq!(
            store.insert_one(doc.clone()),
            Err(StoreError::Duplicate(doc.id))
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn update_rewrites_document() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        let doc = DeckDocument::from(Deck::new(false, &["AS", "2S", "3S"], &mut RngState::from_seed(4)));
        let id = store.insert_one(doc).expect("insert");
        let update = DeckUpdate {
            pull_codes: vec!["3S".parse().expect("code")],
            set_remaining: 2,
        };
        assert!(store.update_one(&id, &update).expect("update"));
        let found = store.find_one(&id).expect("find").expect("present");
        assert_eq!(found.remaining, 2);
        assert_eq!(found.cards.len(), 2);
        assert!(!store.document_path(&id).with_extension(TEMP_EXT).exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn update_missing_reports_no_match() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        let update = DeckUpdate {
            pull_codes: Vec::new(),
            set_remaining: 0,
        };
        assert!(!store.update_one(&DeckId::new(), &update).expect("update"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_document_is_reported() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        let id = DeckId::new();
        fs::write(store.document_path(&id), "{not json").expect("write");
        let err = store.find_one(&id).expect_err("corrupt");
        assert!(matches!(err, StoreError::Corrupt(_)), "{err}");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn document_under_wrong_name_is_corrupt() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        let other = DeckDocument::from(Deck::new(false, &["AS"], &mut RngState::from_seed(4)));
        let id = DeckId::new();
        let body = serde_json::to_string(&other).expect("serialize");
        fs::write(store.document_path(&id), body).expect("write");

        let err = store.find_one(&id).expect_err("mismatch");
        assert!(matches!(&err, StoreError::Corrupt(msg) if msg.contains(&other.id.to_string())), "{err}");
        let update = DeckUpdate {
            pull_codes: Vec::new(),
            set_remaining: 0,
        };
        assert!(matches!(store.update_one(&id, &update), Err(StoreError::Corrupt(_))));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn document_layout_on_disk() {
        let dir = unique_temp_dir();
        let store = FileStore::open(&dir).expect("open");
        let deck = Deck::new(true, &["KC"], &mut RngState::from_seed(4));
        let id = store.insert_one(DeckDocument::from(deck)).expect("insert");
        let body = fs::read_to_string(store.document_path(&id)).expect("read");
        let value: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["_id"], id.to_string());
        assert_eq!(value["shuffled"], true);
        assert_eq!(value["remaining"], 1);
        assert_eq!(value["cards"][0]["code"], "KC");
        assert_eq!(value["cards"][0]["value"], "KING");
        assert_eq!(value["cards"][0]["suit"], "CLUBS");
        let _ = fs::remove_dir_all(dir);
    }

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "deckhand_file_store_test_{}_{}_{}",
            std::process::id(),
            nanos,
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ))
    }
}
