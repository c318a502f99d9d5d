use crate::{Card, CardCode, Deck, DeckError, DeckId, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Persisted form of a deck: one document per deck keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckDocument {
    #[serde(rename = "_id")]
    pub id: DeckId,
    pub shuffled: bool,
    pub remaining: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Card>,
}

impl DeckDocument {
    pub fn apply(&mut self, update: &DeckUpdate) {
        self.cards
            .retain(|card| !update.pull_codes.contains(&card.code()));
        self.remaining = update.set_remaining;
    }
}

impl From<Deck> for DeckDocument {
    fn from(deck: Deck) -> Self {
        Self {
            id: deck.deck_id,
            shuffled: deck.shuffled,
            remaining: deck.remaining,
            cards: deck.cards,
        }
    }
}

impl From<DeckDocument> for Deck {
    fn from(doc: DeckDocument) -> Self {
        Self {
            deck_id: doc.id,
            shuffled: doc.shuffled,
            remaining: doc.remaining,
            cards: doc.cards,
        }
    }
}

/// Pull every card whose code is listed, then set `remaining`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckUpdate {
    pub pull_codes: Vec<CardCode>,
    pub set_remaining: usize,
}

/// Narrow CRUD interface over a document store.
///
/// `update_one` must apply the whole [`DeckUpdate`] to a single document
/// atomically: readers observe either the old or the new document, never a
/// mix. Nothing spans more than one document.
pub trait DocumentStore: Send + Sync {
    fn insert_one(&self, doc: DeckDocument) -> Result<DeckId, StoreError>;

    fn find_one(&self, id: &DeckId) -> Result<Option<DeckDocument>, StoreError>;

    /// Returns `false` when no document has this id.
    fn update_one(&self, id: &DeckId, update: &DeckUpdate) -> Result<bool, StoreError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn insert_one(&self, doc: DeckDocument) -> Result<DeckId, StoreError> {
        (**self).insert_one(doc)
    }

    fn find_one(&self, id: &DeckId) -> Result<Option<DeckDocument>, StoreError> {
        (**self).find_one(id)
    }

    fn update_one(&self, id: &DeckId, update: &DeckUpdate) -> Result<bool, StoreError> {
        (**self).update_one(id, update)
    }
}

/// Process-local store. Contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<DeckId, DeckDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<DeckId, DeckDocument>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for MemoryStore {
    fn insert_one(&self, doc: DeckDocument) -> Result<DeckId, StoreError> {
        let mut documents = self.lock();
        if documents.contains_key(&doc.id) {
            return Err(StoreError::Duplicate(doc.id));
        }
        let id = doc.id;
        documents.insert(id, doc);
        Ok(id)
    }

    fn find_one(&self, id: &DeckId) -> Result<Option<DeckDocument>, StoreError> {
        Ok(self.lock().get(id).cloned())
    }

    fn update_one(&self, id: &DeckId, update: &DeckUpdate) -> Result<bool, StoreError> {
        match self.lock().get_mut(id) {
            Some(doc) => {
                doc.apply(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Deck-level operations on top of a [`DocumentStore`].
#[derive(Debug)]
pub struct DeckStore<S> {
    documents: S,
}

impl<S: DocumentStore> DeckStore<S> {
    pub fn new(documents: S) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &S {
        &self.documents
    }

    pub fn into_inner(self) -> S {
        self.documents
    }

    /// Returns the id the document was stored under, which is the deck's own.
    pub fn insert_deck(&self, deck: &Deck) -> Result<DeckId, DeckError> {
        let id = self.documents.insert_one(DeckDocument::from(deck.clone()))?;
        Ok(id)
    }

    pub fn get_deck(&self, id: &DeckId) -> Result<Deck, DeckError> {
        self.documents
            .find_one(id)?
            .map(Deck::from)
            .ok_or(DeckError::NotFound(*id))
    }

    /// Pops `count` cards off the end of the stored deck and persists the
    /// removal with one single-document update. Returns the drawn cards
    /// last card first. Fails without touching the store when the deck
    /// holds fewer than `count` cards.
    ///
    /// Two concurrent draws on the same deck can both read the same state;
    /// callers that need strict consistency serialise draws per deck.
    pub fn draw_cards_from_deck(&self, id: &DeckId, count: usize) -> Result<Vec<Card>, DeckError> {
        let mut deck = self.get_deck(id)?;
        let drawn = deck.draw(count)?;
        let update = DeckUpdate {
            pull_codes: drawn.iter().map(Card::code).collect(),
            set_remaining: deck.remaining,
        };
        if !self.documents.update_one(id, &update)? {
            return Err(DeckError::NotFound(*id));
        }
        Ok(drawn)
    }
}
