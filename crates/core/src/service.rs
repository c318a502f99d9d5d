use crate::{Card, Deck, DeckError, DeckId, DeckStore, DocumentStore, RngState};
use std::sync::{Mutex, PoisonError};

/// Create, open and draw. Holds no deck state between calls; the store is
/// the only owner of decks. The shuffle source is the one piece of mutable
/// state kept here.
#[derive(Debug)]
pub struct DeckService<S> {
    store: DeckStore<S>,
    rng: Mutex<RngState>,
}

impl<S: DocumentStore> DeckService<S> {
    pub fn new(documents: S) -> Self {
        Self::with_rng(documents, RngState::from_entropy())
    }

    pub fn with_rng(documents: S, rng: RngState) -> Self {
        Self {
            store: DeckStore::new(documents),
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &DeckStore<S> {
        &self.store
    }

    /// Hands the document store back for shutdown.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    /// Persists a new deck and returns its metadata without cards.
    pub fn create_deck<C: AsRef<str>>(
        &self,
        shuffled: bool,
        requested: &[C],
    ) -> Result<Deck, DeckError> {
        let deck = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            Deck::new(shuffled, requested, &mut rng)
        };
        self.store.insert_deck(&deck)?;
        tracing::debug!(
            deck_id = %deck.deck_id,
            shuffled,
            remaining = deck.remaining,
            "deck created"
        );
        Ok(deck.into_summary())
    }

    pub fn open_deck(&self, id: &DeckId) -> Result<Deck, DeckError> {
        self.store.get_deck(id)
    }

    pub fn draw_cards(&self, id: &DeckId, count: usize) -> Result<Vec<Card>, DeckError> {
        let drawn = self.store.draw_cards_from_deck(id, count)?;
        tracing::debug!(deck_id = %id, count, "cards drawn");
        Ok(drawn)
    }
}
