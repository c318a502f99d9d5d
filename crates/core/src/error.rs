use crate::{CardCode, DeckId};
use thiserror::Error;

/// Coarse classification used by boundary layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Store,
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("deck {0} not found")]
    NotFound(DeckId),
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl DeckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid deck id {0:?}")]
    InvalidDeckId(String),
    #[error("invalid shuffle flag {0:?}")]
    InvalidShuffleFlag(String),
    #[error("invalid card count {0:?}")]
    InvalidCount(String),
    #[error("card count must not be negative, got {0}")]
    NegativeCount(i64),
    #[error("deck has {remaining} cards, cannot draw {requested}")]
    NotEnoughCards { requested: usize, remaining: usize },
    #[error("invalid card code {0:?}")]
    InvalidCardCode(String),
    #[error("card code {found} does not match {expected}")]
    CardCodeMismatch { expected: CardCode, found: CardCode },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("deck {0} already exists")]
    Duplicate(DeckId),
    #[error("corrupt document {0}")]
    Corrupt(String),
}
