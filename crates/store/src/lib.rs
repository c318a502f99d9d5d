//! Durable document storage for decks.

mod file;

pub use file::*;
