//! Deck model, store seam and deck service. Keep this crate free of IO and
//! platform concerns.

pub mod cards;
pub mod deck;
pub mod error;
pub mod id;
pub mod request;
pub mod rng;
pub mod service;
pub mod store;

pub use cards::*;
pub use deck::*;
pub use error::*;
pub use id::*;
pub use request::*;
pub use rng::*;
pub use service::*;
pub use store::*;
