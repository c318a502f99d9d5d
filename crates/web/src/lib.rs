//! HTTP surface for the deck service.

mod api;
mod config;
mod server;

pub use api::*;
pub use config::*;
pub use server::*;
