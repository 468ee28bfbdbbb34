//! In-memory backend for the shelf library catalog.
//!
//! Emulates the observable surface of the hosted backend — authentication,
//! the profile and borrow-record tables, and session-change notifications —
//! entirely in process. Used by the demo CLI and by tests; the tables start
//! empty or pre-loaded with the demo dataset via [`MemoryBackend::seeded`].

mod backend;
mod seed;

pub mod error;

pub use backend::MemoryBackend;
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
