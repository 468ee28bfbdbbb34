//! Core types and trait definitions for the shelf library catalog.
//!
//! Holds the domain rows, the [`backend::LibraryBackend`] capability surface
//! the hosted backend is reached through, and the shared error type. Every
//! other crate in the workspace depends on this one; it knows about no
//! concrete backend.

// Trait futures carry explicit `Send` bounds; silence the advisory lint.
#![allow(async_fn_in_trait)]

pub mod backend;
pub mod book;
pub mod error;
pub mod loan;
pub mod profile;
pub mod session;

pub use error::{Error, Result};
