//! In-memory book catalog: browse/search plus the administrative CRUD.
//!
//! [`Catalog`] owns its books outright and is single-writer; persistence and
//! sharing are out of scope here. Availability is driven by the loan flow,
//! not by catalog edits.

mod catalog;
pub mod error;

pub use catalog::Catalog;
pub use error::{Error, Result};
