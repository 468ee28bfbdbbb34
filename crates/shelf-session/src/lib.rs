//! Session & profile synchronisation for the shelf library catalog.
//!
//! Two cooperating services over any [`shelf_core::backend::LibraryBackend`]:
//!
//! - [`SessionManager`] owns the authentication identity and the derived
//!   student profile, keeps them in sync with the backend's session-change
//!   notifications, and publishes snapshots to all consumers.
//! - [`LoanService`] turns a resolved profile's borrow records into the
//!   derived active/returned loan view.
//!
//! Construct one manager at process start and pass clones of the handle to
//! every consumer; there is no ambient global.

pub mod loans;
pub mod manager;

pub use loans::LoanService;
pub use manager::{AuthPhase, AuthSnapshot, SessionManager};
