//! Reconciliation of scanner rows against an organization's standard time.

pub mod engine;
pub mod slot;
pub mod store;
pub mod validity;

pub use engine::{ReconcileOptions, reconcile};
pub use slot::{Bounds, Slot};
pub use store::{AttendanceStore, MySqlStore};
