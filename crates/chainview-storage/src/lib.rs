//! SQLite view store for ChainView.
//!
//! Projections materialize chain events into *views* — plain SQL tables
//! optimized for reads. This crate owns the SQLite pool, the view table
//! schema, and the two storage primitives every projection builds on:
//!
//! - [`watermark`] — per-projection last-handled-height bookkeeping, so a
//!   restarted projection resumes exactly where it left off.
//! - [`counter::CounterView`] — a generic key/value counter table with
//!   atomic increment semantics.
//!
//! All mutating helpers take a [`sqlx::SqliteConnection`] rather than the
//! pool, so a projection can run its view writes and its watermark advance
//! inside a single transaction.

pub mod counter;
pub mod error;
pub mod sqlite;
pub mod watermark;

pub use counter::CounterView;
pub use error::StorageError;
pub use sqlite::SqliteStore;
