//! Store Module
//!
//! Authoritative in-memory record set.
//!
//! ## Responsibilities
//! - Exact-key lookup
//! - Insert-if-absent saves (never overwrite, never merge)
//! - Delete by key, failing when the key is absent
//! - Point-in-time snapshots for persistence
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in a parking_lot RwLock:
//! - Lookups share the read lock
//! - `save` checks and inserts under a single write lock, so two racing
//!   saves of one key give exactly one winner
//! - Ordered keys make snapshot order reproducible
//! - Records are stored as `Arc<Record>`; readers get shared, immutable views

mod table;

pub use table::RecordStore;
