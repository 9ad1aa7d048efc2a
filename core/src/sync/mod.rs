//! Sync scheduling and persisted watch state
//!
//! - **`policy`**: when a sync is due ([`SyncPolicy`], [`SyncWindow`])
//! - **`state`**: [`SyncState`] and its checksummed storage record
//! - **`scheduler`**: [`SyncScheduler`], the only writer of persisted state
//!
//! State lifecycle: loaded once at boot, saved on change. A failed sync
//! never touches it, so the next wake re-evaluates the decision rather
//! than retrying the network immediately.

pub mod policy;
pub mod scheduler;
pub mod state;

pub use policy::{SyncPolicy, SyncWindow};
pub use scheduler::{StoreError, SyncScheduler};
pub use state::SyncState;
