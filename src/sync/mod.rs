//! One synchronization pass from remote lists to a published filter.

mod error;
mod syncer;


pub use error::SyncError;
pub use syncer::{PassReport, SlotOutcome, Syncer};
