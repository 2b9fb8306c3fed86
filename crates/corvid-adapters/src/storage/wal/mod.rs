//! The segmented, checksummed write-ahead log.
//!
//! Every mutation is appended as a length-prefixed, CRC32-checksummed
//! [`WalRecord`] before it is considered durable (§4.3). Segments roll over
//! by size and are named so lexical order tracks creation order (see
//! [`segment`]); [`WalRecovery`] replays across segment boundaries after a
//! crash.

mod log;
mod record;
mod recovery;
pub mod segment;

pub use log::{WalManager, WalPosition, WalSyncPolicy};
pub use record::WalRecord;
pub use recovery::WalRecovery;
