//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod store;

pub use clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
pub use store::{IndexDefinition, IndexQuery, POST_INDEXES, PostStore, Record, STATUS_INDEX};
