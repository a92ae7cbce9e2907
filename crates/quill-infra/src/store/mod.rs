//! Post store implementations - in-memory backend and the retry decorator.

mod memory;
mod retry;

pub use memory::{InMemoryPostStore, InMemoryStoreConfig};
pub use retry::{RetryPolicy, RetryingStore};
