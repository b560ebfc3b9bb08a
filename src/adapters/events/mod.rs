//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process publish/subscribe

mod in_memory;

pub use in_memory::InMemoryEventBus;
