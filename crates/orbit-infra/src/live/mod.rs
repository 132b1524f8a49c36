//! Live notifier implementations.

mod memory;

pub use memory::InMemoryLiveNotifier;
