//! In-memory adapters for tests and offline use.

mod generator;
mod slot;

pub use generator::StaticTextGenerator;
pub use slot::InMemorySlot;
