//! Adapter implementations for task storage and text-generation ports.

pub mod directory;
pub mod gemini;
pub mod memory;
pub mod slot;

pub use directory::DirectorySlot;
pub use gemini::GeminiTextGenerator;
pub use slot::SlotTaskStorage;
