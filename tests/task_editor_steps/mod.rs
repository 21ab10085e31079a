//! Step definitions for task editor BDD scenarios.

pub mod given;
pub mod then;
pub mod world;
