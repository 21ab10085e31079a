//! Taskdeck: task authoring with persisted lists and suggested subtasks.
//!
//! This crate provides the core of a personal task manager: an editor that
//! drafts tasks in create or edit mode, merges manual and AI-suggested
//! subtasks under a fixed cap, and writes the whole task list through to a
//! single durable slot after every change.
//!
//! # Architecture
//!
//! Taskdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (slot files, HTTP APIs)
//!
//! # Modules
//!
//! - [`task`]: Task model, storage, suggestion client, and editor
//! - [`config`]: TOML configuration and credential loading
//! - [`telemetry`]: Tracing subscriber setup
//! - [`app`]: Production wiring of the editor

pub mod app;
pub mod config;
pub mod task;
pub mod telemetry;
