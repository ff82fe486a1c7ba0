//! # Macroz Architecture
//!
//! Macroz is a **persistence library for named keystroke macros**, with a
//! small CLI on top. Each macro keeps two views of one capture: a printable
//! `content` for people and an exact, codec-encoded `raw` payload for
//! byte-for-byte replay, including NULs, escape sequences and invalid UTF-8.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints output, owns exit codes         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (1-based indexes, names → selectors)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - load → mutate → save, one full cycle per operation       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, formatter.rs, codec.rs)             │
//! │  - MacroBackend trait: FileBackend, MemoryBackend           │
//! │  - Optional external JSON formatter, atomic file replace    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Problems come back as [`error::MacroError`] values; degraded
//! but successful operations (a formatter that failed on read) come back as
//! warning messages in the command result and as `tracing` events.
//!
//! ## Module Overview
//!
//! - [`codec`]: binary-safe text encoding for raw captures
//! - [`model`]: `MacroRecord` and the ordered `MacroStore`
//! - [`store`]: backing-file load/save and the backend trait
//! - [`formatter`]: external pretty-printer filters with timeouts
//! - [`commands`]: one module per operation
//! - [`api`]: the facade
//! - [`index`]: 1-based display indexes and name selectors
//! - [`notation`]: printable key notation for raw bytes
//! - [`config`]: configuration file
//! - [`error`]: error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatter;
pub mod index;
pub mod model;
pub mod notation;
pub mod store;
