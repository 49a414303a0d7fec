//! # booktrack Architecture
//!
//! booktrack is the core of a personal book tracker: it sits between an HTTP
//! surface and a record store and owns the two pieces of non-trivial logic in
//! between. It turns loosely-typed filter/sort parameters into a well-formed
//! query, and it turns status/progress changes into consistent field updates.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, one method per request kind                 │
//! │  - Validates, builds, delegates; returns Result types       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (validation.rs, query/, transition.rs)                │
//! │  - Pure functions of their input (plus an injected clock)   │
//! │  - Produce a QuerySpec, a BookFields set or a BookDelta     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract BookRepository trait                            │
//! │  - JsonFileRepository, InMemoryRepository (testing)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O in the Core
//!
//! Validation, query building and transitions never touch storage, the
//! network or the terminal, and never read the wall clock directly. The same
//! core can back a REST service, a desktop app or a CLI.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber; that is
//! the embedding application's job.
//!
//! ## Module Overview
//!
//! - [`model`]: `BookRecord`, `BookFields`, `BookDelta`, `ReadingStatus`
//! - [`validation`]: raw input to typed fields
//! - [`query`]: filter/sort parameters to `QuerySpec`
//! - [`transition`]: status and progress deltas, `Clock`
//! - [`store`]: `BookRepository` and its implementations
//! - [`api`]: facade over all of the above
//! - [`lookup`]: catalog search results merged into raw input
//! - [`config`]: layered configuration
//! - [`error`]: `BookError` and `Result`

pub mod api;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod query;
pub mod store;
pub mod transition;
pub mod validation;
