//! # Storage Layer
//!
//! This module defines the boundary between booktrack and whatever persists the
//! books. The core never talks to storage itself: it hands a [`BookRepository`]
//! a [`QuerySpec`] to run, a [`BookFields`] set to create or replace, or a
//! [`BookDelta`] to apply.
//!
//! ## Contract
//!
//! - **Identity**: repositories assign a fresh UUID on `create`; ids never change.
//! - **Timestamps**: `created_at` is set on `create`, `updated_at` on every write.
//!   No other code writes them.
//! - **Not found**: `get`, `replace_by_id`, `update_by_id` and `delete_by_id`
//!   return [`BookError::NotFound`] for unknown ids.
//! - **Concurrency**: writes take `&mut self`. Two callers that read a record,
//!   compute deltas and write back race; the last write wins.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryRepository`]: keeps records in a `Vec`. For tests and embedding.
//! - [`fs::JsonFileRepository`]: keeps records in one JSON file, rewritten atomically.
//!
//! Both evaluate queries with [`QuerySpec::apply`]. Neither is meant to scale.
//!
//! [`BookError::NotFound`]: crate::error::BookError::NotFound

use uuid::Uuid;

use crate::error::Result;
use crate::model::{BookDelta, BookFields, BookRecord};
use crate::query::QuerySpec;

pub mod fs;
pub mod memory;

/// Abstract interface for book storage.
pub trait BookRepository {
    /// Records matching `query`, in its sort order.
    fn find(&self, query: &QuerySpec) -> Result<Vec<BookRecord>>;

    fn get(&self, id: &Uuid) -> Result<BookRecord>;

    /// Stores a new record with a fresh id and timestamps.
    fn create(&mut self, fields: BookFields) -> Result<BookRecord>;

    /// Replaces every caller-owned field of an existing record.
    fn replace_by_id(&mut self, id: &Uuid, fields: BookFields) -> Result<BookRecord>;

    /// Applies a partial update and returns the updated record.
    fn update_by_id(&mut self, id: &Uuid, delta: &BookDelta) -> Result<BookRecord>;

    /// Removes a record for good and returns what was removed.
    fn delete_by_id(&mut self, id: &Uuid) -> Result<BookRecord>;
}
