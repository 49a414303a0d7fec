//! # Query Construction
//!
//! Listing books goes through three steps, each in its own module:
//!
//! 1. [`QueryParams`] collects the loosely-typed parameters a caller supplied.
//! 2. [`QueryBuilder`] turns them into a canonical [`QuerySpec`], filling in the
//!    configured defaults.
//! 3. A [`crate::store::BookRepository`] executes the spec.
//!
//! ## Parameters
//!
//! | Parameter | Effect |
//! |-----------|--------|
//! | `search` | `title`, `author` or `genre` contains the text (case-insensitive, OR) |
//! | `status` | exact match |
//! | `genre` | `genre` contains the text (case-insensitive) |
//! | `yearFrom`, `yearTo` | inclusive bounds on `year`, each optional |
//! | `sortBy` | sort field; unknown names fall back to the configured default |
//! | `sortOrder` | `desc` is descending, anything else ascending |
//!
//! Every supplied filter must match (AND). Absent parameters constrain nothing.
//!
//! ## Usage
//!
//! ```ignore
//! let params = QueryParams::from_pairs([("search", "tolkien"), ("sortBy", "year")])?;
//! let spec = QueryBuilder::new(&config.query).build(&params);
//! let books = repo.find(&spec)?;
//! ```

mod builder;
mod params;
mod spec;

pub use builder::QueryBuilder;
pub use params::QueryParams;
pub use spec::{Predicate, QuerySpec, SortField, SortOrder, SortSpec, TextField};
