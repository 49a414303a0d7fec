//! # Configuration
//!
//! booktrack configuration is managed by [`confique`], which handles layered
//! loading from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `BOOKTRACK_DEFAULT_SORT_BY`, `BOOKTRACK_DEFAULT_SORT_ORDER`.
//! 2. **Config file**: the TOML file handed to [`BooktrackConfig::load`], if any.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `query.default_sort_by` | `createdAt` | Sort field when a query names none, or an unknown one |
//! | `query.default_sort_order` | `desc` | Sort direction when a query names none |
//!
//! ```toml
//! [query]
//! default_sort_by = "title"
//! default_sort_order = "asc"
//! ```
//!
//! Values are kept as text and resolved by accessor methods, so a typo in the
//! config file degrades to the built-in default instead of failing startup.

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BookError, Result};
use crate::query::{SortField, SortOrder};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BooktrackConfig {
    #[config(nested)]
    pub query: QueryConfig,
}

impl Default for BooktrackConfig {
    fn default() -> Self {
        Self {
            query: QueryConfig::default(),
        }
    }
}

impl BooktrackConfig {
    /// Loads the configuration: environment over `path` over defaults.
    ///
    /// A `path` that does not exist is skipped.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = path {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| BookError::Config(e.to_string()))
    }
}

/// Defaults applied by [`crate::query::QueryBuilder`].
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Sort field wire name (e.g. "createdAt", "title", "year")
    #[config(default = "createdAt", env = "BOOKTRACK_DEFAULT_SORT_BY")]
    pub default_sort_by: String,

    /// "desc" for newest/largest first; anything else sorts ascending
    #[config(default = "desc", env = "BOOKTRACK_DEFAULT_SORT_ORDER")]
    pub default_sort_order: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_sort_by: SortField::CreatedAt.as_str().to_string(),
            default_sort_order: SortOrder::Desc.as_str().to_string(),
        }
    }
}

impl QueryConfig {
    /// The configured default sort field, or `createdAt` if it is not a known field.
    pub fn sort_field(&self) -> SortField {
        SortField::parse(self.default_sort_by.trim()).unwrap_or_else(|| {
            warn!(
                value = %self.default_sort_by,
                "Unknown default sort field, using createdAt"
            );
            SortField::CreatedAt
        })
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::from_literal(self.default_sort_order.trim())
    }
}
