//! Loosely-typed filter and sort parameters.
//!
//! [`QueryParams`] is what an HTTP layer collects from a query string. Values
//! that need typing (`status`, `yearFrom`, `yearTo`) are checked here; the sort
//! parameters stay raw because unknown values are resolved (not rejected) by the
//! builder.

use tracing::debug;

use crate::error::{BookError, FieldError, Result};
use crate::model::ReadingStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub search: Option<String>,
    pub status: Option<ReadingStatus>,
    pub genre: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads HTTP-style key/value pairs.
    ///
    /// Empty values count as absent, a repeated key keeps its last value and
    /// unknown keys are skipped. A non-integer year bound or an unknown status
    /// is a validation failure naming the parameter.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = QueryParams::default();
        let mut errors = Vec::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();
            let present = (!value.is_empty()).then(|| value.to_string());

            match key {
                "search" => params.search = present,
                "genre" => params.genre = present,
                "sortBy" => params.sort_by = present,
                "sortOrder" => params.sort_order = present,
                "status" => {
                    params.status = None;
                    if let Some(text) = present {
                        match text.parse::<ReadingStatus>() {
                            Ok(status) => params.status = Some(status),
                            Err(_) => errors.push(FieldError::new(
                                key,
                                format!("'{}' is not one of to-read, reading, read", text),
                            )),
                        }
                    }
                }
                "yearFrom" => params.year_from = parse_year(key, present, &mut errors),
                "yearTo" => params.year_to = parse_year(key, present, &mut errors),
                other => {
                    debug!(key = other, "Ignoring unknown query parameter");
                }
            }
        }

        if errors.is_empty() {
            Ok(params)
        } else {
            Err(BookError::from(errors))
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn status(mut self, status: ReadingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn genre(mut self, text: impl Into<String>) -> Self {
        self.genre = Some(text.into());
        self
    }

    pub fn year_from(mut self, year: i32) -> Self {
        self.year_from = Some(year);
        self
    }

    pub fn year_to(mut self, year: i32) -> Self {
        self.year_to = Some(year);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn sort_order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }
}

fn parse_year(key: &str, value: Option<String>, errors: &mut Vec<FieldError>) -> Option<i32> {
    let text = value?;
    match text.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            errors.push(FieldError::new(key, format!("'{}' is not a number", text)));
            None
        }
    }
}
