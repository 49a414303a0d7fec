//! # Domain Model: Books and Reading State
//!
//! This module defines the record shapes the rest of the crate passes around:
//!
//! - [`BookRecord`]: a stored book, with its repository-owned identity and timestamps.
//! - [`BookFields`]: a validated field set, the input to create and whole-record replacement.
//! - [`BookDelta`]: the partial field set produced by the transition engine.
//! - [`ReadingStatus`]: the reading-progress state.
//!
//! ## Wire Format
//!
//! Records serialize with camelCase names, the status with its kebab-case literal:
//!
//! ```text
//! {
//!   "id": "6d1c…",
//!   "title": "Dune",
//!   "author": "Frank Herbert",
//!   "genre": "Science Fiction",
//!   "year": 1965,
//!   "status": "reading",
//!   "pageCount": 412,
//!   "currentPage": 120,
//!   "startDate": "2024-03-01T00:00:00Z",
//!   "createdAt": "…",
//!   "updatedAt": "…"
//! }
//! ```
//!
//! Absent optional values are omitted rather than written as `null`.
//!
//! ## Status and Dates
//!
//! Each status names the date it implies through [`ReadingStatus::stamp`]:
//! `reading` implies a start date, `read` a finish date, `to-read` nothing.
//! The stamping itself lives in [`crate::transition`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    #[default]
    ToRead,
    Reading,
    Read,
}

/// The date a status implies once a book enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStamp {
    Start,
    Finish,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::ToRead,
        ReadingStatus::Reading,
        ReadingStatus::Read,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReadingStatus::ToRead => "to-read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Read => "read",
        }
    }

    pub fn stamp(self) -> Option<DateStamp> {
        match self {
            ReadingStatus::ToRead => None,
            ReadingStatus::Reading => Some(DateStamp::Start),
            ReadingStatus::Read => Some(DateStamp::Finish),
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReadingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                BookError::invalid(
                    "status",
                    format!("'{}' is not one of to-read, reading, read", s),
                )
            })
    }
}

/// Validated, trimmed field values for a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    #[serde(default)]
    pub status: ReadingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<DateTime<Utc>>,
}

impl BookFields {
    /// Minimal field set with every optional value absent.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            year,
            status: ReadingStatus::ToRead,
            isbn: None,
            description: None,
            cover_image_url: None,
            page_count: None,
            current_page: 0,
            rating: None,
            start_date: None,
            finish_date: None,
            publication_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    #[serde(default)]
    pub status: ReadingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookRecord {
    /// Builds a stored record. Only repositories should call this: they own
    /// identity and timestamps.
    pub fn from_fields(id: Uuid, fields: BookFields, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            id,
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            year: 0,
            status: ReadingStatus::ToRead,
            isbn: None,
            description: None,
            cover_image_url: None,
            page_count: None,
            current_page: 0,
            rating: None,
            start_date: None,
            finish_date: None,
            publication_date: None,
            created_at: now,
            updated_at: now,
        };
        record.replace_fields(fields, now);
        record
    }

    /// Whole-record replacement. Identity and `created_at` survive.
    pub fn replace_fields(&mut self, fields: BookFields, now: DateTime<Utc>) {
        self.title = fields.title;
        self.author = fields.author;
        self.genre = fields.genre;
        self.year = fields.year;
        self.status = fields.status;
        self.isbn = fields.isbn;
        self.description = fields.description;
        self.cover_image_url = fields.cover_image_url;
        self.page_count = fields.page_count;
        self.current_page = fields.current_page;
        self.rating = fields.rating;
        self.start_date = fields.start_date;
        self.finish_date = fields.finish_date;
        self.publication_date = fields.publication_date;
        self.updated_at = now;
    }

    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            year: self.year,
            status: self.status,
            isbn: self.isbn.clone(),
            description: self.description.clone(),
            cover_image_url: self.cover_image_url.clone(),
            page_count: self.page_count,
            current_page: self.current_page,
            rating: self.rating,
            start_date: self.start_date,
            finish_date: self.finish_date,
            publication_date: self.publication_date,
        }
    }
}

/// The fields a narrow mutation changes on an existing record.
///
/// `None` means "leave as is"; a delta can never clear a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReadingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
}

impl BookDelta {
    /// Writes the present fields onto `record`. Does not touch `updated_at`.
    pub fn apply(&self, record: &mut BookRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(start) = self.start_date {
            record.start_date = Some(start);
        }
        if let Some(finish) = self.finish_date {
            record.finish_date = Some(finish);
        }
        if let Some(page) = self.current_page {
            record.current_page = page;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_status_round_trips_through_literals() {
        for status in ReadingStatus::ALL {
            assert_eq!(status.as_str().parse::<ReadingStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_literal() {
        let err = "finished".parse::<ReadingStatus>().unwrap_err();
        assert!(err.validation_errors().unwrap().get("status").is_some());
    }

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert!("Reading".parse::<ReadingStatus>().is_err());
    }

    #[test]
    fn test_status_stamps() {
        assert_eq!(ReadingStatus::ToRead.stamp(), None);
        assert_eq!(ReadingStatus::Reading.stamp(), Some(DateStamp::Start));
        assert_eq!(ReadingStatus::Read.stamp(), Some(DateStamp::Finish));
    }

    #[test]
    fn test_record_serializes_camel_case_and_omits_absent() {
        let record = BookRecord::from_fields(
            Uuid::nil(),
            BookFields::new("Dune", "Frank Herbert", "Science Fiction", 1965),
            now(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "to-read");
        assert_eq!(json["currentPage"], 0);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("pageCount").is_none());
        assert!(json.get("startDate").is_none());
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let json = serde_json::json!({
            "id": Uuid::nil(),
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science Fiction",
            "year": 1965,
            "createdAt": now(),
            "updatedAt": now(),
        });
        let record: BookRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.status, ReadingStatus::ToRead);
        assert_eq!(record.current_page, 0);
        assert_eq!(record.rating, None);
    }

    #[test]
    fn test_replace_fields_keeps_identity_and_creation_time() {
        let created = now();
        let mut record = BookRecord::from_fields(
            Uuid::nil(),
            BookFields::new("Dune", "Frank Herbert", "Science Fiction", 1965),
            created,
        );
        let later = created + chrono::Duration::hours(1);
        let mut fields = BookFields::new("Dune Messiah", "Frank Herbert", "Science Fiction", 1969);
        fields.page_count = Some(256);
        record.replace_fields(fields, later);

        assert_eq!(record.id, Uuid::nil());
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
        assert_eq!(record.title, "Dune Messiah");
        assert_eq!(record.page_count, Some(256));
    }

    #[test]
    fn test_delta_apply_only_touches_present_fields() {
        let mut record = BookRecord::from_fields(
            Uuid::nil(),
            BookFields::new("Dune", "Frank Herbert", "Science Fiction", 1965),
            now(),
        );
        record.start_date = Some(now());

        let delta = BookDelta {
            current_page: Some(42),
            ..Default::default()
        };
        delta.apply(&mut record);

        assert_eq!(record.current_page, 42);
        assert_eq!(record.status, ReadingStatus::ToRead);
        assert_eq!(record.start_date, Some(now()));
        assert_eq!(record.updated_at, now());
    }
}
