//! # Field Validation
//!
//! Turns the loosely-typed input an HTTP layer receives into typed, trimmed
//! [`BookFields`]. Validation is a pure function of the input map.
//!
//! ## Input
//!
//! A [`RawFields`] map of field name to JSON value. `null` and absent keys mean
//! the same thing. Unknown keys are ignored, so a client may post back a whole
//! record (with `id`, `createdAt`, ...) without tripping validation.
//!
//! ## Rules
//!
//! | Field | Accepts | Rejects |
//! |-------|---------|---------|
//! | `title`, `author`, `genre` | text or number, trimmed, required | blank, bool, array, object |
//! | `isbn`, `description`, `coverImageUrl` | text or number, trimmed; blank → absent | bool, array, object |
//! | `year` | integer or integer string, required | fractions, non-numeric text |
//! | `pageCount`, `currentPage` | non-negative integer | negatives, non-numeric |
//! | `rating` | integer 1..=5 | anything outside the range |
//! | `startDate`, `finishDate`, `publicationDate` | RFC 3339, `YYYY-MM-DD`, `YYYY-MM`, `YYYY` | anything else |
//! | `status` | `to-read`, `reading`, `read`; absent → `to-read` | other literals |
//!
//! Failures are collected rather than short-circuited, so the caller gets one
//! [`FieldError`] per bad field.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::error::{BookError, FieldError, Result};
use crate::model::{BookFields, ReadingStatus};
use crate::transition::StatusChange;

pub type RawFields = Map<String, Value>;

/// Validates a full field set for create or whole-record replacement.
pub fn validate_fields(raw: &RawFields) -> Result<BookFields> {
    let mut reader = FieldReader::new(raw);

    let title = reader.required_text("title");
    let author = reader.required_text("author");
    let genre = reader.required_text("genre");
    let year = reader.required_year("year");
    let status = reader.status("status");
    let isbn = reader.optional_text("isbn");
    let description = reader.optional_text("description");
    let cover_image_url = reader.optional_text("coverImageUrl");
    let page_count = reader.count("pageCount");
    let current_page = reader.count("currentPage");
    let rating = reader.rating("rating");
    let start_date = reader.date("startDate");
    let finish_date = reader.date("finishDate");
    let publication_date = reader.date("publicationDate");

    let (Some(title), Some(author), Some(genre), Some(year)) = (title, author, genre, year) else {
        // a missing required value always left a failure behind
        return Err(reader.into_error());
    };
    reader.finish()?;

    Ok(BookFields {
        title,
        author,
        genre,
        year,
        status: status.unwrap_or_default(),
        isbn,
        description,
        cover_image_url,
        page_count,
        current_page: current_page.unwrap_or(0),
        rating,
        start_date,
        finish_date,
        publication_date,
    })
}

/// Validates the input of a status change: a required `status` and optional
/// explicit `startDate` / `finishDate`.
pub fn validate_status_change(raw: &RawFields) -> Result<StatusChange> {
    let mut reader = FieldReader::new(raw);
    let status = reader.status("status");
    if status.is_none() && reader.is_absent("status") {
        reader.fail("status", "is required");
    }
    let start_date = reader.date("startDate");
    let finish_date = reader.date("finishDate");
    reader.finish()?;

    Ok(StatusChange {
        status: status.unwrap_or_default(),
        start_date,
        finish_date,
    })
}

/// Reads `currentPage` as a signed integer. The range check belongs to
/// [`crate::transition::TransitionEngine::set_progress`].
pub fn validate_progress(raw: &RawFields) -> Result<i64> {
    let mut reader = FieldReader::new(raw);
    let page = reader.integer("currentPage");
    if page.is_none() && reader.is_absent("currentPage") {
        reader.fail("currentPage", "is required");
    }
    reader.finish()?;
    Ok(page.unwrap_or_default())
}

/// Parses a calendar date in any of the accepted forms.
///
/// Partial dates resolve to the first day of the period at midnight UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    let parts: Vec<&str> = text.split('-').collect();
    let (year, month, day) = match parts.as_slice() {
        [y] if digits(y, 4) => (*y, "1", "1"),
        [y, m] if digits(y, 4) && digits(m, 2) => (*y, *m, "1"),
        [y, m, d] if digits(y, 4) && digits(m, 2) && digits(d, 2) => (*y, *m, *d),
        _ => return None,
    };
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

/// Exactly `len` ASCII digits.
fn digits(text: &str, len: usize) -> bool {
    text.len() == len && text.bytes().all(|b| b.is_ascii_digit())
}

struct FieldReader<'a> {
    raw: &'a RawFields,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn new(raw: &'a RawFields) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, reason: impl Into<String>) {
        self.errors.push(FieldError::new(field, reason));
    }

    fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    fn into_error(self) -> BookError {
        self.errors.into()
    }

    /// The raw value, with `null` folded into absence.
    fn value(&self, field: &str) -> Option<&'a Value> {
        self.raw.get(field).filter(|v| !v.is_null())
    }

    fn is_absent(&self, field: &str) -> bool {
        match self.value(field) {
            None => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    fn text(&mut self, field: &str) -> Option<String> {
        let text = match self.value(field)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.fail(field, "must be text");
                return None;
            }
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn optional_text(&mut self, field: &str) -> Option<String> {
        self.text(field)
    }

    fn required_text(&mut self, field: &str) -> Option<String> {
        let before = self.errors.len();
        let text = self.text(field);
        if text.is_none() && self.errors.len() == before {
            self.fail(field, "is required");
        }
        text
    }

    fn integer(&mut self, field: &str) -> Option<i64> {
        match self.value(field)? {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(i),
                None => {
                    self.fail(field, format!("'{}' is not an integer", n));
                    None
                }
            },
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                match s.parse::<i64>() {
                    Ok(i) => Some(i),
                    Err(_) => {
                        self.fail(field, format!("'{}' is not a number", s));
                        None
                    }
                }
            }
            _ => {
                self.fail(field, "must be a number");
                None
            }
        }
    }

    fn required_year(&mut self, field: &str) -> Option<i32> {
        let before = self.errors.len();
        let Some(year) = self.integer(field) else {
            if self.errors.len() == before {
                self.fail(field, "is required");
            }
            return None;
        };
        match i32::try_from(year) {
            Ok(year) => Some(year),
            Err(_) => {
                self.fail(field, format!("{} is out of range", year));
                None
            }
        }
    }

    fn count(&mut self, field: &str) -> Option<u32> {
        let value = self.integer(field)?;
        if value < 0 {
            self.fail(field, "must not be negative");
            return None;
        }
        match u32::try_from(value) {
            Ok(count) => Some(count),
            Err(_) => {
                self.fail(field, format!("{} is too large", value));
                None
            }
        }
    }

    fn rating(&mut self, field: &str) -> Option<u8> {
        let value = self.integer(field)?;
        if (1..=5).contains(&value) {
            // in range, cannot truncate
            Some(value as u8)
        } else {
            self.fail(field, "must be between 1 and 5");
            None
        }
    }

    fn date(&mut self, field: &str) -> Option<DateTime<Utc>> {
        match self.value(field)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => match parse_date(s) {
                Some(date) => Some(date),
                None => {
                    self.fail(field, format!("'{}' is not a valid date", s.trim()));
                    None
                }
            },
            _ => {
                self.fail(field, "must be a date string");
                None
            }
        }
    }

    fn status(&mut self, field: &str) -> Option<ReadingStatus> {
        match self.value(field)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => match s.trim().parse::<ReadingStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    self.fail(
                        field,
                        format!("'{}' is not one of to-read, reading, read", s.trim()),
                    );
                    None
                }
            },
            _ => {
                self.fail(field, "must be text");
                None
            }
        }
    }
}
