//! # Reading-State Transitions
//!
//! The two narrow mutations a book goes through while being read. Both return a
//! [`BookDelta`] for the repository to apply; neither touches storage.
//!
//! ## Status Changes
//!
//! Entering a status may stamp the date that status implies
//! ([`ReadingStatus::stamp`]):
//!
//! | New status | Stamps | Unless |
//! |------------|--------|--------|
//! | `to-read` | nothing | |
//! | `reading` | `startDate = now` | the record already has a start date, or one was supplied |
//! | `read` | `finishDate = now` | the record already has a finish date, or one was supplied |
//!
//! Explicitly supplied dates are always written verbatim, whatever the status and
//! whatever the record already holds.
//!
//! Dates are history. Moving back to `to-read`, or from `read` back to `reading`,
//! keeps both dates as they are. Repeating the current status is therefore
//! harmless: the "already has a date" guard means only `status` is rewritten.
//!
//! ## Progress
//!
//! `currentPage` must be non-negative. It is NOT clamped to `pageCount`: a value
//! past the last page is written as given.
//!
//! ## Time
//!
//! The engine reads the time from a [`Clock`], so tests pin it with
//! [`FixedClock`]. The clock is only consulted when a default date is needed.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{BookError, Result};
use crate::model::{BookDelta, BookRecord, DateStamp, ReadingStatus};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// A requested status change, with optional explicit dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ReadingStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub finish_date: Option<DateTime<Utc>>,
}

impl StatusChange {
    pub fn new(status: ReadingStatus) -> Self {
        Self {
            status,
            start_date: None,
            finish_date: None,
        }
    }

    pub fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_finish_date(mut self, date: DateTime<Utc>) -> Self {
        self.finish_date = Some(date);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransitionEngine<C: Clock = SystemClock> {
    clock: C,
}

impl TransitionEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> TransitionEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn set_status(&self, current: &BookRecord, change: &StatusChange) -> BookDelta {
        let mut delta = BookDelta {
            status: Some(change.status),
            start_date: change.start_date,
            finish_date: change.finish_date,
            current_page: None,
        };

        match change.status.stamp() {
            Some(DateStamp::Start) if delta.start_date.is_none() && current.start_date.is_none() => {
                delta.start_date = Some(self.clock.now());
            }
            Some(DateStamp::Finish)
                if delta.finish_date.is_none() && current.finish_date.is_none() =>
            {
                delta.finish_date = Some(self.clock.now());
            }
            _ => {}
        }

        debug!(
            id = %current.id,
            from = %current.status,
            to = %change.status,
            stamped_start = delta.start_date.is_some() && change.start_date.is_none(),
            stamped_finish = delta.finish_date.is_some() && change.finish_date.is_none(),
            "Computed status delta"
        );
        delta
    }

    pub fn set_progress(&self, current: &BookRecord, new_current_page: i64) -> Result<BookDelta> {
        if new_current_page < 0 {
            return Err(BookError::invalid("currentPage", "must not be negative"));
        }
        let page = u32::try_from(new_current_page).map_err(|_| {
            BookError::invalid("currentPage", format!("{} is too large", new_current_page))
        })?;

        if let Some(page_count) = current.page_count {
            if page > page_count {
                debug!(
                    id = %current.id,
                    current_page = page,
                    page_count,
                    "Progress beyond page count accepted as-is"
                );
            }
        }

        Ok(BookDelta {
            current_page: Some(page),
            ..Default::default()
        })
    }
}
