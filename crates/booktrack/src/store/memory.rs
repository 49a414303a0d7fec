use tracing::debug;
use uuid::Uuid;

use super::BookRepository;
use crate::error::{BookError, Result};
use crate::model::{BookDelta, BookFields, BookRecord};
use crate::query::QuerySpec;
use crate::transition::{Clock, SystemClock};

/// In-memory repository.
///
/// Records live in insertion order, which is also the tie-break order for
/// queries that sort on equal values.
pub struct InMemoryRepository<C: Clock = SystemClock> {
    books: Vec<BookRecord>,
    clock: C,
    simulate_write_error: bool,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> InMemoryRepository<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            books: Vec::new(),
            clock,
            simulate_write_error: false,
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(BookError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn position(&self, id: &Uuid) -> Result<usize> {
        self.books
            .iter()
            .position(|b| b.id == *id)
            .ok_or(BookError::NotFound(*id))
    }
}

impl<C: Clock> BookRepository for InMemoryRepository<C> {
    fn find(&self, query: &QuerySpec) -> Result<Vec<BookRecord>> {
        Ok(query.apply(self.books.iter().cloned()))
    }

    fn get(&self, id: &Uuid) -> Result<BookRecord> {
        let idx = self.position(id)?;
        Ok(self.books[idx].clone())
    }

    fn create(&mut self, fields: BookFields) -> Result<BookRecord> {
        self.check_writable()?;
        let record = BookRecord::from_fields(Uuid::new_v4(), fields, self.clock.now());
        debug!(id = %record.id, "Created book");
        self.books.push(record.clone());
        Ok(record)
    }

    fn replace_by_id(&mut self, id: &Uuid, fields: BookFields) -> Result<BookRecord> {
        let idx = self.position(id)?;
        self.check_writable()?;
        let now = self.clock.now();
        let record = &mut self.books[idx];
        record.replace_fields(fields, now);
        Ok(record.clone())
    }

    fn update_by_id(&mut self, id: &Uuid, delta: &BookDelta) -> Result<BookRecord> {
        let idx = self.position(id)?;
        self.check_writable()?;
        let now = self.clock.now();
        let record = &mut self.books[idx];
        delta.apply(record);
        record.updated_at = now;
        Ok(record.clone())
    }

    fn delete_by_id(&mut self, id: &Uuid) -> Result<BookRecord> {
        let idx = self.position(id)?;
        self.check_writable()?;
        debug!(id = %id, "Deleted book");
        Ok(self.books.remove(idx))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::ReadingStatus;
    use crate::transition::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Builds a repository whose records have strictly increasing `created_at`,
    /// one minute apart, starting at 2024-01-01 00:00 UTC.
    pub struct RepoFixture {
        pub repo: InMemoryRepository<FixedClock>,
        next_created: DateTime<Utc>,
    }

    impl Default for RepoFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RepoFixture {
        pub fn new() -> Self {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            Self {
                repo: InMemoryRepository::with_clock(FixedClock(start)),
                next_created: start,
            }
        }

        fn push(mut self, fields: BookFields) -> Self {
            self.repo.clock = FixedClock(self.next_created);
            self.repo.create(fields).unwrap();
            self.next_created += Duration::minutes(1);
            self
        }

        pub fn with_book(self, title: &str, author: &str, genre: &str, year: i32) -> Self {
            self.push(BookFields::new(title, author, genre, year))
        }

        pub fn with_status(
            self,
            title: &str,
            author: &str,
            genre: &str,
            year: i32,
            status: ReadingStatus,
        ) -> Self {
            let mut fields = BookFields::new(title, author, genre, year);
            fields.status = status;
            self.push(fields)
        }

        pub fn with_pages(self, title: &str, page_count: u32) -> Self {
            let mut fields = BookFields::new(title, "Anonymous", "Unsorted", 2000);
            fields.page_count = Some(page_count);
            self.push(fields)
        }

        /// Sets the clock used for later writes.
        pub fn at(mut self, now: DateTime<Utc>) -> Self {
            self.repo.clock = FixedClock(now);
            self
        }

        pub fn id_of(&self, title: &str) -> Uuid {
            self.repo
                .books
                .iter()
                .find(|b| b.title == title)
                .map(|b| b.id)
                .unwrap()
        }
    }
}
