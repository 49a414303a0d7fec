//! # API Facade
//!
//! The API layer is a **thin facade** that wires the core together in the order
//! every request follows:
//!
//! ```text
//! raw input ──▶ validation / QueryParams ──▶ QueryBuilder | TransitionEngine ──▶ BookRepository
//! ```
//!
//! It is the single entry point an HTTP handler (or any other UI) should call.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: query shaping lives in [`crate::query`], date stamping in
//!   [`crate::transition`].
//! - **Error translation**: repository results and errors come back unchanged.
//! - **Retries**: a failed write is reported once; the caller decides.
//!
//! ## Read-Modify-Write
//!
//! `set_status` and `set_progress` read the current record, compute a delta and
//! write it back. The two steps are not atomic: a concurrent writer in between
//! is overwritten (last write wins).
//!
//! ## Generic Over BookRepository
//!
//! `BookTrackerApi<R, C>` is generic over storage and clock:
//! - Production: `BookTrackerApi<JsonFileRepository>` or an embedder's own repository
//! - Testing: `BookTrackerApi<InMemoryRepository<FixedClock>, FixedClock>`

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::BooktrackConfig;
use crate::error::Result;
use crate::model::BookRecord;
use crate::query::{QueryBuilder, QueryParams, QuerySpec};
use crate::store::BookRepository;
use crate::transition::{Clock, StatusChange, SystemClock, TransitionEngine};
use crate::validation::{self, RawFields};

pub struct BookTrackerApi<R: BookRepository, C: Clock = SystemClock> {
    repo: R,
    queries: QueryBuilder,
    transitions: TransitionEngine<C>,
}

impl<R: BookRepository> BookTrackerApi<R> {
    pub fn new(repo: R, config: &BooktrackConfig) -> Self {
        Self::with_clock(repo, config, SystemClock)
    }
}

impl<R: BookRepository, C: Clock> BookTrackerApi<R, C> {
    pub fn with_clock(repo: R, config: &BooktrackConfig, clock: C) -> Self {
        Self {
            repo,
            queries: QueryBuilder::new(&config.query),
            transitions: TransitionEngine::with_clock(clock),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// The spec a parameter set turns into, without running it.
    pub fn query_spec(&self, params: &QueryParams) -> QuerySpec {
        self.queries.build(params)
    }

    pub fn find_books(&self, params: &QueryParams) -> Result<Vec<BookRecord>> {
        let spec = self.queries.build(params);
        self.repo.find(&spec)
    }

    /// Lists books from query-string style pairs (`search`, `status`, `genre`,
    /// `yearFrom`, `yearTo`, `sortBy`, `sortOrder`).
    pub fn list_books<I, K, V>(&self, pairs: I) -> Result<Vec<BookRecord>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params = QueryParams::from_pairs(pairs)?;
        self.find_books(&params)
    }

    pub fn get_book(&self, id: &Uuid) -> Result<BookRecord> {
        self.repo.get(id)
    }

    #[instrument(skip_all)]
    pub fn create_book(&mut self, raw: &RawFields) -> Result<BookRecord> {
        let fields = validation::validate_fields(raw)?;
        self.repo.create(fields)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub fn replace_book(&mut self, id: &Uuid, raw: &RawFields) -> Result<BookRecord> {
        let fields = validation::validate_fields(raw)?;
        self.repo.replace_by_id(id, fields)
    }

    #[instrument(skip_all, fields(id = %id, status = %change.status))]
    pub fn set_status(&mut self, id: &Uuid, change: &StatusChange) -> Result<BookRecord> {
        let current = self.repo.get(id)?;
        let delta = self.transitions.set_status(&current, change);
        self.repo.update_by_id(id, &delta)
    }

    /// [`Self::set_status`] from raw input (`status`, `startDate`, `finishDate`).
    pub fn set_status_raw(&mut self, id: &Uuid, raw: &RawFields) -> Result<BookRecord> {
        let change = validation::validate_status_change(raw)?;
        self.set_status(id, &change)
    }

    #[instrument(skip_all, fields(id = %id, current_page = current_page))]
    pub fn set_progress(&mut self, id: &Uuid, current_page: i64) -> Result<BookRecord> {
        let current = self.repo.get(id)?;
        let delta = self.transitions.set_progress(&current, current_page)?;
        self.repo.update_by_id(id, &delta)
    }

    /// [`Self::set_progress`] from raw input (`currentPage`).
    pub fn set_progress_raw(&mut self, id: &Uuid, raw: &RawFields) -> Result<BookRecord> {
        let page = validation::validate_progress(raw)?;
        self.set_progress(id, page)
    }

    pub fn delete_book(&mut self, id: &Uuid) -> Result<BookRecord> {
        let removed = self.repo.delete_by_id(id)?;
        debug!(id = %id, title = %removed.title, "Book deleted");
        Ok(removed)
    }
}
