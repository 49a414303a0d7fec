use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::BookRepository;
use crate::error::{BookError, Result};
use crate::model::{BookDelta, BookFields, BookRecord};
use crate::query::QuerySpec;
use crate::transition::{Clock, SystemClock};

/// Repository backed by a single JSON file holding an array of records.
///
/// Every operation reads the whole file; every write rewrites it through a
/// temporary file and a rename, so readers never see a partial write. A missing
/// file is an empty collection.
pub struct JsonFileRepository<C: Clock = SystemClock> {
    path: PathBuf,
    clock: C,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> JsonFileRepository<C> {
    pub fn with_clock(path: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<BookRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(BookError::Io)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let books = serde_json::from_str(&content).map_err(BookError::Serialization)?;
        Ok(books)
    }

    fn save(&self, books: &[BookRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(BookError::Io)?;
        }

        let content = serde_json::to_string_pretty(books).map_err(BookError::Serialization)?;
        let tmp_file = dir.join(format!(".books-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(BookError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, &self.path) {
            let _ = fs::remove_file(&tmp_file);
            return Err(BookError::Io(e));
        }
        Ok(())
    }

    fn modify<F>(&mut self, id: &Uuid, change: F) -> Result<BookRecord>
    where
        F: FnOnce(&mut BookRecord),
    {
        let mut books = self.load()?;
        let record = books
            .iter_mut()
            .find(|b| b.id == *id)
            .ok_or(BookError::NotFound(*id))?;
        change(record);
        record.updated_at = self.clock.now();
        let updated = record.clone();
        self.save(&books)?;
        Ok(updated)
    }
}

impl<C: Clock> BookRepository for JsonFileRepository<C> {
    fn find(&self, query: &QuerySpec) -> Result<Vec<BookRecord>> {
        Ok(query.apply(self.load()?))
    }

    fn get(&self, id: &Uuid) -> Result<BookRecord> {
        self.load()?
            .into_iter()
            .find(|b| b.id == *id)
            .ok_or(BookError::NotFound(*id))
    }

    fn create(&mut self, fields: BookFields) -> Result<BookRecord> {
        let mut books = self.load()?;
        let record = BookRecord::from_fields(Uuid::new_v4(), fields, self.clock.now());
        books.push(record.clone());
        self.save(&books)?;
        debug!(id = %record.id, path = %self.path.display(), "Created book");
        Ok(record)
    }

    fn replace_by_id(&mut self, id: &Uuid, fields: BookFields) -> Result<BookRecord> {
        let now = self.clock.now();
        self.modify(id, |record| record.replace_fields(fields, now))
    }

    fn update_by_id(&mut self, id: &Uuid, delta: &BookDelta) -> Result<BookRecord> {
        self.modify(id, |record| delta.apply(record))
    }

    fn delete_by_id(&mut self, id: &Uuid) -> Result<BookRecord> {
        let mut books = self.load()?;
        let idx = books
            .iter()
            .position(|b| b.id == *id)
            .ok_or(BookError::NotFound(*id))?;
        let removed = books.remove(idx);
        self.save(&books)?;
        debug!(id = %id, path = %self.path.display(), "Deleted book");
        Ok(removed)
    }
}
