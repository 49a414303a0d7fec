//! The canonical query specification.
//!
//! A [`QuerySpec`] is what the builder hands to a repository: a conjunction of
//! [`Predicate`]s plus one [`SortSpec`]. Repositories backed by a real database
//! translate it; the in-process repositories evaluate it directly through
//! [`QuerySpec::apply`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::{BookRecord, ReadingStatus};

/// Text fields that support substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    Title,
    Author,
    Genre,
}

impl TextField {
    fn value(self, book: &BookRecord) -> &str {
        match self {
            TextField::Title => &book.title,
            TextField::Author => &book.author,
            TextField::Genre => &book.genre,
        }
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Predicate {
    /// Case-insensitive substring match. `needle` is stored lowercased.
    Contains { field: TextField, needle: String },
    StatusEq { status: ReadingStatus },
    /// Inclusive lower bound on `year`.
    YearAtLeast { year: i32 },
    /// Inclusive upper bound on `year`.
    YearAtMost { year: i32 },
    /// Matches when any inner predicate matches.
    AnyOf { predicates: Vec<Predicate> },
}

impl Predicate {
    pub fn contains(field: TextField, needle: &str) -> Self {
        Predicate::Contains {
            field,
            needle: needle.to_lowercase(),
        }
    }

    pub fn matches(&self, book: &BookRecord) -> bool {
        match self {
            Predicate::Contains { field, needle } => {
                field.value(book).to_lowercase().contains(needle.as_str())
            }
            Predicate::StatusEq { status } => book.status == *status,
            Predicate::YearAtLeast { year } => book.year >= *year,
            Predicate::YearAtMost { year } => book.year <= *year,
            Predicate::AnyOf { predicates } => predicates.iter().any(|p| p.matches(book)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    Author,
    Genre,
    Year,
    Status,
    PageCount,
    CurrentPage,
    Rating,
    StartDate,
    FinishDate,
    PublicationDate,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 13] = [
        SortField::Title,
        SortField::Author,
        SortField::Genre,
        SortField::Year,
        SortField::Status,
        SortField::PageCount,
        SortField::CurrentPage,
        SortField::Rating,
        SortField::StartDate,
        SortField::FinishDate,
        SortField::PublicationDate,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Genre => "genre",
            SortField::Year => "year",
            SortField::Status => "status",
            SortField::PageCount => "pageCount",
            SortField::CurrentPage => "currentPage",
            SortField::Rating => "rating",
            SortField::StartDate => "startDate",
            SortField::FinishDate => "finishDate",
            SortField::PublicationDate => "publicationDate",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Looks up a field by its wire name. Exact, case-sensitive match.
    pub fn parse(name: &str) -> Option<Self> {
        SortField::ALL.into_iter().find(|f| f.as_str() == name)
    }

    fn compare(self, a: &BookRecord, b: &BookRecord) -> Ordering {
        match self {
            SortField::Title => a.title.cmp(&b.title),
            SortField::Author => a.author.cmp(&b.author),
            SortField::Genre => a.genre.cmp(&b.genre),
            SortField::Year => a.year.cmp(&b.year),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::PageCount => a.page_count.cmp(&b.page_count),
            SortField::CurrentPage => a.current_page.cmp(&b.current_page),
            SortField::Rating => a.rating.cmp(&b.rating),
            SortField::StartDate => a.start_date.cmp(&b.start_date),
            SortField::FinishDate => a.finish_date.cmp(&b.finish_date),
            SortField::PublicationDate => a.publication_date.cmp(&b.publication_date),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `"desc"` is descending; every other literal is ascending.
    pub fn from_literal(literal: &str) -> Self {
        if literal == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    /// Absent optional values order before present ones when ascending.
    pub fn compare(&self, a: &BookRecord, b: &BookRecord) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// All predicates must match.
    pub filter: Vec<Predicate>,
    pub sort: SortSpec,
}

impl QuerySpec {
    pub fn matches(&self, book: &BookRecord) -> bool {
        self.filter.iter().all(|p| p.matches(book))
    }

    /// Filters and sorts `books`. The sort is stable, so ties keep their input order.
    pub fn apply<I>(&self, books: I) -> Vec<BookRecord>
    where
        I: IntoIterator<Item = BookRecord>,
    {
        let mut matched: Vec<BookRecord> = books.into_iter().filter(|b| self.matches(b)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookFields;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn book(title: &str, author: &str, genre: &str, year: i32) -> BookRecord {
        BookRecord::from_fields(
            Uuid::new_v4(),
            BookFields::new(title, author, genre, year),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let pred = Predicate::contains(TextField::Author, "SMITH");
        assert!(pred.matches(&book("Wealth", "John Smith", "Economics", 1776)));
        assert!(!pred.matches(&book("Wealth", "Jones", "Economics", 1776)));
    }

    #[test]
    fn test_any_of_is_or() {
        let pred = Predicate::AnyOf {
            predicates: vec![
                Predicate::contains(TextField::Title, "dune"),
                Predicate::contains(TextField::Genre, "poetry"),
            ],
        };
        assert!(pred.matches(&book("Dune", "Herbert", "SF", 1965)));
        assert!(pred.matches(&book("Odes", "Keats", "Poetry", 1819)));
        assert!(!pred.matches(&book("Emma", "Austen", "Novel", 1815)));
    }

    #[test]
    fn test_empty_any_of_matches_nothing() {
        let pred = Predicate::AnyOf { predicates: vec![] };
        assert!(!pred.matches(&book("Dune", "Herbert", "SF", 1965)));
    }

    #[test]
    fn test_year_bounds_are_inclusive() {
        let from = Predicate::YearAtLeast { year: 2000 };
        let to = Predicate::YearAtMost { year: 2010 };
        assert!(from.matches(&book("A", "B", "C", 2000)));
        assert!(!from.matches(&book("A", "B", "C", 1999)));
        assert!(to.matches(&book("A", "B", "C", 2010)));
        assert!(!to.matches(&book("A", "B", "C", 2011)));
    }

    #[test]
    fn test_sort_field_names() {
        for field in SortField::ALL {
            assert_eq!(SortField::parse(field.as_str()), Some(field));
        }
        assert_eq!(SortField::parse("createdat"), None);
        assert_eq!(SortField::parse("_id"), None);
    }

    #[test]
    fn test_sort_order_literals() {
        assert_eq!(SortOrder::from_literal("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_literal("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_literal("DESC"), SortOrder::Asc);
        assert_eq!(SortOrder::from_literal("backwards"), SortOrder::Asc);
    }

    #[test]
    fn test_absent_values_sort_first_ascending() {
        let mut rated = book("Rated", "A", "G", 2000);
        rated.rating = Some(4);
        let unrated = book("Unrated", "A", "G", 2000);

        let spec = QuerySpec {
            filter: vec![],
            sort: SortSpec {
                field: SortField::Rating,
                order: SortOrder::Asc,
            },
        };
        let sorted = spec.apply(vec![rated.clone(), unrated.clone()]);
        assert_eq!(sorted[0].title, "Unrated");

        let spec = QuerySpec {
            sort: SortSpec {
                order: SortOrder::Desc,
                ..spec.sort
            },
            ..spec
        };
        let sorted = spec.apply(vec![unrated, rated]);
        assert_eq!(sorted[0].title, "Rated");
    }

    #[test]
    fn test_status_sorts_by_literal() {
        let mut a = book("A", "X", "G", 2000);
        a.status = ReadingStatus::ToRead;
        let mut b = book("B", "X", "G", 2000);
        b.status = ReadingStatus::Read;
        let mut c = book("C", "X", "G", 2000);
        c.status = ReadingStatus::Reading;

        let spec = QuerySpec {
            filter: vec![],
            sort: SortSpec {
                field: SortField::Status,
                order: SortOrder::Asc,
            },
        };
        let titles: Vec<String> = spec.apply(vec![a, b, c]).into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_spec_serializes_with_tagged_predicates() {
        let spec = QuerySpec {
            filter: vec![
                Predicate::StatusEq {
                    status: ReadingStatus::Reading,
                },
                Predicate::YearAtLeast { year: 2000 },
            ],
            sort: SortSpec {
                field: SortField::CreatedAt,
                order: SortOrder::Desc,
            },
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "filter": [
                    { "op": "statusEq", "status": "reading" },
                    { "op": "yearAtLeast", "year": 2000 }
                ],
                "sort": { "field": "createdAt", "order": "desc" }
            })
        );
    }
}
