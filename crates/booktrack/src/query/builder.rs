//! Builds a [`QuerySpec`] from [`QueryParams`].

use tracing::debug;

use super::params::QueryParams;
use super::spec::{Predicate, QuerySpec, SortField, SortOrder, SortSpec, TextField};
use crate::config::QueryConfig;

/// Turns filter/sort parameters into a canonical [`QuerySpec`].
///
/// The builder holds only its defaults; `build` is a pure function of the
/// parameters, so equal inputs give equal (and identically serialized) specs.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    default_sort_by: SortField,
    default_sort_order: SortOrder,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

impl QueryBuilder {
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            default_sort_by: config.sort_field(),
            default_sort_order: config.sort_order(),
        }
    }

    pub fn build(&self, params: &QueryParams) -> QuerySpec {
        // predicate order is fixed: search, status, genre, yearFrom, yearTo
        let mut filter = Vec::new();

        if let Some(text) = non_blank(params.search.as_deref()) {
            filter.push(Predicate::AnyOf {
                predicates: [TextField::Title, TextField::Author, TextField::Genre]
                    .into_iter()
                    .map(|field| Predicate::contains(field, text))
                    .collect(),
            });
        }
        if let Some(status) = params.status {
            filter.push(Predicate::StatusEq { status });
        }
        if let Some(text) = non_blank(params.genre.as_deref()) {
            filter.push(Predicate::contains(TextField::Genre, text));
        }
        if let Some(year) = params.year_from {
            filter.push(Predicate::YearAtLeast { year });
        }
        if let Some(year) = params.year_to {
            filter.push(Predicate::YearAtMost { year });
        }

        let field = match params.sort_by.as_deref() {
            None => self.default_sort_by,
            Some(name) => SortField::parse(name.trim()).unwrap_or_else(|| {
                debug!(sort_by = name, "Unknown sort field, using default");
                self.default_sort_by
            }),
        };
        let order = params
            .sort_order
            .as_deref()
            .map(|literal| SortOrder::from_literal(literal.trim()))
            .unwrap_or(self.default_sort_order);

        let spec = QuerySpec {
            filter,
            sort: SortSpec { field, order },
        };
        debug!(predicates = spec.filter.len(), sort = ?spec.sort, "Built query spec");
        spec
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BookFields, BookRecord, ReadingStatus};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn book(title: &str, author: &str, genre: &str, year: i32) -> BookRecord {
        BookRecord::from_fields(
            Uuid::new_v4(),
            BookFields::new(title, author, genre, year),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn build(params: QueryParams) -> QuerySpec {
        QueryBuilder::default().build(&params)
    }

    #[test]
    fn test_no_params_means_no_filter_and_default_sort() {
        let spec = build(QueryParams::new());
        assert!(spec.filter.is_empty());
        assert_eq!(
            spec.sort,
            SortSpec {
                field: SortField::CreatedAt,
                order: SortOrder::Desc
            }
        );
    }

    #[test]
    fn test_search_matches_title_author_or_genre() {
        let spec = build(QueryParams::new().search("smith"));

        assert!(spec.matches(&book("Wealth of Nations", "John Smith", "Economics", 1776)));
        assert!(spec.matches(&book("The Smiths", "Anon", "Music", 2001)));
        assert!(spec.matches(&book("Forging", "Anon", "Blacksmithing", 1990)));
        assert!(!spec.matches(&book("Ulysses", "Jones", "Novel", 1922)));
    }

    #[test]
    fn test_search_ignores_case() {
        let spec = build(QueryParams::new().search("SmItH"));
        assert!(spec.matches(&book("Wealth", "John Smith", "Economics", 1776)));
    }

    #[test]
    fn test_blank_search_is_no_constraint() {
        assert!(build(QueryParams::new().search("   ")).filter.is_empty());
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let spec = build(QueryParams::new().year_from(2000).year_to(2010));

        assert!(!spec.matches(&book("A", "B", "C", 1999)));
        assert!(spec.matches(&book("A", "B", "C", 2000)));
        assert!(spec.matches(&book("A", "B", "C", 2005)));
        assert!(spec.matches(&book("A", "B", "C", 2010)));
        assert!(!spec.matches(&book("A", "B", "C", 2011)));
    }

    #[test]
    fn test_either_year_bound_alone() {
        let from = build(QueryParams::new().year_from(2000));
        assert_eq!(from.filter, vec![Predicate::YearAtLeast { year: 2000 }]);

        let to = build(QueryParams::new().year_to(2010));
        assert_eq!(to.filter, vec![Predicate::YearAtMost { year: 2010 }]);
    }

    #[test]
    fn test_inverted_year_range_matches_nothing() {
        let spec = build(QueryParams::new().year_from(2010).year_to(2000));
        assert!(!spec.matches(&book("A", "B", "C", 2005)));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let spec = build(
            QueryParams::new()
                .status(ReadingStatus::Reading)
                .genre("FANTASY")
                .year_from(1950),
        );

        let mut hobbit = book("The Hobbit", "Tolkien", "Fantasy", 1937);
        hobbit.status = ReadingStatus::Reading;
        let mut earthsea = book("A Wizard of Earthsea", "Le Guin", "Fantasy", 1968);
        earthsea.status = ReadingStatus::Reading;
        let unread = book("The Last Unicorn", "Beagle", "Dark Fantasy", 1968);

        assert!(!spec.matches(&hobbit));
        assert!(spec.matches(&earthsea));
        assert!(!spec.matches(&unread));
    }

    #[test]
    fn test_unknown_sort_field_falls_back_to_created_at_desc() {
        let spec = build(QueryParams::new().sort_by("popularity"));
        assert_eq!(spec.sort.field, SortField::CreatedAt);
        assert_eq!(spec.sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_explicit_sort() {
        let spec = build(QueryParams::new().sort_by("year").sort_order("asc"));
        assert_eq!(
            spec.sort,
            SortSpec {
                field: SortField::Year,
                order: SortOrder::Asc
            }
        );
    }

    #[test]
    fn test_unknown_sort_order_is_ascending() {
        let spec = build(QueryParams::new().sort_order("newest"));
        assert_eq!(spec.sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_configured_defaults_are_used() {
        let config = QueryConfig {
            default_sort_by: "title".into(),
            default_sort_order: "asc".into(),
        };
        let builder = QueryBuilder::new(&config);

        let spec = builder.build(&QueryParams::new());
        assert_eq!(spec.sort.field, SortField::Title);
        assert_eq!(spec.sort.order, SortOrder::Asc);

        // unknown names fall back to the configured default, not createdAt
        let spec = builder.build(&QueryParams::new().sort_by("nope"));
        assert_eq!(spec.sort.field, SortField::Title);
    }

    #[test]
    fn test_build_is_deterministic() {
        let params = QueryParams::new()
            .search("Le Guin")
            .status(ReadingStatus::Read)
            .genre("fantasy")
            .year_from(1960)
            .year_to(1980)
            .sort_by("rating")
            .sort_order("desc");
        let builder = QueryBuilder::default();

        let first = serde_json::to_string(&builder.build(&params)).unwrap();
        let second = serde_json::to_string(&builder.build(&params)).unwrap();
        let fresh = serde_json::to_string(&QueryBuilder::default().build(&params)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }

    #[test]
    fn test_needles_are_stored_lowercase() {
        let spec = build(QueryParams::new().genre("  Science Fiction "));
        assert_eq!(
            spec.filter,
            vec![Predicate::Contains {
                field: TextField::Genre,
                needle: "science fiction".into()
            }]
        );
    }
}
