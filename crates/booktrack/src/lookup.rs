//! # Catalog Lookup Results
//!
//! Users often start a new entry by searching a public catalog (Google Books)
//! instead of typing every field. The network request is the caller's business;
//! this module maps the catalog's `volumeInfo` document into a [`LookupResult`]
//! and merges it into the raw input of a create or update request.
//!
//! ## Mapping
//!
//! | `volumeInfo` | Field | Notes |
//! |--------------|-------|-------|
//! | `title` | `title` | |
//! | `authors[]` | `author` | joined with `", "` |
//! | `industryIdentifiers[]` | `isbn` | `ISBN_13` preferred, then `ISBN_10` |
//! | `pageCount` | `pageCount` | `0` means unknown |
//! | `description` | `description` | |
//! | `imageLinks.thumbnail` | `coverImageUrl` | `http:` upgraded to `https:` |
//! | `publishedDate` | `publicationDate` | kept as text (`2004`, `2004-05`, `2004-05-17`) |
//!
//! ## Merging
//!
//! [`LookupResult::merge_into`] only fills keys the caller left absent, `null` or
//! blank: whatever the user typed wins. The merged map is then validated like
//! any other input, so nothing here is trusted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::RawFields;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
}

impl LookupResult {
    /// Maps one Google Books `volumeInfo` object. Missing or mistyped entries
    /// are simply left out.
    pub fn from_volume_info(info: &Value) -> Self {
        let text = |key: &str| {
            info.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let author = info
            .get("authors")
            .and_then(Value::as_array)
            .map(|authors| {
                authors
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|a| !a.is_empty());

        let page_count = info
            .get("pageCount")
            .and_then(Value::as_u64)
            .filter(|&n| n > 0)
            .and_then(|n| u32::try_from(n).ok());

        let cover_image_url = info
            .get("imageLinks")
            .and_then(|links| links.get("thumbnail"))
            .and_then(Value::as_str)
            .map(upgrade_to_https);

        Self {
            title: text("title"),
            author,
            isbn: isbn(info),
            page_count,
            description: text("description"),
            cover_image_url,
            publication_date: text("publishedDate"),
        }
    }

    /// Fills absent or blank keys of `raw` from this result.
    pub fn merge_into(&self, raw: &mut RawFields) {
        let text_fields = [
            ("title", &self.title),
            ("author", &self.author),
            ("isbn", &self.isbn),
            ("description", &self.description),
            ("coverImageUrl", &self.cover_image_url),
            ("publicationDate", &self.publication_date),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                fill(raw, key, Value::String(value.clone()));
            }
        }
        if let Some(pages) = self.page_count {
            fill(raw, "pageCount", Value::from(pages));
        }
    }
}

fn fill(raw: &mut RawFields, key: &str, value: Value) {
    let blank = match raw.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if blank {
        raw.insert(key.to_string(), value);
    }
}

fn isbn(info: &Value) -> Option<String> {
    let ids = info.get("industryIdentifiers")?.as_array()?;
    let find = |kind: &str| {
        ids.iter()
            .find(|id| id.get("type").and_then(Value::as_str) == Some(kind))
            .and_then(|id| id.get("identifier"))
            .and_then(Value::as_str)
            .map(String::from)
    };
    find("ISBN_13").or_else(|| find("ISBN_10"))
}

fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http:") {
        Some(rest) => format!("https:{}", rest),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_fields;
    use serde_json::json;

    fn dune_volume() -> Value {
        json!({
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "publishedDate": "1990-09-01",
            "description": "Set on the desert planet Arrakis...",
            "industryIdentifiers": [
                { "type": "ISBN_10", "identifier": "0441172717" },
                { "type": "ISBN_13", "identifier": "9780441172719" }
            ],
            "pageCount": 535,
            "imageLinks": {
                "smallThumbnail": "http://books.google.com/small",
                "thumbnail": "http://books.google.com/thumb"
            }
        })
    }

    #[test]
    fn test_maps_volume_info() {
        let result = LookupResult::from_volume_info(&dune_volume());
        assert_eq!(
            result,
            LookupResult {
                title: Some("Dune".into()),
                author: Some("Frank Herbert".into()),
                isbn: Some("9780441172719".into()),
                page_count: Some(535),
                description: Some("Set on the desert planet Arrakis...".into()),
                cover_image_url: Some("https://books.google.com/thumb".into()),
                publication_date: Some("1990-09-01".into()),
            }
        );
    }

    #[test]
    fn test_joins_multiple_authors() {
        let info = json!({ "authors": ["Terry Pratchett", "Neil Gaiman"] });
        let result = LookupResult::from_volume_info(&info);
        assert_eq!(result.author.as_deref(), Some("Terry Pratchett, Neil Gaiman"));
    }

    #[test]
    fn test_falls_back_to_isbn_10() {
        let info = json!({
            "industryIdentifiers": [
                { "type": "OTHER", "identifier": "OCLC:123" },
                { "type": "ISBN_10", "identifier": "0441172717" }
            ]
        });
        let result = LookupResult::from_volume_info(&info);
        assert_eq!(result.isbn.as_deref(), Some("0441172717"));
    }

    #[test]
    fn test_zero_page_count_is_unknown() {
        let result = LookupResult::from_volume_info(&json!({ "pageCount": 0 }));
        assert_eq!(result.page_count, None);
    }

    #[test]
    fn test_empty_volume_maps_to_nothing() {
        assert_eq!(
            LookupResult::from_volume_info(&json!({})),
            LookupResult::default()
        );
    }

    #[test]
    fn test_merge_keeps_user_input() {
        let mut raw = json!({
            "title": "Dune (annotated)",
            "author": "  ",
            "genre": "Science Fiction",
            "year": 1965,
            "isbn": null
        })
        .as_object()
        .cloned()
        .unwrap();

        LookupResult::from_volume_info(&dune_volume()).merge_into(&mut raw);

        assert_eq!(raw["title"], "Dune (annotated)");
        assert_eq!(raw["author"], "Frank Herbert");
        assert_eq!(raw["isbn"], "9780441172719");
        assert_eq!(raw["pageCount"], 535);
        assert_eq!(raw["genre"], "Science Fiction");
    }

    #[test]
    fn test_merged_input_validates() {
        let mut raw = json!({ "genre": "Science Fiction", "year": 1965 })
            .as_object()
            .cloned()
            .unwrap();
        LookupResult::from_volume_info(&dune_volume()).merge_into(&mut raw);

        let fields = validate_fields(&raw).unwrap();
        assert_eq!(fields.title, "Dune");
        assert_eq!(fields.page_count, Some(535));
        assert_eq!(
            fields.publication_date,
            crate::validation::parse_date("1990-09-01")
        );
    }
}
