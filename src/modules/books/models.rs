use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A catalog entry. `id` and `created_at` are assigned at creation and never
/// change; everything else is mutable through the update operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Opaque UUIDv7 token, generated at creation
    pub id: String,
    /// Unique across the store, case-sensitive
    pub title: String,
    pub author: String,
    #[serde(with = "iso_date")]
    pub published_date: Date,
    /// Member of the closed genre set at the time of the write that set it
    pub genre: String,
    /// Free-form, never validated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Normalized output of create-validation: every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_date: Date,
    pub genre: String,
    pub publisher: Option<String>,
}

/// Normalized output of update-validation: only the supplied fields.
/// Absent fields are left untouched by the merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_date: Option<Date>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn sample_book() -> Book {
        Book {
            id: "0190a8c0-0000-7000-8000-000000000000".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            published_date: date!(1965 - 08 - 01),
            genre: "Science Fiction".to_string(),
            publisher: None,
            created_at: datetime!(2024-01-01 00:00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00:00 UTC),
        }
    }

    #[test]
    fn published_date_serializes_as_iso_date() {
        let value = serde_json::to_value(sample_book()).unwrap();
        assert_eq!(value["published_date"], "1965-08-01");
    }

    #[test]
    fn timestamps_serialize_as_rfc3339() {
        let value = serde_json::to_value(sample_book()).unwrap();
        assert_eq!(value["created_at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn absent_publisher_is_omitted() {
        let value = serde_json::to_value(sample_book()).unwrap();
        assert!(value.get("publisher").is_none());

        let mut book = sample_book();
        book.publisher = Some("Chilton Books".to_string());
        let value = serde_json::to_value(book).unwrap();
        assert_eq!(value["publisher"], "Chilton Books");
    }
}
