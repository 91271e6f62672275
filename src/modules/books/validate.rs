//! Validation rule set for book input.
//!
//! Two intents: create (all fields required) and update (all fields
//! optional). Both map a raw JSON object to either a normalized struct or an
//! ordered, non-empty violation list; the caller must not touch the store on
//! any violation. Create-validation additionally consults currently stored
//! titles through the `title_taken` predicate; uniqueness is deliberately not
//! re-checked on update.

use serde_json::{Map, Value};
use time::macros::format_description;
use time::Date;

use shelf_http::FieldError;

use super::models::{BookPatch, NewBook};

/// The closed set of accepted genres. Exact, case-sensitive match.
pub const GENRES: [&str; 30] = [
    "Fiction",
    "Non-fiction",
    "Mystery",
    "Thriller",
    "Romance",
    "Science Fiction",
    "Fantasy",
    "Horror",
    "Historical Fiction",
    "Biography",
    "Autobiography",
    "Self-help",
    "Young Adult",
    "Children's",
    "Crime",
    "Adventure",
    "Dystopian",
    "Humor",
    "Poetry",
    "Drama",
    "Classics",
    "Contemporary",
    "Literary Fiction",
    "Graphic Novel",
    "Memoir",
    "Travel",
    "True Crime",
    "Philosophy",
    "Psychology",
    "Science",
];

pub const MAX_TEXT_LEN: usize = 255;

/// Field name as it reads in messages ("published_date" -> "published date").
fn label(field: &str) -> String {
    field.replace('_', " ")
}

fn required(field: &str) -> FieldError {
    FieldError::new(field, format!("The {} field is required.", label(field)))
}

fn not_a_string(field: &str) -> FieldError {
    FieldError::new(field, format!("The {} field must be a string.", label(field)))
}

fn too_long(field: &str) -> FieldError {
    FieldError::new(
        field,
        format!(
            "The {} field must not be greater than {MAX_TEXT_LEN} characters.",
            label(field)
        ),
    )
}

fn invalid_date(field: &str) -> FieldError {
    FieldError::new(
        field,
        format!("The {} field must be a valid date.", label(field)),
    )
}

fn invalid_genre() -> FieldError {
    FieldError::new("genre", "The selected genre is invalid.")
}

fn title_taken_error() -> FieldError {
    FieldError::new("title", "The title has already been taken.")
}

fn parse_date(raw: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &format).ok()
}

/// Required non-empty string field. Pushes the first failing rule and
/// returns None, or returns the value.
fn required_string(
    input: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match input.get(field) {
        None | Some(Value::Null) => {
            errors.push(required(field));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(required(field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(not_a_string(field));
            None
        }
    }
}

fn within_max_len(value: String, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    if value.chars().count() > MAX_TEXT_LEN {
        errors.push(too_long(field));
        None
    } else {
        Some(value)
    }
}

/// Create intent: every field required.
///
/// Violations are collected in field order (title, author, published_date,
/// genre), one per field, first failing rule wins.
pub fn validate_create(
    input: &Map<String, Value>,
    title_taken: impl Fn(&str) -> bool,
) -> Result<NewBook, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = required_string(input, "title", &mut errors)
        .and_then(|t| within_max_len(t, "title", &mut errors))
        .and_then(|t| {
            if title_taken(&t) {
                errors.push(title_taken_error());
                None
            } else {
                Some(t)
            }
        });

    let author = required_string(input, "author", &mut errors)
        .and_then(|a| within_max_len(a, "author", &mut errors));

    let published_date = match input.get("published_date") {
        None | Some(Value::Null) => {
            errors.push(required("published_date"));
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            errors.push(required("published_date"));
            None
        }
        Some(Value::String(s)) => match parse_date(s) {
            Some(date) => Some(date),
            None => {
                errors.push(invalid_date("published_date"));
                None
            }
        },
        Some(_) => {
            errors.push(invalid_date("published_date"));
            None
        }
    };

    let genre = required_string(input, "genre", &mut errors).and_then(|g| {
        if GENRES.contains(&g.as_str()) {
            Some(g)
        } else {
            errors.push(invalid_genre());
            None
        }
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    let (Some(title), Some(author), Some(published_date), Some(genre)) =
        (title, author, published_date, genre)
    else {
        // Unreachable: a missing field always pushed an error above.
        return Err(errors);
    };

    Ok(NewBook {
        title,
        author,
        published_date,
        genre,
        publisher: input
            .get("publisher")
            .and_then(Value::as_str)
            .map(str::to_owned),
    })
}

/// Update intent: every field optional; a present field is held to the same
/// rule as on create, except title uniqueness, which only applies at create.
pub fn validate_update(input: &Map<String, Value>) -> Result<BookPatch, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut patch = BookPatch::default();

    if input.contains_key("title") {
        patch.title = required_string(input, "title", &mut errors)
            .and_then(|t| within_max_len(t, "title", &mut errors));
    }

    if input.contains_key("author") {
        patch.author = required_string(input, "author", &mut errors)
            .and_then(|a| within_max_len(a, "author", &mut errors));
    }

    if let Some(value) = input.get("published_date") {
        patch.published_date = match value {
            Value::String(s) if !s.is_empty() => match parse_date(s) {
                Some(date) => Some(date),
                None => {
                    errors.push(invalid_date("published_date"));
                    None
                }
            },
            Value::String(_) | Value::Null => {
                errors.push(required("published_date"));
                None
            }
            _ => {
                errors.push(invalid_date("published_date"));
                None
            }
        };
    }

    if input.contains_key("genre") {
        patch.genre = required_string(input, "genre", &mut errors).and_then(|g| {
            if GENRES.contains(&g.as_str()) {
                Some(g)
            } else {
                errors.push(invalid_genre());
                None
            }
        });
    }

    patch.publisher = input
        .get("publisher")
        .and_then(Value::as_str)
        .map(str::to_owned);

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    fn valid_input() -> Map<String, Value> {
        obj(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "published_date": "1965-08-01",
            "genre": "Science Fiction",
            "publisher": "Chilton Books",
        }))
    }

    #[test]
    fn genre_set_has_thirty_distinct_entries() {
        let mut unique: Vec<&str> = GENRES.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 30);
    }

    #[test]
    fn valid_create_input_normalizes() {
        let book = validate_create(&valid_input(), |_| false).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.publisher.as_deref(), Some("Chilton Books"));
        assert_eq!(book.published_date.to_string(), "1965-08-01");
    }

    #[test]
    fn empty_input_reports_all_required_fields_in_order() {
        let errors = validate_create(&Map::new(), |_| false).unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "author", "published_date", "genre"]);
        assert_eq!(errors[0].message, "The title field is required.");
        assert_eq!(errors[2].message, "The published date field is required.");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let input = obj(json!({
            "title": "",
            "author": "",
            "published_date": "",
            "genre": "",
        }));
        let errors = validate_create(&input, |_| false).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.message.ends_with("is required.")));
    }

    #[test]
    fn taken_title_is_rejected_on_create() {
        let errors = validate_create(&valid_input(), |t| t == "Dune").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "The title has already been taken.");
    }

    #[test]
    fn unknown_genre_is_rejected() {
        let mut input = valid_input();
        input.insert("genre".to_string(), json!("Not-A-Genre"));

        let errors = validate_create(&input, |_| false).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "genre");
        assert_eq!(errors[0].message, "The selected genre is invalid.");
    }

    #[test]
    fn genre_match_is_case_sensitive() {
        let mut input = valid_input();
        input.insert("genre".to_string(), json!("science fiction"));

        let errors = validate_create(&input, |_| false).unwrap_err();
        assert_eq!(errors[0].field, "genre");
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut input = valid_input();
        input.insert("title".to_string(), json!("x".repeat(256)));

        let errors = validate_create(&input, |_| false).unwrap_err();
        assert_eq!(errors[0].field, "title");
        assert!(errors[0].message.contains("255"));
    }

    #[test]
    fn title_of_exactly_255_chars_passes() {
        let mut input = valid_input();
        input.insert("title".to_string(), json!("x".repeat(255)));

        assert!(validate_create(&input, |_| false).is_ok());
    }

    #[test]
    fn non_string_fields_are_rejected() {
        let mut input = valid_input();
        input.insert("author".to_string(), json!(42));
        input.insert("published_date".to_string(), json!(2020));

        let errors = validate_create(&input, |_| false).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["author", "published_date"]);
        assert_eq!(errors[0].message, "The author field must be a string.");
        assert_eq!(
            errors[1].message,
            "The published date field must be a valid date."
        );
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let mut input = valid_input();
        input.insert("published_date".to_string(), json!("August 1st, 1965"));

        let errors = validate_create(&input, |_| false).unwrap_err();
        assert_eq!(errors[0].field, "published_date");
    }

    #[test]
    fn update_with_no_fields_is_an_empty_patch() {
        let patch = validate_update(&Map::new()).unwrap();
        assert_eq!(patch, BookPatch::default());
    }

    #[test]
    fn update_validates_only_supplied_fields() {
        let patch = validate_update(&obj(json!({ "author": "New Name" }))).unwrap();
        assert_eq!(patch.author.as_deref(), Some("New Name"));
        assert!(patch.title.is_none());
        assert!(patch.genre.is_none());
        assert!(patch.published_date.is_none());
    }

    #[test]
    fn update_rejects_bad_values_for_supplied_fields() {
        let errors = validate_update(&obj(json!({ "genre": "Not-A-Genre" }))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "genre");
    }

    #[test]
    fn update_does_not_check_title_uniqueness() {
        // Uniqueness is enforced only at create; an update may set any title.
        let patch = validate_update(&obj(json!({ "title": "Dune" }))).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Dune"));
    }
}
