//! Schema rules for book payloads.
//!
//! [`validate`] walks every field and reports all violations at once, so a
//! client can fix a form in a single round trip. A successful result is the
//! normalized [`BookInput`] that the store persists verbatim.

use std::ops::RangeInclusive;

use serde::Serialize;
use serde_json::{Map, Value};

use super::models::{BookInput, BookStatus};

pub const RATING_RANGE: RangeInclusive<i64> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingField,
    InvalidEnum,
    OutOfRange,
    TypeMismatch,
}

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            field,
            message: message.into(),
        }
    }
}

/// Validate an arbitrary JSON value as a book payload.
///
/// `id`, `createdAt`, `updatedAt` and unknown keys are ignored.
pub fn validate(input: &Value) -> Result<BookInput, Vec<Violation>> {
    let Some(object) = input.as_object() else {
        return Err(vec![Violation::new(
            ViolationKind::TypeMismatch,
            "body",
            "Book payload must be a JSON object",
        )]);
    };

    let mut violations = Vec::new();

    let title = required_text(object, "title", "Title", &mut violations);
    let author = required_text(object, "author", "Author", &mut violations);
    let genre = optional_text(object, "genre", &mut violations).map(|genre| genre.trim().to_string());
    let status = optional_status(object, &mut violations);
    let rating = optional_rating(object, &mut violations);
    let notes = optional_text(object, "notes", &mut violations);

    match (title, author) {
        (Some(title), Some(author)) if violations.is_empty() => Ok(BookInput {
            title,
            author,
            genre,
            status,
            rating,
            notes,
        }),
        _ => Err(violations),
    }
}

fn required_text(
    object: &Map<String, Value>,
    field: &'static str,
    label: &str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            violations.push(Violation::new(
                ViolationKind::MissingField,
                field,
                format!("{label} is required"),
            ));
            None
        }
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                violations.push(Violation::new(
                    ViolationKind::MissingField,
                    field,
                    format!("{label} is required"),
                ));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            violations.push(type_mismatch(field, "a string"));
            None
        }
    }
}

/// Blank text counts as absent.
fn optional_text(
    object: &Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.trim().is_empty() => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            violations.push(type_mismatch(field, "a string"));
            None
        }
    }
}

fn optional_status(
    object: &Map<String, Value>,
    violations: &mut Vec<Violation>,
) -> Option<BookStatus> {
    match object.get("status") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => match text.parse::<BookStatus>() {
            Ok(status) => Some(status),
            Err(_) => {
                let allowed: Vec<&str> = BookStatus::ALL.iter().map(|s| s.as_str()).collect();
                violations.push(Violation::new(
                    ViolationKind::InvalidEnum,
                    "status",
                    format!("status must be one of {}", allowed.join(", ")),
                ));
                None
            }
        },
        Some(_) => {
            violations.push(type_mismatch("status", "a string"));
            None
        }
    }
}

fn optional_rating(object: &Map<String, Value>, violations: &mut Vec<Violation>) -> Option<u8> {
    let number = match object.get("rating") {
        None | Some(Value::Null) => return None,
        Some(Value::Number(number)) => number,
        Some(_) => {
            violations.push(type_mismatch("rating", "a whole number"));
            return None;
        }
    };

    // `5.0` is accepted as 5; float-to-int casts saturate, so huge values
    // still land outside the range.
    let whole = number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|value| value.is_finite() && value.fract() == 0.0)
            .map(|value| value as i64)
    });

    match whole {
        Some(value) if RATING_RANGE.contains(&value) => u8::try_from(value).ok(),
        Some(_) => {
            violations.push(Violation::new(
                ViolationKind::OutOfRange,
                "rating",
                format!(
                    "Rating must be between {} and {}",
                    RATING_RANGE.start(),
                    RATING_RANGE.end()
                ),
            ));
            None
        }
        None => {
            violations.push(type_mismatch("rating", "a whole number"));
            None
        }
    }
}

fn type_mismatch(field: &'static str, expected: &str) -> Violation {
    Violation::new(
        ViolationKind::TypeMismatch,
        field,
        format!("{field} must be {expected}"),
    )
}
