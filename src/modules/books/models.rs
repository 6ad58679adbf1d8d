use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A catalog entry. `id` is assigned by storage and immutable afterwards.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub author: String,
    pub year_published: i64,
    pub book_type: String,
}

/// Loan-duration tag attached to every book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookType {
    TwoDays,
    FiveDays,
    TenDays,
}

impl BookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookType::TwoDays => "2days",
            BookType::FiveDays => "5days",
            BookType::TenDays => "10days",
        }
    }
}

impl FromStr for BookType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2days" => Ok(BookType::TwoDays),
            "5days" => Ok(BookType::FiveDays),
            "10days" => Ok(BookType::TenDays),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated create/edit payload, ready for persistence.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub name: String,
    pub author: String,
    pub year_published: i64,
    pub book_type: BookType,
}

/// Raw create/edit form as submitted by the client.
///
/// Every field is optional and `year_published` stays a raw JSON value so
/// that any malformed shape reaches the validation path instead of a
/// deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year_published: Option<Value>,
    #[serde(default)]
    pub book_type: Option<String>,
}

/// Characters allowed in a book name besides letters, digits, and
/// whitespace. Markup and quoting metacharacters are deliberately absent.
const NAME_EXTRA_CHARS: &[char] = &['-', '_', '.', ',', ':', '!', '?', '(', ')'];

fn name_is_clean(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace() || NAME_EXTRA_CHARS.contains(&c))
}

impl BookForm {
    /// Validate the form, producing a [`NewBook`] or per-field details
    /// suitable for an error response.
    pub fn validate(&self) -> Result<NewBook, Vec<Value>> {
        let mut details = Vec::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            details.push(json!({"field": "name", "error": "required"}));
        } else if !name_is_clean(name) {
            details.push(json!({"field": "name", "error": "contains forbidden characters"}));
        }

        let author = self.author.as_deref().map(str::trim).unwrap_or_default();
        if author.is_empty() {
            details.push(json!({"field": "author", "error": "required"}));
        }

        let year_published = match &self.year_published {
            Some(Value::Number(n)) if n.as_i64().is_some() => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if year_published.is_none() {
            details.push(json!({"field": "year_published", "error": "must be an integer"}));
        }

        let book_type = self
            .book_type
            .as_deref()
            .and_then(|s| BookType::from_str(s).ok());
        if book_type.is_none() {
            details.push(json!({"field": "book_type", "error": "must be one of 2days/5days/10days"}));
        }

        match (year_published, book_type) {
            (Some(year_published), Some(book_type)) if details.is_empty() => Ok(NewBook {
                name: name.to_string(),
                author: author.to_string(),
                year_published,
                book_type,
            }),
            _ => Err(details),
        }
    }
}
