use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Shelf category. The five preset names come from the add-book form;
/// anything else typed by hand is kept verbatim.
///
/// Categories compare by their text, so `Other("Fiction")` equals `Fiction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Engineering,
    Fiction,
    Science,
    History,
    Business,
    Other(String),
}

impl Category {
    pub const PRESETS: [Category; 5] = [
        Category::Engineering,
        Category::Fiction,
        Category::Science,
        Category::History,
        Category::Business,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Engineering => "Engineering",
            Category::Fiction => "Fiction",
            Category::Science => "Science",
            Category::History => "History",
            Category::Business => "Business",
            Category::Other(name) => name,
        }
    }

    pub fn is_preset(&self) -> bool {
        Category::PRESETS.iter().any(|preset| preset == self)
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "Engineering" => Category::Engineering,
            "Fiction" => Category::Fiction,
            "Science" => Category::Science,
            "History" => Category::History,
            "Business" => Category::Business,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(Category::from(value.as_str()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_and_free_text() {
        assert_eq!(Category::from("Science"), Category::Science);
        assert!(Category::from("Science").is_preset());

        let poetry = Category::from("Poetry");
        assert_eq!(poetry, Category::Other("Poetry".to_string()));
        assert_eq!(poetry.to_string(), "Poetry");
        assert!(!poetry.is_preset());
    }

    #[test]
    fn test_equality_follows_text() {
        let spelled_out = Category::Other("Fiction".to_string());
        assert_eq!(spelled_out, Category::Fiction);
        assert_eq!(Category::from(spelled_out.as_str()), spelled_out);
        assert!(spelled_out.is_preset());

        let mut seen = std::collections::HashSet::new();
        seen.insert(Category::History);
        assert!(!seen.insert(Category::Other("History".to_string())));
    }

    #[test]
    fn test_preset_names_are_case_sensitive() {
        assert_eq!(
            Category::from("fiction"),
            Category::Other("fiction".to_string())
        );
    }
}
