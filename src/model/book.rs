use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::loan::{format_issued_at, issued_at_serde};
use super::{BookStatus, Category, Loan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub category: Category,
    pub status: BookStatus,
    pub borrower: Option<String>,
    #[serde(with = "issued_at_serde")]
    pub issued_at: Option<NaiveDateTime>,
}

impl BookRecord {
    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn is_issued(&self) -> bool {
        self.status == BookStatus::Issued
    }

    pub fn loan(&self) -> Option<Loan> {
        match (&self.borrower, self.issued_at) {
            (Some(borrower), Some(issued_at)) if self.is_issued() => {
                Some(Loan::new(borrower.clone(), issued_at))
            }
            _ => None,
        }
    }

    /// Text of every field, in column order. Missing values are empty strings.
    pub fn field_texts(&self) -> [String; 7] {
        [
            self.id.clone(),
            self.title.clone(),
            self.author.clone().unwrap_or_default(),
            self.category.to_string(),
            self.status.to_string(),
            self.borrower.clone().unwrap_or_default(),
            self.issued_at.as_ref().map(format_issued_at).unwrap_or_default(),
        ]
    }

    /// Human label for pick lists. Never parse an id back out of it.
    pub fn display_label(&self) -> String {
        match &self.borrower {
            Some(borrower) if self.is_issued() => {
                format!("{} - {} (Borrowed by: {})", self.id, self.title, borrower)
            }
            _ => format!("{} - {}", self.id, self.title),
        }
    }
}

/// Input for adding a book to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub category: Category,
}

impl NewBook {
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: None,
            category,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        self.author = if author.trim().is_empty() {
            None
        } else {
            Some(author)
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_issued_at;

    fn issued_book() -> BookRecord {
        BookRecord {
            id: "BK001".to_string(),
            title: "Clean Code".to_string(),
            author: Some("R. Martin".to_string()),
            category: Category::Engineering,
            status: BookStatus::Issued,
            borrower: Some("jdoe".to_string()),
            issued_at: Some(parse_issued_at("2024-01-01 10:00").unwrap()),
        }
    }

    #[test]
    fn test_loan_present_only_when_issued() {
        let book = issued_book();
        let loan = book.loan().unwrap();
        assert_eq!(loan.borrower, "jdoe");

        let returned = BookRecord {
            status: BookStatus::Available,
            borrower: None,
            issued_at: None,
            ..book
        };
        assert!(returned.loan().is_none());
    }

    #[test]
    fn test_field_texts() {
        let mut book = issued_book();
        book.author = None;
        assert_eq!(
            book.field_texts(),
            [
                "BK001",
                "Clean Code",
                "",
                "Engineering",
                "Issued",
                "jdoe",
                "2024-01-01 10:00"
            ]
            .map(String::from)
        );
    }

    #[test]
    fn test_display_label() {
        let book = issued_book();
        assert_eq!(
            book.display_label(),
            "BK001 - Clean Code (Borrowed by: jdoe)"
        );
    }

    #[test]
    fn test_blank_author_is_none() {
        let book = NewBook::new("BK9", "Title", Category::Fiction).with_author("  ");
        assert_eq!(book.author, None);
    }

    #[test]
    fn test_json_uses_stored_date_layout() {
        let json = serde_json::to_string(&issued_book()).unwrap();
        assert!(json.contains("\"issued_at\":\"2024-01-01 10:00\""));
        assert!(json.contains("\"category\":\"Engineering\""));
        let back: BookRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, issued_book());
    }
}
