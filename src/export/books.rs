use std::io::Write;

use super::{Export, ExportError};
use crate::model::{format_issued_at, BookRecord};

const MISSING: &str = "N/A";

const CSV_HEADER: [&str; 7] = [
    "id", "title", "author", "category", "status", "borrower", "issued_at",
];

impl Export for [BookRecord] {
    fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        // serialize() only emits the header alongside the first row
        if self.is_empty() {
            wtr.write_record(CSV_HEADER)?;
        }
        for book in self {
            wtr.serialize(book)?;
        }
        Ok(String::from_utf8(wtr.into_inner()?)?)
    }

    fn to_md(&self) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        writeln!(
            buffer,
            "| ID | Title | Author | Category | Status | Borrower | Issued |"
        )?;
        writeln!(
            buffer,
            "|----|-------|--------|----------|--------|----------|--------|"
        )?;
        for book in self {
            writeln!(
                buffer,
                "| {} | {} | {} | {} | {} | {} | {} |",
                escape_cell(&book.id),
                escape_cell(&book.title),
                book.author.as_deref().map_or(MISSING.into(), escape_cell),
                escape_cell(book.category.as_str()),
                book.status,
                book.borrower.as_deref().map_or(MISSING.into(), escape_cell),
                book.issued_at
                    .as_ref()
                    .map_or(MISSING.to_string(), format_issued_at),
            )?;
        }
        Ok(String::from_utf8(buffer)?)
    }

    fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{parse_issued_at, BookStatus, Category};

    fn get_test_books() -> Vec<BookRecord> {
        vec![
            BookRecord {
                id: "BK001".to_string(),
                title: "Clean Code".to_string(),
                author: Some("R. Martin".to_string()),
                category: Category::Engineering,
                status: BookStatus::Available,
                borrower: None,
                issued_at: None,
            },
            BookRecord {
                id: "BK002".to_string(),
                title: "Dune".to_string(),
                author: None,
                category: Category::Other("Sci-Fi".to_string()),
                status: BookStatus::Issued,
                borrower: Some("jdoe".to_string()),
                issued_at: Some(parse_issued_at("2024-01-01 10:00").unwrap()),
            },
        ]
    }

    #[test]
    fn test_books_to_csv() {
        let books = get_test_books();
        let expected = [
            "id,title,author,category,status,borrower,issued_at",
            "BK001,Clean Code,R. Martin,Engineering,Available,,",
            "BK002,Dune,,Sci-Fi,Issued,jdoe,2024-01-01 10:00",
            "",
        ]
        .join("\n");
        assert_eq!(books.to_csv().unwrap(), expected);
    }

    #[test]
    fn test_empty_csv_keeps_header() {
        let books: Vec<BookRecord> = Vec::new();
        assert_eq!(
            books.to_csv().unwrap(),
            "id,title,author,category,status,borrower,issued_at\n"
        );
    }

    #[test]
    fn test_books_to_md() {
        let books = get_test_books();
        let expected = [
            "| ID | Title | Author | Category | Status | Borrower | Issued |",
            "|----|-------|--------|----------|--------|----------|--------|",
            "| BK001 | Clean Code | R. Martin | Engineering | Available | N/A | N/A |",
            "| BK002 | Dune | N/A | Sci-Fi | Issued | jdoe | 2024-01-01 10:00 |",
            "",
        ]
        .join("\n");
        assert_eq!(books.to_md().unwrap(), expected);
    }

    #[test]
    fn test_md_escapes_pipes() {
        let mut books = get_test_books();
        books[0].title = "A | B".to_string();
        assert!(books.to_md().unwrap().contains("| A \\| B |"));
    }

    #[test]
    fn test_books_to_json() {
        let books = get_test_books();
        let expected = serde_json::to_string(&books).unwrap();
        assert_eq!(books.to_json().unwrap(), expected);
    }
}
