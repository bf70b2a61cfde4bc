use crate::model::BookRecord;

/// Case-insensitive substring search over every field of every record.
/// An empty query matches everything.
pub fn search<'a>(books: &'a [BookRecord], query: &str) -> Vec<&'a BookRecord> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|book| {
            needle.is_empty()
                || book
                    .field_texts()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn available(books: &[BookRecord]) -> Vec<&BookRecord> {
    books.iter().filter(|b| b.is_available()).collect()
}

pub fn issued(books: &[BookRecord]) -> Vec<&BookRecord> {
    books.iter().filter(|b| b.is_issued()).collect()
}
