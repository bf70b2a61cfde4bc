pub mod books;
pub mod error;

pub use error::ExportError;

/// Renders a slice of records as text.
pub trait Export {
    fn to_csv(&self) -> Result<String, ExportError>;
    fn to_md(&self) -> Result<String, ExportError>;
    fn to_json(&self) -> Result<String, ExportError>;
}
