use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer flush failed: {0}")]
    CsvFlush(#[from] csv::IntoInnerError<csv::Writer<Vec<u8>>>),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
