pub mod book;
pub mod category;
pub mod loan;
pub mod status;

pub use book::*;
pub use category::*;
pub use loan::*;
pub use status::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown book status: {0}")]
    UnknownStatus(String),
    #[error("timestamp is not in YYYY-MM-DD HH:MM form: {0}")]
    InvalidTimestamp(String),
}
