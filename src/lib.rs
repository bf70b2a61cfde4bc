pub mod export;
pub mod model;
pub mod search;
pub mod statistics;
pub mod store;

pub use export::{Export, ExportError};
pub use model::*;
pub use search::*;
pub use statistics::*;
pub use store::{CatalogStore, StoreError};
