//! Finding and reading the files a catalog is built from.

pub mod loader;
pub mod types;

pub use loader::CatalogLoader;
pub use types::{
    CatalogInputs,
    IndexerError,
};
