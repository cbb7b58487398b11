//! Catalog read path: product metadata composed with availability.
//!
//! Product metadata is an external collaborator here; the core neither
//! validates nor caches it. The only inventory involvement is consuming
//! availability snapshots for display.

pub mod product;
pub mod read_path;

pub use product::{InMemoryCatalog, ProductCatalog, ProductSummary};
pub use read_path::{CatalogReadPath, ProductView};
