//! Catalog snapshots, reference graph and data sources
//!
//! This crate handles:
//! - Parsing catalog snapshots (inventory + recipes JSON)
//! - Id-indexed catalogs with stable insertion order
//! - Building the sub-recipe reference graph
//! - Impact analysis (which recipes a change reaches)
//! - The data-source seam the catalogs are loaded through

pub mod catalog;
pub mod graph;
pub mod source;
pub mod fixture;

pub use catalog::{Catalog, CatalogEntry, Catalogs, InventoryCatalog, RecipeCatalog, Snapshot};
pub use graph::{RecipeGraph, RecipeId};
pub use source::{CatalogSource, JsonFileSource, SourceError};
pub use fixture::FixtureSource;
