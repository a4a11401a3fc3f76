//! Catalog data model shared by the assembler and the emitters

pub mod catalog;

pub use catalog::{Catalog, CatalogItem, CatalogStats, Category, Entry, Movie, Season, Series};
