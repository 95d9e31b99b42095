//! Albert Heijn API client, queries, and data models.

pub mod client;
pub mod error;
pub mod models;
pub mod queries;

pub use client::{AccessToken, AhClient, ProductCatalog};
pub use error::ApiError;
pub use models::{
    Page, PriceSearchResult, Product, SearchOptions, SearchResult, SortType, DEFAULT_TOLERANCE,
};
