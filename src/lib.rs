//! ah-client - Albert Heijn product search client
//!
//! An async client for the Albert Heijn mobile GraphQL API with
//! anonymous authentication, product search, and price-targeted search.

pub mod ah;
pub mod commands;
pub mod config;
pub mod filters;
pub mod format;

pub use ah::{
    AhClient, ApiError, PriceSearchResult, Product, ProductCatalog, SearchOptions, SearchResult,
    SortType,
};
pub use config::Config;
