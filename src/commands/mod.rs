//! CLI command implementations.

pub mod price;
pub mod product;
pub mod search;

pub use price::PriceCommand;
pub use product::ProductCommand;
pub use search::SearchCommand;
