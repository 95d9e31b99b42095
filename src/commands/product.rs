//! Product lookup command implementation.

use crate::ah::{AhClient, ProductCatalog};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Executes a product lookup by webshop id.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches a product by id and returns formatted output.
    pub async fn execute(&self, id: i64) -> Result<String> {
        let client = AhClient::new(&self.config).await.context("Failed to authenticate")?;

        self.execute_with_client(&client, id).await
    }

    /// Fetches a product with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ProductCatalog,
        id: i64,
    ) -> Result<String> {
        info!("Looking up product: {}", id);

        let product = client
            .try_get_product(id)
            .await
            .with_context(|| format!("Failed to fetch product {}", id))?;

        match product {
            Some(product) => Ok(Formatter::new(self.config.format).format_product(&product)),
            None => Ok(format!("Product with ID {} not found", id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ah::{ApiError, Product, SearchOptions, SearchResult};
    use crate::config::OutputFormat;
    use async_trait::async_trait;
    use serde_json::json;

    /// Mock catalog holding a fixed set of products.
    struct MockCatalog {
        products: Vec<Product>,
        should_fail: bool,
    }

    impl MockCatalog {
        fn new(products: Vec<Product>) -> Self {
            Self { products, should_fail: false }
        }

        fn failing() -> Self {
            Self { products: Vec::new(), should_fail: true }
        }
    }

    #[async_trait]
    impl ProductCatalog for MockCatalog {
        async fn try_search_products(
            &self,
            _query: &str,
            _options: &SearchOptions,
        ) -> Result<SearchResult, ApiError> {
            Ok(SearchResult::default())
        }

        async fn try_get_product(&self, id: i64) -> Result<Option<Product>, ApiError> {
            if self.should_fail {
                return Err(ApiError::Status { status: 503, url: "/graphql".to_string() });
            }
            Ok(self.products.iter().find(|p| p.id == id).cloned())
        }
    }

    fn make_product() -> Product {
        serde_json::from_value(json!({
            "id": 441199,
            "title": "AH Halfvolle melk",
            "brand": "AH",
            "summary": "Verse halfvolle melk",
            "priceV2": { "now": { "amount": 1.09, "formattedV2": "€ 1,09" } },
            "images": [{ "url": "https://static.ah.nl/melk.jpg" }]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_product_command_basic() {
        let client = MockCatalog::new(vec![make_product()]);
        let cmd = ProductCommand::new(Config::default());

        let output = cmd.execute_with_client(&client, 441199).await.unwrap();
        assert!(output.contains("ID:      441199"));
        assert!(output.contains("Title:   AH Halfvolle melk"));
        assert!(output.contains("Price:   € 1,09"));
    }

    #[tokio::test]
    async fn test_product_command_not_found() {
        let client = MockCatalog::new(vec![make_product()]);
        let cmd = ProductCommand::new(Config::default());

        let output = cmd.execute_with_client(&client, 999).await.unwrap();
        assert_eq!(output, "Product with ID 999 not found");
    }

    #[tokio::test]
    async fn test_product_command_failure_propagates() {
        let client = MockCatalog::failing();
        let cmd = ProductCommand::new(Config::default());

        let err = cmd.execute_with_client(&client, 441199).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to fetch product 441199"));
        assert!(message.contains("status: 503"));
    }

    #[tokio::test]
    async fn test_product_command_json_format() {
        let client = MockCatalog::new(vec![make_product()]);
        let config = Config { format: OutputFormat::Json, ..Config::default() };
        let cmd = ProductCommand::new(config);

        let output = cmd.execute_with_client(&client, 441199).await.unwrap();
        assert!(output.starts_with('{'));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["id"], json!(441199));
        assert_eq!(value["summary"], json!("Verse halfvolle melk"));
    }

    #[tokio::test]
    async fn test_product_command_markdown_format() {
        let client = MockCatalog::new(vec![make_product()]);
        let config = Config { format: OutputFormat::Markdown, ..Config::default() };
        let cmd = ProductCommand::new(config);

        let output = cmd.execute_with_client(&client, 441199).await.unwrap();
        assert!(output.contains("## AH Halfvolle melk"));
        assert!(output.contains("**ID:** 441199"));
    }
}
