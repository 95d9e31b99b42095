//! Price-targeted search command implementation.

use crate::ah::{AhClient, PriceSearchResult, ProductCatalog};
use crate::config::{Config, OutputFormat};
use crate::format::Formatter;
use anyhow::{bail, Context, Result};
use tracing::info;

/// Searches for products priced close to a target price.
pub struct PriceCommand {
    config: Config,
}

impl PriceCommand {
    /// Creates a new price command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Tolerance used when none is given on the command line.
    pub fn default_tolerance(&self) -> f64 {
        self.config.tolerance
    }

    /// Executes the price search and returns formatted output.
    pub async fn execute(&self, query: &str, target_price: f64, tolerance: f64) -> Result<String> {
        let client = AhClient::new(&self.config).await.context("Failed to authenticate")?;

        self.execute_with_client(&client, query, target_price, tolerance).await
    }

    /// Executes the price search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ProductCatalog,
        query: &str,
        target_price: f64,
        tolerance: f64,
    ) -> Result<String> {
        if !target_price.is_finite() || !tolerance.is_finite() {
            bail!("Price and tolerance must be finite numbers");
        }
        if tolerance < 0.0 {
            bail!("Tolerance must not be negative: {}", tolerance);
        }

        let results = client.search_products_by_price(query, target_price, tolerance).await;
        if let Some(error) = &results.error {
            bail!("Search for '{}' failed: {}", query, error);
        }

        info!(
            "{} products for '{}' within €{:.2} of €{:.2}",
            results.total_count, query, tolerance, target_price
        );

        self.render(&results)
    }

    fn render(&self, results: &PriceSearchResult) -> Result<String> {
        let formatter = Formatter::new(self.config.format);
        let heading = format!(
            "'{}' around €{:.2} (± €{:.2})",
            results.original_query, results.target_price, results.tolerance
        );

        Ok(match self.config.format {
            OutputFormat::Json => serde_json::to_string_pretty(results)?,
            OutputFormat::Table if results.is_empty() => {
                format!("No products found for {}", heading)
            }
            OutputFormat::Table => format!(
                "Found {} products for {}:\n\n{}",
                results.total_count,
                heading,
                formatter.format_products(&results.products)
            ),
            OutputFormat::Markdown => format!(
                "# Price search: {}\n\n{}",
                heading,
                formatter.format_products(&results.products)
            ),
            OutputFormat::Csv => formatter.format_products(&results.products),
        })
    }
}
