//! Search command implementation.

use crate::ah::{AhClient, Page, ProductCatalog, SearchOptions};
use crate::config::{Config, OutputFormat};
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Executes a product search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds search options from the configured sort order and page size.
    pub fn options(&self) -> SearchOptions {
        let mut options = SearchOptions::new();
        if let Some(sort) = self.config.sort {
            options = options.sort(sort);
        }
        if let Some(size) = self.config.page_size {
            options = options.page(Page::first(size));
        }
        options
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let client = AhClient::new(&self.config).await.context("Failed to authenticate")?;

        self.execute_with_client(&client, query).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: &impl ProductCatalog,
        query: &str,
    ) -> Result<String> {
        let options = self.options();
        debug!("Search options: {:?}", options);

        let results = client
            .try_search_products(query, &options)
            .await
            .with_context(|| format!("Search for '{}' failed", query))?;

        info!("Found {} products ({:?} total)", results.products.len(), results.total_found);

        let formatter = Formatter::new(self.config.format);
        Ok(match self.config.format {
            OutputFormat::Json => serde_json::to_string_pretty(&results)?,
            OutputFormat::Table if results.is_empty() => {
                format!("No products found for '{}'", query)
            }
            OutputFormat::Table => format!(
                "Found {} products for '{}':\n\n{}",
                results.products.len(),
                query,
                formatter.format_products(&results.products)
            ),
            OutputFormat::Markdown => format!(
                "# Search: {}\n\n{}",
                query,
                formatter.format_products(&results.products)
            ),
            OutputFormat::Csv => formatter.format_products(&results.products),
        })
    }
}
