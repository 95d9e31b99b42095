//! HTTP client for the Albert Heijn GraphQL API.

use super::error::ApiError;
use super::models::{
    PriceSearchResult, Product, SearchInput, SearchOptions, SearchPayload, SearchResult,
};
use super::queries;
use crate::config::Config;
use crate::filters::{Filter, PriceFilter};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

pub const AUTH_PATH: &str = "/mobile-auth/v1/auth/token/anonymous";
pub const GRAPHQL_PATH: &str = "/graphql";

/// Catalog operations - enables mocking for tests.
///
/// Implementors provide the fallible `try_*` lookups. The provided methods layer
/// the catch policies on top: search degrades to an error-shaped result, product
/// lookup degrades to `None`.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Searches products, propagating any failure.
    async fn try_search_products(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResult, ApiError>;

    /// Fetches a product by id. `Ok(None)` means the product does not exist.
    async fn try_get_product(&self, id: i64) -> Result<Option<Product>, ApiError>;

    /// Searches products. Never fails; errors are reported in `SearchResult::error`.
    async fn search_products(&self, query: &str, options: &SearchOptions) -> SearchResult {
        match self.try_search_products(query, options).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                SearchResult::failed(e.to_string())
            }
        }
    }

    /// Fetches a product by id. Errors and missing products both yield `None`.
    async fn get_product(&self, id: i64) -> Option<Product> {
        match self.try_get_product(id).await {
            Ok(product) => product,
            Err(e) => {
                warn!("Product lookup for {} failed: {}", id, e);
                None
            }
        }
    }

    /// Searches products and keeps those priced within `tolerance` of `target_price`.
    async fn search_products_by_price(
        &self,
        query: &str,
        target_price: f64,
        tolerance: f64,
    ) -> PriceSearchResult {
        let results = self.search_products(query, &SearchOptions::default()).await;
        let filter = PriceFilter::around(target_price, tolerance);
        let products = filter.apply(results.products);

        debug!("{} products within {}", products.len(), filter.description());

        PriceSearchResult {
            total_count: products.len() as u64,
            products,
            original_query: query.to_string(),
            target_price,
            tolerance,
            error: results.error,
        }
    }
}

/// Bearer token issued by the anonymous auth endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// Albert Heijn API client.
///
/// The token is held as an explicit field and attached to each GraphQL request;
/// the underlying transport carries no default auth header.
pub struct AhClient {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    user_agent: Option<String>,
    token: Option<AccessToken>,
}

impl AhClient {
    /// Creates a client and authenticates it.
    pub async fn new(config: &Config) -> Result<Self, ApiError> {
        let mut client = Self::unauthenticated(config)?;
        client.authenticate().await?;
        Ok(client)
    }

    /// Creates a client without contacting the API.
    pub fn unauthenticated(config: &Config) -> Result<Self, ApiError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            user_agent: config.user_agent.clone(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Obtains an anonymous access token. Does nothing if one is already held.
    pub async fn authenticate(&mut self) -> Result<(), ApiError> {
        if self.token.is_some() {
            debug!("Already authenticated");
            return Ok(());
        }

        let url = format!("{}{}", self.base_url, AUTH_PATH);
        let body = TokenRequest { client_id: &self.client_id, client_secret: &self.client_secret };

        info!("Requesting anonymous access token");
        let response: TokenResponse =
            serde_json::from_value(self.post_json(&url, &body, None).await?)?;

        let token =
            response.access_token.filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)?;
        self.token = Some(AccessToken(token));
        debug!("Authenticated");

        Ok(())
    }

    /// Executes a GraphQL query and returns the full response body.
    ///
    /// A non-empty `errors` array is turned into [`ApiError::GraphQl`] with all
    /// messages joined by `"; "`.
    pub async fn graphql(&self, query: &str, variables: Value) -> Result<Value, ApiError> {
        let token = self.token.as_ref().ok_or(ApiError::NotAuthenticated)?;

        let url = format!("{}{}", self.base_url, GRAPHQL_PATH);
        let body = GraphQlRequest { query, variables };
        let result = self.post_json(&url, &body, Some(token)).await?;

        if let Some(message) = collect_errors(&result) {
            return Err(ApiError::GraphQl(message));
        }

        Ok(result)
    }

    /// Executes a query and decodes `data.<field>`. Null or missing yields `None`.
    pub async fn query_data<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<Option<T>, ApiError> {
        let mut body = self.graphql(query, variables).await?;

        match body.get_mut("data").and_then(|d| d.get_mut(field)).map(Value::take) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Sends a JSON POST and parses the JSON response.
    async fn post_json(
        &self,
        url: &str,
        body: &impl Serialize,
        token: Option<&AccessToken>,
    ) -> Result<Value, ApiError> {
        debug!("POST {}", url);

        let mut request = self
            .client
            .post(url)
            .emulation(Emulation::Chrome131)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(serde_json::to_vec(body)?);

        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent.as_str());
        }

        if let Some(token) = token {
            request = request.header("Authorization", token.bearer());
        }

        let response = request.send().await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), url: url.to_string() });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Joins the messages of an `errors` entry. Any `errors` key counts as a failure,
/// even an empty or null one.
fn collect_errors(body: &Value) -> Option<String> {
    let messages: Vec<&str> = match body.get("errors")? {
        Value::Array(errors) => errors.iter().map(error_message).collect(),
        Value::Null => Vec::new(),
        other => vec![error_message(other)],
    };

    Some(messages.join("; "))
}

fn error_message(error: &Value) -> &str {
    error.get("message").and_then(Value::as_str).unwrap_or("Unknown error")
}

#[async_trait]
impl ProductCatalog for AhClient {
    async fn try_search_products(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResult, ApiError> {
        info!("Searching: {}", query);

        let input = serde_json::to_value(SearchInput { query, options })?;
        let payload: Option<SearchPayload> = self
            .query_data(queries::SEARCH_PRODUCTS, json!({ "input": input }), "searchProducts")
            .await?;

        let payload =
            payload.unwrap_or(SearchPayload { total_found: Some(0), products: Vec::new() });
        let result = SearchResult::from_payload(payload);
        debug!("Found {} products ({:?} total)", result.products.len(), result.total_found);

        Ok(result)
    }

    async fn try_get_product(&self, id: i64) -> Result<Option<Product>, ApiError> {
        info!("Fetching product: {}", id);

        let product = self.query_data(queries::PRODUCT, json!({ "id": id }), "product").await?;
        if product.is_none() {
            debug!("Product {} not found", id);
        }

        Ok(product)
    }
}
