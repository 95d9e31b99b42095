//! Data models for Albert Heijn products, prices, and search results.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decodes `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Default price tolerance used by price-filtered search (currency units, not cents).
pub const DEFAULT_TOLERANCE: f64 = 0.10;

/// A product as returned by the GraphQL API.
///
/// Only `id` is required. Fields the client does not model are kept in `extra`
/// and written back out on serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Webshop product identifier
    pub id: i64,
    /// Product title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Brand name if available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Short description (only requested by product lookup)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Current and previous price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_v2: Option<PriceV2>,
    /// Regular list price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_price: Option<ListPrice>,
    /// Product images
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    /// Any other fields returned by the API
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Resolves the effective price of this product.
    ///
    /// Prefers `priceV2.now.amount`, then `listPrice.amount`. Zero amounts are
    /// treated as missing.
    pub fn resolved_price(&self) -> Option<f64> {
        let now = self
            .price_v2
            .as_ref()
            .and_then(|p| p.now.as_ref())
            .and_then(|m| m.amount)
            .filter(|a| *a != 0.0);

        now.or_else(|| self.list_price.as_ref().and_then(|p| p.amount).filter(|a| *a != 0.0))
    }

    /// Returns a display string for the price, preferring the API's own formatting.
    pub fn display_price(&self) -> Option<String> {
        let formatted = self
            .price_v2
            .as_ref()
            .and_then(|p| p.now.as_ref())
            .and_then(|m| m.formatted_v2.clone());

        formatted.or_else(|| self.resolved_price().map(|p| format!("€{:.2}", p)))
    }

    /// Returns the URL of the first image that has one.
    pub fn image_url(&self) -> Option<&str> {
        self.images.iter().map(|i| i.url.as_str()).find(|url| !url.is_empty())
    }
}

/// Current and previous price of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceV2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was: Option<Money>,
}

/// An amount with the API's preformatted representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, rename = "formattedV2", skip_serializing_if = "Option::is_none")]
    pub formatted_v2: Option<String>,
}

impl Money {
    /// Creates an amount without formatting.
    pub fn amount(amount: f64) -> Self {
        Self { amount: Some(amount), formatted_v2: None }
    }
}

/// List price with currency code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPrice {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Product image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// Sort order accepted by `searchProducts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "RELEVANCE")]
    Relevance,
    #[serde(rename = "PRICE_LOW_HIGH")]
    PriceLowHigh,
    #[serde(rename = "PRICE_HIGH_LOW")]
    PriceHighLow,
    #[serde(rename = "NAME_A_Z")]
    NameAZ,
    #[serde(rename = "NAME_Z_A")]
    NameZA,
}

impl SortType {
    /// Returns all sort orders.
    pub fn all() -> &'static [SortType] {
        &[
            SortType::Relevance,
            SortType::PriceLowHigh,
            SortType::PriceHighLow,
            SortType::NameAZ,
            SortType::NameZA,
        ]
    }

    /// Returns the value sent to the API.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            SortType::Relevance => "RELEVANCE",
            SortType::PriceLowHigh => "PRICE_LOW_HIGH",
            SortType::PriceHighLow => "PRICE_HIGH_LOW",
            SortType::NameAZ => "NAME_A_Z",
            SortType::NameZA => "NAME_Z_A",
        }
    }
}

impl std::str::FromStr for SortType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "relevance" => Ok(SortType::Relevance),
            "price-low" | "price-low-high" => Ok(SortType::PriceLowHigh),
            "price-high" | "price-high-low" => Ok(SortType::PriceHighLow),
            "name-a-z" => Ok(SortType::NameAZ),
            "name-z-a" => Ok(SortType::NameZA),
            _ => Err(format!(
                "Unknown sort: {}. Use: relevance, price-low, price-high, name-a-z, name-z-a",
                s
            )),
        }
    }
}

impl std::fmt::Display for SortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortType::Relevance => write!(f, "relevance"),
            SortType::PriceLowHigh => write!(f, "price-low"),
            SortType::PriceHighLow => write!(f, "price-high"),
            SortType::NameAZ => write!(f, "name-a-z"),
            SortType::NameZA => write!(f, "name-z-a"),
        }
    }
}

/// Pagination for search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub size: u32,
    #[serde(default)]
    pub number: u32,
}

impl Page {
    /// First page with the given size.
    pub fn first(size: u32) -> Self {
        Self { size, number: 0 }
    }
}

/// Optional search parameters merged verbatim into the search input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    /// Passthrough keys, not validated
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: SortType) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    /// Adds an arbitrary key to the search input.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// The `input` variable of the SearchProducts query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchInput<'a> {
    pub query: &'a str,
    #[serde(flatten)]
    pub options: &'a SearchOptions,
}

/// Raw `data.searchProducts` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    #[serde(default)]
    pub total_found: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<Product>,
}

/// Outcome of a product search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub products: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_found: Option<u64>,
    /// Copy of `total_found`, present only when the API reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    /// Set when the search failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResult {
    /// Builds a result from the API payload, copying `totalFound` into `totalCount`.
    pub fn from_payload(payload: SearchPayload) -> Self {
        Self {
            products: payload.products,
            total_found: payload.total_found,
            total_count: payload.total_found,
            error: None,
        }
    }

    /// An empty result carrying an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            products: Vec::new(),
            total_found: None,
            total_count: Some(0),
            error: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Outcome of a price-filtered search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSearchResult {
    pub products: Vec<Product>,
    pub total_count: u64,
    pub original_query: String,
    pub target_price: f64,
    pub tolerance: f64,
    /// Error of the underlying search, if it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PriceSearchResult {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
