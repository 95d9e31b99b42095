//! Output formatting for products (table, JSON, markdown, CSV).

use crate::ah::Product;
use crate::config::OutputFormat;

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single product.
    pub fn format_product(&self, product: &Product) -> String {
        match self.format {
            OutputFormat::Json => self.json_single(product),
            OutputFormat::Table => self.table_single(product),
            OutputFormat::Markdown => self.markdown_single(product),
            OutputFormat::Csv => self.csv_products(std::slice::from_ref(product)),
        }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_products(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
            OutputFormat::Csv => self.csv_products(products),
        }
    }

    // JSON formatting

    fn json_single(&self, product: &Product) -> String {
        serde_json::to_string_pretty(product).unwrap_or_else(|_| "{}".to_string())
    }

    fn json_products(&self, products: &[Product]) -> String {
        serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_single(&self, product: &Product) -> String {
        let mut lines = Vec::new();

        lines.push(format!("ID:      {}", product.id));
        lines.push(format!("Title:   {}", product.title));
        lines.push(format!("Brand:   {}", product.brand.as_deref().unwrap_or("Unknown")));

        if let Some(summary) = &product.summary {
            lines.push(format!("Summary: {}", summary));
        }

        match (product.display_price(), was_price(product)) {
            (Some(price), Some(was)) => lines.push(format!("Price:   {} (was {})", price, was)),
            (Some(price), None) => lines.push(format!("Price:   {}", price)),
            (None, _) => lines.push("Price:   N/A".to_string()),
        }

        if let Some(url) = product.image_url() {
            lines.push(format!("Image:   {}", url));
        }

        lines.join("\n")
    }

    fn table_products(&self, products: &[Product]) -> String {
        let index_width = 3;
        let id_width = 8;
        let price_width = 10;
        let brand_width = 16;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<index_width$}  {:<id_width$}  {:<price_width$}  {:<brand_width$}  {}",
            "#", "ID", "Price", "Brand", "Title"
        ));
        lines.push(format!(
            "{:-<index_width$}  {:-<id_width$}  {:-<price_width$}  {:-<brand_width$}  {:-<title_width$}",
            "", "", "", "", ""
        ));

        for (i, product) in products.iter().enumerate() {
            let price_str = product.display_price().unwrap_or_else(|| "N/A".to_string());
            let brand = truncate(product.brand.as_deref().unwrap_or("-"), brand_width);
            let title = truncate(&product.title, title_width);

            lines.push(format!(
                "{:<index_width$}  {:<id_width$}  {:>price_width$}  {:<brand_width$}  {}",
                i + 1,
                product.id,
                price_str,
                brand,
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_single(&self, product: &Product) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.title));
        lines.push(String::new());

        lines.push(format!("- **ID:** {}", product.id));

        if let Some(brand) = &product.brand {
            lines.push(format!("- **Brand:** {}", brand));
        }

        if let Some(price) = product.display_price() {
            match was_price(product) {
                Some(was) => lines.push(format!("- **Price:** {} ~~{}~~", price, was)),
                None => lines.push(format!("- **Price:** {}", price)),
            }
        }

        if let Some(summary) = &product.summary {
            lines.push(format!("- **Summary:** {}", summary));
        }

        if let Some(url) = product.image_url() {
            lines.push(format!("- **Image:** ![{}]({})", product.title, url));
        }

        lines.join("\n")
    }

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| # | ID | Price | Brand | Title |".to_string());
        lines.push("|---|----|-------|-------|-------|".to_string());

        for (i, product) in products.iter().enumerate() {
            let price_str = product.display_price().unwrap_or_else(|| "N/A".to_string());

            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                i + 1,
                product.id,
                price_str,
                product.brand.as_deref().unwrap_or(""),
                truncate(&product.title, 40)
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "id,title,brand,price,was_price,list_price,currency,image_url".to_string()
    }

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            let price = product.resolved_price().map(|p| p.to_string()).unwrap_or_default();

            let was = product
                .price_v2
                .as_ref()
                .and_then(|p| p.was.as_ref())
                .and_then(|m| m.amount)
                .map(|a| a.to_string())
                .unwrap_or_default();

            let list = product
                .list_price
                .as_ref()
                .and_then(|p| p.amount)
                .map(|a| a.to_string())
                .unwrap_or_default();

            let currency =
                product.list_price.as_ref().and_then(|p| p.currency.clone()).unwrap_or_default();

            let brand = product.brand.as_ref().map(|b| Self::csv_escape(b)).unwrap_or_default();

            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                product.id,
                Self::csv_escape(&product.title),
                brand,
                price,
                was,
                list,
                currency,
                product.image_url().unwrap_or_default()
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

/// Previous price for display, when the product is discounted.
fn was_price(product: &Product) -> Option<String> {
    let was = product.price_v2.as_ref()?.was.as_ref()?;
    was.formatted_v2.clone().or_else(|| was.amount.map(|a| format!("€{:.2}", a)))
}

/// Shortens to `max` characters, ending with "..." when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ah::models::{Image, ListPrice, Money, PriceV2};
    use serde_json::Map;

    fn make_product() -> Product {
        Product {
            id: 441199,
            title: "AH Halfvolle melk".to_string(),
            brand: Some("AH".to_string()),
            summary: Some("Verse halfvolle melk".to_string()),
            price_v2: Some(PriceV2 {
                now: Some(Money { amount: Some(1.09), formatted_v2: Some("€ 1,09".to_string()) }),
                was: Some(Money { amount: Some(1.29), formatted_v2: Some("€ 1,29".to_string()) }),
            }),
            list_price: Some(ListPrice { amount: Some(1.29), currency: Some("EUR".to_string()) }),
            images: vec![Image { url: "https://static.ah.nl/melk.jpg".to_string() }],
            extra: Map::new(),
        }
    }

    fn make_minimal_product() -> Product {
        Product {
            id: 7,
            title: "Minimal".to_string(),
            brand: None,
            summary: None,
            price_v2: None,
            list_price: None,
            images: Vec::new(),
            extra: Map::new(),
        }
    }

    fn make_list_price_product() -> Product {
        Product {
            id: 8,
            title: "Kaas, jong belegen".to_string(),
            brand: Some("Old \"Amsterdam\"".to_string()),
            summary: None,
            price_v2: None,
            list_price: Some(ListPrice { amount: Some(4.5), currency: Some("EUR".to_string()) }),
            images: Vec::new(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_json_single_product() {
        let output = Formatter::new(OutputFormat::Json).format_product(&make_product());

        assert!(output.contains("441199"));
        assert!(output.contains("\"priceV2\""));
        assert!(output.contains("\"formattedV2\": \"€ 1,09\""));
        assert!(output.contains("\"listPrice\""));
    }

    #[test]
    fn test_json_multiple_products() {
        let products = vec![make_product(), make_minimal_product()];
        let output = Formatter::new(OutputFormat::Json).format_products(&products);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
        assert!(output.contains("441199"));
        assert!(output.contains("Minimal"));
    }

    #[test]
    fn test_json_empty() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_products(&[]), "[]");
    }

    #[test]
    fn test_table_single_product() {
        let output = Formatter::new(OutputFormat::Table).format_product(&make_product());

        assert!(output.contains("ID:      441199"));
        assert!(output.contains("Title:   AH Halfvolle melk"));
        assert!(output.contains("Brand:   AH"));
        assert!(output.contains("Summary: Verse halfvolle melk"));
        assert!(output.contains("Price:   € 1,09 (was € 1,29)"));
        assert!(output.contains("Image:   https://static.ah.nl/melk.jpg"));
    }

    #[test]
    fn test_table_single_minimal_product() {
        let output = Formatter::new(OutputFormat::Table).format_product(&make_minimal_product());

        assert!(output.contains("ID:      7"));
        assert!(output.contains("Brand:   Unknown"));
        assert!(output.contains("Price:   N/A"));
        assert!(!output.contains("Summary:"));
        assert!(!output.contains("Image:"));
    }

    #[test]
    fn test_table_single_list_price_fallback() {
        let output = Formatter::new(OutputFormat::Table).format_product(&make_list_price_product());
        assert!(output.contains("Price:   €4.50"));
    }

    #[test]
    fn test_table_multiple_products() {
        let products = vec![make_product(), make_minimal_product(), make_list_price_product()];
        let output = Formatter::new(OutputFormat::Table).format_products(&products);

        assert!(output.contains("ID"));
        assert!(output.contains("Price"));
        assert!(output.contains("Brand"));
        assert!(output.contains("Title"));
        assert!(output.contains("--------"));

        assert!(output.contains("441199"));
        assert!(output.contains("€ 1,09"));
        assert!(output.contains("N/A"));
        assert!(output.contains("€4.50"));
        assert!(output.contains("Total: 3 products"));
    }

    #[test]
    fn test_table_long_title_truncation() {
        let mut product = make_product();
        product.title =
            "Zéér lange productnaam die ruim over de vijftig tekens gaat en dus wordt afgekapt"
                .to_string();
        let output = Formatter::new(OutputFormat::Table).format_products(&[product]);

        assert!(output.contains("Zéér lange productnaam"));
        assert!(output.contains("..."));
    }

    #[test]
    fn test_table_empty() {
        assert_eq!(Formatter::new(OutputFormat::Table).format_products(&[]), "No products found.");
    }

    #[test]
    fn test_markdown_single_product() {
        let output = Formatter::new(OutputFormat::Markdown).format_product(&make_product());

        assert!(output.contains("## AH Halfvolle melk"));
        assert!(output.contains("- **ID:** 441199"));
        assert!(output.contains("- **Brand:** AH"));
        assert!(output.contains("- **Price:** € 1,09 ~~€ 1,29~~"));
        assert!(output.contains("- **Summary:** Verse halfvolle melk"));
        assert!(output.contains("![AH Halfvolle melk](https://static.ah.nl/melk.jpg)"));
    }

    #[test]
    fn test_markdown_single_minimal() {
        let output = Formatter::new(OutputFormat::Markdown).format_product(&make_minimal_product());

        assert!(output.contains("## Minimal"));
        assert!(!output.contains("- **Price:**"));
        assert!(!output.contains("- **Brand:**"));
        assert!(!output.contains("~~"));
    }

    #[test]
    fn test_markdown_multiple_products() {
        let products = vec![make_product(), make_minimal_product()];
        let output = Formatter::new(OutputFormat::Markdown).format_products(&products);

        assert!(output.contains("| # | ID | Price | Brand | Title |"));
        assert!(output.contains("| 1 | 441199 | € 1,09 | AH | AH Halfvolle melk |"));
        assert!(output.contains("| 2 | 7 | N/A |  | Minimal |"));
        assert!(output.contains("*2 products found*"));
    }

    #[test]
    fn test_markdown_empty() {
        assert_eq!(
            Formatter::new(OutputFormat::Markdown).format_products(&[]),
            "No products found."
        );
    }

    #[test]
    fn test_csv_products() {
        let products = vec![make_product(), make_minimal_product(), make_list_price_product()];
        let output = Formatter::new(OutputFormat::Csv).format_products(&products);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "id,title,brand,price,was_price,list_price,currency,image_url");
        assert_eq!(
            lines[1],
            "441199,AH Halfvolle melk,AH,1.09,1.29,1.29,EUR,https://static.ah.nl/melk.jpg"
        );
        assert_eq!(lines[2], "7,Minimal,,,,,,");
        assert_eq!(lines[3], "8,\"Kaas, jong belegen\",\"Old \"\"Amsterdam\"\"\",4.5,,4.5,EUR,");
    }

    #[test]
    fn test_csv_single_product() {
        let output = Formatter::new(OutputFormat::Csv).format_product(&make_minimal_product());
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_csv_empty() {
        assert_eq!(
            Formatter::new(OutputFormat::Csv).format_products(&[]),
            "id,title,brand,price,was_price,list_price,currency,image_url"
        );
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(Formatter::csv_escape("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(Formatter::csv_escape("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("crème brûlée", 20), "crème brûlée");
        assert_eq!(truncate("crème brûlée", 8), "crème...");
        assert_eq!(truncate("abc", 2), "...");
    }
}
